//=========================================================================
// Engine Control
//=========================================================================
//
// Cooperative reset / scene-switch requests.
//
// The handle is cloned into every game instance and handed to component
// hooks, so gameplay code can ask the engine to rebuild the current scene
// or move to another one. Requests only set flags; the frame loop checks
// them at the end of each frame and the engine acts between runs.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::Cell;
use std::rc::Rc;

use log::debug;

//=== EngineControl =======================================================

#[derive(Debug, Default)]
struct ControlState {
    pending_reset: Cell<bool>,
    next_scene: Cell<usize>,
    scene_count: Cell<usize>,
}

/// Shared handle for reset and scene-switch requests.
///
/// Clones refer to the same state. The handle is single-threaded.
#[derive(Debug, Clone, Default)]
pub struct EngineControl {
    state: Rc<ControlState>,
}

impl EngineControl {
    /// Creates a handle with no registered scenes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ends the current run after this frame and rebuilds the same scene.
    pub fn reset(&self) {
        self.state.pending_reset.set(true);
    }

    /// Selects the scene for the next run and requests a reset.
    ///
    /// Out-of-range indices are clamped to the last scene. Returns the
    /// index that will actually run.
    pub fn switch_scene(&self, index: usize) -> usize {
        let clamped = self.clamp(index);
        if clamped != index {
            debug!(
                target: "engine",
                "Scene index {} out of range ({} scenes), clamped to {}",
                index, self.state.scene_count.get(), clamped
            );
        }
        self.state.next_scene.set(clamped);
        self.state.pending_reset.set(true);
        clamped
    }

    /// Whether a reset has been requested during the current run.
    pub fn is_reset_pending(&self) -> bool {
        self.state.pending_reset.get()
    }

    /// Index the next run will use.
    pub fn next_scene(&self) -> usize {
        self.state.next_scene.get()
    }

    /// Number of registered scenes.
    pub fn scene_count(&self) -> usize {
        self.state.scene_count.get()
    }

    //--- Engine Side ------------------------------------------------------

    /// Clears the pending reset and returns the scene index to run.
    pub(crate) fn begin_run(&self) -> usize {
        self.state.pending_reset.set(false);
        self.state.next_scene.get()
    }

    pub(crate) fn set_scene_count(&self, count: usize) {
        self.state.scene_count.set(count);
        self.state.next_scene.set(self.clamp(self.state.next_scene.get()));
    }

    fn clamp(&self, index: usize) -> usize {
        index.min(self.state.scene_count.get().saturating_sub(1))
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
