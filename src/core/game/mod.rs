//=========================================================================
// Game Instance
//=========================================================================
//
// Per-run container and frame loop.
//
// Architecture:
//   Engine ──creates──> GameInstance ──scene populates──> ActorSet
//                           │
//                           └─ run(platform, events)
//                                Initializing → Running → Finalizing → Finished
//
// Per frame (strictly in order):
//   1. pump + drain platform events, update input / window, hotkeys
//   2. start every not-yet-started component
//   3. update            (unless paused)
//   4. fixed_update × N  (accumulator, capped)
//   5. animation_update, god_update (paused only)
//   6. render + present  (unless minimized)
//   7. pacing, pending reset check
//
//=========================================================================

//=== Module Declarations =================================================

mod callbacks;
mod instance;
mod timer;

//=== Public API ==========================================================

pub use callbacks::{Callback, GameCallbacks};
pub use instance::GameInstance;
pub use timer::{Clock, FrameTime};

//=== GameState ===========================================================

/// Lifecycle state of a game instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    /// Created; the scene may populate it.
    Initializing,

    /// Inside the frame loop.
    Running,

    /// Destroying components.
    Finalizing,

    /// Torn down; cannot run again.
    Finished,
}

//=== RunOutcome ==========================================================

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The window closed. Takes precedence over a pending reset.
    Closed,

    /// A reset or scene switch was requested.
    ResetRequested,
}

//=== WindowState =========================================================

/// Window size and visibility as seen by the frame loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowState {
    /// Drawable size in physical pixels.
    pub size: (u32, u32),

    pub minimized: bool,

    pub open: bool,
}

impl Default for WindowState {
    fn default() -> Self {
        Self {
            size: (0, 0),
            minimized: false,
            open: true,
        }
    }
}

//=== SimulationState =====================================================

/// Pause / single-step bookkeeping.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct SimulationState {
    paused: bool,
    step_requested: bool,
}

impl SimulationState {
    /// Whether update and fixed_update run this frame. Consumes a pending
    /// single step.
    fn take_frame(&mut self) -> FrameMode {
        if !self.paused {
            FrameMode::Running
        } else if std::mem::take(&mut self.step_requested) {
            FrameMode::Step
        } else {
            FrameMode::Paused
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameMode {
    Running,
    Step,
    Paused,
}
