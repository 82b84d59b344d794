//=========================================================================
// Component Context
//=========================================================================
//
// Everything a lifecycle hook may touch, passed explicitly per call.
//
// Components never reach the game instance or the engine through a
// global. The hook gets its owner's transform, the frame timing, the
// input snapshot, the engine control handle and a deferred command queue
// for structural changes (spawn / destroy) that are applied at the next
// phase boundary.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::actor::{ActorId, Commands};
use crate::core::game::FrameTime;
use crate::core::input::InputState;
use crate::core::transform::Transform;
use crate::engine::EngineControl;

//=== ComponentContext ====================================================

/// Per-call view handed to [`Component`](super::Component) hooks.
pub struct ComponentContext<'a> {
    actor: ActorId,
    actor_name: &'a str,
    transform: &'a mut Transform,
    enabled: &'a mut bool,
    time: &'a FrameTime,
    input: &'a InputState,
    control: &'a EngineControl,
    commands: &'a mut Commands,
}

impl<'a> ComponentContext<'a> {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        actor: ActorId,
        actor_name: &'a str,
        transform: &'a mut Transform,
        enabled: &'a mut bool,
        time: &'a FrameTime,
        input: &'a InputState,
        control: &'a EngineControl,
        commands: &'a mut Commands,
    ) -> Self {
        Self {
            actor,
            actor_name,
            transform,
            enabled,
            time,
            input,
            control,
            commands,
        }
    }

    //--- Owner ------------------------------------------------------------

    /// Id of the owning actor.
    pub fn actor(&self) -> ActorId {
        self.actor
    }

    /// Name of the owning actor.
    pub fn actor_name(&self) -> &str {
        self.actor_name
    }

    /// Owner's transform.
    pub fn transform(&self) -> &Transform {
        self.transform
    }

    /// Owner's transform, mutable.
    pub fn transform_mut(&mut self) -> &mut Transform {
        self.transform
    }

    //--- Self -------------------------------------------------------------

    /// Whether this component currently receives updates.
    pub fn is_enabled(&self) -> bool {
        *self.enabled
    }

    /// Enables or disables this component from inside its own hook.
    ///
    /// Takes effect from the next dispatch.
    pub fn set_enabled(&mut self, enabled: bool) {
        *self.enabled = enabled;
    }

    //--- Frame ------------------------------------------------------------

    /// Timing for the current frame or fixed step.
    pub fn time(&self) -> &FrameTime {
        self.time
    }

    /// Input snapshot for the current frame.
    pub fn input(&self) -> &InputState {
        self.input
    }

    //--- Engine -----------------------------------------------------------

    /// Handle for requesting a reset or a scene switch.
    pub fn control(&self) -> &EngineControl {
        self.control
    }

    /// Deferred spawn / destroy queue.
    pub fn commands(&mut self) -> &mut Commands {
        self.commands
    }
}
