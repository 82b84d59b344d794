//=========================================================================
// Component Slot
//=========================================================================
//
// Per-attachment bookkeeping around a boxed component.
//
// The slot is where the lifecycle guarantees live: it records whether
// `start` and `on_destroy` already ran, owns the `enabled` flag, holds
// the back-reference to the owning actor (an id, set at attach time),
// and isolates hook failures so one misbehaving component cannot take
// the frame loop down with it.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use log::error;

//=== Internal Dependencies ===============================================

use super::{Component, ComponentContext};
use crate::core::actor::{ActorId, ActorSet, Commands};
use crate::core::game::FrameTime;
use crate::core::input::InputState;
use crate::core::transform::Transform;
use crate::engine::EngineControl;

//=== HookPhase ===========================================================

/// Lifecycle hook selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HookPhase {
    Start,
    Update,
    FixedUpdate,
    Destroy,
}

impl fmt::Display for HookPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Start => "start",
            Self::Update => "update",
            Self::FixedUpdate => "fixed_update",
            Self::Destroy => "on_destroy",
        };
        f.write_str(name)
    }
}

//=== HookEnv =============================================================

/// Frame-wide state shared by every hook call in a phase.
pub(crate) struct HookEnv<'a> {
    pub time: &'a FrameTime,
    pub input: &'a InputState,
    pub control: &'a EngineControl,
    pub commands: &'a mut Commands,
}

//=== ComponentSlot =======================================================

/// A component plus its attachment state.
///
/// Slots can be created before attachment; an unattached slot has no
/// owner and resolves its transform to [`Transform::detached`].
pub struct ComponentSlot {
    behaviour: Box<dyn Component>,
    enabled: bool,
    owner: Option<ActorId>,
    started: bool,
    destroyed: bool,
    faulted: bool,
}

impl ComponentSlot {
    //--- Construction -----------------------------------------------------

    /// Wraps a component. The slot starts enabled and unattached.
    pub fn new<T: Component>(component: T) -> Self {
        Self::from_boxed(Box::new(component))
    }

    /// Wraps an already boxed component.
    pub fn from_boxed(behaviour: Box<dyn Component>) -> Self {
        Self {
            behaviour,
            enabled: true,
            owner: None,
            started: false,
            destroyed: false,
            faulted: false,
        }
    }

    /// Sets the initial enabled state (builder style).
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    //--- Queries ----------------------------------------------------------

    /// The component's label.
    pub fn name(&self) -> &str {
        self.behaviour.name()
    }

    /// Whether update / fixed_update are dispatched.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enables or disables update dispatch. Start and destroy ignore it.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Owning actor, once attached.
    pub fn owner(&self) -> Option<ActorId> {
        self.owner
    }

    /// `start` has run.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// `on_destroy` has run.
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// A hook failed and the component was disabled.
    pub fn is_faulted(&self) -> bool {
        self.faulted
    }

    /// Resolves the owner's transform, or the detached default when the
    /// slot is unattached or its owner no longer exists.
    pub fn transform<'a>(&self, actors: &'a ActorSet) -> &'a Transform {
        self.owner
            .and_then(|id| actors.get(id))
            .map(|actor| actor.transform())
            .unwrap_or_else(|| Transform::detached())
    }

    /// Downcasts to the concrete component type.
    pub fn get<T: Component>(&self) -> Option<&T> {
        let behaviour: &dyn Component = &*self.behaviour;
        behaviour.as_any().downcast_ref::<T>()
    }

    /// Downcasts to the concrete component type, mutable.
    pub fn get_mut<T: Component>(&mut self) -> Option<&mut T> {
        let behaviour: &mut dyn Component = &mut *self.behaviour;
        behaviour.as_any_mut().downcast_mut::<T>()
    }

    /// Returns `true` if the component is a `T`.
    pub fn is<T: Component>(&self) -> bool {
        self.get::<T>().is_some()
    }

    //--- Lifecycle (driven by GameInstance) -------------------------------

    pub(crate) fn attach(&mut self, owner: ActorId) {
        self.owner = Some(owner);
    }

    /// Whether `phase` should be dispatched to this slot right now.
    pub(crate) fn wants(&self, phase: HookPhase) -> bool {
        match phase {
            HookPhase::Start => !self.started && !self.destroyed,
            HookPhase::Update | HookPhase::FixedUpdate => {
                self.started && self.enabled && !self.faulted && !self.destroyed
            }
            HookPhase::Destroy => !self.destroyed,
        }
    }

    /// Runs one hook with failure isolation.
    ///
    /// An `Err` or a panic from `start`, `update` or `fixed_update` is
    /// logged and faults the component (disabled for the rest of the run).
    /// A failing `on_destroy` is only logged.
    pub(crate) fn invoke(
        &mut self,
        phase: HookPhase,
        actor: ActorId,
        actor_name: &str,
        transform: &mut Transform,
        env: &mut HookEnv<'_>,
    ) {
        match phase {
            HookPhase::Start => self.started = true,
            HookPhase::Destroy => self.destroyed = true,
            HookPhase::Update | HookPhase::FixedUpdate => {}
        }

        let outcome = {
            let behaviour = &mut self.behaviour;
            let mut ctx = ComponentContext::new(
                actor,
                actor_name,
                transform,
                &mut self.enabled,
                env.time,
                env.input,
                env.control,
                env.commands,
            );

            panic::catch_unwind(AssertUnwindSafe(|| match phase {
                HookPhase::Start => behaviour.start(&mut ctx),
                HookPhase::Update => behaviour.update(&mut ctx),
                HookPhase::FixedUpdate => behaviour.fixed_update(&mut ctx),
                HookPhase::Destroy => behaviour.on_destroy(&mut ctx),
            }))
        };

        let reason = match outcome {
            Ok(Ok(())) => return,
            Ok(Err(err)) => format!("{err:#}"),
            Err(payload) => format!("panicked: {}", panic_message(payload.as_ref())),
        };

        if phase == HookPhase::Destroy {
            error!(
                target: "game",
                "{} of `{}` on actor `{}` failed: {}",
                phase, self.behaviour.name(), actor_name, reason
            );
            return;
        }

        self.faulted = true;
        self.enabled = false;
        error!(
            target: "game",
            "{} of `{}` on actor `{}` failed: {}; component disabled",
            phase, self.behaviour.name(), actor_name, reason
        );
    }
}

impl fmt::Debug for ComponentSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentSlot")
            .field("name", &self.name())
            .field("enabled", &self.enabled)
            .field("owner", &self.owner)
            .field("started", &self.started)
            .field("destroyed", &self.destroyed)
            .field("faulted", &self.faulted)
            .finish()
    }
}

//--- Helpers -------------------------------------------------------------

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
