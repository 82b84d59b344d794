//=========================================================================
// Deferred Commands
//=========================================================================
//
// Structural changes requested from inside a hook.
//
// A hook only holds its own component and transform, so it cannot touch
// the actor set directly. Spawns and destroys are queued here and the
// game instance applies them at the next phase boundary, in the order
// they were issued.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::{ActorId, ActorSet};
use crate::core::component::{Component, ComponentSlot};
use crate::core::transform::Transform;
use glam::Vec3;

//=== ActorBlueprint ======================================================

/// Description of an actor to be created later.
#[derive(Debug)]
pub struct ActorBlueprint {
    name: String,
    transform: Transform,
    slots: Vec<ComponentSlot>,
    parent: Option<ActorId>,
}

impl ActorBlueprint {
    /// Blueprint with an identity transform and no components.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::new(),
            slots: Vec::new(),
            parent: None,
        }
    }

    /// Initial local transform. Hierarchy links on it are ignored.
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Initial local position.
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self
    }

    /// Appends a component.
    pub fn with_component<T: Component>(self, component: T) -> Self {
        self.with_slot(ComponentSlot::new(component))
    }

    /// Appends a pre-built slot.
    pub fn with_slot(mut self, slot: ComponentSlot) -> Self {
        self.slots.push(slot);
        self
    }

    /// Parent to link under once spawned.
    pub fn with_parent(mut self, parent: ActorId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Name the actor will get.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn spawn_into(self, actors: &mut ActorSet) -> ActorId {
        let id = actors.spawn(self.name);

        if let Some(actor) = actors.get_mut(id) {
            let transform = actor.transform_mut();
            transform.position = self.transform.position;
            transform.rotation = self.transform.rotation;
            transform.scale = self.transform.scale;

            for slot in self.slots {
                actor.attach(slot);
            }
        }

        if let Some(parent) = self.parent {
            actors.set_parent(id, parent);
        }

        id
    }
}

//=== Commands ============================================================

/// One queued structural change.
#[derive(Debug)]
pub(crate) enum Command {
    Spawn(ActorBlueprint),
    Destroy(ActorId),
}

/// Queue of spawns and destroys applied at the next phase boundary.
///
/// Spawned actors get `start` at the beginning of the following frame,
/// before their first `update`.
#[derive(Debug, Default)]
pub struct Commands {
    queue: Vec<Command>,
}

impl Commands {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues an actor for creation.
    pub fn spawn(&mut self, blueprint: ActorBlueprint) {
        self.queue.push(Command::Spawn(blueprint));
    }

    /// Queues an actor for destruction. Unknown ids are ignored when
    /// applied.
    pub fn destroy(&mut self, id: ActorId) {
        self.queue.push(Command::Destroy(id));
    }

    /// Number of queued commands.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns `true` if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Takes every queued command, leaving the queue empty.
    pub(crate) fn take(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.queue)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
