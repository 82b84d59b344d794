//=========================================================================
// Actor
//=========================================================================
//
// Unit of scene composition: a name, a transform and an ordered list of
// components.
//
// Architecture:
//   ActorSet (arena, one per GameInstance)
//     ├─ SlotMap<ActorId, Actor>      stable ids, weak links
//     └─ order: Vec<ActorId>          creation order = dispatch order
//
//   Actor
//     ├─ transform: Transform         always present
//     └─ components: Vec<ComponentSlot>
//
//=========================================================================

//=== External Dependencies ===============================================

use slotmap::new_key_type;

//=== Internal Dependencies ===============================================

use crate::core::component::{Component, ComponentSlot};
use crate::core::transform::Transform;

//=== Module Declarations =================================================

mod actor_set;
mod commands;

//=== Public API ==========================================================

pub use actor_set::ActorSet;
pub use commands::{ActorBlueprint, Commands};
pub(crate) use commands::Command;

new_key_type! {
    /// Stable handle to an actor inside one [`ActorSet`].
    ///
    /// Ids are never reused while the set lives, so a stale id simply
    /// resolves to nothing.
    pub struct ActorId;
}

//=== Actor ===============================================================

/// A named transform with attached components.
///
/// Actors are created through
/// [`GameInstance::create_actor`](crate::core::game::GameInstance::create_actor)
/// (or [`Commands::spawn`] from inside a hook) and live in the instance's
/// [`ActorSet`].
#[derive(Debug)]
pub struct Actor {
    id: ActorId,
    name: String,
    transform: Transform,
    components: Vec<ComponentSlot>,
}

impl Actor {
    pub(crate) fn new(id: ActorId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            transform: Transform::new(),
            components: Vec::new(),
        }
    }

    //--- Identity ---------------------------------------------------------

    /// This actor's id.
    pub fn id(&self) -> ActorId {
        self.id
    }

    /// This actor's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    //--- Transform --------------------------------------------------------

    /// Local transform.
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Local transform, mutable.
    ///
    /// Parent / child links are read-only here; change them through
    /// [`ActorSet::set_parent`].
    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    //--- Components -------------------------------------------------------

    /// Attaches `component` and returns it for further setup.
    ///
    /// ```rust
    /// # use stagehand::prelude::*;
    /// # use stagehand::core::render::Light;
    /// # let mut actors = ActorSet::new();
    /// # let id = actors.spawn("sun");
    /// # let actor = actors.get_mut(id).unwrap();
    /// actor.add_component(Light::default()).intensity = 2.5;
    /// ```
    pub fn add_component<T: Component>(&mut self, component: T) -> &mut T {
        let index = self.attach(ComponentSlot::new(component));
        self.components[index]
            .get_mut::<T>()
            .expect("component slot holds the type it was created with")
    }

    /// Attaches a pre-built slot (e.g. one created disabled) and returns
    /// its index.
    pub fn attach(&mut self, mut slot: ComponentSlot) -> usize {
        slot.attach(self.id);
        self.components.push(slot);
        self.components.len() - 1
    }

    /// First component of type `T`.
    pub fn get_component<T: Component>(&self) -> Option<&T> {
        self.components.iter().find_map(|slot| slot.get::<T>())
    }

    /// First component of type `T`, mutable.
    pub fn get_component_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.components.iter_mut().find_map(|slot| slot.get_mut::<T>())
    }

    /// Every component of type `T`, in attachment order.
    pub fn get_components<T: Component>(&self) -> Vec<&T> {
        self.components.iter().filter_map(|slot| slot.get::<T>()).collect()
    }

    /// All slots in attachment order.
    pub fn components(&self) -> &[ComponentSlot] {
        &self.components
    }

    /// Enables or disables the component at `index`.
    ///
    /// Returns `false` if there is no such component.
    pub fn set_component_enabled(&mut self, index: usize, enabled: bool) -> bool {
        match self.components.get_mut(index) {
            Some(slot) => {
                slot.set_enabled(enabled);
                true
            }
            None => false,
        }
    }

    //--- Internal ---------------------------------------------------------

    /// Split borrow used by the frame loop.
    pub(crate) fn parts_mut(&mut self) -> (&str, &mut Transform, &mut [ComponentSlot]) {
        (&self.name, &mut self.transform, &mut self.components)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    struct Tag(&'static str);
    impl Component for Tag {}

    struct Other;
    impl Component for Other {}

    fn actor() -> (ActorSet, ActorId) {
        let mut set = ActorSet::new();
        let id = set.spawn("subject");
        (set, id)
    }

    #[test]
    fn add_component_sets_owner_and_preserves_order() {
        let (mut set, id) = actor();
        let actor = set.get_mut(id).unwrap();

        actor.add_component(Tag("first"));
        actor.add_component(Other);
        actor.add_component(Tag("second"));

        let tags: Vec<_> = actor.get_components::<Tag>().iter().map(|t| t.0).collect();
        assert_eq!(tags, vec!["first", "second"]);
        assert!(actor.components().iter().all(|slot| slot.owner() == Some(id)));
    }

    #[test]
    fn add_component_returns_instance_for_setup() {
        let (mut set, id) = actor();
        let actor = set.get_mut(id).unwrap();

        actor.add_component(Tag("before")).0 = "after";

        assert_eq!(actor.get_component::<Tag>().unwrap().0, "after");
    }

    #[test]
    fn query_with_no_match_is_empty() {
        let (set, id) = actor();
        let actor = set.get(id).unwrap();

        assert!(actor.get_component::<Tag>().is_none());
        assert!(actor.get_components::<Tag>().is_empty());
    }

    #[test]
    fn set_component_enabled_by_index() {
        let (mut set, id) = actor();
        let actor = set.get_mut(id).unwrap();
        actor.add_component(Other);

        assert!(actor.set_component_enabled(0, false));
        assert!(!actor.components()[0].is_enabled());
        assert!(!actor.set_component_enabled(3, false));
    }

    #[test]
    fn attach_prebuilt_disabled_slot() {
        let (mut set, id) = actor();
        let actor = set.get_mut(id).unwrap();

        let index = actor.attach(ComponentSlot::new(Other).with_enabled(false));

        assert_eq!(index, 0);
        assert_eq!(actor.components()[0].owner(), Some(id));
        assert!(!actor.components()[0].is_enabled());
    }
}
