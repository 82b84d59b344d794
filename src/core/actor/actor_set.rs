//=========================================================================
// Actor Set
//=========================================================================
//
// Arena owning every live actor of one game instance.
//
// Actors are stored in a slot map keyed by `ActorId`; a separate id list
// records creation order, which is the order hooks are dispatched in.
// Transform parent/child links are ids into this same arena, so all
// hierarchy edits go through here to keep both sides consistent.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use glam::Mat4;
use log::{debug, warn};
use slotmap::SlotMap;

//=== Internal Dependencies ===============================================

use super::{Actor, ActorId};
use crate::core::component::Component;

//=== ActorSet ============================================================

/// Live actors in creation order.
#[derive(Debug, Default)]
pub struct ActorSet {
    actors: SlotMap<ActorId, Actor>,
    order: Vec<ActorId>,
}

impl ActorSet {
    //--- Construction -----------------------------------------------------

    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an actor with an identity transform and no components.
    pub fn spawn(&mut self, name: impl Into<String>) -> ActorId {
        let name = name.into();
        let id = self.actors.insert_with_key(|id| Actor::new(id, name));
        self.order.push(id);
        id
    }

    //--- Access -----------------------------------------------------------

    /// Looks up an actor.
    pub fn get(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(id)
    }

    /// Looks up an actor, mutable.
    pub fn get_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.get_mut(id)
    }

    /// Returns `true` if `id` names a live actor.
    pub fn contains(&self, id: ActorId) -> bool {
        self.actors.contains_key(id)
    }

    /// Number of live actors.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if there are no live actors.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Live actor ids in creation order.
    pub fn ids(&self) -> &[ActorId] {
        &self.order
    }

    /// Live actors in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Actor> + '_ {
        self.order.iter().filter_map(move |&id| self.actors.get(id))
    }

    /// First actor (in creation order) with the given name.
    pub fn find_by_name(&self, name: &str) -> Option<ActorId> {
        self.iter().find(|actor| actor.name() == name).map(Actor::id)
    }

    //--- Component Queries ------------------------------------------------

    /// Every component of type `T` across all actors, in actor creation
    /// then attachment order. Empty when nothing matches.
    pub fn find_components<T: Component>(&self) -> Vec<&T> {
        self.iter()
            .flat_map(|actor| actor.components().iter().filter_map(|slot| slot.get::<T>()))
            .collect()
    }

    /// Mutable variant of [`find_components`](Self::find_components).
    pub fn find_components_mut<T: Component>(&mut self) -> Vec<&mut T> {
        let mut by_id: HashMap<ActorId, &mut Actor> = self.actors.iter_mut().collect();
        let mut found = Vec::new();

        for id in &self.order {
            if let Some(actor) = by_id.remove(id) {
                let (_, _, slots) = actor.parts_mut();
                found.extend(slots.iter_mut().filter_map(|slot| slot.get_mut::<T>()));
            }
        }

        found
    }

    /// First component of type `T`, if any.
    pub fn find_component<T: Component>(&self) -> Option<&T> {
        self.iter().find_map(|actor| actor.get_component::<T>())
    }

    //--- Hierarchy --------------------------------------------------------

    /// Links `child` under `parent`, moving it from any previous parent.
    ///
    /// Refuses (returns `false`) if either actor is missing or the link
    /// would create a cycle.
    pub fn set_parent(&mut self, child: ActorId, parent: ActorId) -> bool {
        if !self.contains(child) || !self.contains(parent) {
            warn!(target: "game", "set_parent on a missing actor ignored");
            return false;
        }

        if self.is_ancestor_or_self(child, parent) {
            warn!(
                target: "game",
                "Refusing to parent {:?} under its own descendant {:?}",
                child, parent
            );
            return false;
        }

        self.detach_from_parent(child);

        if let Some(actor) = self.actors.get_mut(child) {
            actor.transform_mut().set_parent_link(Some(parent));
        }
        if let Some(actor) = self.actors.get_mut(parent) {
            actor.transform_mut().push_child_link(child);
        }

        true
    }

    /// Unlinks `child` from its parent. Returns `false` if it had none.
    pub fn detach_from_parent(&mut self, child: ActorId) -> bool {
        let Some(parent) = self.actors.get(child).and_then(|a| a.transform().parent()) else {
            return false;
        };

        if let Some(actor) = self.actors.get_mut(parent) {
            actor.transform_mut().remove_child_link(child);
        }
        if let Some(actor) = self.actors.get_mut(child) {
            actor.transform_mut().set_parent_link(None);
        }

        true
    }

    /// World matrix of `id` (parent chain applied). Identity if missing.
    pub fn world_matrix(&self, id: ActorId) -> Mat4 {
        let mut matrix = Mat4::IDENTITY;
        let mut current = Some(id);
        let mut depth = 0;

        while let Some(node) = current {
            let Some(actor) = self.actors.get(node) else {
                break;
            };
            matrix = actor.transform().local_matrix() * matrix;
            current = actor.transform().parent();

            depth += 1;
            if depth > self.order.len() {
                warn!(target: "game", "Transform cycle detected at {:?}", node);
                break;
            }
        }

        matrix
    }

    fn is_ancestor_or_self(&self, candidate: ActorId, of: ActorId) -> bool {
        let mut current = Some(of);
        let mut depth = 0;

        while let Some(node) = current {
            if node == candidate {
                return true;
            }
            current = self.actors.get(node).and_then(|a| a.transform().parent());

            depth += 1;
            if depth > self.order.len() {
                return true;
            }
        }

        false
    }

    //--- Removal ----------------------------------------------------------

    /// Removes an actor and returns it (components not yet destroyed).
    ///
    /// The actor is unlinked from its parent; its children are orphaned,
    /// becoming roots that keep their local transform.
    pub fn remove(&mut self, id: ActorId) -> Option<Actor> {
        if !self.contains(id) {
            return None;
        }

        self.detach_from_parent(id);

        let mut actor = self.actors.remove(id)?;
        for child in actor.transform_mut().take_child_links() {
            if let Some(orphan) = self.actors.get_mut(child) {
                debug!(
                    target: "game",
                    "Actor `{}` orphaned by removal of `{}`",
                    orphan.name(), actor.name()
                );
                orphan.transform_mut().set_parent_link(None);
            }
        }

        self.order.retain(|&other| other != id);
        Some(actor)
    }

    /// Removes every actor, returning them in creation order.
    pub(crate) fn drain(&mut self) -> Vec<Actor> {
        let order = std::mem::take(&mut self.order);
        let mut drained = Vec::with_capacity(order.len());
        for id in order {
            if let Some(actor) = self.actors.remove(id) {
                drained.push(actor);
            }
        }
        drained
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
