//=========================================================================
// Scene Registry
//=========================================================================
//
// Ordered scene list addressed by index, with each scene's callbacks.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, error};

//=== Internal Dependencies ===============================================

use super::{Scene, SceneCallbacks};
use crate::core::game::GameInstance;
use crate::engine::EngineError;

//=== SceneRegistry =======================================================

struct SceneEntry {
    scene: Box<dyn Scene>,
    callbacks: SceneCallbacks,
}

/// Scenes in registration order.
#[derive(Default)]
pub struct SceneRegistry {
    entries: Vec<SceneEntry>,
}

impl SceneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces every scene.
    pub fn set(&mut self, scenes: Vec<Box<dyn Scene>>) {
        self.entries = scenes
            .into_iter()
            .map(|scene| SceneEntry {
                scene,
                callbacks: SceneCallbacks::default(),
            })
            .collect();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Name of scene `index`.
    pub fn name(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|entry| entry.scene.name())
    }

    //--- Run Protocol -----------------------------------------------------

    /// Lets scene `index` populate `game`.
    pub(crate) fn populate(&mut self, index: usize, game: &mut GameInstance) -> Result<(), EngineError> {
        let Some(entry) = self.entries.get_mut(index) else {
            return Err(EngineError::NoScenes);
        };

        debug!(target: "scene", "Populating scene `{}`", entry.scene.name());
        entry
            .scene
            .populate_actors(game, &mut entry.callbacks)
            .map_err(|err| {
                error!(target: "scene", "Scene `{}` failed to populate: {:#}", entry.scene.name(), err);
                EngineError::ScenePopulation {
                    scene: entry.scene.name().to_string(),
                    reason: format!("{err:#}"),
                }
            })
    }

    pub(crate) fn enter(&mut self, index: usize) {
        if let Some(entry) = self.entries.get_mut(index) {
            entry.callbacks.on_enter.invoke(&());
        }
    }

    pub(crate) fn exit(&mut self, index: usize) {
        if let Some(entry) = self.entries.get_mut(index) {
            entry.callbacks.on_exit.invoke(&());
        }
    }

    pub(crate) fn clear_callbacks(&mut self, index: usize) {
        if let Some(entry) = self.entries.get_mut(index) {
            entry.callbacks.clear();
        }
    }

    #[cfg(test)]
    pub(crate) fn callbacks(&self, index: usize) -> Option<&SceneCallbacks> {
        self.entries.get(index).map(|entry| &entry.callbacks)
    }
}

impl std::fmt::Debug for SceneRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|entry| entry.scene.name()))
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
