//=========================================================================
// Scene System
//=========================================================================
//
// Scenes describe what a run starts with.
//
// Architecture:
//   SceneRegistry
//     └─ entries: Vec<(Box<dyn Scene>, SceneCallbacks)>   index = scene id
//
// Per run, for the selected scene:
//   populate_actors → on_enter → GameInstance::run → on_exit → clear
//
// A scene keeps no hold on the game instance between runs; every run
// populates a fresh one.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::game::{Callback, GameInstance};

//=== Module Declarations =================================================

mod registry;

//=== Public API ==========================================================

pub use registry::SceneRegistry;

//=== SceneCallbacks ======================================================

/// Hooks a scene registers while populating.
///
/// Cleared after every run, so listeners never leak into the next one.
#[derive(Debug, Default)]
pub struct SceneCallbacks {
    /// Fired after population, before the first frame.
    pub on_enter: Callback<()>,

    /// Fired after the run has torn down.
    pub on_exit: Callback<()>,
}

impl SceneCallbacks {
    /// Removes every listener.
    pub fn clear(&mut self) {
        self.on_enter.clear();
        self.on_exit.clear();
    }
}

//=== Scene Trait =========================================================

/// Populates a game instance with actors.
///
/// ```rust
/// # use stagehand::prelude::*;
/// struct Sandbox;
///
/// impl Scene for Sandbox {
///     fn name(&self) -> &str {
///         "Sandbox"
///     }
///
///     fn populate_actors(
///         &mut self,
///         game: &mut GameInstance,
///         callbacks: &mut SceneCallbacks,
///     ) -> anyhow::Result<()> {
///         let ground = game.create_actor("ground");
///         game.actor_mut(ground).unwrap().transform_mut().scale = Vec3::new(10.0, 1.0, 10.0);
///         callbacks.on_enter.register(|_| log::info!("sandbox ready"));
///         Ok(())
///     }
/// }
/// ```
pub trait Scene {
    /// Label used in logs.
    fn name(&self) -> &str {
        "Scene"
    }

    /// Creates the actors and registers the callbacks for one run.
    ///
    /// Returning `Err` aborts the engine with
    /// [`EngineError::ScenePopulation`](crate::engine::EngineError::ScenePopulation).
    fn populate_actors(
        &mut self,
        game: &mut GameInstance,
        callbacks: &mut SceneCallbacks,
    ) -> anyhow::Result<()>;
}

//=== FnScene =============================================================

/// Scene built from a closure.
pub struct FnScene<F> {
    name: String,
    populate: F,
}

impl<F> FnScene<F>
where
    F: FnMut(&mut GameInstance, &mut SceneCallbacks) -> anyhow::Result<()>,
{
    pub fn new(name: impl Into<String>, populate: F) -> Self {
        Self {
            name: name.into(),
            populate,
        }
    }
}

impl<F> Scene for FnScene<F>
where
    F: FnMut(&mut GameInstance, &mut SceneCallbacks) -> anyhow::Result<()>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn populate_actors(
        &mut self,
        game: &mut GameInstance,
        callbacks: &mut SceneCallbacks,
    ) -> anyhow::Result<()> {
        (self.populate)(game, callbacks)
    }
}
