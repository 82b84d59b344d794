//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use stagehand::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine
pub use crate::engine::{Engine, EngineBuilder, EngineConfig, EngineControl};

// Actors and components
pub use crate::core::actor::{Actor, ActorBlueprint, ActorId, ActorSet, Commands};
pub use crate::core::component::{Component, ComponentContext, ComponentSlot, HookResult};
pub use crate::core::transform::Transform;

// Game instance
pub use crate::core::game::{FrameTime, GameCallbacks, GameInstance};

// Scenes
pub use crate::core::scene::{FnScene, Scene, SceneCallbacks};

// Input
pub use crate::core::input::{InputState, KeyCode, Modifiers, MouseButton};

// Math
pub use glam::{Quat, Vec3, Vec4};
