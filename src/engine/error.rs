//=========================================================================
// Engine Errors
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;

//=== Internal Dependencies ===============================================

use super::config::ConfigError;
use crate::core::gpu::InteropError;
use crate::core::platform_bridge::PlatformError;
use crate::core::render::RenderError;

//=== EngineError =========================================================

/// Errors that stop the engine or the current run.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Window, event loop or graphics context failure.
    #[error(transparent)]
    Platform(#[from] PlatformError),

    /// Compute interop could not be initialised.
    #[error(transparent)]
    Interop(#[from] InteropError),

    /// The render pipeline failed during a run.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// `run` was called with no scenes registered.
    #[error("no scenes registered")]
    NoScenes,

    /// A scene failed to populate its game instance.
    #[error("scene `{scene}` failed to populate: {reason}")]
    ScenePopulation { scene: String, reason: String },
}
