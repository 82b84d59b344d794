//=========================================================================
// GPU Interop
//=========================================================================
//
// Seam for a GPU-compute layer that shares the window's graphics device.
//
// The engine reads the `GraphicsDevice` from the platform once at boot
// and hands it to the interop layer, which must bind to that same device.
// Failure there is fatal to startup. The interop is shut down after the
// last scene run.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

use log::debug;
use thiserror::Error;

//=== GraphicsDevice ======================================================

/// Identifies the graphics device backing the window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphicsDevice {
    /// Adapter index as reported by the platform.
    pub index: u32,

    /// Human-readable adapter or context name.
    pub name: String,
}

impl GraphicsDevice {
    pub fn new(index: u32, name: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
        }
    }
}

impl fmt::Display for GraphicsDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} ({})", self.index, self.name)
    }
}

//=== InteropError ========================================================

/// Compute interop failures.
#[derive(Debug, Error)]
pub enum InteropError {
    /// The compute runtime could not bind to the graphics device.
    #[error("compute interop could not bind to device {device}: {reason}")]
    DeviceBinding { device: GraphicsDevice, reason: String },

    /// No compute runtime is present on this machine.
    #[error("compute runtime unavailable: {0}")]
    Unavailable(String),
}

//=== ComputeInterop ======================================================

/// GPU compute layer sharing the render device.
pub trait ComputeInterop {
    /// Label used in logs.
    fn name(&self) -> &str {
        "compute"
    }

    /// Binds to `device`. Called exactly once, before any scene runs.
    fn initialize(&mut self, device: &GraphicsDevice) -> Result<(), InteropError>;

    /// Releases the compute context. Called once at engine shutdown.
    fn shutdown(&mut self) {}
}

//=== NoComputeInterop ====================================================

/// Interop that binds to nothing.
#[derive(Debug, Default)]
pub struct NoComputeInterop;

impl ComputeInterop for NoComputeInterop {
    fn name(&self) -> &str {
        "none"
    }

    fn initialize(&mut self, device: &GraphicsDevice) -> Result<(), InteropError> {
        debug!(target: "engine", "No compute interop configured for device {}", device);
        Ok(())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_interop_accepts_any_device() {
        let mut interop = NoComputeInterop;

        assert!(interop.initialize(&GraphicsDevice::new(0, "headless")).is_ok());
        interop.shutdown();
    }

    #[test]
    fn binding_error_names_the_device() {
        let err = InteropError::DeviceBinding {
            device: GraphicsDevice::new(1, "discrete"),
            reason: "context lost".into(),
        };

        assert_eq!(
            err.to_string(),
            "compute interop could not bind to device #1 (discrete): context lost"
        );
    }
}
