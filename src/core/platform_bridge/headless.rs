//=========================================================================
// Headless Platform
//=========================================================================
//
// Window-less `Platform` driven by a script.
//
// Used for tests, servers and benchmarks: it reports a fixed window size,
// delivers pre-scheduled events on given frames and closes itself after
// a frame budget. The budget counts pumps across every run of the engine,
// so a reset does not restart it.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::BTreeMap;
use std::time::Duration;

use crossbeam_channel::Sender;
use log::debug;

//=== Internal Dependencies ===============================================

use super::interface::forward_event;
use super::{Platform, PlatformError, PlatformEvent};
use crate::core::gpu::GraphicsDevice;
use crate::core::input::InputEvent;

//=== HeadlessPlatform ====================================================

/// Scripted platform with no OS window.
#[derive(Debug)]
pub struct HeadlessPlatform {
    sender: Sender<PlatformEvent>,
    size: (u32, u32),
    open: bool,
    close_sent: bool,
    frames: u64,
    close_after: Option<u64>,
    script: BTreeMap<u64, Vec<PlatformEvent>>,
    device: Option<GraphicsDevice>,
    presented: u64,
}

impl HeadlessPlatform {
    /// Creates an open 800x600 platform with no frame budget.
    pub fn new(sender: Sender<PlatformEvent>) -> Self {
        Self {
            sender,
            size: (800, 600),
            open: true,
            close_sent: false,
            frames: 0,
            close_after: None,
            script: BTreeMap::new(),
            device: Some(GraphicsDevice::new(0, "headless")),
            presented: 0,
        }
    }

    //--- Script -----------------------------------------------------------

    /// Initial window size.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    /// Closes the window on the pump after `frames` frames.
    pub fn close_after(mut self, frames: u64) -> Self {
        self.close_after = Some(frames);
        self
    }

    /// Reports no graphics device, making engine boot fail.
    pub fn without_graphics_device(mut self) -> Self {
        self.device = None;
        self
    }

    /// Delivers `event` during the pump of frame `frame` (0-based, counted
    /// across runs).
    pub fn schedule(mut self, frame: u64, event: PlatformEvent) -> Self {
        self.script.entry(frame).or_default().push(event);
        self
    }

    /// Delivers one input event during frame `frame`.
    pub fn schedule_input(self, frame: u64, event: InputEvent) -> Self {
        let batch = if event.is_continuous() {
            PlatformEvent::Inputs {
                discrete: Vec::new(),
                continuous: vec![event],
            }
        } else {
            PlatformEvent::Inputs {
                discrete: vec![event],
                continuous: Vec::new(),
            }
        };
        self.schedule(frame, batch)
    }

    //--- Inspection -------------------------------------------------------

    /// Frames pumped so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Frames presented so far.
    pub fn presented(&self) -> u64 {
        self.presented
    }

    fn send_close(&mut self) {
        self.open = false;
        if !self.close_sent {
            self.close_sent = true;
            forward_event(&self.sender, PlatformEvent::WindowClosed);
        }
    }
}

impl Platform for HeadlessPlatform {
    fn pump_events(&mut self, _timeout: Option<Duration>) -> Result<(), PlatformError> {
        if !self.open {
            self.send_close();
            return Ok(());
        }

        if self.close_after.is_some_and(|budget| self.frames >= budget) {
            debug!(target: "platform", "Headless frame budget of {} reached", self.frames);
            self.send_close();
            return Ok(());
        }

        for event in self.script.remove(&self.frames).unwrap_or_default() {
            if let PlatformEvent::Resized { width, height } = event {
                self.size = (width, height);
            }
            if event == PlatformEvent::WindowClosed {
                self.send_close();
                continue;
            }
            forward_event(&self.sender, event);
        }

        self.frames += 1;
        Ok(())
    }

    fn window_size(&self) -> (u32, u32) {
        self.size
    }

    fn is_minimized(&self) -> bool {
        self.size.0 == 0 || self.size.1 == 0
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn request_close(&mut self) {
        self.open = false;
    }

    fn present(&mut self) -> Result<(), PlatformError> {
        self.presented += 1;
        Ok(())
    }

    fn graphics_device(&self) -> Result<GraphicsDevice, PlatformError> {
        self.device
            .clone()
            .ok_or_else(|| PlatformError::GraphicsContext("headless platform has no device".into()))
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
