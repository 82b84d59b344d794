//=========================================================================
// Platform Subsystem
//
// Winit-backed `Platform`: owns the OS window and forwards its events
// into the core channel.
//
// Architecture:
// ```text
//  Caller's thread
//  ┌──────────────────────────────────────────────────────────────┐
//  │  GameInstance::run                                           │
//  │    └─ platform.pump_events(Some(0))                          │
//  │         └─ EventLoop::pump_app_events                        │
//  │              └─ WindowApp (ApplicationHandler)               │
//  │                   ├─ InputProcessor: winit → InputEvent      │
//  │                   ├─ InputBuffer: discrete / continuous      │
//  │                   └─ Resized / CloseRequested                │
//  │         └─ flush → PlatformEvent ──channel──► EventCollector │
//  └──────────────────────────────────────────────────────────────┘
// ```
//
// Key Design Decisions:
// - **Pump model**: the frame loop drives winit through
//   `pump_app_events`, so the window, the event loop and the game all
//   live on the thread that called `Engine::run()`.
// - **Pump = frame boundary**: input collected during one pump is sent
//   as a single `Inputs` batch; empty batches are not sent.
// - **Sticky modifiers**: modifier state persists until winit reports a
//   change.
//
//=========================================================================

//=== Submodules ==========================================================

mod input_buffer;
mod input_processor;

//=== External Crates =====================================================

use std::time::Duration;

use crossbeam_channel::Sender;
use log::{debug, error, info, trace};
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    platform::pump_events::{EventLoopExtPumpEvents, PumpStatus},
    window::{Window, WindowAttributes, WindowId},
};

//=== Internal Imports ====================================================

use crate::core::gpu::GraphicsDevice;
use crate::core::platform_bridge::{forward_event, Platform, PlatformError, PlatformEvent};
use crate::engine::config::WindowConfig;
use input_buffer::InputBuffer;
use input_processor::InputProcessor;

/// Pumps allowed for the OS to deliver `resumed` during boot.
const BOOT_PUMPS: usize = 16;

//=== WinitPlatform =======================================================

/// Desktop window driven by the frame loop.
///
/// # Lifecycle
///
/// 1. **Construction**: creates the event loop and pumps it until the
///    window exists
/// 2. **Frames**: `pump_events` processes pending OS events and flushes
///    the gathered input into the channel
/// 3. **Shutdown**: a close request (user or [`request_close`]) sends
///    `WindowClosed` once and drops the window
///
/// # Thread Safety
///
/// Not `Send`: winit requires the event loop on the main thread on
/// macOS/iOS.
///
/// [`request_close`]: Platform::request_close
pub struct WinitPlatform {
    event_loop: EventLoop<()>,
    app: WindowApp,
}

impl WinitPlatform {
    /// Creates the event loop and opens the window.
    ///
    /// # Errors
    ///
    /// [`PlatformError::EventLoopCreation`] if winit cannot start,
    /// [`PlatformError::WindowCreation`] if the window never opens.
    pub fn new(config: &WindowConfig, sender: Sender<PlatformEvent>) -> Result<Self, PlatformError> {
        let event_loop =
            EventLoop::new().map_err(|err| PlatformError::EventLoopCreation(err.to_string()))?;

        let attributes = WindowAttributes::default()
            .with_title(config.title.clone())
            .with_inner_size(LogicalSize::new(config.width, config.height))
            .with_resizable(config.resizable);

        let mut platform = Self {
            event_loop,
            app: WindowApp::new(attributes, sender),
        };

        for _ in 0..BOOT_PUMPS {
            platform.pump(Some(Duration::ZERO))?;
            if platform.app.window.is_some() {
                info!(target: "platform", "Platform subsystem initialized");
                return Ok(platform);
            }
        }

        Err(PlatformError::WindowCreation(
            "event loop never resumed".to_string(),
        ))
    }

    fn pump(&mut self, timeout: Option<Duration>) -> Result<(), PlatformError> {
        if let PumpStatus::Exit(code) = self.event_loop.pump_app_events(timeout, &mut self.app) {
            debug!(target: "platform", "Event loop exited with code {}", code);
            self.app.close();
        }
        self.app.flush_input_buffer();

        match self.app.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Platform for WinitPlatform {
    fn pump_events(&mut self, timeout: Option<Duration>) -> Result<(), PlatformError> {
        if !self.app.open {
            self.app.close();
            return Ok(());
        }
        self.pump(timeout)
    }

    fn window_size(&self) -> (u32, u32) {
        self.app.size
    }

    fn is_minimized(&self) -> bool {
        self.app.is_minimized()
    }

    fn is_open(&self) -> bool {
        self.app.open
    }

    fn request_close(&mut self) {
        debug!(target: "platform", "Close requested by the engine");
        self.app.open = false;
    }

    fn present(&mut self) -> Result<(), PlatformError> {
        if let Some(window) = &self.app.window {
            window.pre_present_notify();
            window.request_redraw();
        }
        Ok(())
    }

    fn graphics_device(&self) -> Result<GraphicsDevice, PlatformError> {
        let window = self.app.window.as_ref().ok_or_else(|| {
            PlatformError::GraphicsContext("window is not open".to_string())
        })?;

        let name = window
            .current_monitor()
            .and_then(|monitor| monitor.name())
            .unwrap_or_else(|| "primary display".to_string());
        Ok(GraphicsDevice::new(0, name))
    }
}

//=== WindowApp ===========================================================

/// Winit application state: the window plus input gathering.
struct WindowApp {
    attributes: WindowAttributes,
    window: Option<Window>,
    buffer: InputBuffer,
    input_processor: InputProcessor,
    event_sender: Sender<PlatformEvent>,
    size: (u32, u32),
    minimized: bool,
    open: bool,
    close_sent: bool,
    error: Option<PlatformError>,
}

impl WindowApp {
    fn new(attributes: WindowAttributes, event_sender: Sender<PlatformEvent>) -> Self {
        Self {
            attributes,
            window: None,
            buffer: InputBuffer::new(),
            input_processor: InputProcessor::new(),
            event_sender,
            size: (0, 0),
            minimized: false,
            open: true,
            close_sent: false,
            error: None,
        }
    }

    fn is_minimized(&self) -> bool {
        self.minimized || self.size.0 == 0 || self.size.1 == 0
    }

    /// Sends buffered input as one `Inputs` batch. Empty buffers send
    /// nothing.
    fn flush_input_buffer(&mut self) {
        if let Some((discrete, continuous)) = self.buffer.drain() {
            trace!(
                target: "platform::input",
                "Flushing {} discrete + {} continuous events",
                discrete.len(),
                continuous.len()
            );
            forward_event(&self.event_sender, PlatformEvent::Inputs { discrete, continuous });
        }
    }

    fn resized(&mut self, width: u32, height: u32) {
        if self.size == (width, height) {
            return;
        }
        self.size = (width, height);
        self.minimized = width == 0 || height == 0;
        forward_event(&self.event_sender, PlatformEvent::Resized { width, height });
    }

    /// Marks the window closed and sends `WindowClosed` once.
    fn close(&mut self) {
        self.open = false;
        self.window = None;
        if !self.close_sent {
            self.close_sent = true;
            forward_event(&self.event_sender, PlatformEvent::WindowClosed);
        }
    }
}

//=== Winit Integration ===================================================

impl ApplicationHandler for WindowApp {
    /// Creates the window on first resume. Later resumes (mobile) keep it.
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || !self.open {
            return;
        }

        match event_loop.create_window(self.attributes.clone()) {
            Ok(window) => {
                let size = window.inner_size();
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    size.width,
                    size.height,
                    window.scale_factor()
                );
                self.size = (size.width, size.height);
                self.minimized = window.is_minimized().unwrap_or(false);
                window.request_redraw();
                self.window = Some(window);
            }
            Err(err) => {
                error!(target: "platform", "Window creation failed: {}", err);
                self.error = Some(PlatformError::WindowCreation(err.to_string()));
                self.close();
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                info!(target: "platform", "Window close requested");
                self.close();
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                trace!(target: "platform", "Resized to {}x{}", size.width, size.height);
                self.resized(size.width, size.height);
            }

            WindowEvent::Occluded(occluded) => {
                self.minimized = occluded || self.size.0 == 0 || self.size.1 == 0;
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                trace!(target: "platform::input", "Modifiers changed: {:?}", modifiers);
                self.input_processor.update_modifiers(modifiers.state());
            }

            WindowEvent::CursorMoved { position, .. } => {
                let event = self.input_processor.process_mouse_move(position);
                self.buffer.push_continuous(event);
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let event = self.input_processor.process_scroll(delta);
                self.buffer.push_discrete(event);
            }

            WindowEvent::KeyboardInput { event, .. } => {
                match self.input_processor.process_key_event(&event) {
                    Some(event) => self.buffer.push_discrete(event),
                    None => trace!(target: "platform::input", "Unmapped key ignored"),
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let event = self.input_processor.process_mouse_button(button, state);
                self.buffer.push_discrete(event);
            }

            _ => {}
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
