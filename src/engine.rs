//=========================================================================
// Stagehand Engine
//
// Main entry point: boots the platform and compute interop, then runs
// scenes until the window closes.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──run()──>  [Scene loop]
//         │            (boot)        │
//         ├─ with_config()           ├─ set_scenes()
//         ├─ with_tps()              ├─ reset() / switch_scene()
//         ├─ with_platform()         └─ per run: fresh GameInstance
//         └─ with_render_pipeline()       populate → enter → run → exit
// ```
//
//=========================================================================

//=== Module Declarations =================================================

pub mod config;
mod control;
mod error;

//=== Public API ==========================================================

pub use config::{ConfigError, EngineConfig, HotkeyConfig, TimingConfig, WindowConfig};
pub use control::EngineControl;
pub use error::EngineError;

//=== External Dependencies ===============================================

use std::process::ExitCode;

use crossbeam_channel::{bounded, Sender};
use log::{debug, error, info};

//=== Internal Dependencies ===============================================

use crate::core::game::{GameInstance, RunOutcome};
use crate::core::gpu::{ComputeInterop, GraphicsDevice, NoComputeInterop};
use crate::core::platform_bridge::{EventCollector, Platform, PlatformError, PlatformEvent};
use crate::core::render::{NullRenderPipeline, RenderPipeline};
use crate::core::resources::ResourceCache;
use crate::core::scene::{Scene, SceneRegistry};
use crate::platform::WinitPlatform;

type PlatformFactory =
    Box<dyn FnOnce(&EngineConfig, Sender<PlatformEvent>) -> Result<Box<dyn Platform>, PlatformError>>;
type PipelineFactory = Box<dyn FnMut() -> Box<dyn RenderPipeline>>;

//=== EngineBuilder =======================================================

/// Builder for configuring and booting an [`Engine`].
///
/// # Default Values
///
/// - **TPS**: 60.0 (fixed updates per second)
/// - **Channel capacity**: 128 events
/// - **Platform**: a winit window
/// - **Render pipeline**: [`NullRenderPipeline`]
/// - **Compute interop**: [`NoComputeInterop`]
///
/// # Examples
///
/// ```no_run
/// use stagehand::prelude::*;
///
/// struct Empty;
///
/// impl Scene for Empty {
///     fn populate_actors(&mut self, _: &mut GameInstance, _: &mut SceneCallbacks) -> anyhow::Result<()> {
///         Ok(())
///     }
/// }
///
/// fn main() -> std::process::ExitCode {
///     stagehand::logging::init();
///
///     let mut engine = match EngineBuilder::new().with_tps(120.0).build() {
///         Ok(engine) => engine,
///         Err(_) => return std::process::ExitCode::FAILURE,
///     };
///     engine.set_scenes(vec![Box::new(Empty)]);
///     engine.run()
/// }
/// ```
pub struct EngineBuilder {
    config: EngineConfig,
    platform: Option<PlatformFactory>,
    pipeline: PipelineFactory,
    interop: Box<dyn ComputeInterop>,
}

impl EngineBuilder {
    /// Creates a builder with default settings.
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            platform: None,
            pipeline: Box::new(|| Box::new(NullRenderPipeline::new()) as Box<dyn RenderPipeline>),
            interop: Box::new(NoComputeInterop),
        }
    }

    /// Replaces the whole configuration (validated in [`build`](Self::build)).
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the fixed update rate.
    ///
    /// Default: 60.0
    ///
    /// # Panics
    ///
    /// Panics if `tps <= 0.0`.
    pub fn with_tps(mut self, tps: f64) -> Self {
        assert!(tps > 0.0, "TPS must be positive, got {}", tps);
        self.config.timing.tps = tps;
        self
    }

    /// Sets the channel capacity for platform → core communication.
    ///
    /// Events that arrive while the channel is full are dropped.
    ///
    /// Default: 128
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.config.channel_capacity = capacity;
        self
    }

    /// Uses a custom platform instead of a winit window.
    ///
    /// The factory receives the config and the sending half of the event
    /// channel.
    pub fn with_platform<F, P>(mut self, factory: F) -> Self
    where
        F: FnOnce(&EngineConfig, Sender<PlatformEvent>) -> Result<P, PlatformError> + 'static,
        P: Platform + 'static,
    {
        self.platform = Some(Box::new(move |config: &EngineConfig, sender: Sender<PlatformEvent>| {
            factory(config, sender).map(|platform| Box::new(platform) as Box<dyn Platform>)
        }));
        self
    }

    /// Uses a custom render pipeline. The factory is called once per run.
    pub fn with_render_pipeline<F, R>(mut self, mut factory: F) -> Self
    where
        F: FnMut() -> R + 'static,
        R: RenderPipeline + 'static,
    {
        self.pipeline = Box::new(move || Box::new(factory()) as Box<dyn RenderPipeline>);
        self
    }

    /// Uses a GPU compute interop bound to the window's graphics device.
    pub fn with_compute_interop<I: ComputeInterop + 'static>(mut self, interop: I) -> Self {
        self.interop = Box::new(interop);
        self
    }

    /// Boots the engine: event channel, platform, graphics device, compute
    /// interop.
    ///
    /// # Errors
    ///
    /// Any boot failure is logged and returned; no engine is created.
    pub fn build(self) -> Result<Engine, EngineError> {
        let Self {
            config,
            platform,
            pipeline,
            mut interop,
        } = self;

        config.validate().map_err(|err| {
            error!(target: "engine", "Invalid configuration: {}", err);
            EngineError::from(err)
        })?;

        info!(
            target: "engine",
            "Building engine (TPS: {}, channel: {})",
            config.timing.tps, config.channel_capacity
        );

        //--- 1. Communication channel ---------------------------------------
        let (tx, rx) = bounded(config.channel_capacity);

        //--- 2. Platform ----------------------------------------------------
        let platform = match platform {
            Some(factory) => factory(&config, tx),
            None => WinitPlatform::new(&config.window, tx)
                .map(|platform| Box::new(platform) as Box<dyn Platform>),
        }
        .map_err(|err| {
            error!(target: "engine", "Platform initialization failed: {}", err);
            EngineError::from(err)
        })?;

        //--- 3. Graphics device ---------------------------------------------
        let device = platform.graphics_device().map_err(|err| {
            error!(target: "engine", "No graphics device: {}", err);
            EngineError::from(err)
        })?;

        //--- 4. Compute interop ---------------------------------------------
        interop.initialize(&device).map_err(|err| {
            error!(target: "engine", "Compute interop `{}` failed: {}", interop.name(), err);
            EngineError::from(err)
        })?;

        info!(target: "engine", "Engine booted on device {}", device);

        Ok(Engine {
            config,
            platform,
            events: EventCollector::new(rx),
            pipeline,
            interop,
            device,
            scenes: SceneRegistry::new(),
            control: EngineControl::new(),
            resources: ResourceCache::new(),
            shut_down: false,
        })
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== RunSummary ==========================================================

/// What happened across all scene runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Scene runs completed.
    pub runs: u32,

    /// Frames across all runs.
    pub frames: u64,

    /// Index of the last scene that ran.
    pub last_scene: usize,
}

//=== Engine ==============================================================

/// Stagehand runtime.
///
/// Owns the platform, the compute interop, the resource cache and the
/// scene list across runs. Create via [`EngineBuilder`].
///
/// # Architecture
///
/// ```text
/// Engine (caller's thread)
///   ├─► Platform ──PlatformEvent──► EventCollector
///   │
///   └─► per run: GameInstance
///         ├─► ActorSet → Components (start/update/fixed_update/on_destroy)
///         └─► RenderPipeline
/// ```
pub struct Engine {
    config: EngineConfig,
    platform: Box<dyn Platform>,
    events: EventCollector,
    pipeline: PipelineFactory,
    interop: Box<dyn ComputeInterop>,
    device: GraphicsDevice,
    scenes: SceneRegistry,
    control: EngineControl,
    resources: ResourceCache,
    shut_down: bool,
}

impl Engine {
    //--- Configuration ----------------------------------------------------

    /// Replaces the scene list. Index 0 runs first unless
    /// [`switch_scene`](Self::switch_scene) picked another.
    pub fn set_scenes(&mut self, scenes: Vec<Box<dyn Scene>>) {
        info!(target: "engine", "{} scenes registered", scenes.len());
        self.scenes.set(scenes);
        self.control.set_scene_count(self.scenes.len());
    }

    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }

    /// Handle for requesting resets and scene switches.
    pub fn control(&self) -> &EngineControl {
        &self.control
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Graphics device the engine booted on.
    pub fn graphics_device(&self) -> &GraphicsDevice {
        &self.device
    }

    //--- Control ----------------------------------------------------------

    /// Rebuilds the current scene after the current frame.
    pub fn reset(&self) {
        self.control.reset();
    }

    /// Switches to scene `index` (clamped) after the current frame.
    /// Returns the index that will run.
    pub fn switch_scene(&self, index: usize) -> usize {
        self.control.switch_scene(index)
    }

    //--- Execution --------------------------------------------------------

    /// Runs scenes until the window closes.
    ///
    /// Every iteration builds a fresh [`GameInstance`], lets the selected
    /// scene populate it and runs it. A reset or scene switch starts the
    /// next iteration; a closed window ends the loop. The resource cache
    /// and scene callbacks are cleared after every run, and platform events
    /// the previous run left queued are dropped.
    ///
    /// # Errors
    ///
    /// [`EngineError::NoScenes`] with an empty scene list; population,
    /// render and platform failures end the loop with their error.
    pub fn try_run(&mut self) -> Result<RunSummary, EngineError> {
        if self.scenes.is_empty() {
            error!(target: "engine", "run() called with no scenes registered");
            return Err(EngineError::NoScenes);
        }

        let mut summary = RunSummary::default();
        let result = loop {
            let index = self.control.begin_run();
            if summary.runs > 0 {
                let stale = self.events.discard_pending();
                if stale > 0 {
                    debug!(target: "engine", "Discarded {} platform events left over from the previous run", stale);
                }
            }
            info!(
                target: "engine",
                "Run #{}: scene {} `{}`",
                summary.runs + 1, index, self.scenes.name(index).unwrap_or("?")
            );

            let mut game = GameInstance::new(
                &self.config,
                self.control.clone(),
                (self.pipeline)(),
                std::mem::take(&mut self.resources),
            );

            if let Err(err) = self.scenes.populate(index, &mut game) {
                self.scenes.clear_callbacks(index);
                drop(game);
                break Err(err);
            }

            self.scenes.enter(index);
            let outcome = game.run(self.platform.as_mut(), &mut self.events);
            self.scenes.exit(index);
            self.scenes.clear_callbacks(index);

            self.resources = game.take_resources();
            self.resources.clear();

            summary.runs += 1;
            summary.frames += game.time().frame;
            summary.last_scene = index;
            drop(game);

            match outcome {
                Ok(RunOutcome::ResetRequested) => continue,
                Ok(RunOutcome::Closed) => break Ok(summary),
                Err(err) => {
                    error!(target: "engine", "Run aborted: {}", err);
                    break Err(err);
                }
            }
        };

        self.shutdown();
        result
    }

    /// Runs scenes and maps the result to a process exit code.
    pub fn run(mut self) -> ExitCode {
        match self.try_run() {
            Ok(summary) => {
                info!(
                    target: "engine",
                    "{} runs, {} frames",
                    summary.runs, summary.frames
                );
                ExitCode::SUCCESS
            }
            Err(err) => {
                error!(target: "engine", "Engine stopped: {}", err);
                ExitCode::FAILURE
            }
        }
    }

    fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;
        self.interop.shutdown();
        info!(target: "engine", "Engine shutdown complete");
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.shutdown();
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
