//=========================================================================
// Stagecraft Engine
//
// Main entry point: configures the loop and the window, then runs the
// scene stack until it empties.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──run()──>  [SceneManager::run]
//         │                          │                       │
//         ├─ with_title()            ├─ init(|scenes| ..)    └─ WinitWindow
//         ├─ with_size()             └─ run_with(window)          or any Window
//         ├─ with_fixed_step_ms()
//         └─ with_max_frame_delta_ms()
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{error, info};

//=== Internal Dependencies ===============================================

use crate::core::canvas::Dimensions;
use crate::core::clock::LoopConfig;
use crate::core::error::EngineError;
use crate::core::scene::SceneManager;
use crate::core::window::Window;
use crate::platform::{WindowConfig, WinitWindow};

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **Title**: "Stagecraft"
/// - **Size**: 800x600
/// - **Fixed step**: 10 ms
/// - **Max frame delta**: 250 ms
///
/// # Examples
///
/// ```no_run
/// use stagecraft::prelude::*;
///
/// struct Title;
/// impl Scene for Title {}
///
/// EngineBuilder::new()
///     .with_title("Demo")
///     .with_fixed_step_ms(16)
///     .build()
///     .init(|scenes| scenes.push(Title))
///     .run()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct EngineBuilder {
    window: WindowConfig,
    timing: LoopConfig,
}

impl EngineBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            window: WindowConfig::default(),
            timing: LoopConfig::default(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.window.title = title.into();
        self
    }

    /// Sets the initial inner size of the window, in logical pixels.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        assert!(
            width > 0 && height > 0,
            "Window size must be positive, got {}x{}",
            width,
            height
        );
        self.window.size = Dimensions::new(width, height);
        self
    }

    pub fn with_resizable(mut self, resizable: bool) -> Self {
        self.window.resizable = resizable;
        self
    }

    /// Sets the simulation step length (`dt`) in milliseconds.
    ///
    /// Default: 10
    ///
    /// # Panics
    ///
    /// Panics if `ms == 0`.
    pub fn with_fixed_step_ms(mut self, ms: u64) -> Self {
        assert!(ms > 0, "Fixed step must be positive, got {}", ms);
        self.timing.fixed_step_ms = ms;
        self
    }

    /// Sets the stall guard: the most real time one iteration may feed
    /// into the simulation.
    ///
    /// Default: 250
    pub fn with_max_frame_delta_ms(mut self, ms: u64) -> Self {
        self.timing.max_frame_delta_ms = ms;
        self
    }

    /// Builds the engine instance with an empty scene stack.
    ///
    /// # Panics
    ///
    /// Panics if the max frame delta is shorter than one fixed step, since
    /// the simulation could then never advance.
    pub fn build(self) -> Engine {
        assert!(
            self.timing.max_frame_delta_ms >= self.timing.fixed_step_ms,
            "Max frame delta must cover at least one fixed step ({} < {})",
            self.timing.max_frame_delta_ms,
            self.timing.fixed_step_ms
        );

        info!(
            "Building engine (step: {}ms, max delta: {}ms, window: {}x{})",
            self.timing.fixed_step_ms,
            self.timing.max_frame_delta_ms,
            self.window.size.width,
            self.window.size.height
        );

        Engine {
            scenes: SceneManager::with_config(self.timing),
            window: self.window,
        }
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// Stagecraft runtime: a scene stack plus the window it runs in.
///
/// Create via [`EngineBuilder`].
#[derive(Debug)]
pub struct Engine {
    scenes: SceneManager,
    window: WindowConfig,
}

impl Engine {
    //--- Initialization ---------------------------------------------------

    /// Gives mutable access to the [`SceneManager`] before running,
    /// typically to push the first scene.
    pub fn init<F>(mut self, init_fn: F) -> Self
    where
        F: FnOnce(&mut SceneManager),
    {
        info!("Initializing scene stack");
        init_fn(&mut self.scenes);
        info!("Engine initialization complete ({} scene(s))", self.scenes.len());
        self
    }

    //--- Execution --------------------------------------------------------

    /// Opens the OS window and runs until the scene stack is empty.
    ///
    /// Must be called on the main thread.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Platform`] if the window can't be opened or a
    /// frame can't be presented, and [`EngineError::Scene`] if a scene hook
    /// fails.
    pub fn run(self) -> Result<(), EngineError> {
        info!("Opening window \"{}\"", self.window.title);
        let mut window = WinitWindow::open(self.window.clone()).inspect_err(|e| {
            error!("Platform error: {}", e);
        })?;

        self.run_with(&mut window)
    }

    /// Runs until the scene stack is empty, against any [`Window`].
    pub fn run_with<W: Window + ?Sized>(mut self, window: &mut W) -> Result<(), EngineError> {
        info!("Starting engine runtime");

        let result = self.scenes.run(window);
        match &result {
            Ok(()) => info!("Engine shutdown complete"),
            Err(e) => error!("Engine stopped: {}", e),
        }
        result
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
