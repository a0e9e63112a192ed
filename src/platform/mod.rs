//=========================================================================
// Platform Subsystem
//
// Implements the `Window` contract on top of Winit (OS window + events)
// and pixels (framebuffer presentation).
//
// Architecture:
// ```text
//  Scene loop thread (= main thread):
//  ┌─────────────────────────────────────────────────────────┐
//  │  SceneManager::run                                      │
//  │    ↓ poll_events()                                      │
//  │  WinitWindow                                            │
//  │    ├─ EventLoop::pump_app_events(timeout = 0)           │
//  │    │    ↓                                               │
//  │    │  WindowHandler (ApplicationHandler)                │
//  │    │    ├─ InputProcessor: WindowEvent → Event          │
//  │    │    └─ Sender<Event> ──┐                            │
//  │    ├─ Receiver<Event> ◄────┘  (drained into the loop)   │
//  │    ↓ present()                                          │
//  │  Canvas ──copy──► Pixels frame ──► GPU surface          │
//  └─────────────────────────────────────────────────────────┘
// ```
//
// Key Design Decisions:
// - **Pumped, not run**: `pump_app_events` with a zero timeout keeps the
//   event loop from owning the thread, so the scene loop stays in charge
//   and `poll_events` never blocks
// - **Close = Quit**: CloseRequested and event-loop exit both surface as a
//   single `Event::Quit`
// - **Canvas tracks the window**: on resize the pixels buffer, the surface
//   and the canvas are all resized before the next render
// - **Main thread requirement**: Winit mandates the main thread on macOS,
//   so the window must be opened by the thread that runs the scene loop
//
//=========================================================================

//=== Submodules ==========================================================

mod headless;
mod input_processor;

//=== Public API ==========================================================

pub use headless::{EventInjector, HeadlessWindow};

//=== External Crates =====================================================

use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::*;
use pixels::{Pixels, SurfaceTexture};
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    platform::pump_events::{EventLoopExtPumpEvents, PumpStatus},
    window::{Window as OsWindow, WindowAttributes, WindowId},
};

//=== Internal Imports ====================================================

use crate::core::canvas::{Canvas, Dimensions};
use crate::core::error::PlatformError;
use crate::core::event::Event;
use crate::core::subsystem::{Subsystem, SubsystemGuard};
use crate::core::window::{EventSource, Window};
use input_processor::InputProcessor;

//=== WindowConfig ========================================================

/// Parameters of the OS window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowConfig {
    pub title: String,

    /// Initial inner size in logical pixels.
    pub size: Dimensions,

    pub resizable: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Stagecraft".to_string(),
            size: Dimensions::new(800, 600),
            resizable: true,
        }
    }
}

//=== WindowHandler =======================================================

/// Winit callback target. Translates window events and forwards them over
/// the channel; owns the OS window once it exists.
struct WindowHandler {
    config: WindowConfig,

    /// OS window handle (None until `resumed()` called).
    window: Option<Arc<OsWindow>>,

    sender: Sender<Event>,
    input_processor: InputProcessor,

    /// Failure raised inside a callback, picked up by `WinitWindow`.
    failure: Option<PlatformError>,

    /// Latest physical size reported by `Resized`, not yet applied.
    pending_resize: Option<Dimensions>,

    quit_sent: bool,
}

impl WindowHandler {
    fn new(config: WindowConfig, sender: Sender<Event>) -> Self {
        Self {
            config,
            window: None,
            sender,
            input_processor: InputProcessor::new(),
            failure: None,
            pending_resize: None,
            quit_sent: false,
        }
    }

    fn send(&self, event: Event) {
        if self.sender.send(event).is_err() {
            warn!(target: "platform::input", "Event channel disconnected, event dropped");
        }
    }

    /// Emits `Event::Quit` at most once.
    fn request_quit(&mut self) {
        if !self.quit_sent {
            self.quit_sent = true;
            self.send(Event::Quit);
        }
    }
}

impl ApplicationHandler for WindowHandler {
    /// Called when the app becomes active (startup or mobile resume).
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Window already exists (mobile resume?)");
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(self.config.size.width, self.config.size.height))
            .with_resizable(self.config.resizable);

        match event_loop.create_window(attrs) {
            Ok(window) => {
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    window.inner_size().width,
                    window.inner_size().height,
                    window.scale_factor()
                );
                self.window = Some(Arc::new(window));
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                self.failure = Some(PlatformError::WindowCreation(e));
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match &event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.request_quit();
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                trace!(target: "platform", "Resized to {}x{}", size.width, size.height);
                self.pending_resize = Some(Dimensions::new(size.width, size.height));
                self.send(self.input_processor.process_resize(*size));
            }

            WindowEvent::ModifiersChanged(state) => {
                trace!(target: "platform::input", "Modifiers changed: {:?}", state);
                self.input_processor.update_modifiers(state.state());
            }

            WindowEvent::CursorMoved { position, .. } => {
                let event = self
                    .input_processor
                    .process_mouse_move(position.x as f32, position.y as f32);
                self.send(event);
            }

            WindowEvent::KeyboardInput { event: key_event, .. } => {
                if let Some(event) = self.input_processor.process_key_event(key_event) {
                    self.send(event);
                } else {
                    trace!(target: "platform::input", "Unmapped key ignored");
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                self.send(self.input_processor.process_mouse_button(*button, *state));
            }

            _ => {
                // Ignore: Focused, RedrawRequested, etc. (the scene loop renders unprompted)
            }
        }
    }
}

//=== WinitWindow =========================================================

/// Desktop [`Window`] backed by Winit and pixels.
///
/// Not `Send`: open it on, and keep it on, the main thread.
pub struct WinitWindow {
    event_loop: EventLoop<()>,
    handler: WindowHandler,
    receiver: Receiver<Event>,
    pixels: Pixels<'static>,
    canvas: Canvas,
    exited: bool,
    _events: SubsystemGuard,
    _video: SubsystemGuard,
}

impl WinitWindow {
    //--- Construction -----------------------------------------------------

    /// Creates the event loop, the OS window and its pixel surface.
    ///
    /// # Errors
    ///
    /// Fails if the event loop, the window or the surface can't be created,
    /// or if the event loop exits before a window shows up.
    pub fn open(config: WindowConfig) -> Result<Self, PlatformError> {
        let video = SubsystemGuard::acquire(Subsystem::Video);
        let events = SubsystemGuard::acquire(Subsystem::Events);

        debug!(target: "platform", "Creating Winit event loop");
        let mut event_loop = EventLoop::new().map_err(PlatformError::EventLoop)?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let (sender, receiver) = unbounded();
        let mut handler = WindowHandler::new(config, sender);

        let window = loop {
            let status = event_loop.pump_app_events(Some(Duration::ZERO), &mut handler);
            if let Some(failure) = handler.failure.take() {
                return Err(failure);
            }
            if let Some(window) = handler.window.clone() {
                break window;
            }
            if let PumpStatus::Exit(code) = status {
                warn!(target: "platform", "Event loop exited with code {} before window creation", code);
                return Err(PlatformError::NoWindow);
            }
        };

        let physical = window.inner_size();
        let size = Dimensions::new(physical.width.max(1), physical.height.max(1));
        let surface = SurfaceTexture::new(size.width, size.height, Arc::clone(&window));
        let pixels = Pixels::new(size.width, size.height, surface).map_err(PlatformError::Surface)?;

        info!(target: "platform", "Surface ready: {}x{}", size.width, size.height);

        Ok(Self {
            event_loop,
            handler,
            receiver,
            pixels,
            canvas: Canvas::new(size),
            exited: false,
            _events: events,
            _video: video,
        })
    }

    //--- Internal Helpers -------------------------------------------------

    /// Resizes surface, buffer and canvas together. Zero sizes (minimized
    /// windows) and failed resizes keep the previous size.
    fn apply_resize(&mut self, size: Dimensions) {
        if size.width == 0 || size.height == 0 || size == self.canvas.size() {
            return;
        }

        if let Err(e) = self.pixels.resize_surface(size.width, size.height) {
            warn!(target: "platform", "Surface resize to {}x{} failed: {}", size.width, size.height, e);
            return;
        }
        if let Err(e) = self.pixels.resize_buffer(size.width, size.height) {
            warn!(target: "platform", "Buffer resize to {}x{} failed: {}", size.width, size.height, e);
            return;
        }

        debug!(target: "platform", "Canvas resized to {}x{}", size.width, size.height);
        self.canvas = Canvas::new(size);
    }
}

impl EventSource for WinitWindow {
    fn poll_events(&mut self, events: &mut Vec<Event>) {
        if !self.exited {
            let status = self.event_loop.pump_app_events(Some(Duration::ZERO), &mut self.handler);
            if let PumpStatus::Exit(code) = status {
                info!(target: "platform", "Event loop exited with code {}", code);
                self.exited = true;
                self.handler.request_quit();
            }
        }

        if let Some(size) = self.handler.pending_resize.take() {
            self.apply_resize(size);
        }

        events.extend(self.receiver.try_iter());
    }
}

impl Window for WinitWindow {
    fn size(&self) -> Dimensions {
        self.canvas.size()
    }

    fn canvas(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    fn present(&mut self) -> Result<(), PlatformError> {
        let bytes = self.canvas.as_bytes();
        let frame = self.pixels.frame_mut();
        let len = frame.len().min(bytes.len());
        frame[..len].copy_from_slice(&bytes[..len]);

        self.pixels.render().map_err(PlatformError::Present)
    }
}

impl std::fmt::Debug for WinitWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WinitWindow")
            .field("title", &self.handler.config.title)
            .field("size", &self.canvas.size())
            .field("exited", &self.exited)
            .finish_non_exhaustive()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
//
// Opening a real window needs a display server, so only the parts that
// don't touch the OS are covered here.
//
