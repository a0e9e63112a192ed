//=========================================================================
// Core Systems
//=========================================================================
//
// Platform-independent building blocks of the scene loop.
//
// Responsibilities:
// - Scene lifecycle state machine and the scene stack (`scene`)
// - Fixed-timestep pacing over a monotonic clock (`clock`)
// - Backend-neutral events, canvas and window contract
// - Error taxonomy and subsystem initialization guards
//
// Notes:
// Nothing in here knows about winit or pixels. The `platform` module
// implements `Window` on top of them and feeds events back as `Event`.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod canvas;
pub mod clock;
pub mod error;
pub mod event;
pub mod scene;
pub mod subsystem;
pub mod window;

//=== Public API ==========================================================

pub use canvas::{Canvas, Color, Dimensions, Rect};
pub use clock::{Clock, FixedTimestep, LoopConfig, ManualClock, SystemClock};
pub use error::{EngineError, PlatformError, SceneError, SceneResult};
pub use event::{Event, EventKind, KeyCode, Modifiers, MouseButton};
pub use scene::{ManagedScene, Scene, SceneContext, SceneManager, SceneState};
pub use subsystem::{Subsystem, SubsystemGuard};
pub use window::{EventSource, Window};
