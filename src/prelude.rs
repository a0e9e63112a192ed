//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use stagecraft::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine core
pub use crate::engine::{Engine, EngineBuilder};

// Scene system
pub use crate::core::scene::{Scene, SceneContext, SceneManager, SceneState};

// Errors
pub use crate::core::error::{EngineError, SceneError, SceneResult};

// Drawing and input
pub use crate::core::canvas::{Canvas, Color, Dimensions, Rect};
pub use crate::core::event::{Event, KeyCode, Modifiers, MouseButton};

// Windows
pub use crate::core::window::Window;
pub use crate::platform::{HeadlessWindow, WindowConfig, WinitWindow};
