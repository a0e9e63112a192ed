//=========================================================================
// Window Contract
//=========================================================================
//
// What the scene loop needs from a window, independent of the backend.
//
// Implementations:
//   platform::WinitWindow    - desktop window presented through `pixels`
//   platform::HeadlessWindow - canvas only, events injected by hand
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::canvas::{Canvas, Dimensions};
use super::error::PlatformError;
use super::event::Event;

//=== EventSource =========================================================

/// Non-blocking queue of pending input and system events.
pub trait EventSource {
    /// Appends every currently queued event to `events`, oldest first.
    ///
    /// Never waits: if nothing is queued, `events` is left untouched.
    fn poll_events(&mut self, events: &mut Vec<Event>);
}

//=== Window ==============================================================

/// Output surface the scene loop renders into.
///
/// Supplied once per [`SceneManager::run`](crate::core::scene::SceneManager::run)
/// call and assumed valid for the whole loop.
pub trait Window: EventSource {
    /// Current inner size of the window, in pixels.
    fn size(&self) -> Dimensions;

    /// The renderer scenes draw into.
    fn canvas(&mut self) -> &mut Canvas;

    /// Shows the canvas contents. Pacing (vsync etc.) happens here, if at all.
    fn present(&mut self) -> Result<(), PlatformError>;
}
