//=========================================================================
// Error Types
//=========================================================================
//
// Error taxonomy for the engine.
//
// Architecture:
//   Scene hooks ──► SceneError ──┐
//                                ├──► EngineError ──► caller of run()
//   Window/OS   ──► PlatformError┘
//
// Nothing here is caught internally: a failing hook or a failed present
// ends the run loop and leaves partial state as-is.
//
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;

//=== SceneError ==========================================================

/// Failure raised by a scene lifecycle or frame hook.
#[derive(Debug, Error)]
pub enum SceneError {
    /// Plain message raised by application code.
    #[error("{0}")]
    Message(String),

    /// Any other error bubbled up from application code.
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl SceneError {
    /// Builds a [`SceneError::Message`] from anything printable.
    pub fn msg(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}

/// Result type returned by scene hooks.
pub type SceneResult<T = ()> = Result<T, SceneError>;

//=== PlatformError =======================================================

/// Window, surface and OS-level failures.
///
/// These are typically fatal. If the event loop or the drawing surface
/// can't be created, there is nothing to run the scenes against.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// Event loop creation failed (OS-level issue or a second event loop).
    #[error("event loop creation failed: {0}")]
    EventLoop(#[source] winit::error::EventLoopError),

    /// The OS refused to create the window.
    #[error("window creation failed: {0}")]
    WindowCreation(#[source] winit::error::OsError),

    /// The event loop exited before a window was ever created.
    #[error("event loop exited before a window was created")]
    NoWindow,

    /// The pixel surface for the window could not be created.
    #[error("surface creation failed: {0}")]
    Surface(#[source] pixels::Error),

    /// Presenting a frame to the window failed.
    #[error("frame presentation failed: {0}")]
    Present(#[source] pixels::Error),
}

//=== EngineError =========================================================

/// Everything that can end [`SceneManager::run`](crate::core::scene::SceneManager::run)
/// abnormally.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("scene failed: {0}")]
    Scene(#[from] SceneError),

    #[error("platform failed: {0}")]
    Platform(#[from] PlatformError),
}

//=========================================================================
// Unit Tests
//=========================================================================
