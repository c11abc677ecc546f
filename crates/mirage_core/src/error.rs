// Mirror error types.
//
// Handlers at the host boundary log these and keep the host running; nothing here is surfaced to
// the user.

use thiserror::Error;

/// Errors raised while managing or feeding the mirror surface.
#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("Window error: {0}")]
    Window(String),

    #[error("Surface creation failed: {0}")]
    SurfaceCreation(String),

    #[error("Surface resize failed: {0}")]
    SurfaceResize(String),

    #[error("Surface descriptor unavailable: {0}")]
    Descriptor(String),

    #[error("Frame copy failed: {0}")]
    Copy(String),

    #[error("Present failed: {0}")]
    Present(String),

    #[error("Settings error: {0}")]
    Settings(#[from] anyhow::Error),
}

/// Result type alias for convenience
pub type MirrorResult<T> = Result<T, MirrorError>;
