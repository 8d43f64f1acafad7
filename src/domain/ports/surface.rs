use async_trait::async_trait;

use crate::domain::errors::SurfaceResult;
use crate::domain::models::ReadOutcome;

/// Keys the engine needs to press on an input surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    End,
    Backspace,
}

/// Port trait for a read-only observable value on the page
///
/// Implementations must report a surface that cannot currently be resolved
/// (detached during a re-render, not yet mounted) as
/// [`ReadOutcome::Unresolved`], and reserve `Err` for hard failures such as
/// a lost session.
#[async_trait]
pub trait ObservableSurface: Send + Sync {
    /// Human-readable role of the surface ("input", "output")
    fn label(&self) -> &str;

    /// Read the current text
    async fn read(&self) -> SurfaceResult<ReadOutcome>;

    /// Number of elements the surface currently resolves to
    async fn count(&self) -> SurfaceResult<usize>;
}

/// Port trait for an editable surface
#[async_trait]
pub trait InputSurface: ObservableSurface {
    /// Replace the whole value, as a fill would
    async fn write(&self, text: &str) -> SurfaceResult<()>;

    /// Give the surface keyboard focus
    async fn focus(&self) -> SurfaceResult<()>;

    /// Press a single key
    async fn press(&self, key: Key) -> SurfaceResult<()>;

    /// Type text at the caret, one key event per character
    async fn type_text(&self, text: &str) -> SurfaceResult<()>;
}
