//! Browser tab control: host seam, load waiting, tab lifecycle.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `host` | [`TabHost`] seam and page-load events |
//! | `load` | [`LoadWaiter`]: completion event vs. timeout race |
//! | `lifecycle` | [`TabLifecycle`]: tab ownership across a retried run |

// ============================================================================
// Submodules
// ============================================================================

/// Raw tab control seam and load events.
pub mod host;

/// Page-load waiting.
pub mod load;

/// Tab ownership across create, retry and close.
pub mod lifecycle;

// ============================================================================
// Re-exports
// ============================================================================

pub use host::{LoadStatus, TabEvent, TabHost};
pub use lifecycle::TabLifecycle;
pub use load::LoadWaiter;
