//! Input loading and data source handling.

mod loader;
mod preview;
mod source;

pub use loader::{Loader, LoaderConfig, REQUIRED_COLUMNS};
pub use preview::TablePreview;
pub use source::SourceMetadata;
