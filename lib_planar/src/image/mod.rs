pub mod format;
pub mod indexer;

pub use format::{ImageError, IndexedImage, Rgb};
pub use indexer::{expand_rgb, index_rgb, IndexingError};
