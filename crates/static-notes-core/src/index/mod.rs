//! Notes manifest (`index.json`) and its builder

mod builder;
mod types;

pub use builder::IndexBuilder;
pub use types::{BuildStats, Manifest, NoteSummary, INDEX_FILE, MANIFEST_VERSION};
