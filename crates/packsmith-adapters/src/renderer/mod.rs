//! Render strategies registered on the core `Renderer`.

mod merge;

pub use merge::MergeStrategy;
