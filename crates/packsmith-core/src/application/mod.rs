//! Application layer for Packsmith.
//!
//! This layer contains:
//! - **Tracker**: transactional bookkeeping of every created entry
//! - **Renderer**: template resolution and placeholder substitution
//! - **Materializer**: the tree walk that drives both
//! - **Services**: use case orchestration (ScaffoldService)
//! - **Ports**: interface definitions (traits) for external dependencies
//! - **Errors**: application-specific error types

pub mod error;
pub mod materializer;
pub mod ports;
pub mod renderer;
pub mod services;
pub mod tracker;

pub use materializer::Materializer;
pub use renderer::{RenderRequest, RenderStrategy, Renderer};
pub use services::{ScaffoldReport, ScaffoldService};
pub use tracker::Tracker;

// Re-export port traits (for adapter implementation)
pub use ports::{AssetLocator, Filesystem, SettingsStore};

pub use error::ApplicationError;
