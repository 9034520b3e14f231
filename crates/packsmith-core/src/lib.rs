//! Packsmith Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the Packsmith
//! package scaffolding tool, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          packsmith-cli (CLI)            │
//! │   (Builds TreeSpecs, owns validation)   │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  ScaffoldService → Materializer         │
//! │        Tracker  ·  Renderer             │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Filesystem, AssetLocator, Settings)    │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    packsmith-adapters (Infrastructure)  │
//! │ (LocalFilesystem, InstalledAssets, ...) │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │  (TreeNode, Context, TrackerEntry)      │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use packsmith_core::prelude::*;
//!
//! // 1. Describe the layout; conditions are evaluated up front.
//! let tree = TreeNode::root([
//!     TreeNode::dir("src")
//!         .child(TreeNode::file("__init__.py").template("__init__.py.t").build()?)
//!         .build()?,
//!     TreeNode::dir("data").when(false).build()?,
//! ])?;
//!
//! // 2. Run it through the service (adapters injected by the caller).
//! let service = ScaffoldService::new(filesystem, renderer);
//! let context = Context::new().with("package", "demo");
//! service.scaffold(&tree, "/tmp/demo", &context)?;
//! # Ok::<(), ScaffoldError>(())
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        Materializer, RenderRequest, RenderStrategy, Renderer, ScaffoldReport, ScaffoldService,
        Tracker,
        ports::{AssetLocator, Filesystem, SettingsStore},
    };
    pub use crate::domain::{
        Context, EntryKind, Manifest, NodeKind, Settings, TemplateRef, TrackerEntry, TreeNode,
        substitute,
    };
    pub use crate::error::{ScaffoldError, ScaffoldResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
