//! Core domain layer for Packsmith.
//!
//! This module contains pure logic: the declarative tree specification, the
//! substitution context, tracker entries and the persisted manifest. All I/O
//! is reached through ports defined in the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or external calls
//! - **Immutable entities**: Trees are validated once and read-only after
//!
pub mod context;
pub mod entry;
pub mod error;
pub mod manifest;
pub mod settings;
pub mod tree;
pub mod validation;

pub use context::{Context, substitute};
pub use entry::{EntryKind, TrackerEntry};
pub use error::{DomainError, ErrorCategory};
pub use manifest::{MANIFEST_FILE, Manifest};
pub use settings::Settings;
pub use tree::{NodeBuilder, NodeKind, TemplateRef, TreeNode};
pub use validation::Validator;
