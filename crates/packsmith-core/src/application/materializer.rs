//! Tree materialization.
//!
//! Walks a [`TreeNode`] depth-first and turns every enabled node into a real
//! entry through the [`Tracker`]. Directories are created before anything
//! inside them; files are rendered first and then written in one go.
//!
//! The walk does no error handling of its own. The first failure propagates
//! and the caller decides whether to roll the tracker back.

use std::path::Path;

use tracing::{debug, instrument, trace};

use crate::{
    application::{
        ApplicationError,
        renderer::{RenderRequest, Renderer},
        tracker::Tracker,
    },
    domain::{Context, NodeKind, TreeNode},
    error::ScaffoldResult,
};

/// Drives a tree walk against a renderer and a tracker.
pub struct Materializer<'r> {
    renderer: &'r Renderer,
}

impl<'r> Materializer<'r> {
    pub fn new(renderer: &'r Renderer) -> Self {
        Self { renderer }
    }

    /// Create every enabled node of `root` under `base`.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if `base` is relative; nothing is touched
    /// - any error raised by the tracker or the renderer, unchanged. Entries
    ///   created before the failure stay in `tracker`.
    #[instrument(skip_all, fields(base = %base.display()))]
    pub fn materialize(
        &self,
        root: &TreeNode,
        base: &Path,
        context: &Context,
        tracker: &mut Tracker<'_>,
    ) -> ScaffoldResult<()> {
        if !base.is_absolute() {
            return Err(ApplicationError::ValidationFailed(format!(
                "base path must be absolute (got '{}')",
                base.display()
            ))
            .into());
        }

        self.walk(root, base, context, tracker)?;
        debug!(entries = tracker.len(), "Tree materialized");
        Ok(())
    }

    fn walk(
        &self,
        node: &TreeNode,
        current: &Path,
        context: &Context,
        tracker: &mut Tracker<'_>,
    ) -> ScaffoldResult<()> {
        if node.kind() == NodeKind::Root {
            for child in node.children() {
                self.walk(child, current, context, tracker)?;
            }
            return Ok(());
        }

        let Some(name) = node.name() else {
            return Ok(());
        };
        let path = current.join(name);

        if !node.condition() {
            trace!(kind = %node.kind(), path = %path.display(), "Skipped");
            return Ok(());
        }

        match node.kind() {
            NodeKind::Dir => {
                tracker.create_dir(&path)?;
                for child in node.children() {
                    self.walk(child, &path, context, tracker)?;
                }
            }
            _ => {
                let content = match node.template() {
                    Some(template) => self
                        .renderer
                        .render(&RenderRequest::for_template(template, context))?,
                    None => Vec::new(),
                };
                tracker.create_file(&path, &content)?;
            }
        }

        Ok(())
    }
}
