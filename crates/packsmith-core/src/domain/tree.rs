//! Declarative tree specification.
//!
//! A [`TreeNode`] describes what should exist on disk, independent of how it
//! gets there. Trees are validated when each node is built, so a tree that
//! exists is well-formed; nothing downstream re-checks structure.
//!
//! ```text
//! ROOT
//! ├── DIR  src
//! │   └── FILE __init__.py   (template: __init__.py.t)
//! └── DIR  data              (condition: false → skipped with its subtree)
//! ```
//!
//! Conditions are plain booleans. Callers evaluate flags *before* building the
//! node, so materialization never depends on argument-parsing order.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use crate::domain::{entry::TrackerEntry, error::DomainError};

/// What a node turns into on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Top of a tree. Contributes no path segment and no entry.
    Root,
    Dir,
    File,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => write!(f, "ROOT"),
            Self::Dir => write!(f, "DIR"),
            Self::File => write!(f, "FILE"),
        }
    }
}

/// Reference to the template a file is rendered from.
///
/// `name` is a logical template name resolved by the asset locator; `hook`
/// optionally selects a named rendering strategy registered on the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateRef {
    name: String,
    hook: Option<String>,
}

impl TemplateRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hook: None,
        }
    }

    /// Render through the strategy registered under `key`.
    pub fn with_hook(mut self, key: impl Into<String>) -> Self {
        self.hook = Some(key.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hook(&self) -> Option<&str> {
        self.hook.as_deref()
    }
}

impl From<&str> for TemplateRef {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for TemplateRef {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

/// One node of a tree specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    kind: NodeKind,
    name: Option<String>,
    children: Vec<TreeNode>,
    condition: bool,
    template: Option<TemplateRef>,
}

impl TreeNode {
    /// Build and validate a node.
    ///
    /// Children are already valid (they went through this constructor), so
    /// only this node and its direct children are checked.
    ///
    /// # Errors
    ///
    /// [`DomainError::Structural`] when:
    /// - a `File` has children or a `Root` carries a name
    /// - a `Dir`/`File` has no name, or the name is not a single path segment
    /// - a `Root` appears anywhere but the top
    /// - a template is attached to something other than a `File`
    /// - two enabled siblings share a name
    pub fn new(
        kind: NodeKind,
        name: Option<String>,
        children: Vec<TreeNode>,
        condition: bool,
        template: Option<TemplateRef>,
    ) -> Result<Self, DomainError> {
        let node = Self {
            kind,
            name,
            children,
            condition,
            template,
        };
        node.validate()?;
        Ok(node)
    }

    /// Wrap top-level children in a root node.
    pub fn root(children: impl IntoIterator<Item = TreeNode>) -> Result<Self, DomainError> {
        Self::new(
            NodeKind::Root,
            None,
            children.into_iter().collect(),
            true,
            None,
        )
    }

    /// Start building a directory node.
    pub fn dir(name: impl Into<String>) -> NodeBuilder {
        NodeBuilder::new(NodeKind::Dir, name.into())
    }

    /// Start building a file node.
    pub fn file(name: impl Into<String>) -> NodeBuilder {
        NodeBuilder::new(NodeKind::File, name.into())
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn children(&self) -> &[TreeNode] {
        &self.children
    }

    pub fn condition(&self) -> bool {
        self.condition
    }

    pub fn template(&self) -> Option<&TemplateRef> {
        self.template.as_ref()
    }

    /// The entries materializing this tree under `base` would create, in
    /// creation order.
    ///
    /// Used for dry runs; follows the same walk as the materializer.
    pub fn plan(&self, base: &Path) -> Vec<TrackerEntry> {
        let mut entries = Vec::new();
        self.plan_into(base, &mut entries);
        entries
    }

    fn plan_into(&self, current: &Path, entries: &mut Vec<TrackerEntry>) {
        if self.kind == NodeKind::Root {
            for child in &self.children {
                child.plan_into(current, entries);
            }
            return;
        }

        let Some(name) = self.name.as_deref() else {
            return;
        };
        if !self.condition {
            return;
        }

        let path = current.join(name);
        match self.kind {
            NodeKind::Dir => {
                entries.push(TrackerEntry::dir(&path));
                for child in &self.children {
                    child.plan_into(&path, entries);
                }
            }
            _ => entries.push(TrackerEntry::file(path)),
        }
    }

    fn validate(&self) -> Result<(), DomainError> {
        match (self.kind, self.name.as_deref()) {
            (NodeKind::Root, Some(name)) => {
                return Err(DomainError::structural(format!(
                    "root node cannot be named (got '{name}')"
                )));
            }
            (NodeKind::Root, None) if !self.condition => {
                return Err(DomainError::structural("root node cannot be conditional"));
            }
            (NodeKind::Root, None) => {}
            (kind, None) => {
                return Err(DomainError::structural(format!("{kind} node needs a name")));
            }
            (_, Some(name)) => validate_segment(name)?,
        }

        if self.kind == NodeKind::File && !self.children.is_empty() {
            return Err(DomainError::structural(format!(
                "file '{}' cannot have children",
                self.name.as_deref().unwrap_or_default()
            )));
        }

        if self.kind != NodeKind::File && self.template.is_some() {
            return Err(DomainError::structural(format!(
                "only files take a template ({} node '{}' has one)",
                self.kind,
                self.name.as_deref().unwrap_or_default()
            )));
        }

        let mut seen = HashSet::new();
        for child in &self.children {
            if child.kind == NodeKind::Root {
                return Err(DomainError::structural(
                    "root node can only appear at the top of a tree",
                ));
            }

            // Alternatives sharing a name are fine as long as one is disabled.
            if child.condition {
                if let Some(name) = child.name() {
                    if !seen.insert(name) {
                        return Err(DomainError::structural(format!(
                            "duplicate entry '{name}'"
                        )));
                    }
                }
            }
        }

        Ok(())
    }
}

fn validate_segment(name: &str) -> Result<(), DomainError> {
    if name.is_empty() {
        return Err(DomainError::structural("entry name cannot be empty"));
    }
    if name == "." || name == ".." {
        return Err(DomainError::structural(format!(
            "'{name}' is not a valid entry name"
        )));
    }
    if name.contains(['/', '\\', '\0']) {
        return Err(DomainError::structural(format!(
            "entry name '{name}' must be a single path segment"
        )));
    }
    Ok(())
}

/// Builder for [`TreeNode`] directories and files.
#[derive(Debug, Clone)]
#[must_use]
pub struct NodeBuilder {
    kind: NodeKind,
    name: String,
    children: Vec<TreeNode>,
    condition: bool,
    template: Option<TemplateRef>,
}

impl NodeBuilder {
    fn new(kind: NodeKind, name: String) -> Self {
        Self {
            kind,
            name,
            children: Vec::new(),
            condition: true,
            template: None,
        }
    }

    /// Only materialize this node (and its subtree) when `condition` holds.
    pub fn when(mut self, condition: bool) -> Self {
        self.condition = condition;
        self
    }

    pub fn child(mut self, node: TreeNode) -> Self {
        self.children.push(node);
        self
    }

    pub fn children(mut self, nodes: impl IntoIterator<Item = TreeNode>) -> Self {
        self.children.extend(nodes);
        self
    }

    pub fn template(mut self, template: impl Into<TemplateRef>) -> Self {
        self.template = Some(template.into());
        self
    }

    pub fn build(self) -> Result<TreeNode, DomainError> {
        TreeNode::new(
            self.kind,
            Some(self.name),
            self.children,
            self.condition,
            self.template,
        )
    }
}
