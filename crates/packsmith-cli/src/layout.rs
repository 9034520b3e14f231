//! The Python package layout `packsmith pack` lays down.
//!
//! ```text
//! <base>/
//! ├── src/<package>/__init__.py
//! ├── bin/<package>                          --script
//! ├── docs/                                  unless --no-docs
//! ├── data/                                  --data
//! ├── tests/__init__.py
//! ├── .github/workflows/python-package.yml   --github
//! ├── README.md
//! ├── setup.py
//! └── setup.cfg                              + scripts section with --script
//! ```

use std::sync::Arc;

use packsmith_adapters::MergeStrategy;
use packsmith_core::{
    application::{
        Renderer,
        ports::{AssetLocator, Filesystem},
    },
    domain::{DomainError, TemplateRef, TreeNode},
    error::ScaffoldResult,
};

/// Hook that appends the `[options]` scripts section to `setup.cfg`.
pub const SCRIPTS_HOOK: &str = "scripts";

/// Which optional parts of the package to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageLayout {
    pub package: String,
    pub data: bool,
    pub script: bool,
    pub github: bool,
    pub docs: bool,
}

impl PackageLayout {
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            data: false,
            script: false,
            github: false,
            docs: true,
        }
    }

    /// Tree for this layout. Disabled parts stay in the tree as false
    /// conditions.
    pub fn tree(&self) -> Result<TreeNode, DomainError> {
        let setup_cfg = if self.script {
            TemplateRef::new("setup.cfg.t").with_hook(SCRIPTS_HOOK)
        } else {
            TemplateRef::new("setup.cfg.t")
        };

        TreeNode::root([
            TreeNode::dir("src")
                .child(
                    TreeNode::dir(&self.package)
                        .child(TreeNode::file("__init__.py").template("__init__.py.t").build()?)
                        .build()?,
                )
                .build()?,
            TreeNode::dir("bin")
                .when(self.script)
                .child(TreeNode::file(&self.package).template("script.t").build()?)
                .build()?,
            TreeNode::dir("docs").when(self.docs).build()?,
            TreeNode::dir("data").when(self.data).build()?,
            TreeNode::dir("tests")
                .child(TreeNode::file("__init__.py").build()?)
                .build()?,
            TreeNode::dir(".github")
                .when(self.github)
                .child(
                    TreeNode::dir("workflows")
                        .child(
                            TreeNode::file("python-package.yml")
                                .template("github-workflow.yml.t")
                                .build()?,
                        )
                        .build()?,
                )
                .build()?,
            TreeNode::file("README.md").template("README.md.t").build()?,
            TreeNode::file("setup.py").template("setup.py.t").build()?,
            TreeNode::file("setup.cfg").template(setup_cfg).build()?,
        ])
    }

    /// Renderer over `assets` with the hooks this layout refers to.
    pub fn renderer(
        &self,
        assets: Box<dyn AssetLocator>,
        fs: Arc<dyn Filesystem>,
    ) -> ScaffoldResult<Renderer> {
        let mut renderer = Renderer::new(assets, fs);
        if self.script {
            renderer.register(SCRIPTS_HOOK, MergeStrategy::new(["setup.cfg.scripts.t"])?);
        }
        Ok(renderer)
    }
}
