//! Template rendering.
//!
//! The renderer turns a logical template name into file bytes:
//!
//! 1. pick a [`RenderStrategy`]: the one registered under the request's hook
//!    key, or the default asset lookup
//! 2. let it resolve the source path (a strategy may synthesize a new source,
//!    e.g. by merging partial templates)
//! 3. read the source and, when the context is non-empty, run
//!    [`substitute`](crate::domain::substitute) over it
//!
//! The strategy registry is fixed before rendering starts; `render` itself
//! holds no mutable state.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{AssetLocator, Filesystem},
    },
    domain::{Context, TemplateRef, substitute},
    error::ScaffoldResult,
};

/// What to render and with which values.
#[derive(Debug, Clone, Copy)]
pub struct RenderRequest<'a> {
    pub logical_name: &'a str,
    pub context: &'a Context,
    pub hook_key: Option<&'a str>,
}

impl<'a> RenderRequest<'a> {
    pub fn new(logical_name: &'a str, context: &'a Context) -> Self {
        Self {
            logical_name,
            context,
            hook_key: None,
        }
    }

    pub fn with_hook(mut self, key: &'a str) -> Self {
        self.hook_key = Some(key);
        self
    }

    /// Request for a file node's template reference.
    pub fn for_template(template: &'a TemplateRef, context: &'a Context) -> Self {
        Self {
            logical_name: template.name(),
            context,
            hook_key: template.hook(),
        }
    }
}

/// Named rendering strategy.
///
/// Returns the path of the source to read instead of the default lookup of
/// `request.logical_name`.
pub trait RenderStrategy: Send + Sync {
    fn resolve(
        &self,
        request: &RenderRequest<'_>,
        assets: &dyn AssetLocator,
    ) -> ScaffoldResult<PathBuf>;
}

impl<F> RenderStrategy for F
where
    F: Fn(&RenderRequest<'_>, &dyn AssetLocator) -> ScaffoldResult<PathBuf> + Send + Sync,
{
    fn resolve(
        &self,
        request: &RenderRequest<'_>,
        assets: &dyn AssetLocator,
    ) -> ScaffoldResult<PathBuf> {
        self(request, assets)
    }
}

/// Produces file contents from templates.
pub struct Renderer {
    assets: Box<dyn AssetLocator>,
    fs: Arc<dyn Filesystem>,
    strategies: HashMap<String, Box<dyn RenderStrategy>>,
}

impl Renderer {
    pub fn new(assets: Box<dyn AssetLocator>, fs: Arc<dyn Filesystem>) -> Self {
        Self {
            assets,
            fs,
            strategies: HashMap::new(),
        }
    }

    /// Register `strategy` under `key`, replacing any previous one.
    pub fn register(&mut self, key: impl Into<String>, strategy: impl RenderStrategy + 'static) {
        self.strategies.insert(key.into(), Box::new(strategy));
    }

    /// Builder-style [`register`](Self::register).
    pub fn with_strategy(
        mut self,
        key: impl Into<String>,
        strategy: impl RenderStrategy + 'static,
    ) -> Self {
        self.register(key, strategy);
        self
    }

    pub fn has_strategy(&self, key: &str) -> bool {
        self.strategies.contains_key(key)
    }

    /// Render `request` to bytes.
    ///
    /// With an empty context the source bytes are returned verbatim.
    ///
    /// # Errors
    ///
    /// - `NotInstalled` when the template cannot be located
    /// - `RenderingFailed` when a non-empty context meets non-UTF-8 content
    /// - filesystem errors from reading the source
    #[instrument(skip_all, fields(template = request.logical_name, hook = request.hook_key))]
    pub fn render(&self, request: &RenderRequest<'_>) -> ScaffoldResult<Vec<u8>> {
        let source = self.resolve_source(request)?;
        debug!(source = %source.display(), "Template resolved");

        let bytes = self.fs.read(&source)?;
        if request.context.is_empty() {
            return Ok(bytes);
        }

        let text = String::from_utf8(bytes).map_err(|e| ApplicationError::RenderingFailed {
            name: request.logical_name.to_string(),
            reason: format!("template is not valid UTF-8: {e}"),
        })?;

        Ok(substitute(&text, request.context).into_bytes())
    }

    fn resolve_source(&self, request: &RenderRequest<'_>) -> ScaffoldResult<PathBuf> {
        match request.hook_key {
            Some(key) => match self.strategies.get(key) {
                Some(strategy) => strategy.resolve(request, self.assets.as_ref()),
                None => {
                    warn!(hook = key, "Unknown rendering strategy; using default lookup");
                    self.assets.resolve(request.logical_name)
                }
            },
            None => self.assets.resolve(request.logical_name),
        }
    }
}
