//! `packsmith clear`: undo a previous `pack`.

use std::sync::Arc;

use tracing::{info, instrument};

use packsmith_adapters::LocalFilesystem;
use packsmith_core::application::{Renderer, ScaffoldService, ports::Filesystem};

use crate::{
    cli::ClearArgs,
    commands::{packaging_path, shared_assets},
    config::AppConfig,
    error::{CliResult, IntoCli as _},
    output::OutputManager,
};

/// Remove everything the manifest in the packaging path records, newest
/// first, the manifest last.
#[instrument(skip_all)]
pub fn execute(args: ClearArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let base = packaging_path(args.path.as_deref())?;

    let filesystem: Arc<dyn Filesystem> = Arc::new(LocalFilesystem::new());
    let renderer = Renderer::new(Box::new(shared_assets(&config)?), Arc::clone(&filesystem));
    let service = ScaffoldService::new(filesystem, renderer);

    let removed = service
        .clear(&base)
        .with_cli_context(|| format!("clearing {}", base.display()))?;
    info!(removed, base = %base.display(), "Package cleared");

    output.success(&format!(
        "Removed {removed} entries from {}",
        base.display()
    ))?;
    Ok(())
}
