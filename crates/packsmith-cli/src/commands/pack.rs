//! Implementation of the `packsmith pack` command.
//!
//! Responsibility: turn CLI arguments into a package layout and a template
//! context, call the core scaffold service, and display results.

use std::{path::Path, sync::Arc};

use tracing::{debug, info, instrument};

use packsmith_adapters::{JsonSettingsStore, LocalFilesystem};
use packsmith_core::{
    application::{
        ApplicationError, ScaffoldService,
        ports::{Filesystem, SettingsStore},
    },
    domain::{Context, MANIFEST_FILE, Settings, TrackerEntry, Validator},
    error::ScaffoldError,
};

use crate::{
    cli::{GlobalArgs, PackArgs},
    commands::{packaging_path, shared_assets},
    config::AppConfig,
    error::{CliError, CliResult},
    layout::PackageLayout,
    output::OutputManager,
};

/// Execute `packsmith pack`.
///
/// 1. Resolve the packaging path and validate name and version
/// 2. Build the layout tree (conditions are fixed here)
/// 3. Stop early if the path already holds a package
/// 4. Confirm unless `--yes`, `--quiet` or `--dry-run`
/// 5. `--dry-run`: list the plan and stop
/// 6. Fold stored settings into the context and scaffold
#[instrument(skip_all)]
pub fn execute(
    args: PackArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let base = packaging_path(args.path.as_deref())?;
    let package = match args.package.as_deref() {
        Some(name) => name.to_string(),
        None => default_package_name(&base)?,
    };
    let package = Validator::package(&package)?.to_string();
    let version = args
        .package_version
        .as_deref()
        .unwrap_or(&config.defaults.version);
    let version = Validator::version(version)?.to_string();

    let layout = PackageLayout {
        package,
        data: args.data,
        script: args.script,
        github: args.github,
        docs: config.defaults.docs && !args.no_docs,
    };
    let tree = layout.tree()?;
    debug!(?layout, base = %base.display(), "Layout resolved");

    if base.join(MANIFEST_FILE).exists() {
        output.info(&format!("Package already built at {}", base.display()))?;
        return Ok(());
    }

    if !global.quiet && !args.yes && !args.dry_run {
        show_configuration(&layout, &version, &base, &output)?;
        if !output.confirm("Continue?")? {
            return Err(CliError::Cancelled);
        }
    }

    let assets = shared_assets(&config)?;
    let filesystem: Arc<dyn Filesystem> = Arc::new(LocalFilesystem::new());
    let renderer = layout.renderer(Box::new(Arc::clone(&assets)), Arc::clone(&filesystem))?;
    let service = ScaffoldService::new(filesystem, renderer);

    if args.dry_run {
        output.info(&format!(
            "Dry run: would create '{}' at {}",
            layout.package,
            base.display()
        ))?;
        for entry in service.plan(&tree, &base) {
            output.print(&format!("  {}", relative(&entry, &base)))?;
        }
        return Ok(());
    }

    let settings = JsonSettingsStore::in_data_root(&assets)?.get()?;
    let context = build_context(&layout.package, &version, &settings);

    output.header(&format!("Packing '{}'...", layout.package))?;
    info!(package = %layout.package, path = %base.display(), "Pack started");

    let report = match service.scaffold(&tree, &base, &context) {
        Ok(report) => report,
        Err(ScaffoldError::Application(ApplicationError::AlreadyScaffolded { path })) => {
            output.info(&format!("Package already built at {}", path.display()))?;
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    output.success(&format!(
        "Package '{}' created ({} directories, {} files)",
        layout.package,
        report.directory_count(),
        report.file_count(),
    ))?;

    if !global.quiet {
        output.print("")?;
        output.print("Next steps:")?;
        output.print(&format!("  cd {}", base.display()))?;
        output.print("  pip install -e .")?;
        if settings.author.is_none() {
            output.print("  # Set your name for future packages: packsmith config -a \"Your Name\"")?;
        }
    }

    Ok(())
}

/// Package name taken from the packaging directory's own name.
fn default_package_name(base: &Path) -> CliResult<String> {
    base.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| CliError::InvalidInput {
            message: format!(
                "cannot derive a package name from '{}'; pass --package",
                base.display()
            ),
            source: None,
        })
}

/// Template values for one run. Settings the user never stored stay as
/// literal placeholders.
fn build_context(package: &str, version: &str, settings: &Settings) -> Context {
    let mut context = Context::new()
        .with("package", package)
        .with("version", version)
        .with("year", chrono::Local::now().format("%Y").to_string());
    settings.apply_to(&mut context);
    context
}

fn relative(entry: &TrackerEntry, base: &Path) -> String {
    let path = entry.path().strip_prefix(base).unwrap_or(entry.path());
    format!("{:<4} {}", entry.kind.to_string(), path.display())
}

// ── UI helpers ────────────────────────────────────────────────────────────────

fn show_configuration(
    layout: &PackageLayout,
    version: &str,
    base: &Path,
    out: &OutputManager,
) -> CliResult<()> {
    let yes_no = |flag: bool| if flag { "yes" } else { "no" };

    out.header("Configuration")?;
    out.print(&format!("  Package:   {}", layout.package))?;
    out.print(&format!("  Version:   {version}"))?;
    out.print(&format!("  Location:  {}", base.display()))?;
    out.print(&format!("  Script:    {}", yes_no(layout.script)))?;
    out.print(&format!("  Data dir:  {}", yes_no(layout.data)))?;
    out.print(&format!("  Docs:      {}", yes_no(layout.docs)))?;
    out.print(&format!("  GitHub CI: {}", yes_no(layout.github)))?;
    out.print("")?;
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
