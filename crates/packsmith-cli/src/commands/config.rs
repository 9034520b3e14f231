//! `packsmith config`: show or store the author defaults.
//!
//! The values live in the settings file next to the installed templates and
//! fill the `{author}`, `{email}` and `{user}` placeholders.

use tracing::{debug, instrument};

use packsmith_adapters::JsonSettingsStore;
use packsmith_core::{
    application::ports::SettingsStore,
    domain::{Settings, Validator},
};

use crate::{
    cli::ConfigArgs,
    commands::shared_assets,
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

#[instrument(skip_all)]
pub fn execute(args: ConfigArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let updates = validated_updates(&args)?;
    let assets = shared_assets(&config)?;
    let store = JsonSettingsStore::in_data_root(&assets)?;
    let mut settings = store.get()?;

    if updates.is_empty() {
        for line in listing(&settings) {
            output.print(&line)?;
        }
        return Ok(());
    }

    settings.merge(updates);
    store.set(&settings)?;
    debug!(path = %store.path().display(), "Settings updated");
    output.success(&format!("Defaults saved to {}", store.path().display()))?;
    Ok(())
}

/// Checked values for the flags given; absent flags stay `None`.
fn validated_updates(args: &ConfigArgs) -> CliResult<Settings> {
    Ok(Settings {
        author: args
            .author
            .as_deref()
            .map(Validator::author)
            .transpose()?
            .map(str::to_string),
        email: args
            .email
            .as_deref()
            .map(Validator::email)
            .transpose()?
            .map(str::to_string),
        user: args
            .user
            .as_deref()
            .map(Validator::user)
            .transpose()?
            .map(str::to_string),
    })
}

fn listing(settings: &Settings) -> Vec<String> {
    settings
        .entries()
        .iter()
        .map(|(key, value)| format!("{key} = {}", value.unwrap_or("(not set)")))
        .collect()
}

// ── tests ─────────────────────────────────────────────────────────────────────
