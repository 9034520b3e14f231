//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums. No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(
    name    = "packsmith",
    bin_name = "packsmith",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Python package scaffolding with all-or-nothing rollback",
    long_about = "Packsmith lays out a Python package (src, tests, docs, setup files) \
                  in an existing directory. A failed run leaves the directory exactly \
                  as it was, and `packsmith clear` undoes a successful one.",
    after_help = "EXAMPLES:\n\
        \x20 packsmith pack ./my-package --script --github\n\
        \x20 packsmith clear ./my-package\n\
        \x20 packsmith config --author \"Ada Lovelace\" --email ada@example.com\n\
        \x20 packsmith completions bash > ~/.local/share/bash-completion/completions/packsmith",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Lay out a Python package in an existing directory.
    #[command(
        visible_alias = "p",
        about = "Scaffold a Python package",
        after_help = "EXAMPLES:\n\
            \x20 packsmith pack                      # current directory, named after it\n\
            \x20 packsmith pack ./demo -p demo_pkg   # explicit package name\n\
            \x20 packsmith pack ./demo -s -d -g      # script, data dir and CI workflow\n\
            \x20 packsmith pack ./demo --dry-run     # list what would be created"
    )]
    Pack(PackArgs),

    /// Undo a previous `pack`.
    #[command(
        about = "Remove a scaffolded package",
        after_help = "EXAMPLES:\n\
            \x20 packsmith clear\n\
            \x20 packsmith clear ./demo"
    )]
    Clear(ClearArgs),

    /// Show or store the author defaults used in templates.
    #[command(
        about = "Manage author defaults",
        after_help = "EXAMPLES:\n\
            \x20 packsmith config                              # show current defaults\n\
            \x20 packsmith config -a \"Ada Lovelace\"\n\
            \x20 packsmith config -e ada@example.com -u ada"
    )]
    Config(ConfigArgs),

    /// Write the default configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 packsmith init\n\
            \x20 packsmith init --force   # overwrite an existing file"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 packsmith completions bash > ~/.local/share/bash-completion/completions/packsmith\n\
            \x20 packsmith completions zsh  > ~/.zfunc/_packsmith\n\
            \x20 packsmith completions fish > ~/.config/fish/completions/packsmith.fish"
    )]
    Completions(CompletionsArgs),
}

// ── pack ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct PackArgs {
    /// Directory to scaffold into. Must already exist.
    #[arg(value_name = "PATH", help = "Packaging path (default: current directory)")]
    pub path: Option<PathBuf>,

    /// Package name. Defaults to the name of the packaging directory.
    #[arg(
        short = 'p',
        long = "package",
        value_name = "NAME",
        help = "Package name"
    )]
    pub package: Option<String>,

    #[arg(
        long = "package-version",
        value_name = "VERSION",
        help = "Initial package version (default from config)"
    )]
    pub package_version: Option<String>,

    #[arg(short = 'd', long = "data", help = "Add a data/ directory")]
    pub data: bool,

    #[arg(
        short = 's',
        long = "script",
        help = "Add a bin/<package> command-line script"
    )]
    pub script: bool,

    #[arg(
        short = 'g',
        long = "github",
        help = "Add a GitHub Actions workflow"
    )]
    pub github: bool,

    #[arg(long = "no-docs", help = "Do not create a docs/ directory")]
    pub no_docs: bool,

    /// Preview what would be created without writing any files.
    #[arg(long = "dry-run", help = "Show what would be created without creating")]
    pub dry_run: bool,

    #[arg(
        short = 'y',
        long = "yes",
        help = "Skip confirmation and create immediately"
    )]
    pub yes: bool,
}

// ── clear ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ClearArgs {
    #[arg(value_name = "PATH", help = "Packaging path (default: current directory)")]
    pub path: Option<PathBuf>,
}

// ── config ────────────────────────────────────────────────────────────────────

/// Without flags the current defaults are printed.
#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[arg(
        short = 'a',
        long = "author",
        value_name = "NAME",
        help = "Set the default author name"
    )]
    pub author: Option<String>,

    #[arg(
        short = 'e',
        long = "email",
        value_name = "EMAIL",
        help = "Set the default email address"
    )]
    pub email: Option<String>,

    #[arg(
        short = 'u',
        long = "user",
        value_name = "USER",
        help = "Set the default (GitHub) username"
    )]
    pub user: Option<String>,
}

// ── init ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct InitArgs {
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_flags_parse() {
        let cli = Cli::try_parse_from([
            "packsmith", "pack", "./demo", "-p", "demo", "-d", "-s", "-g", "--no-docs", "-y",
        ])
        .unwrap();

        let Commands::Pack(args) = cli.command else {
            panic!("expected pack");
        };
        assert_eq!(args.path, Some(PathBuf::from("./demo")));
        assert_eq!(args.package.as_deref(), Some("demo"));
        assert!(args.data && args.script && args.github && args.no_docs && args.yes);
        assert!(!args.dry_run);
    }

    #[test]
    fn pack_path_is_optional() {
        let cli = Cli::try_parse_from(["packsmith", "pack"]).unwrap();
        let Commands::Pack(args) = cli.command else {
            panic!("expected pack");
        };
        assert!(args.path.is_none());
        assert!(args.package.is_none());
    }

    #[test]
    fn config_without_flags_is_a_listing() {
        let cli = Cli::try_parse_from(["packsmith", "config"]).unwrap();
        let Commands::Config(args) = cli.command else {
            panic!("expected config");
        };
        assert!(args.author.is_none() && args.email.is_none() && args.user.is_none());
    }

    #[test]
    fn global_flags_work_after_the_subcommand() {
        let cli = Cli::try_parse_from(["packsmith", "clear", "-vv", "--no-color"]).unwrap();
        assert_eq!(cli.global.verbose, 2);
        assert!(cli.global.no_color);
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["packsmith", "-q", "-v", "clear"]).is_err());
    }
}
