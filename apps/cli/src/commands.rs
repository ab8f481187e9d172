//! CLI command definitions, routing, and tracing setup.

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use console::{Term, style};
use rollup_core::{Propagator, reference};
use rollup_github::GitHubStore;
use rollup_shared::{
    AppConfig, Reference, init_config, load_config, missing_token_error, token_from_env,
};
use tracing::{debug, info};

use crate::display::{DisplayMode, TreeDisplay, summary_lines};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// rollup: close parent issues once all their sub-issues are done.
#[derive(Parser)]
#[command(
    name = "rollup",
    version,
    about = "Close parent issues automatically once every sub-issue is complete.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Walk an issue's sub-issue tree and close every completed parent.
    Close {
        /// Root issue: owner/repo#123 or a .../owner/repo/items/123 address.
        /// Prompted for when omitted.
        reference: Option<String>,

        /// Report what would be closed without changing anything.
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Only print issues that are closed (or would be).
        #[arg(short, long)]
        quiet: bool,

        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,

        /// API token (falls back to the configured env var, GH_TOKEN, then `gh auth token`).
        #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
        token: Option<String>,
    },

    /// Show how a reference is parsed.
    Resolve {
        /// Reference to parse.
        reference: String,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr; stdout carries
/// the tree display.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "rollup=warn",
        1 => "rollup=info",
        2 => "rollup=debug",
        _ => "rollup=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Close {
            reference,
            dry_run,
            quiet,
            yes,
            token,
        } => cmd_close(reference.as_deref(), dry_run, quiet, yes, token.as_deref()).await,
        Command::Resolve { reference } => cmd_resolve(&reference),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_close(
    target: Option<&str>,
    dry_run: bool,
    quiet: bool,
    yes: bool,
    token: Option<&str>,
) -> Result<()> {
    let config = load_config()?;

    let root = match target {
        Some(text) => reference::parse(text.trim())?,
        None => prompt_reference()?,
    };

    let token = resolve_token(token, &config)?;
    let store = GitHubStore::new(&config.github, &token)?;

    if !dry_run && !yes && config.display.confirm {
        let question = format!("Close eligible parent issues under {root}?");
        if !confirm(&question)? {
            println!("Aborted; nothing was changed.");
            return Ok(());
        }
    }

    let mode = if quiet || config.display.quiet {
        DisplayMode::Quiet
    } else {
        DisplayMode::Tree
    };
    let display = TreeDisplay::new(mode);

    info!(%root, dry_run, "walking issue hierarchy");

    let outcome = Propagator::new(&store)
        .with_observer(&display)
        .with_note(config.closing.note.clone())
        .propagate(&root, 0, dry_run)
        .await;
    display.finish();
    let result = outcome?;

    println!();
    for line in summary_lines(&result, dry_run) {
        println!("{line}");
    }
    if dry_run {
        println!("  {}", style("Dry run: nothing was changed.").dim());
    }
    println!();

    Ok(())
}

fn cmd_resolve(text: &str) -> Result<()> {
    let resolved = reference::parse(text.trim())?;
    println!("  Namespace: {}", resolved.container.namespace);
    println!("  Name:      {}", resolved.container.name);
    println!("  ID:        {}", resolved.id);
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Token & prompts
// ---------------------------------------------------------------------------

/// Pick the API token: flag, environment, then the GitHub CLI's stored login.
fn resolve_token(flag: Option<&str>, config: &AppConfig) -> Result<String> {
    if let Some(token) = flag.map(str::trim).filter(|t| !t.is_empty()) {
        return Ok(token.to_string());
    }
    if let Some(token) = token_from_env(config) {
        return Ok(token);
    }
    if let Some(token) = gh_auth_token() {
        debug!("using token from `gh auth token`");
        return Ok(token);
    }
    Err(missing_token_error(config).into())
}

/// Ask the GitHub CLI for its token, if it is installed and logged in.
fn gh_auth_token() -> Option<String> {
    let output = std::process::Command::new("gh")
        .args(["auth", "token"])
        .output();

    match output {
        Ok(output) if output.status.success() => {
            let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
            (!token.is_empty()).then_some(token)
        }
        Ok(output) => {
            debug!(status = ?output.status.code(), "`gh auth token` failed");
            None
        }
        Err(e) => {
            debug!(error = %e, "gh CLI not available");
            None
        }
    }
}

/// Prompt until the user enters a valid reference.
fn prompt_reference() -> Result<Reference> {
    let term = Term::stdout();
    if !term.is_term() {
        return Err(eyre!("no issue reference given (expected owner/repo#123)"));
    }

    loop {
        term.write_str(&format!(
            "{} ",
            style("Parent issue (owner/repo#123):").cyan()
        ))?;
        let input = term.read_line()?;
        let input = input.trim();
        if input.is_empty() {
            return Err(eyre!("no issue reference given"));
        }
        match reference::resolve(input) {
            Some(resolved) => return Ok(resolved),
            None => term.write_line(&format!(
                "{}",
                style(format!("'{input}' is not a valid reference")).red()
            ))?,
        }
    }
}

/// Ask a yes/no question; anything but y/yes is "no".
fn confirm(question: &str) -> Result<bool> {
    let term = Term::stdout();
    if !term.is_term() {
        return Err(eyre!(
            "refusing to close issues without confirmation; pass --yes or --dry-run"
        ));
    }

    term.write_str(&format!("{} [y/N] ", style(question).cyan()))?;
    let answer = term.read_line()?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
