use std::io::IsTerminal;
use std::path::PathBuf;

use agenda_shared::ActionKind;
use anyhow::{anyhow, bail};
use clap::{ArgAction, ArgGroup, Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// One `--set key=value` page configuration override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigOverride {
    pub key: String,
    pub value: String,
}

impl std::str::FromStr for ConfigOverride {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((key, value)) = s.split_once('=') else {
            bail!("expected a page config key=value, got: {s}");
        };
        let key = key.trim();
        if key.is_empty() {
            bail!("missing page config key in: {s}");
        }
        Ok(Self {
            key: key.to_string(),
            value: value.trim().to_string(),
        })
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "agenda",
    version,
    about = "Inspect conference schedule filter fragments and requests",
    disable_help_subcommand = true
)]
pub struct GlobalCli {
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[arg(short = 'q', long = "quiet", action = ArgAction::Count, global = true)]
    pub quiet: u8,

    /// Page configuration file (TOML).
    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Override one configuration key, e.g. `--set add_path=/api/add`.
    #[arg(
        long = "set",
        value_parser = clap::builder::ValueParser::new(|s: &str| s.parse::<ConfigOverride>()),
        action = ArgAction::Append,
        global = true
    )]
    pub overrides: Vec<ConfigOverride>,

    /// Emit JSON instead of text.
    #[arg(long = "json", global = true)]
    pub json: bool,

    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Decode a fragment, rewriting it to the default when incomplete.
    Decode { fragment: String },

    /// Build the fragment for a selection.
    Encode {
        #[arg(long, default_value = agenda_shared::ALL)]
        date: String,
        #[arg(long = "type", default_value = agenda_shared::ALL)]
        kind: String,
    },

    /// Apply a fragment to a listing of events read from a JSON file.
    Project {
        fragment: String,
        #[arg(long)]
        items: PathBuf,
    },

    /// Fragment after a selector widget edit.
    Select(SelectArgs),

    /// Fragment after the reset button.
    Reset,

    /// Location the search box navigates to.
    Search {
        #[arg(required = true, num_args = 1..)]
        keywords: Vec<String>,
    },

    /// Schedule collaborator request for an add or remove click.
    Request {
        #[arg(value_parser = clap::builder::ValueParser::new(|s: &str| s.parse::<ActionKind>()))]
        action: ActionKind,
        event_id: String,
    },

    /// Print the effective page configuration.
    Config,
}

#[derive(Args, Debug, Clone)]
#[command(group(ArgGroup::new("axis").required(true).args(["date", "kind"])))]
pub struct SelectArgs {
    pub fragment: String,
    #[arg(long)]
    pub date: Option<String>,
    #[arg(long = "type")]
    pub kind: Option<String>,
}

/// Log level used when `RUST_LOG` is unset. Quiet wins over verbose.
fn default_level(verbose: u8, quiet: u8) -> &'static str {
    match (quiet, verbose) {
        (2.., _) => "error",
        (1, _) | (0, 0) => "warn",
        (0, 1) => "info",
        (0, 2) => "debug",
        (0, 3..) => "trace",
    }
}

pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let level = default_level(verbose, quiet);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| anyhow!("invalid RUST_LOG filter: {e}"))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, fallback = level, "tracing already initialised");
    }

    Ok(())
}
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_select_with_type_only() {
        let cli = GlobalCli::parse_from([
            "agenda",
            "select",
            "#!date=july_10&type=all",
            "--type",
            "workshop",
        ]);
        match cli.command {
            Command::Select(args) => {
                assert_eq!(args.kind.as_deref(), Some("workshop"));
                assert!(args.date.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn select_requires_an_axis() {
        assert!(GlobalCli::try_parse_from(["agenda", "select", "#!date=all&type=all"]).is_err());
    }

    #[test]
    fn global_overrides_accumulate() {
        let cli = GlobalCli::parse_from([
            "agenda",
            "--set",
            "add_path=/api/add",
            "request",
            "add",
            "42",
            "--set",
            "event_id_param = id",
        ]);
        assert_eq!(cli.overrides.len(), 2);
        assert_eq!(cli.overrides[1].key, "event_id_param");
        assert_eq!(cli.overrides[1].value, "id");
    }

    #[test]
    fn override_needs_a_key() {
        assert!("nokey".parse::<ConfigOverride>().is_err());
        assert!(" =/api/add".parse::<ConfigOverride>().is_err());
        assert_eq!(
            "search_path=/find?a=b".parse::<ConfigOverride>().unwrap(),
            ConfigOverride {
                key: "search_path".to_string(),
                value: "/find?a=b".to_string(),
            }
        );
    }

    #[test]
    fn quiet_beats_verbose() {
        assert_eq!(default_level(0, 0), "warn");
        assert_eq!(default_level(2, 0), "debug");
        assert_eq!(default_level(7, 0), "trace");
        assert_eq!(default_level(3, 1), "warn");
        assert_eq!(default_level(1, 4), "error");
    }
}
