//! Clap derive structures for the `luxtronik` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// luxtronik -- inspect and edit Luxtronik heat pump snapshots
#[derive(Debug, Parser)]
#[command(
    name = "luxtronik",
    version,
    about = "Inspect and edit Luxtronik heat pump snapshots",
    long_about = "Runs the Luxtronik update coordinator against a JSON snapshot of the\n\
        controller's parameter, calculation and visibility tables.\n\n\
        Writes go through the same locked write path as a live device and are\n\
        persisted back to the snapshot file.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Snapshot file (JSON dump of the controller tables)
    #[arg(long, short = 'f', env = "LUXTRONIK_SNAPSHOT", global = true)]
    pub snapshot: Option<PathBuf>,

    /// Config file (defaults to the platform config path)
    #[arg(long, env = "LUXTRONIK_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format (defaults to the configured `output`, else table)
    #[arg(long, short = 'o', global = true)]
    pub output: Option<OutputFormat>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output Enum ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Look up values by `group.field` identifier
    #[command(alias = "g")]
    Get(GetArgs),

    /// List every field of one table
    Fields(FieldsArgs),

    /// Show serial number, model, manufacturer and firmware
    #[command(alias = "id")]
    Identity,

    /// Show registry metadata for each logical device
    Devices,

    /// Show detected features (cooling zones, solar)
    Features,

    /// Show built-in switches and their states
    Switches,

    /// Turn a built-in switch on or off
    Switch(SwitchArgs),

    /// Write a parameter
    Set(SetArgs),

    /// Show the effective configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Command Arguments ────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GetArgs {
    /// Identifiers such as `parameters.ID_Ba_Hz_akt` or `calculations.15`
    #[arg(required = true)]
    pub ids: Vec<String>,
}

#[derive(Debug, Args)]
pub struct FieldsArgs {
    /// Table to list
    #[arg(value_parser = ["parameters", "calculations", "visibilities"])]
    pub group: String,
}

#[derive(Debug, Args)]
pub struct SwitchArgs {
    /// Switch key (see `luxtronik switches`)
    pub key: String,

    /// Desired state
    pub state: SwitchState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SwitchState {
    On,
    Off,
}

#[derive(Debug, Args)]
pub struct SetArgs {
    /// Parameter name, optionally prefixed with `parameters.`
    pub parameter: String,

    /// New value (booleans and numbers are detected, anything else is text)
    pub value: String,

    /// Skip the follow-up read after the write
    #[arg(long)]
    pub no_refresh: bool,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration as TOML
    Show,
    /// Print the config file path
    Path,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    pub shell: clap_complete::Shell,
}
