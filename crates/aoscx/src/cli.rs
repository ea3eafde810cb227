//! Clap derive structures for the `aoscx` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use aoscx_api::{AdminState, Choice, LacpMode, VlanMode, VlanSettings};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// aoscx -- configure ArubaOS-CX switches over REST
#[derive(Debug, Parser)]
#[command(
    name = "aoscx",
    version,
    about = "Configure ArubaOS-CX switches from the command line",
    long_about = "Manage VLANs, LAGs and switch ports through the AOS-CX REST API.\n\n\
        VLANs referenced by LAG or port configuration are created on the\n\
        switch when they do not exist yet.",
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
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Switch address (overrides AOSCX_HOSTNAME and the config file)
    #[arg(long, short = 'H', global = true)]
    pub host: Option<String>,

    /// Login user
    #[arg(long, short = 'u', global = true)]
    pub username: Option<String>,

    /// REST API version to fall back to when the switch cannot be probed
    #[arg(long, global = true)]
    pub api_version: Option<String>,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(long, short = 'o', default_value = "table", global = true)]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Field/value table
    Table,
    /// Pretty-printed JSON
    Json,
    /// YAML
    Yaml,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage VLANs
    Vlan(VlanArgs),

    /// Manage link aggregation groups
    Lag(LagArgs),

    /// Admin state and description of a physical port
    #[command(alias = "if")]
    Interface(InterfaceArgs),

    /// Layer-2 VLAN membership of a physical port
    L2(L2Args),

    /// Show the latest REST API version the switch offers
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    pub shell: clap_complete::Shell,
}

/// Parse an enumerated value with the library's own validation message.
fn choice<T: Choice>(value: &str) -> Result<T, String> {
    T::from_field(value).map_err(|e| e.to_string())
}

// ── Shared field groups ──────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CommonFields {
    /// Description
    #[arg(long)]
    pub description: Option<String>,

    /// Administrative state: up or down
    #[arg(long, value_parser = choice::<AdminState>)]
    pub admin: Option<AdminState>,
}

#[derive(Debug, Args)]
pub struct VlanFlags {
    /// VLAN mode: access, trunk, native-untagged or native-tagged
    #[arg(long, value_parser = choice::<VlanMode>)]
    pub vlan_mode: Option<VlanMode>,

    /// Access VLAN, or native VLAN in the trunk modes
    #[arg(long)]
    pub vlan_tag: Option<u16>,

    /// Trunk VLANs, comma separated
    #[arg(long, value_delimiter = ',')]
    pub vlan_trunks: Vec<u16>,

    /// Carry every VLAN on the trunk (overrides --vlan-trunks)
    #[arg(long)]
    pub trunk_allowed_all: bool,
}

impl VlanFlags {
    /// `None` when no VLAN flag was given.
    pub fn settings(&self) -> Option<VlanSettings> {
        if self.vlan_mode.is_none()
            && self.vlan_tag.is_none()
            && self.vlan_trunks.is_empty()
            && !self.trunk_allowed_all
        {
            return None;
        }
        Some(VlanSettings {
            mode: self.vlan_mode.unwrap_or_default(),
            tag: self.vlan_tag.unwrap_or(0),
            trunks: self.vlan_trunks.clone(),
            trunk_allowed_all: self.trunk_allowed_all,
        })
    }
}

#[derive(Debug, Args)]
pub struct WriteMode {
    /// Replace the whole configuration (PUT) instead of patching it
    #[arg(long)]
    pub put: bool,
}

// ── VLAN ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct VlanArgs {
    #[command(subcommand)]
    pub command: VlanCommand,
}

#[derive(Debug, Subcommand)]
pub enum VlanCommand {
    /// Create a VLAN
    Create(VlanSpec),
    /// Update an existing VLAN
    Update {
        #[command(flatten)]
        spec: VlanSpec,
        #[command(flatten)]
        mode: WriteMode,
    },
    /// Show a VLAN
    Get { id: u16 },
    /// Delete a VLAN
    Delete { id: u16 },
}

#[derive(Debug, Args)]
pub struct VlanSpec {
    /// VLAN id (1-4094)
    pub id: u16,

    /// VLAN name (defaults to VLAN<id> on create)
    #[arg(long)]
    pub name: Option<String>,

    #[command(flatten)]
    pub fields: CommonFields,
}

// ── LAG ──────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LagArgs {
    #[command(subcommand)]
    pub command: LagCommand,
}

#[derive(Debug, Subcommand)]
pub enum LagCommand {
    /// Create a LAG
    Create(LagSpec),
    /// Update an existing LAG
    Update {
        #[command(flatten)]
        spec: LagSpec,
        #[command(flatten)]
        mode: WriteMode,
    },
    /// Show a LAG
    Get { name: String },
    /// Delete a LAG
    Delete { name: String },
}

#[derive(Debug, Args)]
pub struct LagSpec {
    /// LAG name, e.g. lag60
    pub name: String,

    /// LACP mode: active or passive
    #[arg(long, value_parser = choice::<LacpMode>)]
    pub lacp: Option<LacpMode>,

    #[command(flatten)]
    pub fields: CommonFields,

    #[command(flatten)]
    pub vlan: VlanFlags,
}

// ── Physical ports ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct InterfaceArgs {
    #[command(subcommand)]
    pub command: InterfaceCommand,
}

#[derive(Debug, Subcommand)]
pub enum InterfaceCommand {
    /// Set description and admin state of a port
    Update {
        /// Port name, e.g. 1/1/3
        name: String,
        #[command(flatten)]
        fields: CommonFields,
        #[command(flatten)]
        mode: WriteMode,
    },
    /// Show a port
    Get { name: String },
}

#[derive(Debug, Args)]
pub struct L2Args {
    #[command(subcommand)]
    pub command: L2Command,
}

#[derive(Debug, Subcommand)]
pub enum L2Command {
    /// Configure a port for switching
    Configure {
        /// Port name, e.g. 1/1/3
        name: String,
        #[command(flatten)]
        fields: CommonFields,
        #[command(flatten)]
        vlan: VlanFlags,
        /// Send only the declared fields (PATCH)
        #[arg(long)]
        patch: bool,
    },
    /// Show the port's VLAN configuration
    Get { name: String },
    /// Return the port to its default configuration
    Reset { name: String },
}
