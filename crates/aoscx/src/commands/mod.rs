//! Command dispatch: CLI args -> library resources -> output formatting.

pub mod interface;
pub mod l2;
pub mod lag;
pub mod version;
pub mod vlan;

use aoscx_api::{AdminState, Session, UpdateMethod, VlanSettings};
use serde::Serialize;

use crate::cli::{Command, CommonFields, GlobalOpts, WriteMode};
use crate::error::CliError;
use crate::output::{self, FieldRow};

/// Dispatch a session-bound command to its handler.
pub async fn dispatch(
    cmd: Command,
    session: &Session,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Vlan(args) => vlan::handle(session, args.command, global).await,
        Command::Lag(args) => lag::handle(session, args.command, global).await,
        Command::Interface(args) => interface::handle(session, args.command, global).await,
        Command::L2(args) => l2::handle(session, args.command, global).await,
        Command::Version | Command::Completions(_) => Ok(()),
    }
}

impl WriteMode {
    pub fn method(&self) -> UpdateMethod {
        if self.put {
            UpdateMethod::Put
        } else {
            UpdateMethod::Patch
        }
    }
}

impl CommonFields {
    /// Apply the flags that were given over the current values.
    pub fn apply(&self, description: &mut String, admin_state: &mut AdminState) {
        if let Some(ref d) = self.description {
            description.clone_from(d);
        }
        if let Some(a) = self.admin {
            *admin_state = a;
        }
    }
}

/// VLAN membership as shown to the user.
#[derive(Debug, Serialize)]
pub struct VlanView {
    pub vlan_mode: String,
    pub vlan_tag: Option<u16>,
    pub vlan_trunks: Vec<u16>,
    pub trunk_allowed_all: bool,
}

impl From<&VlanSettings> for VlanView {
    fn from(s: &VlanSettings) -> Self {
        Self {
            vlan_mode: s.mode.to_string(),
            vlan_tag: (s.tag != 0).then_some(s.tag),
            vlan_trunks: s.trunks.clone(),
            trunk_allowed_all: s.trunk_allowed_all,
        }
    }
}

impl VlanView {
    pub fn rows(&self, rows: &mut Vec<FieldRow>) {
        rows.push(FieldRow::new("vlan mode", &self.vlan_mode));
        rows.push(FieldRow::new(
            "vlan tag",
            self.vlan_tag.map_or_else(|| "-".into(), |t| t.to_string()),
        ));
        let trunks = if self.trunk_allowed_all {
            "all".into()
        } else {
            output::join_ids(&self.vlan_trunks)
        };
        rows.push(FieldRow::new("vlan trunks", trunks));
    }
}

/// Print a one-line confirmation of a write.
pub fn confirm(global: &GlobalOpts, message: &str) {
    output::print_output(message, global.quiet);
}
