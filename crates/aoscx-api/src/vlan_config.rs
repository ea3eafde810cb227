// VLAN membership configuration for LAGs and layer-2 ports
//
// The switch models VLAN membership as references to VLAN objects, not
// bare ids: `vlan_tag` and `vlan_trunks` map each id to the VLAN's REST
// URI. Building a configuration therefore resolves every referenced id
// (reading it, or creating it when absent) before the write is sent.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumString, VariantNames};
use tracing::{debug, warn};

use crate::error::Error;
use crate::resource::{Choice, validate_vlan_id};
use crate::session::Session;

/// Port VLAN mode.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    VariantNames,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum VlanMode {
    /// Untagged member of a single VLAN.
    #[default]
    Access,
    /// Tagged member of the trunk VLANs.
    Trunk,
    /// Trunk with the native VLAN carried untagged.
    NativeUntagged,
    /// Trunk with the native VLAN carried tagged.
    NativeTagged,
}

impl Choice for VlanMode {
    const FIELD: &'static str = "vlan_mode";
}

/// Declared VLAN fields of a port or LAG.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VlanSettings {
    pub mode: VlanMode,
    /// Access VLAN in access mode, native VLAN in the trunk modes.
    /// `0` means unset.
    pub tag: u16,
    /// VLANs carried on the trunk.
    pub trunks: Vec<u16>,
    /// Carry every VLAN; `trunks` is ignored when set.
    pub trunk_allowed_all: bool,
}

impl VlanSettings {
    pub fn access(tag: u16) -> Self {
        Self {
            mode: VlanMode::Access,
            tag,
            ..Self::default()
        }
    }

    pub fn trunk(mode: VlanMode, native: u16, trunks: impl IntoIterator<Item = u16>) -> Self {
        Self {
            mode,
            tag: native,
            trunks: trunks.into_iter().collect(),
            trunk_allowed_all: false,
        }
    }

    pub fn allow_all(mut self) -> Self {
        self.trunk_allowed_all = true;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        if self.tag != 0 {
            validate_vlan_id("vlan_tag", self.tag)?;
        }
        for &id in &self.trunks {
            validate_vlan_id("vlan_trunks", id)?;
        }
        Ok(())
    }

    /// Read VLAN settings back from a `?selector=writable` body.
    ///
    /// Returns `None` when the object carries no `vlan_mode`.
    pub(crate) fn from_details(details: &Map<String, Value>) -> Option<Self> {
        let raw_mode = details.get("vlan_mode")?.as_str()?;
        let mode = match VlanMode::from_field(raw_mode) {
            Ok(mode) => mode,
            Err(e) => {
                warn!(error = %e, "switch reported an unknown VLAN mode");
                return None;
            }
        };

        let tag = details
            .get("vlan_tag")
            .and_then(Value::as_object)
            .and_then(|m| m.keys().find_map(|k| k.parse::<u16>().ok()))
            .unwrap_or(0);

        let (trunks, trunk_allowed_all) = match details.get("vlan_trunks").and_then(Value::as_object)
        {
            Some(m) if !m.is_empty() => {
                let ids: BTreeSet<u16> = m.keys().filter_map(|k| k.parse().ok()).collect();
                (ids.into_iter().collect(), false)
            }
            Some(_) => (Vec::new(), true),
            None => (Vec::new(), false),
        };

        Some(Self {
            mode,
            tag,
            trunks,
            trunk_allowed_all,
        })
    }
}

/// A resolved reference to a VLAN object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VlanRef {
    pub id: u16,
    pub uri: String,
}

impl VlanRef {
    fn to_wire(&self) -> Value {
        let mut m = Map::new();
        m.insert(self.id.to_string(), Value::String(self.uri.clone()));
        Value::Object(m)
    }
}

/// Trunk membership after resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrunkMembers {
    /// Every VLAN is allowed.
    All,
    /// Only the listed VLANs, in id order.
    Only(Vec<VlanRef>),
}

/// Fully resolved VLAN configuration, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VlanConfig {
    Access {
        vlan: VlanRef,
    },
    Trunk {
        /// One of the trunk-family modes.
        mode: VlanMode,
        /// `None` leaves no native VLAN pinned.
        native: Option<VlanRef>,
        trunks: TrunkMembers,
    },
}

impl VlanConfig {
    /// Resolve `settings` against the switch.
    ///
    /// Access mode defaults to VLAN 1. In the trunk modes a native tag of 0
    /// or 1 pins no native VLAN. Every referenced VLAN is read or created
    /// through the session's resolver; trunk VLANs that cannot be resolved
    /// are skipped or fail the build depending on its [`TrunkPolicy`].
    ///
    /// [`TrunkPolicy`]: crate::resolver::TrunkPolicy
    pub async fn build(session: &Session, settings: &VlanSettings) -> Result<Self, Error> {
        settings.validate()?;
        let resolver = session.resolver();

        match settings.mode {
            VlanMode::Access => {
                let id = if settings.tag == 0 { 1 } else { settings.tag };
                let vlan = resolver.ensure(session, id).await?;
                Ok(Self::Access { vlan })
            }
            mode @ (VlanMode::Trunk | VlanMode::NativeUntagged | VlanMode::NativeTagged) => {
                let native = match settings.tag {
                    0 | 1 => None,
                    id => Some(resolver.ensure(session, id).await?),
                };

                let trunks = if settings.trunk_allowed_all {
                    if !settings.trunks.is_empty() {
                        debug!(
                            ignored = ?settings.trunks,
                            "trunk allows all VLANs, ignoring explicit trunk list"
                        );
                    }
                    TrunkMembers::All
                } else {
                    TrunkMembers::Only(resolver.ensure_trunks(session, &settings.trunks).await?)
                };

                Ok(Self::Trunk {
                    mode,
                    native,
                    trunks,
                })
            }
        }
    }

    /// Write the wire fields (`vlan_mode`, `vlan_tag`, `vlan_trunks`) into
    /// a request body.
    pub fn apply(&self, body: &mut Map<String, Value>) {
        match self {
            Self::Access { vlan } => {
                body.insert("vlan_mode".into(), Value::String(VlanMode::Access.to_string()));
                body.insert("vlan_tag".into(), vlan.to_wire());
            }
            Self::Trunk {
                mode,
                native,
                trunks,
            } => {
                body.insert("vlan_mode".into(), Value::String(mode.to_string()));
                body.insert(
                    "vlan_tag".into(),
                    native.as_ref().map_or(Value::Null, VlanRef::to_wire),
                );
                let members = match trunks {
                    TrunkMembers::All => Map::new(),
                    TrunkMembers::Only(refs) => refs
                        .iter()
                        .map(|r| (r.id.to_string(), Value::String(r.uri.clone())))
                        .collect(),
                };
                body.insert("vlan_trunks".into(), Value::Object(members));
            }
        }
    }
}
