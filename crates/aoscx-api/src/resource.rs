// Shared CRUD contract for switch resources
//
// Every resource type validates itself locally before writing, tracks
// whether it is known to exist on the switch, and exposes the REST URI
// other objects use to reference it.

use std::future::Future;
use std::str::FromStr;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, VariantNames};

use crate::error::Error;
use crate::session::Session;

/// Create/read/update/delete capability implemented by every resource.
///
/// State only moves on success: a failed `create`, `update` or `delete`
/// leaves [`status`](Self::status) and [`uri`](Self::uri) untouched.
pub trait Resource {
    /// Create the object on the switch.
    fn create(&mut self, session: &Session) -> impl Future<Output = Result<(), Error>> + Send;

    /// Write the declared fields over the existing object.
    fn update(
        &mut self,
        session: &Session,
        method: UpdateMethod,
    ) -> impl Future<Output = Result<(), Error>> + Send;

    /// Remove the object from the switch.
    fn delete(&mut self, session: &Session) -> impl Future<Output = Result<(), Error>> + Send;

    /// Read the object's writable configuration back into `self`.
    fn get(&mut self, session: &Session) -> impl Future<Output = Result<(), Error>> + Send;

    /// `true` while the object is confirmed present on the switch.
    fn status(&self) -> bool;

    /// REST URI of the object, available while it is materialized.
    fn uri(&self) -> Option<&str>;
}

/// How `update` writes to the switch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UpdateMethod {
    /// Fetch the current writable configuration, merge the declared fields
    /// over it, and replace it wholesale.
    Put,
    /// Send only the declared fields.
    #[default]
    Patch,
}

impl UpdateMethod {
    /// Status the switch answers with on success.
    pub fn expected_status(self) -> StatusCode {
        match self {
            Self::Put => StatusCode::OK,
            Self::Patch => StatusCode::NO_CONTENT,
        }
    }

    pub(crate) fn operation(self) -> &'static str {
        match self {
            Self::Put => "PUT update",
            Self::Patch => "PATCH update",
        }
    }
}

// ── Enumerated fields ────────────────────────────────────────────────

/// A closed set of wire values for one field.
///
/// Parsing through [`Choice::from_field`] turns an unknown value into an
/// [`Error::Validation`] that names the field and lists the valid options.
pub trait Choice: FromStr + VariantNames {
    /// Wire name of the field the value belongs to.
    const FIELD: &'static str;

    fn from_field(value: &str) -> Result<Self, Error> {
        value.parse().map_err(|_| {
            Error::validation(
                Self::FIELD,
                format!(
                    "valid options are '{}' received: '{value}'",
                    Self::VARIANTS.join("', '")
                ),
            )
        })
    }
}

/// Administrative state shared by interfaces, LAGs and VLANs.
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
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AdminState {
    #[default]
    Up,
    Down,
}

impl Choice for AdminState {
    const FIELD: &'static str = "admin";
}

/// LACP negotiation mode of a LAG.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, VariantNames,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LacpMode {
    Active,
    Passive,
}

impl Choice for LacpMode {
    const FIELD: &'static str = "lacp";
}

// ── Field validation ─────────────────────────────────────────────────

/// LAG names are `lag` followed by digits, e.g. `lag60`.
pub(crate) fn validate_lag_name(name: &str) -> Result<(), Error> {
    let valid = name
        .strip_prefix("lag")
        .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()));
    if valid {
        Ok(())
    } else {
        Err(Error::validation(
            "name",
            format!("must be in format 'lagXX' (e.g., lag60) received: '{name}'"),
        ))
    }
}

/// Physical ports are `member/slot/port`, e.g. `1/1/3`.
pub(crate) fn validate_port_name(name: &str) -> Result<(), Error> {
    let parts: Vec<&str> = name.split('/').collect();
    let valid = parts.len() == 3
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()));
    if valid {
        Ok(())
    } else {
        Err(Error::validation(
            "name",
            format!("must be in format 'member/slot/port' (e.g., 1/1/3) received: '{name}'"),
        ))
    }
}

/// VLAN ids are 1 through 4094.
pub(crate) fn validate_vlan_id(field: &'static str, id: u16) -> Result<(), Error> {
    if (1..=4094).contains(&id) {
        Ok(())
    } else {
        Err(Error::validation(
            field,
            format!("VLAN id must be between 1 and 4094 received: {id}"),
        ))
    }
}

pub(crate) fn require_name(name: &str) -> Result<(), Error> {
    if name.is_empty() {
        Err(Error::validation("name", "missing interface name"))
    } else {
        Ok(())
    }
}

/// Percent-encode an interface name for use as one path segment
/// (`1/1/3` becomes `1%2F1%2F3`).
pub(crate) fn path_segment(name: &str) -> String {
    url::form_urlencoded::byte_serialize(name.as_bytes()).collect()
}

/// `GET {path}?selector=writable`, returning the object's writable fields.
///
/// Anything but 200 means the object is absent (or unreadable) and is
/// returned as [`Error::Request`].
pub(crate) async fn fetch_writable(
    session: &Session,
    path: &str,
) -> Result<serde_json::Map<String, serde_json::Value>, Error> {
    let url = session.rest_url(&format!("{path}?selector=writable"))?;
    let resp = session.get(url).await?;
    if resp.status != StatusCode::OK {
        return Err(Error::request("get", resp.status));
    }
    Ok(resp.body)
}

/// Statuses a delete (or port reset) may succeed with.
pub(crate) const DELETE_OK: [StatusCode; 2] = [StatusCode::NO_CONTENT, StatusCode::OK];

/// Read a string field out of a details map, ignoring nulls.
pub(crate) fn str_field<'a>(
    details: &'a serde_json::Map<String, serde_json::Value>,
    key: &str,
) -> Option<&'a str> {
    details.get(key).and_then(serde_json::Value::as_str)
}

/// Parse an enumerated field the switch reported, skipping values this
/// client does not know.
pub(crate) fn choice_field<T: Choice>(
    details: &serde_json::Map<String, serde_json::Value>,
) -> Option<T> {
    let raw = str_field(details, T::FIELD)?;
    match T::from_field(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(error = %e, "ignoring unknown value reported by switch");
            None
        }
    }
}
