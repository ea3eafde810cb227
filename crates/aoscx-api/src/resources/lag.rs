// Link aggregation groups: `/rest/{version}/system/interfaces/lag<N>`
//
// LAGs are interfaces of type `lag`. Unlike physical ports they are
// created with POST and removed with DELETE.

use reqwest::StatusCode;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::Error;
use crate::resource::{
    AdminState, DELETE_OK, LacpMode, Resource, UpdateMethod, choice_field, fetch_writable,
    path_segment, require_name, str_field, validate_lag_name,
};
use crate::resources::interface::INTERFACES;
use crate::session::Session;
use crate::vlan_config::{VlanConfig, VlanSettings};

/// A link aggregation group.
#[derive(Debug, Clone, Default)]
pub struct LagInterface {
    /// `lag` followed by digits, e.g. `lag60`.
    pub name: String,
    pub description: String,
    pub admin_state: AdminState,
    /// `None` leaves LACP unconfigured (static LAG).
    pub lacp: Option<LacpMode>,
    /// `None` writes no VLAN configuration.
    pub vlan: Option<VlanSettings>,
    /// Writable fields from the last successful read.
    pub details: Map<String, Value>,
    uri: Option<String>,
}

impl LagInterface {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_admin_state(mut self, admin_state: AdminState) -> Self {
        self.admin_state = admin_state;
        self
    }

    pub fn with_lacp(mut self, lacp: LacpMode) -> Self {
        self.lacp = Some(lacp);
        self
    }

    pub fn with_vlan(mut self, vlan: VlanSettings) -> Self {
        self.vlan = Some(vlan);
        self
    }

    fn path(&self) -> String {
        format!("{INTERFACES}/{}", path_segment(&self.name))
    }

    fn validate(&self) -> Result<(), Error> {
        validate_lag_name(&self.name)?;
        if let Some(vlan) = &self.vlan {
            vlan.validate()?;
        }
        Ok(())
    }

    /// Declared fields in wire form, resolving referenced VLANs.
    async fn writable_fields(&self, session: &Session) -> Result<Map<String, Value>, Error> {
        let mut fields = Map::new();
        fields.insert("description".into(), Value::String(self.description.clone()));
        fields.insert("admin".into(), Value::String(self.admin_state.to_string()));
        if let Some(lacp) = self.lacp {
            fields.insert("lacp".into(), Value::String(lacp.to_string()));
        }
        if let Some(vlan) = &self.vlan {
            VlanConfig::build(session, vlan).await?.apply(&mut fields);
        }
        Ok(fields)
    }
}

impl Resource for LagInterface {
    /// `POST /system/interfaces` with `type: lag`, expecting 201.
    async fn create(&mut self, session: &Session) -> Result<(), Error> {
        self.validate()?;

        let mut body = Map::new();
        body.insert("name".into(), Value::String(self.name.clone()));
        body.insert("type".into(), Value::String("lag".into()));
        body.extend(self.writable_fields(session).await?);

        let url = session.rest_url(INTERFACES)?;
        let resp = session.post(url, &body).await?;
        if resp.status != StatusCode::CREATED {
            return Err(Error::request("create", resp.status));
        }

        debug!(lag = %self.name, "LAG created");
        self.uri = Some(session.rest_path(&self.path()));
        Ok(())
    }

    async fn update(&mut self, session: &Session, method: UpdateMethod) -> Result<(), Error> {
        self.validate()?;
        let path = self.path();

        let mut body = match method {
            UpdateMethod::Put => fetch_writable(session, &path).await?,
            UpdateMethod::Patch => Map::new(),
        };
        body.extend(self.writable_fields(session).await?);

        let url = session.rest_url(&path)?;
        let resp = match method {
            UpdateMethod::Put => session.put(url, &body).await?,
            UpdateMethod::Patch => session.patch(url, &body).await?,
        };
        if resp.status != method.expected_status() {
            return Err(Error::request(method.operation(), resp.status));
        }

        self.uri = Some(session.rest_path(&path));
        Ok(())
    }

    async fn delete(&mut self, session: &Session) -> Result<(), Error> {
        require_name(&self.name)?;

        let url = session.rest_url(&self.path())?;
        let resp = session.delete(url).await?;
        if !DELETE_OK.contains(&resp.status) {
            return Err(Error::request("delete", resp.status));
        }

        debug!(lag = %self.name, "LAG deleted");
        self.uri = None;
        Ok(())
    }

    async fn get(&mut self, session: &Session) -> Result<(), Error> {
        require_name(&self.name)?;
        let path = self.path();

        let body = match fetch_writable(session, &path).await {
            Ok(body) => body,
            Err(e) => {
                self.uri = None;
                return Err(e);
            }
        };

        if let Some(description) = str_field(&body, "description") {
            self.description = description.to_owned();
        }
        if let Some(admin) = choice_field(&body) {
            self.admin_state = admin;
        }
        if let Some(lacp) = choice_field(&body) {
            self.lacp = Some(lacp);
        }
        if let Some(vlan) = VlanSettings::from_details(&body) {
            self.vlan = Some(vlan);
        }
        self.details.extend(body);

        self.uri = Some(session.rest_path(&path));
        Ok(())
    }

    fn status(&self) -> bool {
        self.uri.is_some()
    }

    fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }
}
