// VLAN objects: `/rest/{version}/system/vlans/{id}`

use reqwest::StatusCode;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::Error;
use crate::resource::{
    AdminState, DELETE_OK, Resource, UpdateMethod, choice_field, fetch_writable, str_field,
    validate_vlan_id,
};
use crate::session::Session;

const VLANS: &str = "system/vlans";

/// A VLAN on the switch.
#[derive(Debug, Clone, Default)]
pub struct Vlan {
    /// VLAN id, 1 through 4094.
    pub id: u16,
    /// VLAN name. Created VLANs without one are named `VLAN<id>`.
    pub name: String,
    pub description: String,
    pub admin_state: AdminState,
    /// Writable fields from the last successful read.
    pub details: Map<String, Value>,
    uri: Option<String>,
}

impl Vlan {
    pub fn new(id: u16) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_admin_state(mut self, admin_state: AdminState) -> Self {
        self.admin_state = admin_state;
        self
    }

    /// URI the switch uses to reference VLAN `id`.
    pub fn uri_for(session: &Session, id: u16) -> String {
        session.rest_path(&format!("{VLANS}/{id}"))
    }

    fn path(&self) -> String {
        format!("{VLANS}/{}", self.id)
    }

    fn effective_name(&self) -> String {
        if self.name.is_empty() {
            format!("VLAN{}", self.id)
        } else {
            self.name.clone()
        }
    }

    fn validate(&self) -> Result<(), Error> {
        validate_vlan_id("id", self.id)
    }

    fn writable_fields(&self) -> Map<String, Value> {
        let mut body = Map::new();
        body.insert("name".into(), Value::String(self.effective_name()));
        body.insert("description".into(), Value::String(self.description.clone()));
        body.insert("admin".into(), Value::String(self.admin_state.to_string()));
        body
    }
}

impl Resource for Vlan {
    /// `POST /system/vlans`, expecting 201.
    async fn create(&mut self, session: &Session) -> Result<(), Error> {
        self.validate()?;

        let mut body = self.writable_fields();
        body.insert("id".into(), Value::from(self.id));

        let url = session.rest_url(VLANS)?;
        let resp = session.post(url, &body).await?;
        if resp.status != StatusCode::CREATED {
            return Err(Error::request("create", resp.status));
        }

        debug!(vlan_id = self.id, "VLAN created");
        self.uri = Some(Self::uri_for(session, self.id));
        Ok(())
    }

    async fn update(&mut self, session: &Session, method: UpdateMethod) -> Result<(), Error> {
        self.validate()?;
        let path = self.path();

        let body = match method {
            UpdateMethod::Put => {
                let mut body = fetch_writable(session, &path).await?;
                body.extend(self.writable_fields());
                body
            }
            UpdateMethod::Patch => self.writable_fields(),
        };

        let url = session.rest_url(&path)?;
        let resp = match method {
            UpdateMethod::Put => session.put(url, &body).await?,
            UpdateMethod::Patch => session.patch(url, &body).await?,
        };
        if resp.status != method.expected_status() {
            return Err(Error::request(method.operation(), resp.status));
        }

        self.uri = Some(Self::uri_for(session, self.id));
        Ok(())
    }

    async fn delete(&mut self, session: &Session) -> Result<(), Error> {
        self.validate()?;

        let url = session.rest_url(&self.path())?;
        let resp = session.delete(url).await?;
        if !DELETE_OK.contains(&resp.status) {
            return Err(Error::request("delete", resp.status));
        }

        session.resolver().forget(self.id);
        self.uri = None;
        Ok(())
    }

    async fn get(&mut self, session: &Session) -> Result<(), Error> {
        self.validate()?;

        let body = match fetch_writable(session, &self.path()).await {
            Ok(body) => body,
            Err(e) => {
                self.uri = None;
                return Err(e);
            }
        };

        if let Some(name) = str_field(&body, "name") {
            self.name = name.to_owned();
        }
        if let Some(description) = str_field(&body, "description") {
            self.description = description.to_owned();
        }
        if let Some(admin) = choice_field(&body) {
            self.admin_state = admin;
        }
        self.details.extend(body);

        self.uri = Some(Self::uri_for(session, self.id));
        Ok(())
    }

    fn status(&self) -> bool {
        self.uri.is_some()
    }

    fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }
}
