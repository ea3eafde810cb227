// Physical ports: `/rest/{version}/system/interfaces/{member%2Fslot%2Fport}`
//
// Ports always exist on the switch, so they cannot be POSTed or DELETEd.
// "Creating" a port writes its configuration with PUT, and "deleting" it
// PUTs an empty configuration, returning the port to factory defaults.

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::Error;
use crate::resource::{
    AdminState, DELETE_OK, Resource, UpdateMethod, choice_field, fetch_writable, path_segment,
    str_field, validate_port_name,
};
use crate::session::Session;

pub(crate) const INTERFACES: &str = "system/interfaces";

/// A physical switch port, e.g. `1/1/3`.
#[derive(Debug, Clone, Default)]
pub struct Interface {
    pub name: String,
    pub description: String,
    pub admin_state: AdminState,
    /// Writable fields from the last successful read.
    pub details: Map<String, Value>,
    uri: Option<String>,
}

impl Interface {
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

    pub(crate) fn path(&self) -> String {
        format!("{INTERFACES}/{}", path_segment(&self.name))
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        validate_port_name(&self.name)
    }

    pub(crate) fn writable_fields(&self) -> Map<String, Value> {
        let mut body = Map::new();
        body.insert("description".into(), Value::String(self.description.clone()));
        body.insert("admin".into(), Value::String(self.admin_state.to_string()));
        body
    }

    /// Write `fields` to the port with `method`, merging them over the
    /// current configuration for PUT.
    pub(crate) async fn write(
        &mut self,
        session: &Session,
        method: UpdateMethod,
        fields: Map<String, Value>,
    ) -> Result<(), Error> {
        let path = self.path();

        let body = match method {
            UpdateMethod::Put => {
                let mut body = fetch_writable(session, &path).await?;
                body.extend(fields);
                body
            }
            UpdateMethod::Patch => fields,
        };

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

    /// PUT an empty configuration, returning the port to defaults.
    pub(crate) async fn reset(&mut self, session: &Session) -> Result<(), Error> {
        let url = session.rest_url(&self.path())?;
        let resp = session.put(url, &Map::new()).await?;
        if !DELETE_OK.contains(&resp.status) {
            return Err(Error::request("reset", resp.status));
        }

        debug!(port = %self.name, "port reset to defaults");
        self.uri = None;
        Ok(())
    }

    /// Read the port and return the raw writable fields for callers that
    /// parse more of them.
    pub(crate) async fn read(&mut self, session: &Session) -> Result<Map<String, Value>, Error> {
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
        self.details.extend(body.clone());

        self.uri = Some(session.rest_path(&path));
        Ok(body)
    }
}

impl Resource for Interface {
    /// Ports already exist; this writes the declared configuration with PUT.
    async fn create(&mut self, session: &Session) -> Result<(), Error> {
        self.validate()?;
        let fields = self.writable_fields();
        self.write(session, UpdateMethod::Put, fields).await
    }

    async fn update(&mut self, session: &Session, method: UpdateMethod) -> Result<(), Error> {
        self.validate()?;
        let fields = self.writable_fields();
        self.write(session, method, fields).await
    }

    async fn delete(&mut self, session: &Session) -> Result<(), Error> {
        self.validate()?;
        self.reset(session).await
    }

    async fn get(&mut self, session: &Session) -> Result<(), Error> {
        self.validate()?;
        self.read(session).await.map(|_| ())
    }

    fn status(&self) -> bool {
        self.uri.is_some()
    }

    fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }
}
