// Layer-2 switch ports
//
// A physical port with routing disabled and VLAN membership configured.
// Referenced VLANs are resolved (and created when missing) on every write.

use serde_json::Value;

use crate::error::Error;
use crate::resource::{Resource, UpdateMethod};
use crate::resources::interface::Interface;
use crate::session::Session;
use crate::vlan_config::{VlanConfig, VlanSettings};

/// A physical port configured for switching, e.g. `1/1/3` as an access
/// port on VLAN 100.
#[derive(Debug, Clone, Default)]
pub struct L2Interface {
    pub interface: Interface,
    pub vlan: VlanSettings,
}

impl L2Interface {
    pub fn new(interface: Interface, vlan: VlanSettings) -> Self {
        Self { interface, vlan }
    }

    pub fn name(&self) -> &str {
        &self.interface.name
    }

    fn validate(&self) -> Result<(), Error> {
        self.interface.validate()?;
        self.vlan.validate()
    }

    async fn configure(&mut self, session: &Session, method: UpdateMethod) -> Result<(), Error> {
        self.validate()?;

        let mut fields = self.interface.writable_fields();
        fields.insert("routing".into(), Value::Bool(false));
        VlanConfig::build(session, &self.vlan)
            .await?
            .apply(&mut fields);

        self.interface.write(session, method, fields).await
    }
}

impl Resource for L2Interface {
    /// Ports already exist; this writes the layer-2 configuration with PUT.
    async fn create(&mut self, session: &Session) -> Result<(), Error> {
        self.configure(session, UpdateMethod::Put).await
    }

    async fn update(&mut self, session: &Session, method: UpdateMethod) -> Result<(), Error> {
        self.configure(session, method).await
    }

    async fn delete(&mut self, session: &Session) -> Result<(), Error> {
        self.interface.validate()?;
        self.interface.reset(session).await
    }

    async fn get(&mut self, session: &Session) -> Result<(), Error> {
        self.interface.validate()?;
        let body = self.interface.read(session).await?;
        if let Some(vlan) = VlanSettings::from_details(&body) {
            self.vlan = vlan;
        }
        Ok(())
    }

    fn status(&self) -> bool {
        self.interface.status()
    }

    fn uri(&self) -> Option<&str> {
        self.interface.uri()
    }
}
