use serde::Serialize;

use aoscx_api::{Resource, Session, Vlan};

use crate::cli::{GlobalOpts, VlanCommand, VlanSpec};
use crate::error::CliError;
use crate::output::{self, FieldRow};

#[derive(Debug, Serialize)]
struct View {
    id: u16,
    name: String,
    description: String,
    admin: String,
    uri: Option<String>,
}

impl From<&Vlan> for View {
    fn from(v: &Vlan) -> Self {
        Self {
            id: v.id,
            name: v.name.clone(),
            description: v.description.clone(),
            admin: v.admin_state.to_string(),
            uri: v.uri().map(str::to_owned),
        }
    }
}

fn detail(v: &View) -> Vec<FieldRow> {
    vec![
        FieldRow::new("id", v.id),
        FieldRow::new("name", &v.name),
        FieldRow::new("description", &v.description),
        FieldRow::new("admin", &v.admin),
        FieldRow::new("uri", v.uri.as_deref().unwrap_or("-")),
    ]
}

fn apply(spec: &VlanSpec, vlan: &mut Vlan) {
    if let Some(ref name) = spec.name {
        vlan.name.clone_from(name);
    }
    spec.fields.apply(&mut vlan.description, &mut vlan.admin_state);
}

fn not_found(id: u16) -> impl FnOnce(aoscx_api::Error) -> CliError {
    move |e| CliError::for_resource(e, "VLAN", &id.to_string())
}

pub async fn handle(
    session: &Session,
    cmd: VlanCommand,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        VlanCommand::Create(spec) => {
            let mut vlan = Vlan::new(spec.id);
            apply(&spec, &mut vlan);
            vlan.create(session).await?;
            super::confirm(global, &format!("Created VLAN {}", vlan.id));
        }
        VlanCommand::Update { spec, mode } => {
            // Start from the switch's values so unset flags keep them.
            let mut vlan = Vlan::new(spec.id);
            vlan.get(session).await.map_err(not_found(spec.id))?;
            apply(&spec, &mut vlan);
            vlan.update(session, mode.method()).await?;
            super::confirm(global, &format!("Updated VLAN {}", vlan.id));
        }
        VlanCommand::Get { id } => {
            let mut vlan = Vlan::new(id);
            vlan.get(session).await.map_err(not_found(id))?;
            let out = output::render_single(global.output, &View::from(&vlan), detail)?;
            output::print_output(&out, global.quiet);
        }
        VlanCommand::Delete { id } => {
            let mut vlan = Vlan::new(id);
            vlan.delete(session).await.map_err(not_found(id))?;
            super::confirm(global, &format!("Deleted VLAN {id}"));
        }
    }
    Ok(())
}
