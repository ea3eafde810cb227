use serde::Serialize;

use aoscx_api::{LagInterface, Resource, Session};

use super::VlanView;
use crate::cli::{GlobalOpts, LagCommand, LagSpec};
use crate::error::CliError;
use crate::output::{self, FieldRow};

#[derive(Debug, Serialize)]
struct View {
    name: String,
    description: String,
    admin: String,
    lacp: Option<String>,
    vlan: Option<VlanView>,
    uri: Option<String>,
}

impl From<&LagInterface> for View {
    fn from(l: &LagInterface) -> Self {
        Self {
            name: l.name.clone(),
            description: l.description.clone(),
            admin: l.admin_state.to_string(),
            lacp: l.lacp.as_ref().map(ToString::to_string),
            vlan: l.vlan.as_ref().map(VlanView::from),
            uri: l.uri().map(str::to_owned),
        }
    }
}

fn detail(v: &View) -> Vec<FieldRow> {
    let mut rows = vec![
        FieldRow::new("name", &v.name),
        FieldRow::new("description", &v.description),
        FieldRow::new("admin", &v.admin),
        FieldRow::new("lacp", v.lacp.as_deref().unwrap_or("-")),
    ];
    if let Some(ref vlan) = v.vlan {
        vlan.rows(&mut rows);
    }
    rows.push(FieldRow::new("uri", v.uri.as_deref().unwrap_or("-")));
    rows
}

fn apply(spec: &LagSpec, lag: &mut LagInterface) {
    spec.fields.apply(&mut lag.description, &mut lag.admin_state);
    if let Some(lacp) = spec.lacp {
        lag.lacp = Some(lacp);
    }
    if let Some(vlan) = spec.vlan.settings() {
        lag.vlan = Some(vlan);
    }
}

fn not_found(name: &str) -> impl FnOnce(aoscx_api::Error) -> CliError + '_ {
    move |e| CliError::for_resource(e, "LAG", name)
}

pub async fn handle(
    session: &Session,
    cmd: LagCommand,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        LagCommand::Create(spec) => {
            let mut lag = LagInterface::new(spec.name.clone());
            apply(&spec, &mut lag);
            lag.create(session).await?;
            super::confirm(global, &format!("Created LAG {}", lag.name));
        }
        LagCommand::Update { spec, mode } => {
            let mut lag = LagInterface::new(spec.name.clone());
            lag.get(session).await.map_err(not_found(&spec.name))?;
            apply(&spec, &mut lag);
            lag.update(session, mode.method()).await?;
            super::confirm(global, &format!("Updated LAG {}", lag.name));
        }
        LagCommand::Get { name } => {
            let mut lag = LagInterface::new(name.clone());
            lag.get(session).await.map_err(not_found(&name))?;
            let out = output::render_single(global.output, &View::from(&lag), detail)?;
            output::print_output(&out, global.quiet);
        }
        LagCommand::Delete { name } => {
            let mut lag = LagInterface::new(name.clone());
            lag.delete(session).await.map_err(not_found(&name))?;
            super::confirm(global, &format!("Deleted LAG {name}"));
        }
    }
    Ok(())
}
