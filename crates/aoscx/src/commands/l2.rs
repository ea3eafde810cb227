use serde::Serialize;

use aoscx_api::{Interface, L2Interface, Resource, Session, UpdateMethod, VlanSettings};

use super::VlanView;
use crate::cli::{GlobalOpts, L2Command};
use crate::error::CliError;
use crate::output::{self, FieldRow};

#[derive(Debug, Serialize)]
struct View {
    name: String,
    #[serde(flatten)]
    vlan: VlanView,
    uri: Option<String>,
}

fn detail(v: &View) -> Vec<FieldRow> {
    let mut rows = vec![FieldRow::new("name", &v.name)];
    v.vlan.rows(&mut rows);
    rows.push(FieldRow::new("uri", v.uri.as_deref().unwrap_or("-")));
    rows
}

fn not_found(name: &str) -> impl FnOnce(aoscx_api::Error) -> CliError + '_ {
    move |e| CliError::for_resource(e, "port", name)
}

pub async fn handle(
    session: &Session,
    cmd: L2Command,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        L2Command::Configure {
            name,
            fields,
            vlan,
            patch,
        } => {
            let mut port = Interface::new(name.clone());
            fields.apply(&mut port.description, &mut port.admin_state);
            // Without VLAN flags the port becomes an access port on VLAN 1.
            let settings = vlan.settings().unwrap_or_else(|| VlanSettings::access(1));
            let mut l2 = L2Interface::new(port, settings);

            if patch {
                l2.update(session, UpdateMethod::Patch).await?;
            } else {
                l2.create(session).await?;
            }
            super::confirm(global, &format!("Configured port {name} for switching"));
        }
        L2Command::Get { name } => {
            let mut l2 = L2Interface::new(Interface::new(name.clone()), VlanSettings::default());
            l2.get(session).await.map_err(not_found(&name))?;
            let view = View {
                name,
                vlan: VlanView::from(&l2.vlan),
                uri: l2.uri().map(str::to_owned),
            };
            let out = output::render_single(global.output, &view, detail)?;
            output::print_output(&out, global.quiet);
        }
        L2Command::Reset { name } => {
            let mut l2 = L2Interface::new(Interface::new(name.clone()), VlanSettings::default());
            l2.delete(session).await.map_err(not_found(&name))?;
            super::confirm(global, &format!("Reset port {name} to defaults"));
        }
    }
    Ok(())
}
