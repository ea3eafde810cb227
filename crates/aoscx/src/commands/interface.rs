use serde::Serialize;

use aoscx_api::{Interface, Resource, Session};

use crate::cli::{GlobalOpts, InterfaceCommand};
use crate::error::CliError;
use crate::output::{self, FieldRow};

#[derive(Debug, Serialize)]
struct View {
    name: String,
    description: String,
    admin: String,
    uri: Option<String>,
}

impl From<&Interface> for View {
    fn from(i: &Interface) -> Self {
        Self {
            name: i.name.clone(),
            description: i.description.clone(),
            admin: i.admin_state.to_string(),
            uri: i.uri().map(str::to_owned),
        }
    }
}

fn detail(v: &View) -> Vec<FieldRow> {
    vec![
        FieldRow::new("name", &v.name),
        FieldRow::new("description", &v.description),
        FieldRow::new("admin", &v.admin),
        FieldRow::new("uri", v.uri.as_deref().unwrap_or("-")),
    ]
}

fn not_found(name: &str) -> impl FnOnce(aoscx_api::Error) -> CliError + '_ {
    move |e| CliError::for_resource(e, "port", name)
}

pub async fn handle(
    session: &Session,
    cmd: InterfaceCommand,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        InterfaceCommand::Update { name, fields, mode } => {
            let mut port = Interface::new(name.clone());
            port.get(session).await.map_err(not_found(&name))?;
            fields.apply(&mut port.description, &mut port.admin_state);
            port.update(session, mode.method()).await?;
            super::confirm(global, &format!("Updated port {name}"));
        }
        InterfaceCommand::Get { name } => {
            let mut port = Interface::new(name.clone());
            port.get(session).await.map_err(not_found(&name))?;
            let out = output::render_single(global.output, &View::from(&port), detail)?;
            output::print_output(&out, global.quiet);
        }
    }
    Ok(())
}
