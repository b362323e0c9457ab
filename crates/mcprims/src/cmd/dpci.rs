use mcprims_session::{Dpci, DpciConfig};
use serde::Serialize;

use crate::cmd::{
    create_object, destroy_object, ensure_not_in_use, DpciCommand, DpciCreateArgs, ObjectArgs,
};
use crate::connect::{parse_object_name, ConnectionArgs};
use crate::exit::{mc_error, CliResult, SUCCESS};
use crate::output::{print_action, print_report, OutputFormat};

#[derive(Serialize)]
struct DpciInfo {
    object: String,
    version: String,
    num_of_priorities: u8,
    peer: Option<String>,
    peer_num_of_priorities: Option<u8>,
    link_state: String,
}

pub fn run(command: DpciCommand, conn: &ConnectionArgs, format: OutputFormat) -> CliResult<i32> {
    match command {
        DpciCommand::Info(args) => info(args, conn, format),
        DpciCommand::Create(args) => create(args, conn, format),
        DpciCommand::Destroy(args) => destroy(args, conn, format),
    }
}

fn info(args: ObjectArgs, conn: &ConnectionArgs, format: OutputFormat) -> CliResult<i32> {
    let id = parse_object_name(&args.object, "dpci")?;
    let connection = conn.connect()?;

    let out = connection
        .with_session::<Dpci, _>(id, |dpci| {
            let attrs = dpci.get_attributes()?;
            let version = dpci.api_version()?;
            let peer = dpci.get_peer_attributes()?;
            let link = dpci.get_link_state()?;
            Ok(DpciInfo {
                object: format!("dpci.{}", attrs.id),
                version: version.to_string(),
                num_of_priorities: attrs.num_of_priorities,
                peer: peer.peer_id.map(|peer_id| format!("dpci.{peer_id}")),
                peer_num_of_priorities: peer.peer_id.map(|_| peer.num_of_priorities),
                link_state: format!("{} - {link}", link.raw()),
            })
        })
        .map_err(|err| mc_error(&format!("dpci.{id}"), err))?;

    let mut fields = vec![
        ("dpci version", out.version.clone()),
        ("dpci id", id.to_string()),
        ("num_of_priorities", out.num_of_priorities.to_string()),
        (
            "connected peer",
            out.peer.clone().unwrap_or_else(|| "no peer".to_string()),
        ),
    ];
    if let Some(priorities) = out.peer_num_of_priorities {
        fields.push(("peer's num_of_priorities", priorities.to_string()));
    }
    fields.push(("link status", out.link_state.clone()));

    print_report(&out, &fields, format);
    Ok(SUCCESS)
}

fn create(args: DpciCreateArgs, conn: &ConnectionArgs, format: OutputFormat) -> CliResult<i32> {
    let config = DpciConfig {
        num_of_priorities: args.num_priorities,
    };
    let connection = conn.connect()?;
    let id = create_object::<Dpci>(&connection, &config)
        .map_err(|err| mc_error("create dpci", err))?;

    print_action(&format!("dpci.{id}"), "created", format);
    Ok(SUCCESS)
}

fn destroy(args: ObjectArgs, conn: &ConnectionArgs, format: OutputFormat) -> CliResult<i32> {
    let id = parse_object_name(&args.object, "dpci")?;
    let name = format!("dpci.{id}");
    ensure_not_in_use(conn, &name)?;

    let connection = conn.connect()?;
    destroy_object::<Dpci>(&connection, id).map_err(|err| mc_error(&name, err))?;

    print_action(&name, "destroyed", format);
    Ok(SUCCESS)
}
