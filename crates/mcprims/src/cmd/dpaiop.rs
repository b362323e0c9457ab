use mcprims_session::{AiopState, Dpaiop, DpaiopConfig};
use serde::Serialize;

use crate::cmd::{
    create_object, destroy_object, ensure_not_in_use, DpaiopCommand, DpaiopCreateArgs, ObjectArgs,
};
use crate::connect::{parse_object_name, ConnectionArgs};
use crate::exit::{mc_error, CliResult, SUCCESS};
use crate::output::{print_action, print_report, OutputFormat};

#[derive(Serialize)]
struct DpaiopInfo {
    object: String,
    version: String,
    state: String,
    state_flags: u32,
    sl_version: Option<String>,
}

pub fn run(command: DpaiopCommand, conn: &ConnectionArgs, format: OutputFormat) -> CliResult<i32> {
    match command {
        DpaiopCommand::Info(args) => info(args, conn, format),
        DpaiopCommand::Create(args) => create(args, conn, format),
        DpaiopCommand::Destroy(args) => destroy(args, conn, format),
        DpaiopCommand::Reset(args) => reset(args, conn, format),
    }
}

fn info(args: ObjectArgs, conn: &ConnectionArgs, format: OutputFormat) -> CliResult<i32> {
    let id = parse_object_name(&args.object, "dpaiop")?;
    let connection = conn.connect()?;

    let out = connection
        .with_session::<Dpaiop, _>(id, |aiop| {
            let attrs = aiop.get_attributes()?;
            let version = aiop.api_version()?;
            let state = aiop.get_state()?;
            // The service layer only answers once the tile has booted.
            let sl_version = if state.contains(AiopState::RUNNING) {
                let sl = aiop.get_sl_version()?;
                Some(format!("{}.{}.{}", sl.major, sl.minor, sl.revision))
            } else {
                None
            };
            Ok(DpaiopInfo {
                object: format!("dpaiop.{}", attrs.id),
                version: version.to_string(),
                state: state.to_string(),
                state_flags: state.0,
                sl_version,
            })
        })
        .map_err(|err| mc_error(&format!("dpaiop.{id}"), err))?;

    let fields = [
        ("dpaiop version", out.version.clone()),
        ("dpaiop id", id.to_string()),
        ("state", format!("{} ({:#x})", out.state, out.state_flags)),
        (
            "service layer",
            out.sl_version
                .clone()
                .unwrap_or_else(|| "not running".to_string()),
        ),
    ];
    print_report(&out, &fields, format);
    Ok(SUCCESS)
}

fn create(args: DpaiopCreateArgs, conn: &ConnectionArgs, format: OutputFormat) -> CliResult<i32> {
    let config = DpaiopConfig {
        aiop_id: args.aiop_id,
        aiop_container_id: args.aiop_container_id,
    };
    let connection = conn.connect()?;
    let id = create_object::<Dpaiop>(&connection, &config)
        .map_err(|err| mc_error("create dpaiop", err))?;

    print_action(&format!("dpaiop.{id}"), "created", format);
    Ok(SUCCESS)
}

fn destroy(args: ObjectArgs, conn: &ConnectionArgs, format: OutputFormat) -> CliResult<i32> {
    let id = parse_object_name(&args.object, "dpaiop")?;
    let name = format!("dpaiop.{id}");
    ensure_not_in_use(conn, &name)?;

    let connection = conn.connect()?;
    destroy_object::<Dpaiop>(&connection, id).map_err(|err| mc_error(&name, err))?;

    print_action(&name, "destroyed", format);
    Ok(SUCCESS)
}

fn reset(args: ObjectArgs, conn: &ConnectionArgs, format: OutputFormat) -> CliResult<i32> {
    let id = parse_object_name(&args.object, "dpaiop")?;
    let name = format!("dpaiop.{id}");
    let connection = conn.connect()?;

    connection
        .with_session::<Dpaiop, _>(id, |aiop| aiop.reset())
        .map_err(|err| mc_error(&name, err))?;

    print_action(&name, "reset", format);
    Ok(SUCCESS)
}
