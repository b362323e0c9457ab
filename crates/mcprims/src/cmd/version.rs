use serde::Serialize;

use crate::cmd::VersionArgs;
use crate::connect::ConnectionArgs;
use crate::exit::{mc_error, CliResult, SUCCESS};
use crate::output::{print_report, OutputFormat};

#[derive(Serialize)]
struct McVersionOutput {
    cli_version: &'static str,
    firmware: String,
    scheme: String,
    container_id: u32,
}

pub fn run(args: VersionArgs, conn: &ConnectionArgs, format: OutputFormat) -> CliResult<i32> {
    if !args.mc {
        print_cli_version(args.extended);
        return Ok(SUCCESS);
    }

    let connection = conn.connect()?;
    let firmware = connection
        .query_firmware_version()
        .map_err(|err| mc_error("query firmware version", err))?;
    let container_id = connection
        .container_id()
        .map_err(|err| mc_error("get container id", err))?;

    let out = McVersionOutput {
        cli_version: env!("CARGO_PKG_VERSION"),
        firmware: firmware.to_string(),
        scheme: connection.scheme().to_string(),
        container_id,
    };
    let fields = [
        ("mcprims version", out.cli_version.to_string()),
        ("MC firmware version", out.firmware.clone()),
        ("command set", out.scheme.clone()),
        ("root container", format!("dprc.{container_id}")),
    ];
    print_report(&out, &fields, format);
    Ok(SUCCESS)
}

fn print_cli_version(extended: bool) {
    println!("mcprims {}", env!("CARGO_PKG_VERSION"));
    if !extended {
        return;
    }
    println!(
        "target: {}",
        option_env!("MCPRIMS_BUILD_TARGET").unwrap_or("unknown")
    );
    println!(
        "profile: {}",
        option_env!("MCPRIMS_BUILD_PROFILE").unwrap_or("unknown")
    );
    println!("target_os: {}", std::env::consts::OS);
    println!("features: sim={}, cli=true", cfg!(feature = "sim"));
}
