mod cmd;
mod connect;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::connect::ConnectionArgs;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "mcprims", version, about = "DPAA2 Management Complex object CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "warn", global = true)]
    log_level: LogLevel,

    #[command(flatten)]
    connection: ConnectionArgs,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    match cmd::run(cli.command, &cli.connection, format) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::DpciCommand;
    use crate::connect::SchemeArg;

    #[test]
    fn parses_dpci_info_with_global_flags() {
        let cli = Cli::try_parse_from(["mcprims", "dpci", "info", "dpci.3", "--simulate"])
            .expect("dpci info args should parse");

        assert!(cli.connection.simulate);
        assert!(matches!(cli.command, Command::Dpci(DpciCommand::Info(_))));
    }

    #[test]
    fn parses_scheme_override() {
        let cli = Cli::try_parse_from(["mcprims", "--scheme", "legacy", "version", "--mc"])
            .expect("version args should parse");
        assert_eq!(cli.connection.scheme, SchemeArg::Legacy);
    }

    #[test]
    fn rejects_socket_with_simulate() {
        let err = Cli::try_parse_from([
            "mcprims",
            "--socket",
            "/tmp/mc.sock",
            "--simulate",
            "version",
        ])
        .expect_err("conflicting transports should fail");

        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn rejects_unknown_subcommand() {
        let err = Cli::try_parse_from(["mcprims", "dpni", "info", "dpni.0"])
            .expect_err("unknown object type should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidSubcommand);
    }
}
