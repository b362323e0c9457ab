//! Turn the global connection flags into an [`McConnection`].

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use mcprims_cmd::Scheme;
use mcprims_session::{ConnectionConfig, McConnection, SchemeSelection};
use mcprims_sim::SimManager;
use mcprims_transport::McTransport;
use tracing::debug;

use crate::exit::{mc_error, CliError, CliResult};

pub type CliConnection = McConnection<Box<dyn McTransport + Send>>;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum SchemeArg {
    /// Detect from the firmware version.
    #[default]
    Auto,
    Legacy,
    Container,
}

impl SchemeArg {
    fn selection(self) -> SchemeSelection {
        match self {
            Self::Auto => SchemeSelection::Detect,
            Self::Legacy => SchemeSelection::Force(Scheme::Legacy),
            Self::Container => SchemeSelection::Force(Scheme::Container),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// MC restool device.
    #[arg(
        long,
        value_name = "PATH",
        env = "MCPRIMS_DEVICE",
        default_value = "/dev/mc_restool",
        global = true
    )]
    pub device: PathBuf,

    /// Reach the MC through a mailbox bridge socket instead of the device.
    #[arg(long, value_name = "PATH", global = true, conflicts_with = "simulate")]
    pub socket: Option<PathBuf>,

    /// Talk to an in-process simulated MC preloaded with dpci.0, dpci.1 and dpaiop.0.
    #[arg(long, global = true)]
    pub simulate: bool,

    /// Command set to use.
    #[arg(
        long,
        value_enum,
        env = "MCPRIMS_SCHEME",
        default_value = "auto",
        global = true
    )]
    pub scheme: SchemeArg,

    /// Objects the caller is using; destroy refuses them.
    #[arg(long, value_name = "OBJECT", value_delimiter = ',', global = true)]
    pub protect: Vec<String>,
}

impl ConnectionArgs {
    pub fn connect(&self) -> CliResult<CliConnection> {
        let transport = self.transport()?;
        let config = ConnectionConfig {
            scheme: self.scheme.selection(),
        };
        McConnection::with_config(transport, &config).map_err(|err| mc_error("connect", err))
    }

    fn transport(&self) -> CliResult<Box<dyn McTransport + Send>> {
        if self.simulate {
            let sim = match self.scheme {
                SchemeArg::Legacy => SimManager::legacy(),
                SchemeArg::Auto | SchemeArg::Container => SimManager::container(),
            };
            debug!("using simulated mc");
            return Ok(Box::new(sim.with_demo_objects()));
        }

        if let Some(path) = &self.socket {
            return open_socket(path);
        }

        open_device(&self.device)
    }
}

#[cfg(unix)]
fn open_socket(path: &std::path::Path) -> CliResult<Box<dyn McTransport + Send>> {
    let socket = mcprims_transport::MailboxSocket::connect(path)
        .map_err(|err| crate::exit::transport_error("connect failed", err))?;
    Ok(Box::new(socket))
}

#[cfg(not(unix))]
fn open_socket(path: &std::path::Path) -> CliResult<Box<dyn McTransport + Send>> {
    Err(CliError::usage(format!(
        "{}: mailbox sockets need Unix domain sockets",
        path.display()
    )))
}

#[cfg(target_os = "linux")]
fn open_device(path: &std::path::Path) -> CliResult<Box<dyn McTransport + Send>> {
    let device = mcprims_transport::McDevice::open(path)
        .map_err(|err| crate::exit::transport_error("open failed", err))?;
    Ok(Box::new(device))
}

#[cfg(not(target_os = "linux"))]
fn open_device(path: &std::path::Path) -> CliResult<Box<dyn McTransport + Send>> {
    Err(CliError::usage(format!(
        "{}: the restool device is only available on Linux; use --socket or --simulate",
        path.display()
    )))
}

/// Parse `dpci.5` (or a bare `5`) into an id of object type `kind`.
pub fn parse_object_name(name: &str, kind: &str) -> CliResult<u32> {
    let digits = match name.split_once('.') {
        Some((prefix, rest)) if prefix == kind => rest,
        Some(_) => {
            return Err(CliError::usage(format!(
                "{name} is not a {kind} object name"
            )))
        }
        None => name,
    };
    digits
        .parse()
        .map_err(|_| CliError::usage(format!("invalid {kind} object name: {name}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_qualified_and_bare_names() {
        assert_eq!(parse_object_name("dpci.5", "dpci").unwrap(), 5);
        assert_eq!(parse_object_name("12", "dpaiop").unwrap(), 12);
    }

    #[test]
    fn rejects_foreign_or_malformed_names() {
        assert!(parse_object_name("dpaiop.1", "dpci").is_err());
        assert!(parse_object_name("dpci.x", "dpci").is_err());
        assert!(parse_object_name("", "dpci").is_err());
    }
}
