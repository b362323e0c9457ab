use std::fmt;
use std::io;

use mcprims_cmd::McStatus;
use mcprims_session::McError;
use mcprims_transport::TransportError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(USAGE, message)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CliError {}

fn io_code(err: &io::Error) -> i32 {
    match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::NotFound | io::ErrorKind::ConnectionRefused => FAILURE,
        _ => TRANSPORT_ERROR,
    }
}

fn transport_code(err: &TransportError) -> i32 {
    match err {
        TransportError::Open { source, .. }
        | TransportError::Connect { source, .. }
        | TransportError::Io(source) => io_code(source),
        TransportError::PathTooLong { .. } => USAGE,
        _ => TRANSPORT_ERROR,
    }
}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    CliError::new(transport_code(&err), format!("{context}: {err}"))
}

/// Map a session error onto an exit code by its class.
pub fn mc_error(context: &str, err: McError) -> CliError {
    let code = match &err {
        McError::Transport(inner) => transport_code(inner),
        McError::Codec(_) => TRANSPORT_ERROR,
        McError::Contract(_) => USAGE,
        McError::NotFound { .. } | McError::UnsupportedFirmware(_) => FAILURE,
        McError::InvalidHandle { .. } => INTERNAL,
        McError::Firmware { status, .. } => match status {
            McStatus::AuthError | McStatus::NoPrivilege => PERMISSION_DENIED,
            McStatus::Timeout => TIMEOUT,
            McStatus::ConfigError => DATA_INVALID,
            _ => FAILURE,
        },
    };
    CliError::new(code, format!("{context}: {err}"))
}

#[cfg(test)]
mod tests {
    use mcprims_cmd::{ObjectType, Opcode};
    use mcprims_session::ContractViolation;

    use super::*;

    #[test]
    fn firmware_refusals_map_by_status() {
        let err = McError::Firmware {
            object: ObjectType::Dpci,
            opcode: Opcode::Open,
            status: McStatus::NoPrivilege,
        };
        assert_eq!(mc_error("open", err).code, PERMISSION_DENIED);
    }

    #[test]
    fn contract_violation_is_usage() {
        let err = McError::from(ContractViolation::ZeroToken);
        let cli = mc_error("adopt", err);
        assert_eq!(cli.code, USAGE);
        assert!(cli.message.starts_with("adopt: "));
    }

    #[test]
    fn missing_device_is_failure() {
        let err = TransportError::Open {
            path: "/dev/mc_restool".into(),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        assert_eq!(transport_error("connect", err).code, FAILURE);
    }
}
