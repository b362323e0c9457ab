use mcprims_cmd::ops::dpmng::FirmwareVersion;
use mcprims_cmd::{CodecError, McStatus, ObjectType, Opcode, ParamError, Scheme};
use mcprims_transport::TransportError;

/// Broad failure classes. Every [`McError`] belongs to exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// The channel failed; the response, if any, is undefined.
    TransportFailure,
    /// The firmware answered and refused the command.
    FirmwareStatus,
    /// The caller broke a precondition; nothing was sent.
    ContractViolation,
}

impl std::fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::TransportFailure => "transport",
            Self::FirmwareStatus => "firmware",
            Self::ContractViolation => "contract",
        })
    }
}

/// Preconditions checked before any command is built.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContractViolation {
    /// Zero is never a valid session token.
    #[error("token 0 does not name a session")]
    ZeroToken,

    /// A request parameter is out of range.
    #[error("invalid parameter: {0}")]
    Param(#[from] ParamError),

    /// The interrupt index is beyond the object's interrupt sources.
    #[error("{object} has {count} irq source(s), index {index} is out of range")]
    IrqIndexOutOfRange {
        object: ObjectType,
        index: u8,
        count: u8,
    },

    /// The object does not implement the operation in this protocol generation.
    #[error("{object} does not support {opcode} with the {scheme} command set")]
    Unsupported {
        object: ObjectType,
        opcode: Opcode,
        scheme: Scheme,
    },

    /// Container-addressed lifecycle commands need the parent container's session.
    #[error("{opcode} on {object} requires an open parent container")]
    MissingContainer { object: ObjectType, opcode: Opcode },

    /// The operation only exists in the other protocol generation.
    #[error("{operation} is not available with the {scheme} command set")]
    SchemeMismatch {
        operation: &'static str,
        scheme: Scheme,
    },
}

/// Errors that can occur in MC session operations.
#[derive(Debug, thiserror::Error)]
pub enum McError {
    /// The command could not be exchanged with the MC.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The response buffer did not answer the command that was sent.
    #[error("malformed response: {0}")]
    Codec(#[from] CodecError),

    /// The MC refused the command.
    #[error("{object} {opcode} failed: {status}")]
    Firmware {
        object: ObjectType,
        opcode: Opcode,
        status: McStatus,
    },

    /// Open named an object the MC does not know.
    #[error("{object}.{id} not found: {status}")]
    NotFound {
        object: ObjectType,
        id: u32,
        status: McStatus,
    },

    /// The MC reported success but returned the "no session" token.
    #[error("{object} {opcode} returned token 0")]
    InvalidHandle { object: ObjectType, opcode: Opcode },

    /// The firmware predates every supported command set.
    #[error("unsupported MC firmware {0}")]
    UnsupportedFirmware(FirmwareVersion),

    /// A precondition was violated; no command was sent.
    #[error("contract violation: {0}")]
    Contract(#[from] ContractViolation),
}

impl McError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Transport(_) | Self::Codec(_) => ErrorClass::TransportFailure,
            Self::Firmware { .. }
            | Self::NotFound { .. }
            | Self::InvalidHandle { .. }
            | Self::UnsupportedFirmware(_) => ErrorClass::FirmwareStatus,
            Self::Contract(_) => ErrorClass::ContractViolation,
        }
    }

    /// Status reported by the firmware, when it answered.
    pub fn status(&self) -> Option<McStatus> {
        match self {
            Self::Firmware { status, .. } | Self::NotFound { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether repeating the same command may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.status(),
            Some(McStatus::Busy | McStatus::Timeout | McStatus::NoResource | McStatus::NoMemory)
        )
    }
}

impl From<ParamError> for McError {
    fn from(err: ParamError) -> Self {
        Self::Contract(ContractViolation::Param(err))
    }
}

pub type Result<T> = std::result::Result<T, McError>;
