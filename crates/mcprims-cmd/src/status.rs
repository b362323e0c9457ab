use std::fmt;

/// Completion status written by the MC into a response header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum McStatus {
    Ok,
    Ready,
    AuthError,
    NoPrivilege,
    DmaError,
    ConfigError,
    Timeout,
    NoResource,
    NoMemory,
    Busy,
    UnsupportedOp,
    InvalidState,
    /// A code this library does not know about.
    Unknown(u8),
}

impl McStatus {
    pub fn from_code(code: u8) -> Self {
        match code {
            0x0 => Self::Ok,
            0x1 => Self::Ready,
            0x3 => Self::AuthError,
            0x4 => Self::NoPrivilege,
            0x5 => Self::DmaError,
            0x6 => Self::ConfigError,
            0x7 => Self::Timeout,
            0x8 => Self::NoResource,
            0x9 => Self::NoMemory,
            0xa => Self::Busy,
            0xb => Self::UnsupportedOp,
            0xc => Self::InvalidState,
            other => Self::Unknown(other),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Ok => 0x0,
            Self::Ready => 0x1,
            Self::AuthError => 0x3,
            Self::NoPrivilege => 0x4,
            Self::DmaError => 0x5,
            Self::ConfigError => 0x6,
            Self::Timeout => 0x7,
            Self::NoResource => 0x8,
            Self::NoMemory => 0x9,
            Self::Busy => 0xa,
            Self::UnsupportedOp => 0xb,
            Self::InvalidState => 0xc,
            Self::Unknown(code) => code,
        }
    }

    /// Human-readable description of the status.
    pub fn description(self) -> &'static str {
        match self {
            Self::Ok => "Command completed successfully",
            Self::Ready => "Command ready to be processed",
            Self::AuthError => "Authentication error",
            Self::NoPrivilege => "No privilege",
            Self::DmaError => "DMA or I/O error",
            Self::ConfigError => "Configuration error",
            Self::Timeout => "Operation timed out",
            Self::NoResource => "No resources",
            Self::NoMemory => "No memory available",
            Self::Busy => "Device is busy",
            Self::UnsupportedOp => "Unsupported operation",
            Self::InvalidState => "Invalid state",
            Self::Unknown(_) => "Unknown MC error",
        }
    }

    pub fn is_ok(self) -> bool {
        self == Self::Ok
    }
}

impl fmt::Display for McStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (status {:#x})", self.description(), self.code())
    }
}
