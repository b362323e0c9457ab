//! MC management commands.

use std::fmt;

use crate::command::{Field, McCommand, Params};
use crate::object::Opcode;
use crate::request::Request;

const REVISION: Field = Field::new("revision", 0, 0, 32);
const MAJOR: Field = Field::new("major", 0, 32, 32);
const MINOR: Field = Field::new("minor", 1, 0, 32);

/// MC firmware version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FirmwareVersion {
    pub major: u32,
    pub minor: u32,
    pub revision: u32,
}

impl fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.revision)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GetFirmwareVersion;

impl Request for GetFirmwareVersion {
    const OPCODE: Opcode = Opcode::GetFirmwareVersion;
    type Response = FirmwareVersion;

    fn decode_response(response: &McCommand) -> FirmwareVersion {
        FirmwareVersion {
            major: response.params.get(MAJOR) as u32,
            minor: response.params.get(MINOR) as u32,
            revision: response.params.get(REVISION) as u32,
        }
    }
}

/// Write a [`GetFirmwareVersion`] response.
pub fn encode_firmware_version(params: &mut Params, version: &FirmwareVersion) {
    params.set(MAJOR, u64::from(version.major));
    params.set(MINOR, u64::from(version.minor));
    params.set(REVISION, u64::from(version.revision));
}
