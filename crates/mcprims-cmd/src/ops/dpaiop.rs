//! DPAIOP (AIOP controller) commands.

use std::fmt;

use crate::command::{Field, McCommand, Params};
use crate::error::ParamError;
use crate::object::Opcode;
use crate::ops::lifecycle::{ApiVersion, CreateConfig};
use crate::request::Request;

const CFG_AIOP_ID: Field = Field::new("aiop_id", 0, 0, 32);
const CFG_CONTAINER_ID: Field = Field::new("aiop_container_id", 0, 32, 32);
const ATTR_ID: Field = Field::new("id", 0, 0, 32);
const ATTR_MAJOR: Field = Field::new("version_major", 1, 0, 16);
const ATTR_MINOR: Field = Field::new("version_minor", 1, 16, 16);
const LOAD_SIZE: Field = Field::new("img_size", 0, 0, 32);
const LOAD_IOVA: Field = Field::new("img_iova", 1, 0, 64);
const LOAD_OPTIONS: Field = Field::new("options", 2, 0, 64);
const RUN_ARGS_SIZE: Field = Field::new("args_size", 0, 0, 32);
const RUN_CORES: Field = Field::new("cores_mask", 1, 0, 64);
const RUN_OPTIONS: Field = Field::new("options", 2, 0, 64);
const RUN_ARGS_IOVA: Field = Field::new("args_iova", 3, 0, 64);
const SL_MAJOR: Field = Field::new("major", 0, 0, 32);
const SL_MINOR: Field = Field::new("minor", 0, 32, 32);
const SL_REVISION: Field = Field::new("revision", 1, 0, 32);
const STATE: Field = Field::new("state", 0, 0, 32);

/// DPAIOP creation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DpaiopConfig {
    /// AIOP tile to control.
    pub aiop_id: u32,
    /// Container the AIOP runs in.
    pub aiop_container_id: u32,
}

impl CreateConfig for DpaiopConfig {
    fn encode(&self, params: &mut Params) {
        params.set(CFG_AIOP_ID, u64::from(self.aiop_id));
        params.set(CFG_CONTAINER_ID, u64::from(self.aiop_container_id));
    }
}

/// Read the configuration carried by a DPAIOP create command.
pub fn decode_config(params: &Params) -> DpaiopConfig {
    DpaiopConfig {
        aiop_id: params.get(CFG_AIOP_ID) as u32,
        aiop_container_id: params.get(CFG_CONTAINER_ID) as u32,
    }
}

/// DPAIOP attributes snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DpaiopAttributes {
    pub id: u32,
    /// Reported only by the legacy command set.
    pub version: Option<ApiVersion>,
}

#[derive(Debug, Clone, Copy)]
pub struct GetAttributes;

impl Request for GetAttributes {
    const OPCODE: Opcode = Opcode::GetAttributes;
    type Response = DpaiopAttributes;

    fn decode_response(response: &McCommand) -> DpaiopAttributes {
        let params = &response.params;
        let version = ApiVersion {
            major: params.get(ATTR_MAJOR) as u16,
            minor: params.get(ATTR_MINOR) as u16,
        };
        DpaiopAttributes {
            id: params.get(ATTR_ID) as u32,
            version: (version != ApiVersion { major: 0, minor: 0 }).then_some(version),
        }
    }
}

/// Write a [`GetAttributes`] response.
pub fn encode_attributes(params: &mut Params, attr: &DpaiopAttributes) {
    params.set(ATTR_ID, u64::from(attr.id));
    if let Some(version) = attr.version {
        params.set(ATTR_MAJOR, u64::from(version.major));
        params.set(ATTR_MINOR, u64::from(version.minor));
    }
}

/// AIOP image load parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadConfig {
    /// I/O virtual address of the ELF image.
    pub img_iova: u64,
    /// Image size in bytes.
    pub img_size: u32,
    pub options: u64,
}

#[derive(Debug, Clone, Copy)]
pub struct Load(pub LoadConfig);

impl Request for Load {
    const OPCODE: Opcode = Opcode::Load;
    type Response = ();

    fn validate(&self) -> Result<(), ParamError> {
        if self.0.img_size == 0 {
            return Err(ParamError::OutOfRange {
                field: "img_size",
                value: 0,
                min: 1,
                max: u64::from(u32::MAX),
            });
        }
        Ok(())
    }

    fn encode_params(&self, params: &mut Params) {
        params.set(LOAD_SIZE, u64::from(self.0.img_size));
        params.set(LOAD_IOVA, self.0.img_iova);
        params.set(LOAD_OPTIONS, self.0.options);
    }

    fn decode_response(_response: &McCommand) {}
}

/// Read the configuration carried by [`Load`].
pub fn decode_load(params: &Params) -> LoadConfig {
    LoadConfig {
        img_iova: params.get(LOAD_IOVA),
        img_size: params.get(LOAD_SIZE) as u32,
        options: params.get(LOAD_OPTIONS),
    }
}

/// AIOP run parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunConfig {
    /// Cores to start.
    pub cores_mask: u64,
    pub options: u64,
    /// I/O virtual address of the arguments block.
    pub args_iova: u64,
    pub args_size: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct Run(pub RunConfig);

impl Request for Run {
    const OPCODE: Opcode = Opcode::Run;
    type Response = ();

    fn encode_params(&self, params: &mut Params) {
        params.set(RUN_ARGS_SIZE, u64::from(self.0.args_size));
        params.set(RUN_CORES, self.0.cores_mask);
        params.set(RUN_OPTIONS, self.0.options);
        params.set(RUN_ARGS_IOVA, self.0.args_iova);
    }

    fn decode_response(_response: &McCommand) {}
}

/// Read the configuration carried by [`Run`].
pub fn decode_run(params: &Params) -> RunConfig {
    RunConfig {
        cores_mask: params.get(RUN_CORES),
        options: params.get(RUN_OPTIONS),
        args_iova: params.get(RUN_ARGS_IOVA),
        args_size: params.get(RUN_ARGS_SIZE) as u32,
    }
}

/// AIOP service layer version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlVersion {
    pub major: u32,
    pub minor: u32,
    pub revision: u32,
}

impl fmt::Display for SlVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.revision)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GetSlVersion;

impl Request for GetSlVersion {
    const OPCODE: Opcode = Opcode::GetSlVersion;
    type Response = SlVersion;

    fn decode_response(response: &McCommand) -> SlVersion {
        SlVersion {
            major: response.params.get(SL_MAJOR) as u32,
            minor: response.params.get(SL_MINOR) as u32,
            revision: response.params.get(SL_REVISION) as u32,
        }
    }
}

/// Write a [`GetSlVersion`] response.
pub fn encode_sl_version(params: &mut Params, version: &SlVersion) {
    params.set(SL_MAJOR, u64::from(version.major));
    params.set(SL_MINOR, u64::from(version.minor));
    params.set(SL_REVISION, u64::from(version.revision));
}

/// AIOP state word. Zero means reset done; other states are flag bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AiopState(pub u32);

impl AiopState {
    pub const RESET_DONE: AiopState = AiopState(0x0000_0000);
    pub const RESET_ONGOING: AiopState = AiopState(0x0000_0001);
    pub const LOAD_DONE: AiopState = AiopState(0x0000_0002);
    pub const LOAD_ONGOING: AiopState = AiopState(0x0000_0004);
    pub const LOAD_ERROR: AiopState = AiopState(0x0000_0008);
    pub const BOOT_ONGOING: AiopState = AiopState(0x0000_0010);
    pub const BOOT_ERROR: AiopState = AiopState(0x0000_0020);
    pub const RUNNING: AiopState = AiopState(0x0000_0040);

    const NAMED: [(AiopState, &'static str); 7] = [
        (Self::RESET_ONGOING, "reset-ongoing"),
        (Self::LOAD_DONE, "load-done"),
        (Self::LOAD_ONGOING, "load-ongoing"),
        (Self::LOAD_ERROR, "load-error"),
        (Self::BOOT_ONGOING, "boot-ongoing"),
        (Self::BOOT_ERROR, "boot-error"),
        (Self::RUNNING, "running"),
    ];

    pub fn contains(self, other: AiopState) -> bool {
        self.0 & other.0 == other.0
    }

    /// Names of the state bits that are set.
    pub fn names(self) -> Vec<&'static str> {
        if self == Self::RESET_DONE {
            return vec!["reset-done"];
        }
        Self::NAMED
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect()
    }
}

impl fmt::Display for AiopState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = self.names();
        if names.is_empty() {
            write!(f, "unknown ({:#x})", self.0)
        } else {
            f.write_str(&names.join("|"))
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GetState;

impl Request for GetState {
    const OPCODE: Opcode = Opcode::GetState;
    type Response = AiopState;

    fn decode_response(response: &McCommand) -> AiopState {
        AiopState(response.params.get(STATE) as u32)
    }
}

/// Write a [`GetState`] response.
pub fn encode_state(params: &mut Params, state: AiopState) {
    params.set(STATE, u64::from(state.0));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::encode;

    #[test]
    fn run_layout() {
        let cmd = encode(
            0x2810,
            4,
            &Run(RunConfig {
                cores_mask: 0xff,
                options: 0x1,
                args_iova: 0x8000_0000,
                args_size: 64,
            }),
        );
        assert_eq!(cmd.params.word(0), 64);
        assert_eq!(cmd.params.word(1), 0xff);
        assert_eq!(cmd.params.word(2), 0x1);
        assert_eq!(cmd.params.word(3), 0x8000_0000);
        assert_eq!(decode_run(&cmd.params).args_size, 64);
    }

    #[test]
    fn empty_image_is_rejected() {
        let load = Load(LoadConfig {
            img_iova: 0x1000,
            img_size: 0,
            options: 0,
        });
        assert!(load.validate().is_err());
    }

    #[test]
    fn state_names() {
        assert_eq!(AiopState::RESET_DONE.to_string(), "reset-done");
        assert_eq!(AiopState(0x42).to_string(), "load-done|running");
        assert_eq!(AiopState(0x100).to_string(), "unknown (0x100)");
    }
}
