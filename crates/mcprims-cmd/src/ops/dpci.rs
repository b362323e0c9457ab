//! DPCI (command interface) commands.

use crate::command::{Field, McCommand, Params};
use crate::error::ParamError;
use crate::object::Opcode;
use crate::ops::lifecycle::{ApiVersion, CreateConfig};
use crate::request::Request;

/// Valid range for the number of priorities of a DPCI object.
pub const MIN_PRIORITIES: u8 = 1;
pub const MAX_PRIORITIES: u8 = 2;

const CFG_PRIORITIES: Field = Field::new("num_of_priorities", 0, 0, 8);
const ATTR_ID: Field = Field::new("id", 0, 0, 32);
const ATTR_PRIORITIES: Field = Field::new("num_of_priorities", 0, 48, 8);
const ATTR_MAJOR: Field = Field::new("version_major", 1, 0, 16);
const ATTR_MINOR: Field = Field::new("version_minor", 1, 16, 16);
const PEER_ID: Field = Field::new("peer_id", 0, 0, 32);
const PEER_PRIORITIES: Field = Field::new("num_of_priorities", 0, 48, 8);
const LINK_STATE: Field = Field::new("link_state", 0, 0, 32);

/// DPCI creation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DpciConfig {
    pub num_of_priorities: u8,
}

impl Default for DpciConfig {
    fn default() -> Self {
        Self {
            num_of_priorities: MIN_PRIORITIES,
        }
    }
}

impl CreateConfig for DpciConfig {
    fn validate(&self) -> Result<(), ParamError> {
        if (MIN_PRIORITIES..=MAX_PRIORITIES).contains(&self.num_of_priorities) {
            Ok(())
        } else {
            Err(ParamError::OutOfRange {
                field: "num_of_priorities",
                value: u64::from(self.num_of_priorities),
                min: u64::from(MIN_PRIORITIES),
                max: u64::from(MAX_PRIORITIES),
            })
        }
    }

    fn encode(&self, params: &mut Params) {
        params.set(CFG_PRIORITIES, u64::from(self.num_of_priorities));
    }
}

/// Read the configuration carried by a DPCI create command.
pub fn decode_config(params: &Params) -> DpciConfig {
    DpciConfig {
        num_of_priorities: params.get(CFG_PRIORITIES) as u8,
    }
}

/// DPCI attributes snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DpciAttributes {
    pub id: u32,
    pub num_of_priorities: u8,
    /// Reported only by the legacy command set.
    pub version: Option<ApiVersion>,
}

#[derive(Debug, Clone, Copy)]
pub struct GetAttributes;

impl Request for GetAttributes {
    const OPCODE: Opcode = Opcode::GetAttributes;
    type Response = DpciAttributes;

    fn decode_response(response: &McCommand) -> DpciAttributes {
        let params = &response.params;
        let version = ApiVersion {
            major: params.get(ATTR_MAJOR) as u16,
            minor: params.get(ATTR_MINOR) as u16,
        };
        DpciAttributes {
            id: params.get(ATTR_ID) as u32,
            num_of_priorities: params.get(ATTR_PRIORITIES) as u8,
            version: (version != ApiVersion { major: 0, minor: 0 }).then_some(version),
        }
    }
}

/// Write a [`GetAttributes`] response.
pub fn encode_attributes(params: &mut Params, attr: &DpciAttributes) {
    params.set(ATTR_ID, u64::from(attr.id));
    params.set(ATTR_PRIORITIES, u64::from(attr.num_of_priorities));
    if let Some(version) = attr.version {
        params.set(ATTR_MAJOR, u64::from(version.major));
        params.set(ATTR_MINOR, u64::from(version.minor));
    }
}

/// Attributes of the DPCI connected to this one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeerAttributes {
    /// `None` when no peer is connected.
    pub peer_id: Option<u32>,
    pub num_of_priorities: u8,
}

#[derive(Debug, Clone, Copy)]
pub struct GetPeerAttributes;

impl Request for GetPeerAttributes {
    const OPCODE: Opcode = Opcode::GetPeerAttributes;
    type Response = PeerAttributes;

    fn decode_response(response: &McCommand) -> PeerAttributes {
        let raw = response.params.get(PEER_ID) as u32 as i32;
        PeerAttributes {
            peer_id: u32::try_from(raw).ok(),
            num_of_priorities: response.params.get(PEER_PRIORITIES) as u8,
        }
    }
}

/// Write a [`GetPeerAttributes`] response.
pub fn encode_peer_attributes(params: &mut Params, peer: &PeerAttributes) {
    let raw = peer.peer_id.map_or(-1i32, |id| id as i32);
    params.set(PEER_ID, u64::from(raw as u32));
    params.set(PEER_PRIORITIES, u64::from(peer.num_of_priorities));
}

/// State of the link between a DPCI and its peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Down,
    Up,
    /// Any other value reported by the MC.
    Error(u32),
}

impl LinkState {
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            0 => Self::Down,
            1 => Self::Up,
            other => Self::Error(other),
        }
    }

    pub fn raw(self) -> u32 {
        match self {
            Self::Down => 0,
            Self::Up => 1,
            Self::Error(raw) => raw,
        }
    }
}

impl std::fmt::Display for LinkState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Down => f.write_str("down"),
            Self::Up => f.write_str("up"),
            Self::Error(_) => f.write_str("error state"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GetLinkState;

impl Request for GetLinkState {
    const OPCODE: Opcode = Opcode::GetLinkState;
    type Response = LinkState;

    fn decode_response(response: &McCommand) -> LinkState {
        LinkState::from_raw(response.params.get(LINK_STATE) as u32)
    }
}

/// Write a [`GetLinkState`] response.
pub fn encode_link_state(params: &mut Params, state: LinkState) {
    params.set(LINK_STATE, u64::from(state.raw()));
}
