//! DPCI: a command interface linking two partitions.

use mcprims_cmd::ops::dpci::{
    DpciAttributes, DpciConfig, GetAttributes, GetLinkState, GetPeerAttributes, LinkState,
    PeerAttributes,
};
use mcprims_cmd::ops::ApiVersion;
use mcprims_cmd::ObjectType;
use mcprims_transport::McTransport;

use crate::error::Result;
use crate::object::{Creatable, Described, ObjectAttributes, ObjectKind};
use crate::session::ObjectSession;

#[derive(Debug, Clone, Copy)]
pub struct Dpci;

impl ObjectKind for Dpci {
    const TYPE: ObjectType = ObjectType::Dpci;
    const IRQ_COUNT: u8 = 1;
}

impl Creatable for Dpci {
    type Config = DpciConfig;
}

impl Described for Dpci {
    type Attributes = DpciAttributes;
    type GetAttributes = GetAttributes;

    const GET_ATTRIBUTES: GetAttributes = GetAttributes;
}

impl ObjectAttributes for DpciAttributes {
    fn id(&self) -> u32 {
        self.id
    }

    fn version(&self) -> Option<ApiVersion> {
        self.version
    }
}

impl<T: McTransport> ObjectSession<'_, Dpci, T> {
    /// Attributes of the DPCI this one is connected to.
    pub fn get_peer_attributes(&self) -> Result<PeerAttributes> {
        self.execute(&GetPeerAttributes)
    }

    pub fn get_link_state(&self) -> Result<LinkState> {
        self.execute(&GetLinkState)
    }
}
