//! DPAIOP: control of an AIOP tile.
//!
//! Bring-up is reset, load an image, then run. `get_state` reports where
//! the tile is in that sequence.

use mcprims_cmd::ops::dpaiop::{
    AiopState, DpaiopAttributes, DpaiopConfig, GetAttributes, GetSlVersion, GetState, Load,
    LoadConfig, Run, RunConfig, SlVersion,
};
use mcprims_cmd::ops::ApiVersion;
use mcprims_cmd::ObjectType;
use mcprims_transport::McTransport;

use crate::error::Result;
use crate::object::{Creatable, Described, ObjectAttributes, ObjectKind};
use crate::session::ObjectSession;

#[derive(Debug, Clone, Copy)]
pub struct Dpaiop;

impl ObjectKind for Dpaiop {
    const TYPE: ObjectType = ObjectType::Dpaiop;
    const IRQ_COUNT: u8 = 1;
}

impl Creatable for Dpaiop {
    type Config = DpaiopConfig;
}

impl Described for Dpaiop {
    type Attributes = DpaiopAttributes;
    type GetAttributes = GetAttributes;

    const GET_ATTRIBUTES: GetAttributes = GetAttributes;
}

impl ObjectAttributes for DpaiopAttributes {
    fn id(&self) -> u32 {
        self.id
    }

    fn version(&self) -> Option<ApiVersion> {
        self.version
    }
}

impl<T: McTransport> ObjectSession<'_, Dpaiop, T> {
    /// Load an AIOP image. The image must already be mapped at `img_iova`.
    pub fn load(&self, config: LoadConfig) -> Result<()> {
        self.execute(&Load(config))
    }

    /// Start the loaded image on the cores in `cores_mask`.
    pub fn run(&self, config: RunConfig) -> Result<()> {
        self.execute(&Run(config))
    }

    pub fn get_state(&self) -> Result<AiopState> {
        self.execute(&GetState)
    }

    /// Version of the service layer running on the tile.
    pub fn get_sl_version(&self) -> Result<SlVersion> {
        self.execute(&GetSlVersion)
    }
}
