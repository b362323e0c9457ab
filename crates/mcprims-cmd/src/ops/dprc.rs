//! DPRC (resource container) commands.

use crate::command::{Field, McCommand, Params};
use crate::object::Opcode;
use crate::request::Request;

const CONTAINER_ID: Field = Field::new("container_id", 0, 0, 32);

/// Query the id of the container the caller's portal belongs to.
#[derive(Debug, Clone, Copy)]
pub struct GetContainerId;

impl Request for GetContainerId {
    const OPCODE: Opcode = Opcode::GetContainerId;
    type Response = u32;

    fn decode_response(response: &McCommand) -> u32 {
        response.params.get(CONTAINER_ID) as u32
    }
}

/// Write a [`GetContainerId`] response.
pub fn encode_container_id(params: &mut Params, id: u32) {
    params.set(CONTAINER_ID, u64::from(id));
}
