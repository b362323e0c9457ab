use crate::command::{Field, McCommand, Params};
use crate::error::ParamError;
use crate::header::Priority;
use crate::object::Opcode;
use crate::request::Request;

const OBJECT_ID: Field = Field::new("object_id", 0, 0, 32);
const API_MAJOR: Field = Field::new("api_major", 0, 0, 16);
const API_MINOR: Field = Field::new("api_minor", 0, 16, 16);

/// Object API version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ApiVersion {
    pub major: u16,
    pub minor: u16,
}

impl std::fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Object creation parameters.
pub trait CreateConfig {
    fn validate(&self) -> Result<(), ParamError> {
        Ok(())
    }

    fn encode(&self, params: &mut Params);
}

/// Open a session on an existing object. The response carries the new
/// token in its header.
#[derive(Debug, Clone, Copy)]
pub struct Open {
    pub id: u32,
}

impl Request for Open {
    const OPCODE: Opcode = Opcode::Open;
    type Response = u16;

    fn encode_params(&self, params: &mut Params) {
        params.set(OBJECT_ID, u64::from(self.id));
    }

    fn decode_response(response: &McCommand) -> u16 {
        response.header().token
    }
}

/// Release a session.
#[derive(Debug, Clone, Copy)]
pub struct Close;

impl Request for Close {
    const OPCODE: Opcode = Opcode::Close;
    const PRIORITY: Priority = Priority::High;
    type Response = ();

    fn decode_response(_response: &McCommand) {}
}

/// Return an object to its initial state.
#[derive(Debug, Clone, Copy)]
pub struct Reset;

impl Request for Reset {
    const OPCODE: Opcode = Opcode::Reset;
    type Response = ();

    fn decode_response(_response: &McCommand) {}
}

/// Create an object through the legacy command set. The MC opens the new
/// object and returns its token in the response header.
#[derive(Debug, Clone, Copy)]
pub struct CreateOpened<'a, C>(pub &'a C);

impl<C: CreateConfig> Request for CreateOpened<'_, C> {
    const OPCODE: Opcode = Opcode::Create;
    type Response = u16;

    fn validate(&self) -> Result<(), ParamError> {
        self.0.validate()
    }

    fn encode_params(&self, params: &mut Params) {
        self.0.encode(params);
    }

    fn decode_response(response: &McCommand) -> u16 {
        response.header().token
    }
}

/// Create an object inside the container whose token carries the command.
/// The response returns the new object's id.
#[derive(Debug, Clone, Copy)]
pub struct CreateInContainer<'a, C>(pub &'a C);

impl<C: CreateConfig> Request for CreateInContainer<'_, C> {
    const OPCODE: Opcode = Opcode::Create;
    type Response = u32;

    fn validate(&self) -> Result<(), ParamError> {
        self.0.validate()
    }

    fn encode_params(&self, params: &mut Params) {
        self.0.encode(params);
    }

    fn decode_response(response: &McCommand) -> u32 {
        response.params.get(OBJECT_ID) as u32
    }
}

/// Destroy the object behind the command's token (legacy command set).
#[derive(Debug, Clone, Copy)]
pub struct Destroy;

impl Request for Destroy {
    const OPCODE: Opcode = Opcode::Destroy;
    type Response = ();

    fn decode_response(_response: &McCommand) {}
}

/// Destroy object `id` inside the container whose token carries the command.
#[derive(Debug, Clone, Copy)]
pub struct DestroyById {
    pub id: u32,
}

impl Request for DestroyById {
    const OPCODE: Opcode = Opcode::Destroy;
    type Response = ();

    fn encode_params(&self, params: &mut Params) {
        params.set(OBJECT_ID, u64::from(self.id));
    }

    fn decode_response(_response: &McCommand) {}
}

/// Query an object type's API version (container command set only).
#[derive(Debug, Clone, Copy)]
pub struct GetApiVersion;

impl Request for GetApiVersion {
    const OPCODE: Opcode = Opcode::GetApiVersion;
    type Response = ApiVersion;

    fn decode_response(response: &McCommand) -> ApiVersion {
        ApiVersion {
            major: response.params.get(API_MAJOR) as u16,
            minor: response.params.get(API_MINOR) as u16,
        }
    }
}

/// Write an API version the way [`GetApiVersion`] reads it.
pub fn encode_api_version(params: &mut Params, version: ApiVersion) {
    params.set(API_MAJOR, u64::from(version.major));
    params.set(API_MINOR, u64::from(version.minor));
}

/// Write an object id the way [`CreateInContainer`] and [`DestroyById`]
/// carry it.
pub fn encode_object_id(params: &mut Params, id: u32) {
    params.set(OBJECT_ID, u64::from(id));
}

/// Read the object id carried by [`Open`], [`DestroyById`] or a
/// [`CreateInContainer`] response.
pub fn decode_object_id(params: &Params) -> u32 {
    params.get(OBJECT_ID) as u32
}
