//! Fixed-format command buffers for the Management Complex (MC) firmware.
//!
//! Every command exchanged with the MC is a 64-byte buffer:
//! - An 8-byte header word (command id, priority, token, status)
//! - Seven 8-byte parameter words whose meaning is defined by the command id
//!
//! This crate only builds and parses buffers. It performs no I/O; sending a
//! command is the job of `mcprims-transport`.

pub mod command;
pub mod error;
pub mod header;
pub mod object;
pub mod ops;
pub mod request;
pub mod status;

pub use command::{Field, McCommand, Params, COMMAND_SIZE, MC_CMD_NUM_OF_PARAMS};
pub use error::{CodecError, ParamError, Result};
pub use header::{CmdHeader, Priority, TOKEN_NONE};
pub use object::{CommandId, ObjectType, Opcode, Scheme, VERSION_PROBE_ID};
pub use request::{decode, encode, Request};
pub use status::McStatus;
