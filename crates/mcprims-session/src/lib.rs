//! Sessions on Management Complex objects.
//!
//! This is the layer callers use. Open a connection over any
//! [`McTransport`], then open, create and destroy objects and drive their
//! interrupt sources through typed sessions. The connection picks the
//! command encoding that matches the firmware once, up front.
//!
//! ```no_run
//! # fn main() -> mcprims_session::Result<()> {
//! use mcprims_session::{Dpci, McConnection};
//! use mcprims_transport::McDevice;
//!
//! let conn = McConnection::connect(McDevice::open_default()?)?;
//! let attrs = conn.with_session::<Dpci, _>(5, |dpci| dpci.get_attributes())?;
//! println!("dpci.{} has {} priorities", attrs.id, attrs.num_of_priorities);
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod config;
pub mod connection;
pub mod dpaiop;
pub mod dpci;
pub mod dprc;
pub mod error;
pub mod irq;
pub mod object;
pub mod session;
pub mod status;
pub mod token;

pub use config::{ConnectionConfig, SchemeSelection};
pub use connection::McConnection;
pub use dpaiop::Dpaiop;
pub use dpci::Dpci;
pub use dprc::Dprc;
pub use error::{ContractViolation, ErrorClass, McError, Result};
pub use object::{Creatable, Described, ObjectAttributes, ObjectKind};
pub use session::ObjectSession;
pub use token::Token;

pub use mcprims_cmd::ops::dpaiop::{
    AiopState, DpaiopAttributes, DpaiopConfig, LoadConfig, RunConfig, SlVersion,
};
pub use mcprims_cmd::ops::dpci::{DpciAttributes, DpciConfig, LinkState, PeerAttributes};
pub use mcprims_cmd::ops::dpmng::FirmwareVersion;
pub use mcprims_cmd::ops::irq::{IrqConfig, IrqDescriptor};
pub use mcprims_cmd::ops::ApiVersion;
pub use mcprims_cmd::{McStatus, ObjectType, Opcode, Scheme};
pub use mcprims_transport::McTransport;
