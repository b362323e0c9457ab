//! A Management Complex that lives in the process.
//!
//! [`SimManager`] answers command buffers the way the firmware does: it
//! tracks objects and the tokens opened on them, keeps interrupt state,
//! and speaks the legacy or the container-addressed command set depending
//! on the firmware version it is configured to report. It plugs in wherever
//! an [`McTransport`](mcprims_transport::McTransport) is expected.

mod config;
mod manager;
mod object;

pub use config::SimConfig;
pub use manager::{Fault, SimManager};
pub use object::{IrqState, SimObject};
