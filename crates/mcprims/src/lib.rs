//! Typed sessions on NXP DPAA2 Management Complex objects.
//!
//! # Crate Structure
//!
//! - [`cmd`]: fixed-format command buffers and per-opcode layouts
//! - [`transport`]: blocking channels to the MC (restool device, mailbox socket)
//! - [`session`]: connections, object sessions, version adaptation, error classes
//! - [`sim`]: an in-process MC for tests and dry runs (behind `sim` feature)

/// Re-export command buffer types.
pub mod cmd {
    pub use mcprims_cmd::*;
}

/// Re-export transport types.
pub mod transport {
    pub use mcprims_transport::*;
}

/// Re-export session types.
pub mod session {
    pub use mcprims_session::*;
}

/// Re-export simulator types (requires `sim` feature).
#[cfg(feature = "sim")]
pub mod sim {
    pub use mcprims_sim::*;
}

pub use mcprims_session::{ErrorClass, McConnection, McError, ObjectSession, Result};
