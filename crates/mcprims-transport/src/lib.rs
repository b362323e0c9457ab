//! Blocking command transports to the Management Complex.
//!
//! A transport delivers one command buffer to the MC and returns the
//! response buffer. Available transports:
//! - The Linux restool character device (`/dev/mc_restool`)
//! - A mailbox bridge over a Unix domain socket (emulators, remote portals)
//!
//! The protocol has no request ids, so one channel carries one command at a
//! time. [`SharedPortal`] enforces that when several sessions share a
//! channel.

pub mod error;
pub mod traits;

#[cfg(target_os = "linux")]
pub mod device;
#[cfg(unix)]
pub mod uds;

pub use error::{Result, TransportError};
pub use traits::{McTransport, SharedPortal};

#[cfg(target_os = "linux")]
pub use device::McDevice;
#[cfg(unix)]
pub use uds::MailboxSocket;
