//! Per-opcode request descriptors.
//!
//! Each request type describes one command's parameter layout and response
//! decoding. Generic lifecycle and IRQ commands are shared by every object
//! type; the remaining modules hold object-specific commands.

pub mod dpaiop;
pub mod dpci;
pub mod dpmng;
pub mod dprc;
pub mod irq;
pub mod lifecycle;

pub use lifecycle::{ApiVersion, CreateConfig};
