//! Object kinds: what a session is opened on.

use mcprims_cmd::ops::{ApiVersion, CreateConfig};
use mcprims_cmd::{ObjectType, Request};

/// A firmware object type that sessions can be opened on.
pub trait ObjectKind {
    const TYPE: ObjectType;
    /// Number of interrupt sources; valid indices are `0..IRQ_COUNT`.
    const IRQ_COUNT: u8;
}

/// Object kinds that can be created and destroyed.
pub trait Creatable: ObjectKind {
    type Config: CreateConfig;
}

/// Object kinds that report an attributes snapshot.
pub trait Described: ObjectKind {
    type Attributes: ObjectAttributes;
    type GetAttributes: Request<Response = Self::Attributes>;

    const GET_ATTRIBUTES: Self::GetAttributes;
}

/// Fields every attributes snapshot carries.
pub trait ObjectAttributes {
    fn id(&self) -> u32;

    /// API version, when the command set reports it in the snapshot.
    fn version(&self) -> Option<ApiVersion>;
}
