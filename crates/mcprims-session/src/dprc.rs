use crate::object::ObjectKind;

/// Resource container.
///
/// Only the root container is opened here, to address container-scheme
/// create and destroy commands.
#[derive(Debug, Clone, Copy)]
pub struct Dprc;

impl ObjectKind for Dprc {
    const TYPE: mcprims_cmd::ObjectType = mcprims_cmd::ObjectType::Dprc;
    const IRQ_COUNT: u8 = 1;
}
