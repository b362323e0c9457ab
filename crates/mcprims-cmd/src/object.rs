//! Object types, logical opcodes and the command-id tables behind them.
//!
//! Command ids occupy the top 16 bits of the header. The legacy command set
//! (firmware 8.x/9.x) uses the upper 12 bits only; the container-addressed
//! command set (firmware 10.x) appends a 4-bit command version.

use std::fmt;

/// Command id of the firmware version query.
///
/// Sent before the protocol generation is known, so it always uses the
/// legacy encoding; both generations answer it.
pub const VERSION_PROBE_ID: u16 = CommandId::legacy(0x831);

/// Command version used by every container-addressed command.
const CONTAINER_CMD_VERSION: u8 = 1;

/// Command-id encoders for the two protocol generations.
pub struct CommandId;

impl CommandId {
    /// Legacy 12-bit command id.
    pub const fn legacy(base: u16) -> u16 {
        (base & 0x0fff) << 4
    }

    /// Versioned command id: 12-bit base plus 4-bit command version.
    pub const fn versioned(base: u16, version: u8) -> u16 {
        ((base & 0x0fff) << 4) | (version & 0x0f) as u16
    }
}

/// Firmware object types that speak this command set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectType {
    /// Command interface (inter-partition messaging).
    Dpci,
    /// AIOP (Advanced I/O Processor) controller.
    Dpaiop,
    /// Resource container.
    Dprc,
    /// Management Complex itself.
    Dpmng,
}

impl ObjectType {
    pub fn name(self) -> &'static str {
        match self {
            Self::Dpci => "dpci",
            Self::Dpaiop => "dpaiop",
            Self::Dprc => "dprc",
            Self::Dpmng => "dpmng",
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Logical operations, independent of how a generation numbers them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    Open,
    Close,
    Create,
    Destroy,
    Reset,
    GetAttributes,
    GetApiVersion,
    SetIrq,
    GetIrq,
    SetIrqEnable,
    GetIrqEnable,
    SetIrqMask,
    GetIrqMask,
    GetIrqStatus,
    ClearIrqStatus,
    GetPeerAttributes,
    GetLinkState,
    Load,
    Run,
    GetSlVersion,
    GetState,
    GetContainerId,
    GetFirmwareVersion,
}

impl Opcode {
    /// Every opcode, in table order.
    pub const ALL: [Opcode; 23] = [
        Self::Open,
        Self::Close,
        Self::Create,
        Self::Destroy,
        Self::Reset,
        Self::GetAttributes,
        Self::GetApiVersion,
        Self::SetIrq,
        Self::GetIrq,
        Self::SetIrqEnable,
        Self::GetIrqEnable,
        Self::SetIrqMask,
        Self::GetIrqMask,
        Self::GetIrqStatus,
        Self::ClearIrqStatus,
        Self::GetPeerAttributes,
        Self::GetLinkState,
        Self::Load,
        Self::Run,
        Self::GetSlVersion,
        Self::GetState,
        Self::GetContainerId,
        Self::GetFirmwareVersion,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Close => "close",
            Self::Create => "create",
            Self::Destroy => "destroy",
            Self::Reset => "reset",
            Self::GetAttributes => "get_attributes",
            Self::GetApiVersion => "get_api_version",
            Self::SetIrq => "set_irq",
            Self::GetIrq => "get_irq",
            Self::SetIrqEnable => "set_irq_enable",
            Self::GetIrqEnable => "get_irq_enable",
            Self::SetIrqMask => "set_irq_mask",
            Self::GetIrqMask => "get_irq_mask",
            Self::GetIrqStatus => "get_irq_status",
            Self::ClearIrqStatus => "clear_irq_status",
            Self::GetPeerAttributes => "get_peer_attributes",
            Self::GetLinkState => "get_link_state",
            Self::Load => "load",
            Self::Run => "run",
            Self::GetSlVersion => "get_sl_version",
            Self::GetState => "get_state",
            Self::GetContainerId => "get_container_id",
            Self::GetFirmwareVersion => "get_firmware_version",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Protocol generation: decides how commands are numbered and how object
/// lifecycle commands are addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    /// Firmware 8.x/9.x: create returns a token, destroy goes through an
    /// open token.
    Legacy,
    /// Firmware 10.x: create/destroy are issued on the parent container's
    /// token and address the object by id.
    Container,
}

impl Scheme {
    /// Wire command id for `opcode` on `object`, or `None` when the object
    /// does not implement it in this generation.
    pub fn cmd_id(self, object: ObjectType, opcode: Opcode) -> Option<u16> {
        if object == ObjectType::Dpmng && opcode == Opcode::GetFirmwareVersion {
            return Some(VERSION_PROBE_ID);
        }
        let base = base_id(self, object, opcode)?;
        Some(match self {
            Self::Legacy => CommandId::legacy(base),
            Self::Container => CommandId::versioned(base, CONTAINER_CMD_VERSION),
        })
    }

    /// Reverse lookup used by responders: which opcode does `cmd_id` name on
    /// `object`?
    pub fn opcode_of(self, object: ObjectType, cmd_id: u16) -> Option<Opcode> {
        Opcode::ALL
            .into_iter()
            .find(|opcode| self.cmd_id(object, *opcode) == Some(cmd_id))
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Legacy => f.write_str("legacy"),
            Self::Container => f.write_str("container"),
        }
    }
}

fn base_id(scheme: Scheme, object: ObjectType, opcode: Opcode) -> Option<u16> {
    use ObjectType::*;
    use Opcode::*;

    let common = match opcode {
        Close => Some(0x800),
        GetAttributes => Some(0x004),
        SetIrq => Some(0x010),
        GetIrq => Some(0x011),
        SetIrqEnable => Some(0x012),
        GetIrqEnable => Some(0x013),
        SetIrqMask => Some(0x014),
        GetIrqMask => Some(0x015),
        GetIrqStatus => Some(0x016),
        ClearIrqStatus => Some(0x017),
        _ => None,
    };

    match (object, opcode) {
        (Dpmng, _) => None,
        (Dpci, Open) => Some(0x807),
        (Dpci, Create) => Some(0x907),
        (Dpci, Destroy) => Some(destroy_base(scheme, 0x987)),
        (Dpci, GetApiVersion) => Some(0xa07),
        (Dpci, Reset) => Some(0x005),
        (Dpci, GetLinkState) => Some(0x0e1),
        (Dpci, GetPeerAttributes) => Some(0x0e2),
        (Dpaiop, Open) => Some(0x80a),
        (Dpaiop, Create) => Some(0x90a),
        (Dpaiop, Destroy) => Some(destroy_base(scheme, 0x98a)),
        (Dpaiop, GetApiVersion) => Some(0xa0a),
        (Dpaiop, Reset) => Some(0x005),
        (Dpaiop, Load) => Some(0x280),
        (Dpaiop, Run) => Some(0x281),
        (Dpaiop, GetSlVersion) => Some(0x282),
        (Dpaiop, GetState) => Some(0x283),
        (Dprc, Open) => Some(0x805),
        (Dprc, GetContainerId) => Some(0x830),
        (Dprc, GetApiVersion) => Some(0xa05),
        _ => common,
    }
}

/// Legacy destroy is a generic token-addressed command; container destroy
/// is a per-type command issued on the parent container.
fn destroy_base(scheme: Scheme, container_base: u16) -> u16 {
    match scheme {
        Scheme::Legacy => 0x900,
        Scheme::Container => container_base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generations_number_commands_differently() {
        assert_eq!(
            Scheme::Legacy.cmd_id(ObjectType::Dpci, Opcode::Open),
            Some(0x8070)
        );
        assert_eq!(
            Scheme::Container.cmd_id(ObjectType::Dpci, Opcode::Open),
            Some(0x8071)
        );
    }

    #[test]
    fn close_shares_one_id_across_objects() {
        let dpci = Scheme::Legacy.cmd_id(ObjectType::Dpci, Opcode::Close);
        let dpaiop = Scheme::Legacy.cmd_id(ObjectType::Dpaiop, Opcode::Close);
        assert_eq!(dpci, dpaiop);
    }

    #[test]
    fn destroy_is_addressed_per_generation() {
        assert_eq!(
            Scheme::Legacy.cmd_id(ObjectType::Dpci, Opcode::Destroy),
            Some(0x9000)
        );
        assert_eq!(
            Scheme::Container.cmd_id(ObjectType::Dpci, Opcode::Destroy),
            Some(0x9871)
        );
    }

    #[test]
    fn unsupported_pairs_have_no_id() {
        assert_eq!(Scheme::Legacy.cmd_id(ObjectType::Dpci, Opcode::Load), None);
        assert_eq!(
            Scheme::Container.cmd_id(ObjectType::Dpaiop, Opcode::GetLinkState),
            None
        );
    }

    #[test]
    fn version_probe_is_generation_independent() {
        for scheme in [Scheme::Legacy, Scheme::Container] {
            assert_eq!(
                scheme.cmd_id(ObjectType::Dpmng, Opcode::GetFirmwareVersion),
                Some(VERSION_PROBE_ID)
            );
        }
    }

    #[test]
    fn reverse_lookup_finds_opcode() {
        let id = Scheme::Container
            .cmd_id(ObjectType::Dpaiop, Opcode::GetState)
            .unwrap();
        assert_eq!(
            Scheme::Container.opcode_of(ObjectType::Dpaiop, id),
            Some(Opcode::GetState)
        );
    }
}
