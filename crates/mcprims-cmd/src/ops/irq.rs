//! Interrupt-source configuration commands, shared by every object type.

use crate::command::{Field, McCommand, Params};
use crate::object::Opcode;
use crate::request::Request;

const INDEX: Field = Field::new("irq_index", 0, 32, 8);
const ENABLE: Field = Field::new("irq_enable", 0, 0, 8);
const MASK: Field = Field::new("irq_mask", 0, 0, 32);
const STATUS: Field = Field::new("irq_status", 0, 0, 32);
const VALUE: Field = Field::new("irq_val", 0, 0, 32);
const ADDRESS: Field = Field::new("irq_addr", 1, 0, 64);
const USER_ID: Field = Field::new("user_irq_id", 2, 0, 32);
const TYPE: Field = Field::new("irq_type", 2, 32, 32);

/// Where and what the interrupt source writes when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IrqConfig {
    /// Message address.
    pub addr: u64,
    /// Message value.
    pub val: u32,
    /// Caller-chosen identifier for the interrupt.
    pub user_irq_id: i32,
}

/// Interrupt source configuration as reported by the MC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IrqDescriptor {
    /// Interrupt type reported by the MC.
    pub irq_type: u32,
    pub config: IrqConfig,
}

#[derive(Debug, Clone, Copy)]
pub struct SetIrq {
    pub index: u8,
    pub config: IrqConfig,
}

impl Request for SetIrq {
    const OPCODE: Opcode = Opcode::SetIrq;
    type Response = ();

    fn encode_params(&self, params: &mut Params) {
        params.set(INDEX, u64::from(self.index));
        params.set(VALUE, u64::from(self.config.val));
        params.set(ADDRESS, self.config.addr);
        params.set(USER_ID, u64::from(self.config.user_irq_id as u32));
    }

    fn decode_response(_response: &McCommand) {}
}

#[derive(Debug, Clone, Copy)]
pub struct GetIrq {
    pub index: u8,
}

impl Request for GetIrq {
    const OPCODE: Opcode = Opcode::GetIrq;
    type Response = IrqDescriptor;

    fn encode_params(&self, params: &mut Params) {
        params.set(INDEX, u64::from(self.index));
    }

    fn decode_response(response: &McCommand) -> IrqDescriptor {
        let params = &response.params;
        IrqDescriptor {
            irq_type: params.get(TYPE) as u32,
            config: IrqConfig {
                addr: params.get(ADDRESS),
                val: params.get(VALUE) as u32,
                user_irq_id: params.get(USER_ID) as u32 as i32,
            },
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SetIrqEnable {
    pub index: u8,
    pub enabled: bool,
}

impl Request for SetIrqEnable {
    const OPCODE: Opcode = Opcode::SetIrqEnable;
    type Response = ();

    fn encode_params(&self, params: &mut Params) {
        params.set(ENABLE, u64::from(self.enabled));
        params.set(INDEX, u64::from(self.index));
    }

    fn decode_response(_response: &McCommand) {}
}

#[derive(Debug, Clone, Copy)]
pub struct GetIrqEnable {
    pub index: u8,
}

impl Request for GetIrqEnable {
    const OPCODE: Opcode = Opcode::GetIrqEnable;
    type Response = bool;

    fn encode_params(&self, params: &mut Params) {
        params.set(INDEX, u64::from(self.index));
    }

    fn decode_response(response: &McCommand) -> bool {
        response.params.get(ENABLE) != 0
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SetIrqMask {
    pub index: u8,
    pub mask: u32,
}

impl Request for SetIrqMask {
    const OPCODE: Opcode = Opcode::SetIrqMask;
    type Response = ();

    fn encode_params(&self, params: &mut Params) {
        params.set(MASK, u64::from(self.mask));
        params.set(INDEX, u64::from(self.index));
    }

    fn decode_response(_response: &McCommand) {}
}

#[derive(Debug, Clone, Copy)]
pub struct GetIrqMask {
    pub index: u8,
}

impl Request for GetIrqMask {
    const OPCODE: Opcode = Opcode::GetIrqMask;
    type Response = u32;

    fn encode_params(&self, params: &mut Params) {
        params.set(INDEX, u64::from(self.index));
    }

    fn decode_response(response: &McCommand) -> u32 {
        response.params.get(MASK) as u32
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GetIrqStatus {
    pub index: u8,
}

impl Request for GetIrqStatus {
    const OPCODE: Opcode = Opcode::GetIrqStatus;
    type Response = u32;

    fn encode_params(&self, params: &mut Params) {
        params.set(INDEX, u64::from(self.index));
    }

    fn decode_response(response: &McCommand) -> u32 {
        response.params.get(STATUS) as u32
    }
}

/// Clear the status bits set in `status`; other bits are left untouched.
#[derive(Debug, Clone, Copy)]
pub struct ClearIrqStatus {
    pub index: u8,
    pub status: u32,
}

impl Request for ClearIrqStatus {
    const OPCODE: Opcode = Opcode::ClearIrqStatus;
    type Response = ();

    fn encode_params(&self, params: &mut Params) {
        params.set(STATUS, u64::from(self.status));
        params.set(INDEX, u64::from(self.index));
    }

    fn decode_response(_response: &McCommand) {}
}

/// Read the interrupt index carried by any IRQ command.
pub fn decode_index(params: &Params) -> u8 {
    params.get(INDEX) as u8
}

/// Read the enable flag carried by [`SetIrqEnable`].
pub fn decode_enable(params: &Params) -> bool {
    params.get(ENABLE) != 0
}

/// Read the mask or status bits carried by [`SetIrqMask`] or
/// [`ClearIrqStatus`].
pub fn decode_bits(params: &Params) -> u32 {
    params.get(MASK) as u32
}

/// Read the configuration carried by [`SetIrq`].
pub fn decode_config(params: &Params) -> IrqConfig {
    IrqConfig {
        addr: params.get(ADDRESS),
        val: params.get(VALUE) as u32,
        user_irq_id: params.get(USER_ID) as u32 as i32,
    }
}

/// Write a [`GetIrq`] response.
pub fn encode_descriptor(params: &mut Params, descriptor: &IrqDescriptor) {
    params.set(VALUE, u64::from(descriptor.config.val));
    params.set(ADDRESS, descriptor.config.addr);
    params.set(USER_ID, u64::from(descriptor.config.user_irq_id as u32));
    params.set(TYPE, u64::from(descriptor.irq_type));
}

/// Write a single-word response (`enable`, `mask` or `status`).
pub fn encode_word(params: &mut Params, value: u32) {
    params.set(MASK, u64::from(value));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::encode;

    #[test]
    fn set_irq_splits_address_into_its_own_word() {
        let cmd = encode(
            0x0100,
            3,
            &SetIrq {
                index: 0,
                config: IrqConfig {
                    addr: 0x0000_0008_fee0_0000,
                    val: 0x41,
                    user_irq_id: -1,
                },
            },
        );
        assert_eq!(cmd.params.word(0), 0x41);
        assert_eq!(cmd.params.word(1), 0x0000_0008_fee0_0000);
        assert_eq!(cmd.params.word(2), 0xffff_ffff);
    }

    #[test]
    fn index_shares_word_with_mask() {
        let request = SetIrqMask {
            index: 2,
            mask: 0x8000_0001,
        };
        let cmd = encode(0x0140, 3, &request);
        assert_eq!(cmd.params.word(0), 0x02_8000_0001);
        assert_eq!(decode_index(&cmd.params), 2);
        assert_eq!(decode_bits(&cmd.params), 0x8000_0001);
    }

    #[test]
    fn get_irq_response_decodes_negative_user_id() {
        let mut cmd = encode(0x0110, 3, &GetIrq { index: 0 });
        let descriptor = IrqDescriptor {
            irq_type: 1,
            config: IrqConfig {
                addr: 0xdead_0000,
                val: 7,
                user_irq_id: -5,
            },
        };
        encode_descriptor(&mut cmd.params, &descriptor);
        assert_eq!(GetIrq::decode_response(&cmd), descriptor);
    }
}
