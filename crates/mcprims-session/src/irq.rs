//! Interrupt-source configuration on an open session.
//!
//! Every index is checked against the object's interrupt count before a
//! command is built.

use mcprims_cmd::ops::irq::{
    ClearIrqStatus, GetIrq, GetIrqEnable, GetIrqMask, GetIrqStatus, IrqConfig, IrqDescriptor,
    SetIrq, SetIrqEnable, SetIrqMask,
};
use mcprims_transport::McTransport;

use crate::error::{ContractViolation, Result};
use crate::object::ObjectKind;
use crate::session::ObjectSession;

impl<K: ObjectKind, T: McTransport> ObjectSession<'_, K, T> {
    fn check_irq_index(&self, index: u8) -> Result<()> {
        if index < K::IRQ_COUNT {
            Ok(())
        } else {
            Err(ContractViolation::IrqIndexOutOfRange {
                object: K::TYPE,
                index,
                count: K::IRQ_COUNT,
            }
            .into())
        }
    }

    pub fn set_irq(&self, index: u8, config: IrqConfig) -> Result<()> {
        self.check_irq_index(index)?;
        self.execute(&SetIrq { index, config })
    }

    pub fn get_irq(&self, index: u8) -> Result<IrqDescriptor> {
        self.check_irq_index(index)?;
        self.execute(&GetIrq { index })
    }

    pub fn set_irq_enable(&self, index: u8, enabled: bool) -> Result<()> {
        self.check_irq_index(index)?;
        self.execute(&SetIrqEnable { index, enabled })
    }

    pub fn get_irq_enable(&self, index: u8) -> Result<bool> {
        self.check_irq_index(index)?;
        self.execute(&GetIrqEnable { index })
    }

    /// Set which status bits may raise the interrupt.
    pub fn set_irq_mask(&self, index: u8, mask: u32) -> Result<()> {
        self.check_irq_index(index)?;
        self.execute(&SetIrqMask { index, mask })
    }

    pub fn get_irq_mask(&self, index: u8) -> Result<u32> {
        self.check_irq_index(index)?;
        self.execute(&GetIrqMask { index })
    }

    /// Pending status bits.
    pub fn get_irq_status(&self, index: u8) -> Result<u32> {
        self.check_irq_index(index)?;
        self.execute(&GetIrqStatus { index })
    }

    /// Clear exactly the bits set in `status`.
    pub fn clear_irq_status(&self, index: u8, status: u32) -> Result<()> {
        self.check_irq_index(index)?;
        self.execute(&ClearIrqStatus { index, status })
    }
}
