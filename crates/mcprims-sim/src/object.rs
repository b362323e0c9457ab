use mcprims_cmd::ops::dpaiop::{AiopState, DpaiopConfig, SlVersion};
use mcprims_cmd::ops::irq::IrqDescriptor;
use mcprims_cmd::ObjectType;

/// Service-layer version reported by every simulated AIOP.
pub(crate) const SL_VERSION: SlVersion = SlVersion {
    major: 10,
    minor: 3,
    revision: 0,
};

/// State of one interrupt source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IrqState {
    pub descriptor: IrqDescriptor,
    pub enabled: bool,
    pub mask: u32,
    pub status: u32,
}

impl IrqState {
    /// Latch `bits`. Returns whether the interrupt would be signalled.
    pub fn raise(&mut self, bits: u32) -> bool {
        self.status |= bits;
        self.enabled && bits & self.mask != 0
    }
}

/// A simulated firmware object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimObject {
    Dpci {
        num_of_priorities: u8,
        peer: Option<u32>,
        irq: IrqState,
    },
    Dpaiop {
        config: DpaiopConfig,
        state: AiopState,
        irq: IrqState,
    },
}

impl SimObject {
    pub fn object_type(&self) -> ObjectType {
        match self {
            Self::Dpci { .. } => ObjectType::Dpci,
            Self::Dpaiop { .. } => ObjectType::Dpaiop,
        }
    }

    pub fn irq(&self) -> &IrqState {
        match self {
            Self::Dpci { irq, .. } | Self::Dpaiop { irq, .. } => irq,
        }
    }

    pub(crate) fn irq_mut(&mut self) -> &mut IrqState {
        match self {
            Self::Dpci { irq, .. } | Self::Dpaiop { irq, .. } => irq,
        }
    }

    /// Back to the state right after creation. Links survive a reset.
    pub(crate) fn reset(&mut self) {
        match self {
            Self::Dpci { irq, .. } => *irq = IrqState::default(),
            Self::Dpaiop { state, irq, .. } => {
                *state = AiopState::RESET_DONE;
                *irq = IrqState::default();
            }
        }
    }
}
