/// Token value carried by commands that are not bound to a session.
///
/// Zero is never a valid session token.
pub const TOKEN_NONE: u16 = 0;

/// Hardware flag bit marking a high-priority command.
const FLAG_PRIORITY_HIGH: u8 = 0x80;

/// Command priority.
///
/// High-priority commands preempt queued low-priority work in the MC.
/// Only `close` uses `High` in this command family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Priority {
    #[default]
    Low,
    High,
}

/// Decoded command header.
///
/// Header word layout (little-endian bit numbering):
/// ```text
/// ┌────────┬──────────┬────────┬──────────┬─────────┬──────────┐
/// │ 0..8   │ 8..16    │ 16..24 │ 24..32   │ 32..48  │ 48..64   │
/// │ src_id │ flags_hw │ status │ flags_sw │ token   │ cmd_id   │
/// └────────┴──────────┴────────┴──────────┴─────────┴──────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CmdHeader {
    pub cmd_id: u16,
    pub priority: Priority,
    pub token: u16,
    /// Raw MC status; only meaningful in responses.
    pub status: u8,
}

impl CmdHeader {
    /// Create a request header with a cleared status field.
    pub fn new(cmd_id: u16, priority: Priority, token: u16) -> Self {
        Self {
            cmd_id,
            priority,
            token,
            status: 0,
        }
    }

    /// Pack the header into its wire word.
    pub fn to_word(&self) -> u64 {
        let flags_hw = match self.priority {
            Priority::Low => 0,
            Priority::High => FLAG_PRIORITY_HIGH,
        };
        (u64::from(flags_hw) << 8)
            | (u64::from(self.status) << 16)
            | (u64::from(self.token) << 32)
            | (u64::from(self.cmd_id) << 48)
    }

    /// Unpack a header from its wire word.
    pub fn from_word(word: u64) -> Self {
        let flags_hw = ((word >> 8) & 0xff) as u8;
        let priority = if flags_hw & FLAG_PRIORITY_HIGH != 0 {
            Priority::High
        } else {
            Priority::Low
        };
        Self {
            cmd_id: (word >> 48) as u16,
            priority,
            token: ((word >> 32) & 0xffff) as u16,
            status: ((word >> 16) & 0xff) as u8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_field_positions() {
        let header = CmdHeader::new(0x8071, Priority::Low, 0x1234);
        assert_eq!(header.to_word(), 0x8071_1234_0000_0000);
    }

    #[test]
    fn high_priority_sets_hw_flag() {
        let word = CmdHeader::new(0x8000, Priority::High, 7).to_word();
        assert_eq!((word >> 8) & 0xff, 0x80);
        assert_eq!(CmdHeader::from_word(word).priority, Priority::High);
    }

    #[test]
    fn status_is_read_back_from_response_word() {
        let mut header = CmdHeader::new(0x0041, Priority::Low, 3);
        header.status = 0x0b;
        let parsed = CmdHeader::from_word(header.to_word());
        assert_eq!(parsed.status, 0x0b);
        assert_eq!(parsed.token, 3);
        assert_eq!(parsed.cmd_id, 0x0041);
    }
}
