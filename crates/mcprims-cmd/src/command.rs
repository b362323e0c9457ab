use bytes::{Buf, BufMut, BytesMut};

use crate::error::{CodecError, Result};
use crate::header::CmdHeader;
use crate::status::McStatus;

/// Number of parameter words following the header.
pub const MC_CMD_NUM_OF_PARAMS: usize = 7;

/// Total wire size of a command buffer: header word + parameter words.
pub const COMMAND_SIZE: usize = 8 * (1 + MC_CMD_NUM_OF_PARAMS);

/// The parameter region of a command buffer.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Params(pub [u64; MC_CMD_NUM_OF_PARAMS]);

impl Params {
    /// Raw parameter word.
    pub fn word(&self, index: usize) -> u64 {
        self.0[index]
    }

    /// Read a field.
    pub fn get(&self, field: Field) -> u64 {
        field.read(self)
    }

    /// Write a field. Bits outside the field's width are dropped.
    pub fn set(&mut self, field: Field, value: u64) {
        field.write(self, value);
    }
}

/// Position of one parameter inside the parameter region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub word: usize,
    pub offset: u32,
    pub width: u32,
}

impl Field {
    pub const fn new(name: &'static str, word: usize, offset: u32, width: u32) -> Self {
        Self {
            name,
            word,
            offset,
            width,
        }
    }

    fn mask(&self) -> u64 {
        if self.width >= 64 {
            u64::MAX
        } else {
            (1u64 << self.width) - 1
        }
    }

    fn read(&self, params: &Params) -> u64 {
        (params.0[self.word] >> self.offset) & self.mask()
    }

    fn write(&self, params: &mut Params, value: u64) {
        let mask = self.mask();
        let slot = &mut params.0[self.word];
        *slot &= !(mask << self.offset);
        *slot |= (value & mask) << self.offset;
    }
}

/// A complete command buffer, as sent to and returned by the MC.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct McCommand {
    pub header: u64,
    pub params: Params,
}

impl McCommand {
    /// Create a command with the given header and zeroed parameters.
    pub fn new(header: CmdHeader) -> Self {
        Self {
            header: header.to_word(),
            params: Params::default(),
        }
    }

    /// Decoded header.
    pub fn header(&self) -> CmdHeader {
        CmdHeader::from_word(self.header)
    }

    /// Status reported by the MC in a response.
    pub fn status(&self) -> McStatus {
        McStatus::from_code(self.header().status)
    }

    /// Overwrite the status field, leaving the rest of the header intact.
    pub fn set_status(&mut self, status: McStatus) {
        let mut header = self.header();
        header.status = status.code();
        self.header = header.to_word();
    }

    /// Overwrite the token field, leaving the rest of the header intact.
    pub fn set_token(&mut self, token: u16) {
        let mut header = self.header();
        header.token = token;
        self.header = header.to_word();
    }

    /// Append the little-endian wire image of this command to `dst`.
    pub fn encode_to(&self, dst: &mut BytesMut) {
        dst.reserve(COMMAND_SIZE);
        dst.put_u64_le(self.header);
        for word in self.params.0 {
            dst.put_u64_le(word);
        }
    }

    /// Parse a command from its little-endian wire image.
    pub fn decode_from(mut src: &[u8]) -> Result<Self> {
        if src.len() < COMMAND_SIZE {
            return Err(CodecError::ShortBuffer {
                len: src.len(),
                expected: COMMAND_SIZE,
            });
        }
        let header = src.get_u64_le();
        let mut params = Params::default();
        for word in params.0.iter_mut() {
            *word = src.get_u64_le();
        }
        Ok(Self { header, params })
    }
}
