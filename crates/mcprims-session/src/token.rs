use std::fmt;
use std::num::NonZeroU16;

use crate::error::ContractViolation;

/// Authentication token naming one open session on an MC object.
///
/// Zero is the "no session" value on the wire and can never be held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token(NonZeroU16);

impl Token {
    /// Accept a raw token, rejecting zero.
    pub fn new(raw: u16) -> Result<Self, ContractViolation> {
        NonZeroU16::new(raw)
            .map(Self)
            .ok_or(ContractViolation::ZeroToken)
    }

    pub fn get(self) -> u16 {
        self.0.get()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06x}", self.get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_rejected() {
        assert_eq!(Token::new(0), Err(ContractViolation::ZeroToken));
    }

    #[test]
    fn raw_value_is_preserved() {
        let token = Token::new(0x1234).unwrap();
        assert_eq!(token.get(), 0x1234);
        assert_eq!(token.to_string(), "0x1234");
    }
}
