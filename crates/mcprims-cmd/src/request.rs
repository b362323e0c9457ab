use crate::command::{McCommand, Params};
use crate::error::{CodecError, ParamError, Result};
use crate::header::{CmdHeader, Priority};
use crate::object::Opcode;
use crate::status::McStatus;

/// Per-opcode descriptor: how a request lays out its parameters and how
/// the matching response is read back.
///
/// Implementations only describe the layout. Building, sending and checking
/// a command is shared by every request through [`encode`] and [`decode`].
pub trait Request {
    /// Logical operation this request performs.
    const OPCODE: Opcode;
    /// Header priority.
    const PRIORITY: Priority = Priority::Low;

    /// Typed response value.
    type Response;

    /// Reject parameters the command cannot carry.
    ///
    /// Called before [`encode`]; encoding itself never fails.
    fn validate(&self) -> std::result::Result<(), ParamError> {
        Ok(())
    }

    /// Write parameters into a zeroed parameter region.
    fn encode_params(&self, _params: &mut Params) {}

    /// Read the response value from a returned buffer.
    fn decode_response(response: &McCommand) -> Self::Response;
}

/// Build a command buffer for `request`.
pub fn encode<R: Request>(cmd_id: u16, token: u16, request: &R) -> McCommand {
    let mut cmd = McCommand::new(CmdHeader::new(cmd_id, R::PRIORITY, token));
    request.encode_params(&mut cmd.params);
    cmd
}

/// Read the status and typed response from a returned buffer.
///
/// The status is handed back uninterpreted. The response value is only
/// meaningful when the status is [`McStatus::Ok`].
pub fn decode<R: Request>(
    response: &McCommand,
    expected_cmd_id: u16,
) -> Result<(McStatus, R::Response)> {
    let header = response.header();
    if header.cmd_id != expected_cmd_id {
        return Err(CodecError::UnexpectedCommand {
            expected: expected_cmd_id,
            actual: header.cmd_id,
        });
    }
    Ok((response.status(), R::decode_response(response)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Field;

    const VALUE: Field = Field::new("value", 0, 0, 32);

    struct Echo(u32);

    impl Request for Echo {
        const OPCODE: Opcode = Opcode::GetState;
        type Response = u32;

        fn encode_params(&self, params: &mut Params) {
            params.set(VALUE, u64::from(self.0));
        }

        fn decode_response(response: &McCommand) -> u32 {
            response.params.get(VALUE) as u32
        }
    }

    #[test]
    fn encode_fills_header_and_params() {
        let cmd = encode(0x2831, 9, &Echo(77));
        let header = cmd.header();
        assert_eq!(header.cmd_id, 0x2831);
        assert_eq!(header.token, 9);
        assert_eq!(header.priority, Priority::Low);
        assert_eq!(cmd.params.word(0), 77);
        assert!(cmd.params.0[1..].iter().all(|w| *w == 0));
    }

    #[test]
    fn decode_returns_raw_status() {
        let mut cmd = encode(0x2831, 9, &Echo(5));
        cmd.set_status(McStatus::InvalidState);
        let (status, value) = decode::<Echo>(&cmd, 0x2831).unwrap();
        assert_eq!(status, McStatus::InvalidState);
        assert_eq!(value, 5);
    }

    #[test]
    fn decode_rejects_foreign_response() {
        let cmd = encode(0x2831, 9, &Echo(5));
        let err = decode::<Echo>(&cmd, 0x8001).unwrap_err();
        assert!(matches!(err, CodecError::UnexpectedCommand { .. }));
    }
}
