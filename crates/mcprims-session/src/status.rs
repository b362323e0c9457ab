//! Status translation: turn a raw exchange outcome into a typed result.

use mcprims_cmd::{decode, McCommand, ObjectType, Request};
use mcprims_transport::TransportError;

use crate::error::{McError, Result};

/// Translate the outcome of sending `R` to `object` as command `cmd_id`.
///
/// A transport failure stays a transport failure. A well-formed response
/// with a non-zero status becomes [`McError::Firmware`]. Only a response
/// with status `Ok` yields the decoded value.
pub fn translate<R: Request>(
    object: ObjectType,
    cmd_id: u16,
    outcome: std::result::Result<McCommand, TransportError>,
) -> Result<R::Response> {
    let response = outcome?;
    let (status, value) = decode::<R>(&response, cmd_id)?;
    if status.is_ok() {
        Ok(value)
    } else {
        Err(McError::Firmware {
            object,
            opcode: R::OPCODE,
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use mcprims_cmd::ops::irq::GetIrqMask;
    use mcprims_cmd::{encode, McStatus, Opcode};

    use super::*;
    use crate::error::ErrorClass;

    const CMD_ID: u16 = 0x0151;

    fn response(status: McStatus, mask: u64) -> McCommand {
        let mut cmd = encode(CMD_ID, 7, &GetIrqMask { index: 0 });
        cmd.set_status(status);
        cmd.params.0[0] = mask;
        cmd
    }

    #[test]
    fn ok_yields_value() {
        let outcome = Ok(response(McStatus::Ok, 0xf0));
        let mask = translate::<GetIrqMask>(ObjectType::Dpci, CMD_ID, outcome).unwrap();
        assert_eq!(mask, 0xf0);
    }

    #[test]
    fn nonzero_status_is_firmware_error() {
        let err = translate::<GetIrqMask>(
            ObjectType::Dpci,
            CMD_ID,
            Ok(response(McStatus::AuthError, 0)),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            McError::Firmware {
                object: ObjectType::Dpci,
                opcode: Opcode::GetIrqMask,
                status: McStatus::AuthError,
            }
        ));
    }

    #[test]
    fn unknown_status_is_preserved() {
        let err = translate::<GetIrqMask>(
            ObjectType::Dpci,
            CMD_ID,
            Ok(response(McStatus::from_code(0x2), 0)),
        )
        .unwrap_err();
        assert_eq!(err.status(), Some(McStatus::Unknown(0x2)));
    }

    #[test]
    fn transport_failure_is_not_a_status() {
        let err = translate::<GetIrqMask>(
            ObjectType::Dpci,
            CMD_ID,
            Err(TransportError::Unavailable("closed".into())),
        )
        .unwrap_err();
        assert_eq!(err.class(), ErrorClass::TransportFailure);
        assert_eq!(err.status(), None);
    }

    #[test]
    fn foreign_response_is_rejected() {
        let err =
            translate::<GetIrqMask>(ObjectType::Dpci, 0x0161, Ok(response(McStatus::Ok, 0)))
                .unwrap_err();
        assert!(matches!(err, McError::Codec(_)));
    }
}
