//! Version adaptation.
//!
//! Firmware 8.x and 9.x speak the legacy command set: create opens the new
//! object and hands back its token, destroy is sent on the object's own
//! token. Firmware 10.x speaks the container-addressed set: create and
//! destroy travel on the parent container's token and name objects by id,
//! and every command id carries a command version. Callers see one
//! lifecycle API; the two encodings live here.

use std::ops::RangeInclusive;

use mcprims_cmd::ops::dpmng::{FirmwareVersion, GetFirmwareVersion};
use mcprims_cmd::{encode, ObjectType, Scheme, TOKEN_NONE, VERSION_PROBE_ID};
use mcprims_transport::McTransport;
use tracing::debug;

use crate::error::{McError, Result};
use crate::status::translate;

/// Firmware majors served by the legacy command set.
pub const LEGACY_MAJORS: RangeInclusive<u32> = 8..=9;
/// First firmware major served by the container-addressed command set.
pub const CONTAINER_MIN_MAJOR: u32 = 10;

/// Command set matching `version`.
pub fn scheme_for(version: FirmwareVersion) -> Result<Scheme> {
    if version.major >= CONTAINER_MIN_MAJOR {
        Ok(Scheme::Container)
    } else if LEGACY_MAJORS.contains(&version.major) {
        Ok(Scheme::Legacy)
    } else {
        Err(McError::UnsupportedFirmware(version))
    }
}

/// Ask the MC for its firmware version.
///
/// The probe id is the same in both command sets, so this works before a
/// scheme is chosen.
pub(crate) fn probe<T: McTransport + ?Sized>(transport: &mut T) -> Result<FirmwareVersion> {
    let command = encode(VERSION_PROBE_ID, TOKEN_NONE, &GetFirmwareVersion);
    let outcome = transport.send(&command);
    let version = translate::<GetFirmwareVersion>(ObjectType::Dpmng, VERSION_PROBE_ID, outcome)?;
    debug!(%version, "mc firmware version");
    Ok(version)
}

pub(crate) mod legacy {
    use mcprims_cmd::ops::lifecycle::CreateOpened;
    use mcprims_cmd::{Opcode, TOKEN_NONE};
    use mcprims_transport::McTransport;

    use crate::connection::McConnection;
    use crate::error::{McError, Result};
    use crate::object::{Creatable, Described, ObjectAttributes};
    use crate::session::ObjectSession;
    use crate::token::Token;

    /// Create, learn the new id from the attributes, then release the
    /// token the MC opened for us.
    pub fn create<K, T>(conn: &McConnection<T>, config: &K::Config) -> Result<u32>
    where
        K: Creatable + Described,
        T: McTransport,
    {
        let raw = conn.execute(K::TYPE, TOKEN_NONE, &CreateOpened(config))?;
        let token = Token::new(raw).map_err(|_| McError::InvalidHandle {
            object: K::TYPE,
            opcode: Opcode::Create,
        })?;
        let mut session = ObjectSession::<K, T>::new(conn, 0, token);
        let id = session.get_attributes().map(|attrs| attrs.id());
        if let Ok(id) = id {
            session.set_id(id);
        }
        session.finish(id)
    }

    pub fn destroy<K, T>(conn: &McConnection<T>, id: u32) -> Result<()>
    where
        K: Creatable,
        T: McTransport,
    {
        conn.open::<K>(id)?.destroy()
    }
}

pub(crate) mod container {
    use mcprims_cmd::ops::lifecycle::{CreateInContainer, DestroyById};
    use mcprims_transport::McTransport;

    use crate::connection::McConnection;
    use crate::error::Result;
    use crate::object::Creatable;
    use crate::token::Token;

    pub fn create<K, T>(conn: &McConnection<T>, parent: Token, config: &K::Config) -> Result<u32>
    where
        K: Creatable,
        T: McTransport,
    {
        conn.execute(K::TYPE, parent.get(), &CreateInContainer(config))
    }

    pub fn destroy<K, T>(conn: &McConnection<T>, parent: Token, id: u32) -> Result<()>
    where
        K: Creatable,
        T: McTransport,
    {
        conn.execute(K::TYPE, parent.get(), &DestroyById { id })
    }
}
