use std::sync::{Mutex, MutexGuard};

use mcprims_cmd::ops::dpmng::FirmwareVersion;
use mcprims_cmd::ops::dprc::GetContainerId;
use mcprims_cmd::ops::lifecycle::{GetApiVersion, Open};
use mcprims_cmd::ops::ApiVersion;
use mcprims_cmd::{encode, McStatus, ObjectType, Opcode, Request, Scheme, TOKEN_NONE};
use mcprims_transport::{McTransport, TransportError};
use tracing::{debug, info, trace};

use crate::adapter::{self, container, legacy};
use crate::config::{ConnectionConfig, SchemeSelection};
use crate::dprc::Dprc;
use crate::error::{ContractViolation, McError, Result};
use crate::object::{Creatable, Described, ObjectKind};
use crate::session::ObjectSession;
use crate::status::translate;
use crate::token::Token;

/// A channel to the MC with its command set fixed.
///
/// The command set is chosen once, when the connection is made, and used
/// for every command afterwards. Commands are serialized: one exchange is
/// in flight at a time, so a connection may be shared across threads.
pub struct McConnection<T> {
    transport: Mutex<T>,
    scheme: Scheme,
    firmware: Option<FirmwareVersion>,
}

impl<T: McTransport> McConnection<T> {
    /// Connect, detecting the command set from the firmware version.
    pub fn connect(transport: T) -> Result<Self> {
        Self::with_config(transport, &ConnectionConfig::default())
    }

    /// Connect with explicit configuration.
    pub fn with_config(mut transport: T, config: &ConnectionConfig) -> Result<Self> {
        let (scheme, firmware) = match config.scheme {
            SchemeSelection::Detect => {
                let version = adapter::probe(&mut transport)?;
                (adapter::scheme_for(version)?, Some(version))
            }
            SchemeSelection::Force(scheme) => (scheme, None),
        };
        info!(
            transport = transport.transport_name(),
            %scheme,
            "mc connection ready"
        );
        Ok(Self {
            transport: Mutex::new(transport),
            scheme,
            firmware,
        })
    }

    /// The command set in use.
    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Firmware version seen at connect time. `None` when the command set
    /// was forced.
    pub fn firmware_version(&self) -> Option<FirmwareVersion> {
        self.firmware
    }

    /// Ask the MC for its firmware version now.
    pub fn query_firmware_version(&self) -> Result<FirmwareVersion> {
        let mut transport = self.lock()?;
        adapter::probe(&mut *transport)
    }

    /// Give the transport back.
    pub fn into_inner(self) -> T {
        self.transport
            .into_inner()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn lock(&self) -> Result<MutexGuard<'_, T>> {
        self.transport
            .lock()
            .map_err(|_| TransportError::Unavailable("transport lock poisoned".into()).into())
    }

    /// Validate, encode, send and translate one command.
    ///
    /// Parameter validation and the command-id lookup happen before
    /// anything is sent.
    pub(crate) fn execute<R: Request>(
        &self,
        object: ObjectType,
        token: u16,
        request: &R,
    ) -> Result<R::Response> {
        request.validate()?;
        let cmd_id = self
            .scheme
            .cmd_id(object, R::OPCODE)
            .ok_or(ContractViolation::Unsupported {
                object,
                opcode: R::OPCODE,
                scheme: self.scheme,
            })?;

        let command = encode(cmd_id, token, request);
        trace!(%object, opcode = %R::OPCODE, cmd_id, token, "sending command");
        let outcome = {
            let mut transport = self.lock()?;
            transport.send(&command)
        };

        let result = translate::<R>(object, cmd_id, outcome);
        if let Err(err) = &result {
            debug!(%object, opcode = %R::OPCODE, token, error = %err, "command failed");
        }
        result
    }

    /// Open a session on object `id`.
    ///
    /// An id the MC does not know yields [`McError::NotFound`]; a success
    /// that carries token 0 yields [`McError::InvalidHandle`].
    pub fn open<K: ObjectKind>(&self, id: u32) -> Result<ObjectSession<'_, K, T>> {
        let raw = self
            .execute(K::TYPE, TOKEN_NONE, &Open { id })
            .map_err(|err| match err {
                McError::Firmware {
                    object,
                    status: McStatus::ConfigError,
                    ..
                } => McError::NotFound {
                    object,
                    id,
                    status: McStatus::ConfigError,
                },
                other => other,
            })?;
        let token = Token::new(raw).map_err(|_| McError::InvalidHandle {
            object: K::TYPE,
            opcode: Opcode::Open,
        })?;
        debug!(object = %K::TYPE, id, %token, "session opened");
        Ok(ObjectSession::new(self, id, token))
    }

    /// Take ownership of a token obtained elsewhere. The session closes it
    /// like any other.
    pub fn adopt<K: ObjectKind>(
        &self,
        id: u32,
        raw_token: u16,
    ) -> Result<ObjectSession<'_, K, T>> {
        let token = Token::new(raw_token)?;
        Ok(ObjectSession::new(self, id, token))
    }

    /// Open object `id`, run `f` on the session and close it.
    ///
    /// The session is closed on every path. When `f` fails its error is
    /// returned and a failing close is only logged; otherwise a failing
    /// close is returned.
    pub fn with_session<K, R>(
        &self,
        id: u32,
        f: impl FnOnce(&ObjectSession<'_, K, T>) -> Result<R>,
    ) -> Result<R>
    where
        K: ObjectKind,
    {
        let session = self.open::<K>(id)?;
        let result = f(&session);
        session.finish(result)
    }

    /// Id of the container this connection's portal belongs to.
    pub fn container_id(&self) -> Result<u32> {
        self.execute(ObjectType::Dprc, TOKEN_NONE, &GetContainerId)
    }

    /// Open the container this connection's portal belongs to.
    pub fn open_root_container(&self) -> Result<ObjectSession<'_, Dprc, T>> {
        let id = self.container_id()?;
        self.open::<Dprc>(id)
    }

    /// API version of object type `K` (container command set only; the
    /// legacy set reports it in the attributes instead).
    pub fn api_version<K: ObjectKind>(&self) -> Result<ApiVersion> {
        if self.scheme != Scheme::Container {
            return Err(ContractViolation::SchemeMismatch {
                operation: "get_api_version",
                scheme: self.scheme,
            }
            .into());
        }
        self.execute(K::TYPE, TOKEN_NONE, &GetApiVersion)
    }

    /// Create an object and return its id.
    ///
    /// The container command set needs `parent`, an open session on the
    /// container that will own the object. The legacy set ignores it.
    pub fn create<K>(
        &self,
        parent: Option<&ObjectSession<'_, Dprc, T>>,
        config: &K::Config,
    ) -> Result<u32>
    where
        K: Creatable + Described,
    {
        let id = match self.scheme {
            Scheme::Legacy => legacy::create::<K, T>(self, config)?,
            Scheme::Container => {
                let parent = require_parent(parent, K::TYPE, Opcode::Create)?;
                container::create::<K, T>(self, parent, config)?
            }
        };
        info!(object = %K::TYPE, id, scheme = %self.scheme, "object created");
        Ok(id)
    }

    /// Destroy object `id`. `parent` is as for [`create`](Self::create).
    pub fn destroy<K: Creatable>(
        &self,
        parent: Option<&ObjectSession<'_, Dprc, T>>,
        id: u32,
    ) -> Result<()> {
        match self.scheme {
            Scheme::Legacy => legacy::destroy::<K, T>(self, id)?,
            Scheme::Container => {
                let parent = require_parent(parent, K::TYPE, Opcode::Destroy)?;
                container::destroy::<K, T>(self, parent, id)?
            }
        }
        info!(object = %K::TYPE, id, scheme = %self.scheme, "object destroyed");
        Ok(())
    }
}

fn require_parent<T: McTransport>(
    parent: Option<&ObjectSession<'_, Dprc, T>>,
    object: ObjectType,
    opcode: Opcode,
) -> Result<Token> {
    parent
        .map(ObjectSession::token)
        .ok_or_else(|| ContractViolation::MissingContainer { object, opcode }.into())
}

impl<T> std::fmt::Debug for McConnection<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("McConnection")
            .field("scheme", &self.scheme)
            .field("firmware", &self.firmware)
            .finish_non_exhaustive()
    }
}
