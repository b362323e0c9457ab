use std::marker::PhantomData;

use mcprims_cmd::ops::lifecycle::{Close, Destroy, Reset};
use mcprims_cmd::ops::ApiVersion;
use mcprims_cmd::{Request, Scheme};
use mcprims_transport::McTransport;
use tracing::{debug, info, warn};

use crate::connection::McConnection;
use crate::error::{ContractViolation, Result};
use crate::object::{Described, ObjectAttributes, ObjectKind};
use crate::token::Token;

/// An open session on one MC object.
///
/// Holding a session means holding a token the MC has issued. The token is
/// released exactly once: by [`close`](Self::close), by a successful
/// [`destroy`](Self::destroy), or when the session is dropped. A close that
/// fails on drop is logged.
pub struct ObjectSession<'c, K: ObjectKind, T: McTransport> {
    conn: &'c McConnection<T>,
    id: u32,
    token: Token,
    open: bool,
    kind: PhantomData<K>,
}

impl<'c, K: ObjectKind, T: McTransport> ObjectSession<'c, K, T> {
    pub(crate) fn new(conn: &'c McConnection<T>, id: u32, token: Token) -> Self {
        Self {
            conn,
            id,
            token,
            open: true,
            kind: PhantomData,
        }
    }

    pub(crate) fn set_id(&mut self, id: u32) {
        self.id = id;
    }

    /// Object id.
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn token(&self) -> Token {
        self.token
    }

    pub fn connection(&self) -> &'c McConnection<T> {
        self.conn
    }

    /// Send a request on this session's token.
    pub(crate) fn execute<R: Request>(&self, request: &R) -> Result<R::Response> {
        self.conn.execute(K::TYPE, self.token.get(), request)
    }

    /// Release the token.
    pub fn close(mut self) -> Result<()> {
        self.open = false;
        self.execute(&Close)?;
        debug!(object = %K::TYPE, id = self.id, token = %self.token, "session closed");
        Ok(())
    }

    /// Close the session, folding the close outcome into `result`.
    ///
    /// The first error wins: a failing close after a failed `result` is
    /// logged, not returned.
    pub fn finish<R>(self, result: Result<R>) -> Result<R> {
        let object = K::TYPE;
        let id = self.id;
        match (result, self.close()) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(err)) | (Err(err), Ok(())) => Err(err),
            (Err(err), Err(close_err)) => {
                warn!(%object, id, error = %close_err, "close failed after earlier error");
                Err(err)
            }
        }
    }

    /// Return the object to its initial state.
    pub fn reset(&self) -> Result<()> {
        self.execute(&Reset)
    }

    /// Destroy the object through its own token (legacy command set).
    ///
    /// On success the token dies with the object. On failure the session
    /// is closed and the destroy error returned.
    pub fn destroy(mut self) -> Result<()> {
        let scheme = self.conn.scheme();
        if scheme != Scheme::Legacy {
            let err = ContractViolation::SchemeMismatch {
                operation: "destroy by token",
                scheme,
            };
            return self.finish(Err(err.into()));
        }
        match self.execute(&Destroy) {
            Ok(()) => {
                self.open = false;
                info!(object = %K::TYPE, id = self.id, "object destroyed");
                Ok(())
            }
            Err(err) => self.finish(Err(err)),
        }
    }
}

impl<K: Described, T: McTransport> ObjectSession<'_, K, T> {
    pub fn get_attributes(&self) -> Result<K::Attributes> {
        self.execute(&K::GET_ATTRIBUTES)
    }

    /// API version of this object.
    ///
    /// The legacy command set reports it in the attributes; the container
    /// set has a dedicated query.
    pub fn api_version(&self) -> Result<ApiVersion> {
        match self.conn.scheme() {
            Scheme::Container => self.conn.api_version::<K>(),
            Scheme::Legacy => Ok(self
                .get_attributes()?
                .version()
                .unwrap_or(ApiVersion { major: 0, minor: 0 })),
        }
    }
}

impl<K: ObjectKind, T: McTransport> Drop for ObjectSession<'_, K, T> {
    fn drop(&mut self) {
        if !self.open {
            return;
        }
        self.open = false;
        if let Err(err) = self.execute(&Close) {
            warn!(
                object = %K::TYPE,
                id = self.id,
                token = %self.token,
                error = %err,
                "failed to close session"
            );
        }
    }
}

impl<K: ObjectKind, T: McTransport> std::fmt::Debug for ObjectSession<'_, K, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectSession")
            .field("object", &K::TYPE)
            .field("id", &self.id)
            .field("token", &self.token)
            .finish()
    }
}
