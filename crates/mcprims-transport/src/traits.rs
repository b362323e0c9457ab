use std::sync::{Arc, Mutex};

use mcprims_cmd::McCommand;

use crate::error::{Result, TransportError};

/// A blocking request/response channel to the MC.
///
/// `send` delivers one command and returns the MC's response buffer. Each
/// call completes before the next starts; there is no pipelining and no
/// out-of-order completion.
pub trait McTransport {
    /// Deliver `command` and wait for its response.
    fn send(&mut self, command: &McCommand) -> Result<McCommand>;

    /// Transport name for diagnostics.
    fn transport_name(&self) -> &'static str;
}

impl<T: McTransport + ?Sized> McTransport for &mut T {
    fn send(&mut self, command: &McCommand) -> Result<McCommand> {
        (**self).send(command)
    }

    fn transport_name(&self) -> &'static str {
        (**self).transport_name()
    }
}

impl<T: McTransport + ?Sized> McTransport for Box<T> {
    fn send(&mut self, command: &McCommand) -> Result<McCommand> {
        (**self).send(command)
    }

    fn transport_name(&self) -> &'static str {
        (**self).transport_name()
    }
}

/// A transport shared by several owners, one command in flight at a time.
///
/// Clones refer to the same underlying channel. Every `send` holds the lock
/// for the full request/response exchange.
pub struct SharedPortal<T> {
    inner: Arc<Mutex<T>>,
}

impl<T> Clone for SharedPortal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: McTransport> SharedPortal<T> {
    pub fn new(transport: T) -> Self {
        Self {
            inner: Arc::new(Mutex::new(transport)),
        }
    }

    /// Run `f` with exclusive access to the underlying transport.
    pub fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> Result<R> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| TransportError::Unavailable("portal lock poisoned".to_string()))?;
        Ok(f(&mut guard))
    }
}

impl<T: McTransport> McTransport for SharedPortal<T> {
    fn send(&mut self, command: &McCommand) -> Result<McCommand> {
        self.with(|transport| transport.send(command))?
    }

    fn transport_name(&self) -> &'static str {
        "shared-portal"
    }
}

impl<T> std::fmt::Debug for SharedPortal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedPortal")
            .field("owners", &Arc::strong_count(&self.inner))
            .finish()
    }
}
