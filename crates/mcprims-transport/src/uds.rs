use std::io::{ErrorKind, Read, Write};
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};
use std::time::Duration;

use bytes::BytesMut;
use mcprims_cmd::{McCommand, COMMAND_SIZE};
use tracing::debug;

use crate::error::{Result, TransportError};
use crate::traits::McTransport;

/// Mailbox bridge over a Unix domain socket.
///
/// Each command is written as its 64-byte little-endian image and answered
/// by exactly one 64-byte response image. Used to reach MC emulators and
/// portals forwarded from another partition.
pub struct MailboxSocket {
    stream: UnixStream,
    path: Option<PathBuf>,
    buf: BytesMut,
}

impl MailboxSocket {
    /// Maximum socket path length.
    /// Unix `sockaddr_un.sun_path` is typically 108 bytes on Linux, 104 on macOS.
    #[cfg(target_os = "linux")]
    const MAX_PATH_LEN: usize = 108;
    #[cfg(not(target_os = "linux"))]
    const MAX_PATH_LEN: usize = 104;

    /// Connect to a mailbox bridge listening at `path` (blocking).
    pub fn connect(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let path_bytes = path.as_os_str().len();
        if path_bytes >= Self::MAX_PATH_LEN {
            return Err(TransportError::PathTooLong {
                path,
                len: path_bytes,
                max: Self::MAX_PATH_LEN,
            });
        }

        let stream = UnixStream::connect(&path).map_err(|source| TransportError::Connect {
            path: path.clone(),
            source,
        })?;
        debug!(?path, "connected to mailbox bridge");

        Ok(Self {
            stream,
            path: Some(path),
            buf: BytesMut::with_capacity(COMMAND_SIZE),
        })
    }

    /// Wrap an already connected stream.
    pub fn from_stream(stream: UnixStream) -> Self {
        Self {
            stream,
            path: None,
            buf: BytesMut::with_capacity(COMMAND_SIZE),
        }
    }

    /// Bound each blocking read and write on the socket.
    pub fn set_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        self.stream.set_read_timeout(timeout)?;
        self.stream.set_write_timeout(timeout)?;
        Ok(())
    }

    /// The socket path, when connected by path.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn read_response(&mut self) -> Result<McCommand> {
        let mut image = [0u8; COMMAND_SIZE];
        let mut filled = 0usize;
        while filled < COMMAND_SIZE {
            match self.stream.read(&mut image[filled..]) {
                Ok(0) => {
                    return Err(TransportError::ShortTransfer {
                        expected: COMMAND_SIZE,
                        actual: filled,
                    })
                }
                Ok(n) => filled += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(TransportError::Io(err)),
            }
        }
        McCommand::decode_from(&image).map_err(|err| TransportError::Unavailable(err.to_string()))
    }
}

impl McTransport for MailboxSocket {
    fn send(&mut self, command: &McCommand) -> Result<McCommand> {
        self.buf.clear();
        command.encode_to(&mut self.buf);
        self.stream.write_all(&self.buf)?;
        self.stream.flush()?;
        self.read_response()
    }

    fn transport_name(&self) -> &'static str {
        "mailbox-socket"
    }
}

impl std::fmt::Debug for MailboxSocket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailboxSocket")
            .field("path", &self.path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use mcprims_cmd::{CmdHeader, McStatus, Priority};

    use super::*;

    fn read_image(stream: &mut UnixStream) -> McCommand {
        let mut image = [0u8; COMMAND_SIZE];
        stream.read_exact(&mut image).unwrap();
        McCommand::decode_from(&image).unwrap()
    }

    #[test]
    fn test_send_receives_response_image() {
        let (client, mut server) = UnixStream::pair().unwrap();

        let handle = thread::spawn(move || {
            let mut cmd = read_image(&mut server);
            cmd.set_status(McStatus::Ok);
            cmd.params.0[0] = 0x55;
            let mut out = BytesMut::new();
            cmd.encode_to(&mut out);
            server.write_all(&out).unwrap();
        });

        let mut socket = MailboxSocket::from_stream(client);
        let cmd = McCommand::new(CmdHeader::new(0x0041, Priority::Low, 3));
        let response = socket.send(&cmd).unwrap();
        assert_eq!(response.header().token, 3);
        assert_eq!(response.params.word(0), 0x55);

        handle.join().unwrap();
    }

    #[test]
    fn test_short_response_is_a_transport_failure() {
        let (client, mut server) = UnixStream::pair().unwrap();

        let handle = thread::spawn(move || {
            let _ = read_image(&mut server);
            server.write_all(&[0u8; 10]).unwrap();
        });

        let mut socket = MailboxSocket::from_stream(client);
        let cmd = McCommand::new(CmdHeader::new(0x0041, Priority::Low, 3));
        let err = socket.send(&cmd).unwrap_err();
        assert!(matches!(
            err,
            TransportError::ShortTransfer {
                expected: COMMAND_SIZE,
                actual: 10
            }
        ));

        handle.join().unwrap();
    }

    #[test]
    fn test_path_too_long() {
        let long_path = "/tmp/".to_string() + &"a".repeat(200) + ".sock";
        let result = MailboxSocket::connect(&long_path);
        assert!(matches!(result, Err(TransportError::PathTooLong { .. })));
    }

    #[test]
    fn test_connect_missing_socket() {
        let path =
            std::env::temp_dir().join(format!("mcprims-missing-{}.sock", std::process::id()));
        let result = MailboxSocket::connect(&path);
        assert!(matches!(result, Err(TransportError::Connect { .. })));
    }
}
