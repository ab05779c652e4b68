// src/random/stream.rs
//! Pass-through readers: recorded files, OS entropy devices, unix sockets
//!
//! All of them hand out raw bytes from an external stream. They have no
//! settable state, so `seed` is refused and `advance` does nothing. A read
//! that hits end-of-stream fails instead of returning fewer bytes.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use tracing::debug;

use crate::consts::{DEV_RANDOM_PATH, DEV_URANDOM_PATH, OID_DEV_RANDOM, OID_DEV_URANDOM, OID_FILE};
use crate::error::{CoreError, Result};

use super::RandomBackend;

/// A generator that reads everything from `R`
pub struct StreamBackend<R> {
    name: &'static str,
    reader: Option<R>,
    secure: bool,
}

impl<R: Read + Send> StreamBackend<R> {
    pub fn new(name: &'static str, reader: R, secure: bool) -> Self {
        Self {
            name,
            reader: Some(reader),
            secure,
        }
    }
}

impl<R: Read + Send> RandomBackend for StreamBackend<R> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn advance(&mut self) -> Result<()> {
        Ok(())
    }

    fn seed(&mut self, _seed: &[u8]) -> Result<()> {
        Err(CoreError::UnsupportedOperation {
            backend: self.name,
            operation: "seed",
        })
    }

    fn fill(&mut self, out: &mut [u8]) -> Result<()> {
        let reader = self.reader.as_mut().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotConnected, "random stream already closed")
        })?;
        reader.read_exact(out)?;
        Ok(())
    }

    fn release(&mut self) -> Result<()> {
        // Dropping the reader closes the descriptor
        self.reader = None;
        Ok(())
    }

    fn is_secure(&self) -> bool {
        self.secure
    }
}

fn unavailable(backend: &str, path: &Path, err: io::Error) -> CoreError {
    CoreError::BackendUnavailable {
        backend: backend.to_string(),
        reason: format!("{}: {err}", path.display()),
    }
}

fn open_reader(name: &'static str, path: &Path, secure: bool) -> Result<StreamBackend<File>> {
    let file = File::open(path).map_err(|err| unavailable(name, path, err))?;
    debug!(backend = name, path = %path.display(), "opened random stream");
    Ok(StreamBackend::new(name, file, secure))
}

/// Replay the bytes recorded in `path`
pub fn open_file<P: AsRef<Path>>(path: P) -> Result<StreamBackend<File>> {
    open_reader(OID_FILE, path.as_ref(), false)
}

/// Blocking kernel entropy device
pub fn open_dev_random() -> Result<StreamBackend<File>> {
    open_device(OID_DEV_RANDOM, DEV_RANDOM_PATH)
}

/// Non-blocking kernel entropy device
pub fn open_dev_urandom() -> Result<StreamBackend<File>> {
    open_device(OID_DEV_URANDOM, DEV_URANDOM_PATH)
}

#[cfg(unix)]
fn open_device(name: &'static str, path: &str) -> Result<StreamBackend<File>> {
    open_reader(name, Path::new(path), true)
}

#[cfg(not(unix))]
fn open_device(name: &'static str, _path: &str) -> Result<StreamBackend<File>> {
    Err(CoreError::BackendUnavailable {
        backend: name.to_string(),
        reason: "entropy devices exist only on unix hosts".to_string(),
    })
}

#[cfg(unix)]
pub(crate) fn device_present(path: &str) -> bool {
    Path::new(path).exists()
}

#[cfg(not(unix))]
pub(crate) fn device_present(_path: &str) -> bool {
    false
}

/// Stream random bytes from a unix domain socket
#[cfg(unix)]
pub fn connect_unix_socket<P: AsRef<Path>>(
    path: P,
) -> Result<StreamBackend<std::os::unix::net::UnixStream>> {
    use crate::consts::OID_UNIX_SOCKET;
    use std::os::unix::net::UnixStream;

    let path = path.as_ref();
    let stream =
        UnixStream::connect(path).map_err(|err| unavailable(OID_UNIX_SOCKET, path, err))?;
    debug!(path = %path.display(), "connected random socket");
    Ok(StreamBackend::new(OID_UNIX_SOCKET, stream, false))
}

#[cfg(not(unix))]
pub fn connect_unix_socket<P: AsRef<Path>>(_path: P) -> Result<StreamBackend<File>> {
    Err(CoreError::BackendUnavailable {
        backend: crate::consts::OID_UNIX_SOCKET.to_string(),
        reason: "unix domain sockets are not available on this platform".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn short_stream_fails_instead_of_short_read() {
        let mut backend = StreamBackend::new(OID_FILE, Cursor::new(vec![1u8, 2, 3]), false);
        let mut out = [0u8; 2];
        backend.fill(&mut out).unwrap();
        assert_eq!(out, [1, 2]);

        let err = backend.fill(&mut out).unwrap_err();
        assert!(matches!(err, CoreError::Io(ref e) if e.kind() == io::ErrorKind::UnexpectedEof));
    }

    #[test]
    fn released_stream_refuses_reads() {
        let mut backend = StreamBackend::new(OID_FILE, Cursor::new(vec![0u8; 8]), false);
        backend.release().unwrap();
        assert!(matches!(backend.fill(&mut [0u8; 1]), Err(CoreError::Io(_))));
    }
}
