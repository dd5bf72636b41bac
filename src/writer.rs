//! Response writers and the observer that records what's written to them.

use std::fmt;
use std::io::{self, Read, Write};

/// The status code assumed when a handler never sets one.
pub const DEFAULT_STATUS: u16 = 200;

/// The response half of an HTTP exchange as seen by a handler.
///
/// Only setting the status and writing the body are required, flushing and
/// taking over the connection are optional capabilities which a writer
/// advertises by overriding [`ResponseWriter::as_flush`] and
/// [`ResponseWriter::as_hijack`].
pub trait ResponseWriter {
    /// Set the status code of the response.
    fn set_status(&mut self, status: u16);

    /// Write (part of) the response body, returning the number of bytes
    /// accepted.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize>;

    /// Returns the flush capability, if supported.
    fn as_flush(&mut self) -> Option<&mut dyn Flush> {
        None
    }

    /// Returns the connection takeover capability, if supported.
    fn as_hijack(&mut self) -> Option<&mut dyn Hijack> {
        None
    }
}

/// Writers that can send buffered data to the client.
pub trait Flush {
    /// Flush any buffered data to the client.
    fn flush(&mut self);
}

/// Writers that can hand over the underlying connection.
pub trait Hijack {
    /// Take over the connection, after this the HTTP server no longer
    /// touches it.
    fn hijack(&mut self) -> Result<Box<dyn Connection>, HijackError>;
}

/// A raw, bidirectional connection returned by [`Hijack::hijack`].
pub trait Connection: Read + Write + Send {}

impl<T> Connection for T where T: Read + Write + Send {}

/// Error returned by [`Hijack::hijack`].
#[derive(Debug, thiserror::Error)]
pub enum HijackError {
    /// The wrapped writer doesn't support taking over the connection.
    #[error("underlying response writer does not support hijacking")]
    Unsupported,
    /// The writer failed to hand over the connection.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Wraps a [`ResponseWriter`] recording the status code and number of bytes
/// written, without changing anything that is sent to the client.
pub struct ResponseObserver<'w> {
    inner: &'w mut dyn ResponseWriter,
    status: u16,
    written: usize,
    /// Set once the status line would have been sent.
    committed: bool,
}

impl<'w> ResponseObserver<'w> {
    /// Create a new observer, the status starts at [`DEFAULT_STATUS`].
    pub fn new(inner: &'w mut dyn ResponseWriter) -> ResponseObserver<'w> {
        ResponseObserver {
            inner,
            status: DEFAULT_STATUS,
            written: 0,
            committed: false,
        }
    }

    /// Status code as set by the handler, or [`DEFAULT_STATUS`].
    ///
    /// Servers send the status line only once, either when the status is set
    /// or on the first write. Like the client, this only sees the first status
    /// set before any write, later calls are still passed to the wrapped
    /// writer.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Total number of bytes accepted by the wrapped writer.
    pub fn bytes_written(&self) -> usize {
        self.written
    }
}

impl<'w> ResponseWriter for ResponseObserver<'w> {
    fn set_status(&mut self, status: u16) {
        if !self.committed {
            self.status = status;
            self.committed = true;
        }
        self.inner.set_status(status);
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.committed = true;
        let n = self.inner.write(buf)?;
        self.written += n;
        Ok(n)
    }

    fn as_flush(&mut self) -> Option<&mut dyn Flush> {
        Some(self)
    }

    fn as_hijack(&mut self) -> Option<&mut dyn Hijack> {
        Some(self)
    }
}

impl<'w> Flush for ResponseObserver<'w> {
    fn flush(&mut self) {
        if let Some(flusher) = self.inner.as_flush() {
            flusher.flush();
        }
    }
}

impl<'w> Hijack for ResponseObserver<'w> {
    fn hijack(&mut self) -> Result<Box<dyn Connection>, HijackError> {
        match self.inner.as_hijack() {
            Some(hijacker) => hijacker.hijack(),
            None => Err(HijackError::Unsupported),
        }
    }
}

impl<'w> fmt::Debug for ResponseObserver<'w> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseObserver")
            .field("status", &self.status)
            .field("written", &self.written)
            .field("committed", &self.committed)
            .finish()
    }
}
