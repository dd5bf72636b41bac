//! Line oriented destination of the request logger.

use std::fmt;
use std::io::{self, Write};
use std::panic::Location;
use std::sync::Mutex;

use log::warn;

use crate::config::Flags;
use crate::format;

/// Writes whole lines to the output, prepending the prefix and the
/// decorations selected by the flags.
///
/// Each line is formatted into a buffer first and written with a single call
/// while holding the lock, so lines from concurrent requests don't
/// interleave.
pub(crate) struct LineSink {
    out: Mutex<Box<dyn Write + Send>>,
    prefix: String,
    flags: Flags,
}

impl LineSink {
    pub(crate) fn new(out: Box<dyn Write + Send>, prefix: String, flags: Flags) -> LineSink {
        LineSink {
            out: Mutex::new(out),
            prefix,
            flags,
        }
    }

    pub(crate) fn prefix(&self) -> &str {
        &self.prefix
    }

    pub(crate) fn flags(&self) -> Flags {
        self.flags
    }

    /// Write a single line, the file and line are those of the caller.
    ///
    /// Failures are logged and otherwise ignored.
    #[track_caller]
    pub(crate) fn output(&self, msg: fmt::Arguments<'_>) {
        let location = Location::caller();
        let mut buf = Vec::with_capacity(128);
        format::line(&mut buf, &self.prefix, self.flags, location, msg);
        if let Err(err) = self.write(&buf) {
            log_failure(err);
        }
    }

    fn write(&self, buf: &[u8]) -> io::Result<()> {
        // A panic while holding the lock can't leave a half written line in
        // our state, so just continue with the poisoned lock.
        let mut out = self.out.lock().unwrap_or_else(|err| err.into_inner());
        out.write_all(buf)?;
        out.flush()
    }
}

impl fmt::Debug for LineSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineSink")
            .field("prefix", &self.prefix)
            .field("flags", &self.flags)
            .finish()
    }
}

/// The function that gets called when we're unable to write a line.
#[inline(never)]
#[cold]
fn log_failure(err: io::Error) {
    warn!("unable to write request log line: {}", err);
}

#[cfg(test)]
mod tests {
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

    use super::LineSink;
    use crate::config::Flags;

    #[derive(Clone, Default)]
    struct Shared(Arc<Mutex<Vec<u8>>>);

    impl Write for Shared {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "broken"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn writes_lines() {
        let out = Shared::default();
        let sink = LineSink::new(Box::new(out.clone()), "p ".to_owned(), Flags::NONE);
        sink.output(format_args!("one"));
        sink.output(format_args!("two {}", 2));
        let got = String::from_utf8(out.0.lock().unwrap().clone()).unwrap();
        assert_eq!(got, "p one\np two 2\n");
    }

    #[test]
    fn caller_location() {
        let out = Shared::default();
        let sink = LineSink::new(Box::new(out.clone()), String::new(), Flags::SHORT_FILE);
        let line = line!() + 1;
        sink.output(format_args!("here"));
        let got = String::from_utf8(out.0.lock().unwrap().clone()).unwrap();
        assert_eq!(got, format!("sink.rs:{line}: here\n"));
    }

    #[test]
    fn write_failure_is_not_fatal() {
        let sink = LineSink::new(Box::new(Broken), String::new(), Flags::NONE);
        sink.output(format_args!("lost"));
    }
}
