use std::fmt;
use std::io::Write;
use std::panic::Location;
use std::path::Path;

use crate::config::Flags;

/// Formats a single line, writing into `buf`.
///
/// The layout is: prefix, date, time, file and line, prefix (if
/// [`Flags::MSG_PREFIX`] is set) and finally the message. A newline is added if
/// the message doesn't end with one.
#[inline(always)]
pub(crate) fn line(
    buf: &mut Vec<u8>,
    prefix: &str,
    flags: Flags,
    location: &Location<'_>,
    msg: fmt::Arguments<'_>,
) {
    if !flags.contains(Flags::MSG_PREFIX) {
        buf.extend_from_slice(prefix.as_bytes());
    }

    #[cfg(feature = "timestamp")]
    format_timestamp(buf, flags);

    if flags.intersects(Flags::SHORT_FILE | Flags::LONG_FILE) {
        let file = if flags.contains(Flags::SHORT_FILE) {
            short_file(location.file())
        } else {
            location.file()
        };
        write!(buf, "{}:{}: ", file, location.line()).unwrap_or_else(|_| unreachable!());
    }

    if flags.contains(Flags::MSG_PREFIX) {
        buf.extend_from_slice(prefix.as_bytes());
    }

    buf.write_fmt(msg).unwrap_or_else(|_| unreachable!());
    if buf.last() != Some(&b'\n') {
        buf.push(b'\n');
    }
}

/// The message of a request line:
/// `(address) "METHOD REQUEST-URI PROTOCOL" status size elapsed`.
pub(crate) struct RequestLine<'a> {
    pub(crate) addr: &'a str,
    pub(crate) method: &'a str,
    pub(crate) request_uri: &'a str,
    pub(crate) protocol: &'a str,
    pub(crate) status: u16,
    pub(crate) size: usize,
    pub(crate) elapsed: std::time::Duration,
}

impl<'a> fmt::Display for RequestLine<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}) \"{} {} {}\" {} {} {:?}",
            self.addr,
            self.method,
            self.request_uri,
            self.protocol,
            self.status,
            self.size,
            self.elapsed
        )
    }
}

/// Final element of `file`, `file` itself if it has none.
fn short_file(file: &str) -> &str {
    Path::new(file)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(file)
}

/// Format the timestamp according to `flags`: `YYYY/MM/DD hh:mm:ss.SSSSSS `,
/// for example `2020/12/31 11:00:01.743357 `.
#[cfg(feature = "timestamp")]
#[inline(always)]
fn format_timestamp(buf: &mut Vec<u8>, flags: Flags) {
    if !flags.intersects(Flags::DATE | Flags::TIME | Flags::MICROSECONDS) {
        return;
    }

    if flags.contains(Flags::UTC) {
        write_timestamp(buf, flags, &chrono::Utc::now());
    } else {
        write_timestamp(buf, flags, &chrono::Local::now());
    }
}

#[cfg(feature = "timestamp")]
#[inline(always)]
fn write_timestamp<T>(buf: &mut Vec<u8>, flags: Flags, timestamp: &T)
where
    T: chrono::Datelike + chrono::Timelike,
{
    if flags.contains(Flags::DATE) {
        write!(
            buf,
            "{:004}/{:02}/{:02} ",
            timestamp.year(),
            timestamp.month(),
            timestamp.day(),
        )
        .unwrap_or_else(|_| unreachable!());
    }
    if flags.intersects(Flags::TIME | Flags::MICROSECONDS) {
        write!(
            buf,
            "{:02}:{:02}:{:02}",
            timestamp.hour(),
            timestamp.minute(),
            timestamp.second(),
        )
        .unwrap_or_else(|_| unreachable!());
        if flags.contains(Flags::MICROSECONDS) {
            // Leap seconds are reported as nanoseconds above one second.
            let micros = (timestamp.nanosecond() % 1_000_000_000) / 1000;
            write!(buf, ".{:06}", micros).unwrap_or_else(|_| unreachable!());
        }
        buf.push(b' ');
    }
}
