//! Configuration of the request logger.

use std::env;
use std::fmt;
use std::io::Write;
use std::ops::BitOr;

/// Options used to create a [`RequestLogger`].
///
/// [`RequestLogger`]: crate::RequestLogger
#[derive(Default)]
pub struct Options {
    /// Written in front of every line. Unless `disable_auto_brackets` is set
    /// a non-empty prefix is wrapped in square brackets, e.g. `[my_app] `.
    pub prefix: String,
    /// Use `prefix` as is.
    pub disable_auto_brackets: bool,
    /// Headers to take the client address from, e.g. `X-Forwarded-For` when
    /// running behind a proxy. The first header with a non-empty value is
    /// used, if none is found the remote address of the connection is used.
    pub remote_address_headers: Vec<String>,
    /// Destination of the lines, defaults to standard out.
    pub out: Option<Box<dyn Write + Send>>,
    /// What to write in front of each line, see [`OutputFlags`].
    pub output_flags: OutputFlags,
    /// Request targets that are not logged. Exact match only, compared to
    /// the raw target including the query.
    pub ignored_request_uris: Vec<String>,
}

impl Options {
    /// Options based on the environment.
    ///
    /// * `REQUEST_LOG_PREFIX`: `prefix`.
    /// * `REQUEST_LOG_NO_BRACKETS`: if set, `disable_auto_brackets`.
    /// * `REQUEST_LOG_ADDRESS_HEADERS`: comma separated
    ///   `remote_address_headers`.
    /// * `REQUEST_LOG_IGNORE`: comma separated `ignored_request_uris`.
    /// * `REQUEST_LOG_FLAGS`: `output_flags`, see [`OutputFlags::from`].
    ///
    /// Empty variables are ignored.
    pub fn from_env() -> Options {
        Options {
            prefix: get_env("REQUEST_LOG_PREFIX").unwrap_or_default(),
            disable_auto_brackets: get_env("REQUEST_LOG_NO_BRACKETS").is_some(),
            remote_address_headers: get_env_list("REQUEST_LOG_ADDRESS_HEADERS"),
            out: None,
            output_flags: get_env("REQUEST_LOG_FLAGS")
                .and_then(|flags| flags.trim().parse::<i32>().ok())
                .map(OutputFlags::from)
                .unwrap_or_default(),
            ignored_request_uris: get_env_list("REQUEST_LOG_IGNORE"),
        }
    }

    /// The prefix as it's written in front of the lines.
    pub(crate) fn effective_prefix(&self) -> String {
        if !self.prefix.is_empty() && !self.disable_auto_brackets {
            format!("[{}] ", self.prefix)
        } else {
            self.prefix.clone()
        }
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("prefix", &self.prefix)
            .field("disable_auto_brackets", &self.disable_auto_brackets)
            .field("remote_address_headers", &self.remote_address_headers)
            .field("out", &self.out.as_ref().map(|_| "..").unwrap_or("stdout"))
            .field("output_flags", &self.output_flags)
            .field("ignored_request_uris", &self.ignored_request_uris)
            .finish()
    }
}

fn get_env(name: &str) -> Option<String> {
    match env::var(name) {
        Ok(value) if !value.is_empty() => Some(value),
        _ => None,
    }
}

fn get_env_list(name: &str) -> Vec<String> {
    match get_env(name) {
        Some(values) => values
            .split(',')
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(Into::into)
            .collect(),
        None => Vec::new(),
    }
}

/// Controls the information the sink writes in front of each line.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum OutputFlags {
    /// [`Flags::STD`], i.e. `2009/01/23 01:23:23`.
    #[default]
    Standard,
    /// Nothing but the prefix.
    Disabled,
    /// Use the flags as is, even if they're empty.
    Custom(Flags),
}

impl OutputFlags {
    pub(crate) fn resolve(self) -> Flags {
        match self {
            OutputFlags::Standard => Flags::STD,
            OutputFlags::Disabled => Flags::NONE,
            OutputFlags::Custom(flags) => flags,
        }
    }
}

impl From<i32> for OutputFlags {
    /// `-1` disables all flags, `0` uses the standard flags, any other value
    /// is used as bits of [`Flags`] as is.
    fn from(value: i32) -> OutputFlags {
        match value {
            -1 => OutputFlags::Disabled,
            0 => OutputFlags::Standard,
            bits => OutputFlags::Custom(Flags::from_bits_retain(bits as u32)),
        }
    }
}

impl From<Flags> for OutputFlags {
    fn from(flags: Flags) -> OutputFlags {
        OutputFlags::Custom(flags)
    }
}

/// Set of decorations written in front of each line.
#[derive(Copy, Clone, Eq, PartialEq)]
pub struct Flags(u32);

impl Flags {
    /// No decorations at all.
    pub const NONE: Flags = Flags(0);
    /// The date in the local time zone: `2009/01/23`.
    pub const DATE: Flags = Flags(1);
    /// The time in the local time zone: `01:23:23`.
    pub const TIME: Flags = Flags(1 << 1);
    /// Microsecond resolution: `01:23:23.123123`, implies `TIME`.
    pub const MICROSECONDS: Flags = Flags(1 << 2);
    /// Full file name and line number: `/a/b/c/d.rs:23`.
    pub const LONG_FILE: Flags = Flags(1 << 3);
    /// Final file name element and line number: `d.rs:23`, overrides
    /// `LONG_FILE`.
    pub const SHORT_FILE: Flags = Flags(1 << 4);
    /// Use UTC rather than the local time zone.
    pub const UTC: Flags = Flags(1 << 5);
    /// Move the prefix from the beginning of the line to before the message.
    pub const MSG_PREFIX: Flags = Flags(1 << 6);
    /// Initial values for the standard logger.
    pub const STD: Flags = Flags(Flags::DATE.0 | Flags::TIME.0);

    const KNOWN: u32 = (1 << 7) - 1;

    /// Create flags from `bits`, unknown bits are kept but don't add anything
    /// to the lines.
    pub const fn from_bits_retain(bits: u32) -> Flags {
        Flags(bits)
    }

    /// The raw bits.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns `true` if no flags are set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if all flags in `other` are set.
    pub const fn contains(self, other: Flags) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns `true` if any flag in `other` is set.
    pub const fn intersects(self, other: Flags) -> bool {
        self.0 & other.0 != 0
    }
}

impl BitOr for Flags {
    type Output = Flags;

    fn bitor(self, rhs: Flags) -> Flags {
        Flags(self.0 | rhs.0)
    }
}

impl fmt::Debug for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(Flags, &str); 7] = [
            (Flags::DATE, "DATE"),
            (Flags::TIME, "TIME"),
            (Flags::MICROSECONDS, "MICROSECONDS"),
            (Flags::LONG_FILE, "LONG_FILE"),
            (Flags::SHORT_FILE, "SHORT_FILE"),
            (Flags::UTC, "UTC"),
            (Flags::MSG_PREFIX, "MSG_PREFIX"),
        ];

        if self.is_empty() {
            return f.write_str("NONE");
        }
        let mut first = true;
        for (flag, name) in NAMES {
            if self.contains(flag) {
                if !first {
                    f.write_str(" | ")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        let unknown = self.0 & !Flags::KNOWN;
        if unknown != 0 {
            if !first {
                f.write_str(" | ")?;
            }
            write!(f, "{:#x}", unknown)?;
        }
        Ok(())
    }
}
