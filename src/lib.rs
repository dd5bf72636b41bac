// Copyright 2017 Thomas de Zeeuw
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT
// or http://opensource.org/licenses/MIT>, at your option. This file may not be
// used, copied, modified, or distributed except according to those terms.

//! A crate that logs a single line for every request an HTTP handler handles.
//!
//! [`RequestLogger::wrap`] decorates any [`Handler`], the returned handler
//! times the request, records the status and number of bytes written by the
//! wrapped handler and writes a line like the following to the output
//! (standard out by default):
//!
//! ```text
//! 2009/01/23 01:23:23 (127.0.0.1:4000) "GET /hello?a=b HTTP/1.1" 200 11 25.1µs
//! ```
//!
//! # Options
//!
//! The logger is configured using [`Options`], either in code or from the
//! environment using [`Options::from_env`]. The options control the prefix,
//! the decorations in front of each line (see [`OutputFlags`]), which headers
//! contain the client address (e.g. when behind a proxy) and which request
//! targets not to log.
//!
//! # Note
//!
//! This crate reports its own problems, such as failing to write a line,
//! using the [`log`] crate. Install a logging implementation to see them.
//!
//! [`log`]: https://crates.io/crates/log

#![warn(missing_docs)]

mod config;
mod format;
mod logger;
mod request;
mod sink;
mod writer;

#[cfg(test)]
mod tests;

pub use config::{Flags, Options, OutputFlags};
pub use logger::{Logged, RequestLogger};
pub use request::{RemoteAddr, Request};
pub use writer::{
    Connection, Flush, Hijack, HijackError, ResponseObserver, ResponseWriter, DEFAULT_STATUS,
};

/// Handles a request, writing the response to a [`ResponseWriter`].
pub trait Handler {
    /// Handle `request`.
    fn serve(&self, w: &mut dyn ResponseWriter, request: &Request);
}

impl<F> Handler for F
where
    F: Fn(&mut dyn ResponseWriter, &Request),
{
    fn serve(&self, w: &mut dyn ResponseWriter, request: &Request) {
        (self)(w, request)
    }
}

/// Helps the compiler infer the argument types of a closure used as
/// [`Handler`].
///
/// ```
/// use http_request_logger::{handler_fn, Handler};
///
/// let handler = handler_fn(|w, request| {
///     let _ = w.write(request.request_uri().as_bytes());
/// });
/// # fn assert_handler<H: Handler>(_: &H) {}
/// # assert_handler(&handler);
/// ```
pub fn handler_fn<F>(f: F) -> F
where
    F: Fn(&mut dyn ResponseWriter, &Request),
{
    f
}
