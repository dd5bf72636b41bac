use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Instant;

use log::{debug, trace};

use crate::config::Options;
use crate::format::RequestLine;
use crate::sink::LineSink;
use crate::writer::{ResponseObserver, ResponseWriter};
use crate::{Handler, Request};

/// Logs a line for every request handled by a [wrapped] handler.
///
/// ```
/// use http_request_logger::{handler_fn, Options, RequestLogger};
///
/// let logger = RequestLogger::with_options(Options {
///     prefix: "my_app".to_owned(),
///     ignored_request_uris: vec!["/favicon.ico".to_owned()],
///     ..Options::default()
/// });
///
/// let handler = logger.wrap(handler_fn(|w, _| {
///     let _ = w.write(b"Hello world");
/// }));
/// ```
///
/// Each line looks like:
///
/// ```text
/// [my_app] 2009/01/23 01:23:23 (127.0.0.1:4000) "GET /hello?a=b HTTP/1.1" 200 11 25.1µs
/// ```
///
/// [wrapped]: RequestLogger::wrap
#[derive(Clone)]
pub struct RequestLogger {
    shared: Arc<Shared>,
}

/// Configuration and sink shared between all wrapped handlers.
struct Shared {
    sink: LineSink,
    remote_address_headers: Vec<String>,
    ignored_request_uris: Vec<String>,
}

impl RequestLogger {
    /// Create a logger using the default options, writing to standard out.
    pub fn new() -> RequestLogger {
        RequestLogger::with_options(Options::default())
    }

    /// Create a logger using the first of `options`, the remaining options
    /// are ignored. Without any options the defaults are used.
    pub fn from_options<I>(options: I) -> RequestLogger
    where
        I: IntoIterator<Item = Options>,
    {
        let options = options.into_iter().next().unwrap_or_default();
        RequestLogger::with_options(options)
    }

    /// Create a logger using `options`.
    pub fn with_options(options: Options) -> RequestLogger {
        let prefix = options.effective_prefix();
        let flags = options.output_flags.resolve();
        let out: Box<dyn Write + Send> = match options.out {
            Some(out) => out,
            None => Box::new(io::stdout()),
        };

        debug!(
            "created request logger: prefix = {:?}, flags = {:?}, address_headers = {}, ignored_uris = {}",
            prefix,
            flags,
            options.remote_address_headers.len(),
            options.ignored_request_uris.len(),
        );

        RequestLogger {
            shared: Arc::new(Shared {
                sink: LineSink::new(out, prefix, flags),
                remote_address_headers: options.remote_address_headers,
                ignored_request_uris: options.ignored_request_uris,
            }),
        }
    }

    /// Wrap `handler`, logging every request it handles.
    pub fn wrap<H>(&self, handler: H) -> Logged<H>
    where
        H: Handler,
    {
        Logged {
            handler,
            shared: Arc::clone(&self.shared),
        }
    }

    /// Write an arbitrary line to the same output as the requests, using the
    /// same prefix and flags.
    #[track_caller]
    pub fn print(&self, msg: fmt::Arguments<'_>) {
        self.shared.sink.output(msg);
    }
}

impl Default for RequestLogger {
    fn default() -> RequestLogger {
        RequestLogger::new()
    }
}

impl fmt::Debug for RequestLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestLogger")
            .field("prefix", &self.shared.sink.prefix())
            .field("flags", &self.shared.sink.flags())
            .field("remote_address_headers", &self.shared.remote_address_headers)
            .field("ignored_request_uris", &self.shared.ignored_request_uris)
            .finish()
    }
}

impl Shared {
    fn is_ignored(&self, request_uri: &str) -> bool {
        self.ignored_request_uris
            .iter()
            .any(|ignored| ignored == request_uri)
    }

    /// Address of the client: the first configured header with a non-empty
    /// value, or the remote address of the connection.
    fn client_addr<'r>(&self, request: &'r Request) -> &'r str {
        self.remote_address_headers
            .iter()
            .filter_map(|name| request.header(name))
            .find(|value| !value.is_empty())
            .unwrap_or_else(|| request.remote_addr())
    }
}

/// Handler returned by [`RequestLogger::wrap`].
#[derive(Clone)]
pub struct Logged<H> {
    handler: H,
    shared: Arc<Shared>,
}

impl<H> Handler for Logged<H>
where
    H: Handler,
{
    fn serve(&self, w: &mut dyn ResponseWriter, request: &Request) {
        let start = Instant::now();

        let mut observer = ResponseObserver::new(w);
        self.handler.serve(&mut observer, request);

        if self.shared.is_ignored(request.request_uri()) {
            trace!("not logging ignored request: {}", request.request_uri());
            return;
        }
        let elapsed = start.elapsed();

        self.shared.sink.output(format_args!(
            "{}",
            RequestLine {
                addr: self.shared.client_addr(request),
                method: request.method().as_str(),
                request_uri: request.request_uri(),
                protocol: request.protocol(),
                status: observer.status(),
                size: observer.bytes_written(),
                elapsed,
            }
        ));
    }
}

impl<H> fmt::Debug for Logged<H>
where
    H: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logged")
            .field("handler", &self.handler)
            .finish()
    }
}
