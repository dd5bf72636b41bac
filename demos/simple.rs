use std::io;

use http::header::{HeaderName, HeaderValue};
use http::Method;
use http_request_logger::{Handler, Options, Request, RequestLogger, ResponseWriter};

fn main() {
    // Create the logger, writing to standard out.
    let logger = RequestLogger::with_options(Options {
        prefix: "simple".to_owned(),
        remote_address_headers: vec!["X-Forwarded-For".to_owned()],
        ignored_request_uris: vec!["/favicon.ico".to_owned()],
        ..Options::from_env()
    });
    let handler = logger.wrap(http_handler);

    // Fake the handling of a few requests.
    let requests = [
        Request::new(Method::GET, "/").with_remote_addr("127.0.0.1:54321"),
        Request::new(Method::GET, "/not_found?page=2").with_remote_addr("127.0.0.1:54322"),
        Request::new(Method::GET, "/").with_remote_addr("10.0.0.1:80").with_header(
            HeaderName::from_static("x-forwarded-for"),
            HeaderValue::from_static("203.0.113.7"),
        ),
        // Not logged.
        Request::new(Method::GET, "/favicon.ico"),
    ];
    for request in &requests {
        handler.serve(&mut Stdout(io::stdout()), request);
    }
}

// Our fake HTTP response, the body is written to standard out.
struct Stdout(io::Stdout);

impl ResponseWriter for Stdout {
    fn set_status(&mut self, _: u16) {}

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::Write::write(&mut self.0, buf)
    }
}

fn http_handler(w: &mut dyn ResponseWriter, request: &Request) {
    let body: &[u8] = if request.method() == Method::GET && request.request_uri() == "/" {
        b"Home page\n"
    } else {
        w.set_status(404);
        b"Not found\n"
    };
    let _ = w.write(body);
}
