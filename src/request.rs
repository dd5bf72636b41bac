//! The request as seen by the logger.

use std::net::SocketAddr;

use http::header::{HeaderMap, HeaderName, HeaderValue};
use http::{Method, Version};

/// Remote address of the client, set as extension on a [`http::Request`] by
/// the server so it survives the conversion into a [`Request`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct RemoteAddr(pub SocketAddr);

/// Read-only view of an incoming request.
///
/// Unlike [`http::Request`] this keeps the request target exactly as the
/// client sent it (including query and fragment), that is the string logged
/// and matched against the ignored request targets.
#[derive(Clone, Debug)]
pub struct Request {
    method: Method,
    request_uri: String,
    version: Version,
    remote_addr: String,
    headers: HeaderMap,
}

impl Request {
    /// Create a new HTTP/1.1 request without headers or remote address.
    pub fn new<U>(method: Method, request_uri: U) -> Request
    where
        U: Into<String>,
    {
        Request {
            method,
            request_uri: request_uri.into(),
            version: Version::HTTP_11,
            remote_addr: String::new(),
            headers: HeaderMap::new(),
        }
    }

    /// Set the protocol version.
    pub fn with_version(mut self, version: Version) -> Request {
        self.version = version;
        self
    }

    /// Set the remote address as reported by the transport.
    pub fn with_remote_addr<A>(mut self, addr: A) -> Request
    where
        A: Into<String>,
    {
        self.remote_addr = addr.into();
        self
    }

    /// Append a header.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Request {
        self.headers.append(name, value);
        self
    }

    /// The request method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The unmodified request target, e.g. `/search?q=rust`.
    pub fn request_uri(&self) -> &str {
        &self.request_uri
    }

    /// The protocol version.
    pub fn version(&self) -> Version {
        self.version
    }

    /// The protocol as it appears in a request line, e.g. `HTTP/1.1`.
    pub fn protocol(&self) -> &'static str {
        match self.version {
            Version::HTTP_09 => "HTTP/0.9",
            Version::HTTP_10 => "HTTP/1.0",
            Version::HTTP_2 => "HTTP/2.0",
            Version::HTTP_3 => "HTTP/3.0",
            _ => "HTTP/1.1",
        }
    }

    /// The remote address as reported by the transport, may be empty.
    pub fn remote_addr(&self) -> &str {
        &self.remote_addr
    }

    /// The first value of header `name`. Values that aren't valid visible
    /// ASCII are treated as missing.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .and_then(|value| value.to_str().ok())
    }

    /// All request headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Mutable access to the request headers.
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }
}

impl<B> From<http::Request<B>> for Request {
    /// Uses the path and query of the URI as request target, for requests in
    /// absolute form the entire URI is used.
    fn from(request: http::Request<B>) -> Request {
        let (parts, _) = request.into_parts();
        let request_uri = match (parts.uri.scheme(), parts.uri.path_and_query()) {
            (None, Some(path_and_query)) => path_and_query.as_str().to_owned(),
            _ => parts.uri.to_string(),
        };
        let remote_addr = parts
            .extensions
            .get::<RemoteAddr>()
            .map(|addr| addr.0.to_string())
            .unwrap_or_default();
        Request {
            method: parts.method,
            request_uri,
            version: parts.version,
            remote_addr,
            headers: parts.headers,
        }
    }
}
