//! HTTP/1.1 client
//!
//! Everything here is blocking: a `Request` dials (or reuses) a connection,
//! writes the request head and reads the whole response before `send`
//! returns. Besides `http` and `https` the client understands `file`,
//! `data` and `view-source` urls.
//!
//! Only `GET` without a request body is supported.
//!

mod cache;
mod config;
mod connection;
mod decode;
mod error;
mod fetch;
mod head;
mod parser;
mod request;
mod response;
pub mod url;

pub use self::cache::ResponseCache;
pub use self::config::Config;
pub use self::connection::{Connect, Connection, Net, Stream};
pub use self::error::{Error, ErrorKind};
pub use self::parser::read_response;
pub use self::request::{default_headers, Request};
pub use self::response::{Response, SYNTHETIC_STATUS};
pub use self::url::{Scheme, Url};

/// Maximum number of headers in a response
pub const MAX_HEADERS_NUM: usize = 256;
/// Maximum length of the status line and headers together
pub const MAX_HEADERS_SIZE: usize = 16384;
/// Maximum length of a chunk size line, including extensions
pub const MAX_CHUNK_HEAD: usize = 128;
/// Maximum size of the body, before and after decompression
pub const MAX_BODY_SIZE: usize = 104_856_700;
/// Number of redirects followed by a single `send`
pub const MAX_REDIRECTS: usize = 5;
