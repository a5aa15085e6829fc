//! A small blocking HTTP/1.1 user agent
//!
//! Fetches `http`, `https`, `file`, `data` and `view-source` urls and
//! renders the result as plain text.
//!
//! ```no_run
//! let mut req = wirefetch::Request::parse("https://example.com/").unwrap();
//! let resp = req.send().unwrap();
//! println!("{}", wirefetch::render::render(&resp));
//! ```

#[macro_use] extern crate quick_error;

pub mod client;
pub mod render;
mod shared;

pub use shared::{HeaderMap, Version};
pub use shared::headers;
pub use client::{Config, Error, ErrorKind, Request, Response, ResponseCache};
pub use client::Scheme;
