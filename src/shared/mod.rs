//! Protocol primitives shared by the request writer and response parser.

pub use self::bodykind::BodyKind;
pub use self::headers::HeaderMap;
pub use self::version::Version;

pub mod headers;
mod bodykind;
mod version;
