use crate::shared::{BodyKind, HeaderMap, Version};


/// Parsed status line and headers of a response
#[derive(Debug, Clone)]
pub struct Head {
    pub version: Version,
    pub code: u16,
    /// Status line as received, without the line ending
    pub status: String,
    pub headers: HeaderMap,
    pub body_kind: BodyKind,
    /// Connection can't be reused after this response
    pub close: bool,
}

impl Head {
    /// Interim (1xx) response which is followed by the real one
    pub fn is_informational(&self) -> bool {
        self.code >= 100 && self.code < 200 && self.code != 101
    }
}
