/// How the end of a response body is found
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BodyKind {
    /// Exactly this many bytes follow the head (`Content-Length`)
    ///
    /// Statuses that never carry a body (1xx, 204, 304) are `Fixed(0)`.
    /// The peer may close before all bytes arrive, the body is then
    /// whatever was received.
    Fixed(u64),
    /// `Transfer-Encoding` ends with `chunked`
    Chunked,
    /// No framing headers, the body ends when the server closes the stream
    Eof,
}
