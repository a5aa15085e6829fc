use std::io;
use std::num::ParseIntError;
use std::path::PathBuf;


/// Broad category of an `Error`
///
/// Every category is fatal to the fetch that produced it. Nothing is retried
/// by the library, looping callers decide for themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed url or malformed data received from the peer
    Format,
    /// Dialing or TLS handshake failed
    Connection,
    /// Stream failed or was truncated after connection was established
    Read,
    /// Redirect chain is longer than `MAX_REDIRECTS`
    RedirectLimit,
    /// Reading a `file://` resource failed
    LocalIo,
}

quick_error!{
    /// Error returned by parsing a url or sending a request
    ///
    /// Use `kind()` to dispatch on the category. Matching on the variants
    /// themselves is fine for diagnostics, but more variants may be added.
    #[derive(Debug)]
    pub enum Error {
        InvalidUrl(url: String) {
            display("invalid url format: {:?}", url)
        }
        UnsupportedScheme(scheme: String) {
            display("unsupported scheme: {:?}", scheme)
        }
        InvalidPort(port: String, err: ParseIntError) {
            display("invalid port {:?}: {}", port, err)
            source(err)
        }
        InvalidHead(err: httparse::Error) {
            display("malformed response head: {}", err)
            source(err)
            from()
        }
        HeadersTooLarge(limit: usize) {
            display("response head is larger than {} bytes", limit)
        }
        InvalidChunkSize(err: httparse::InvalidChunkSize) {
            display("error parsing chunk size: {:?}", err)
            from()
        }
        InvalidContentLength(value: String) {
            display("invalid Content-Length: {:?}", value)
        }
        BodyTooLarge(size: u64, limit: usize) {
            display("body size is {} but maximum is {}", size, limit)
        }
        InvalidRedirect(location: String) {
            display("refusing to follow redirect to {:?}", location)
        }
        Connect(addr: String, err: io::Error) {
            display("failed to connect to {}: {}", addr, err)
            source(err)
        }
        Tls(err: rustls::Error) {
            display("tls error: {}", err)
            source(err)
            from()
        }
        InvalidServerName(host: String) {
            display("invalid tls server name: {:?}", host)
        }
        Io(err: io::Error) {
            display("connection error: {}", err)
            source(err)
            from()
        }
        UnexpectedEof(context: &'static str) {
            display("connection closed while reading {}", context)
        }
        Gzip(err: io::Error) {
            display("failed to decode gzip body: {}", err)
            source(err)
        }
        TooManyRedirects(hops: usize) {
            display("too many redirects (followed {})", hops)
        }
        LocalIo(path: PathBuf, err: io::Error) {
            display("failed to read {:?}: {}", path, err)
            source(err)
        }
    }
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        use self::Error::*;
        match *self {
            InvalidUrl(..) | UnsupportedScheme(..) | InvalidPort(..)
            | InvalidHead(..) | HeadersTooLarge(..) | InvalidChunkSize(..)
            | InvalidContentLength(..) | BodyTooLarge(..)
            | InvalidRedirect(..)
            => ErrorKind::Format,
            Connect(..) | Tls(..) | InvalidServerName(..)
            => ErrorKind::Connection,
            Io(..) | UnexpectedEof(..) | Gzip(..) => ErrorKind::Read,
            TooManyRedirects(..) => ErrorKind::RedirectLimit,
            LocalIo(..) => ErrorKind::LocalIo,
        }
    }
}

#[cfg(test)]
mod test {
    use std::io;
    use super::{Error, ErrorKind};

    #[test]
    fn test_kinds() {
        assert_eq!(Error::InvalidUrl("x".into()).kind(), ErrorKind::Format);
        assert_eq!(Error::TooManyRedirects(5).kind(),
                   ErrorKind::RedirectLimit);
        let err = io::Error::new(io::ErrorKind::ConnectionRefused, "refused");
        assert_eq!(Error::Connect("a:80".into(), err).kind(),
                   ErrorKind::Connection);
        let err: Error = io::Error::new(io::ErrorKind::Other, "x").into();
        assert_eq!(err.kind(), ErrorKind::Read);
    }

    #[test]
    fn test_display() {
        assert_eq!(Error::TooManyRedirects(5).to_string(),
                   "too many redirects (followed 5)");
        assert_eq!(Error::UnsupportedScheme("ftp".into()).to_string(),
                   "unsupported scheme: \"ftp\"");
    }
}
