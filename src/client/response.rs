use crate::shared::HeaderMap;
use super::url::Scheme;


/// Status line used for responses that didn't come from the network
pub const SYNTHETIC_STATUS: &'static str = "HTTP/1.1 200 OK";

/// Result of a single fetch
///
/// The body is fully decoded: chunked framing removed and gzip inflated.
/// Bytes that are not valid UTF-8 are replaced by U+FFFD.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Scheme of the request, or `ViewSource` if that wrapper was used
    pub scheme: Scheme,
    /// Raw status line, e.g. `HTTP/1.1 200 OK`
    pub status: String,
    pub headers: HeaderMap,
    pub body: String,
}

impl Response {
    /// Builds a `200 OK` response for the local schemes
    pub fn synthesized(scheme: Scheme, headers: HeaderMap, body: String)
        -> Response
    {
        Response {
            scheme: scheme,
            status: SYNTHETIC_STATUS.to_string(),
            headers: headers,
            body: body,
        }
    }
    /// Numeric status code taken from the status line
    pub fn code(&self) -> Option<u16> {
        self.status.split_whitespace().nth(1).and_then(|x| x.parse().ok())
    }
}

#[cfg(test)]
mod test {
    use super::Response;
    use crate::client::url::Scheme;
    use crate::shared::HeaderMap;

    #[test]
    fn test_code() {
        let mut resp = Response::synthesized(Scheme::Data, HeaderMap::new(),
                                             String::new());
        assert_eq!(resp.code(), Some(200));
        resp.status = "HTTP/1.1 404 Not Found".to_string();
        assert_eq!(resp.code(), Some(404));
        resp.status = "garbage".to_string();
        assert_eq!(resp.code(), None);
    }
}
