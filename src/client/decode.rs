use std::cmp::min;
use std::io::Read;

use flate2::read::GzDecoder;

use crate::shared::HeaderMap;
use crate::shared::headers::is_gzip;
use super::{Error, MAX_BODY_SIZE};


/// Returns true if either content or transfer coding is gzip
pub fn is_gzipped(headers: &HeaderMap) -> bool {
    headers.get("Content-Encoding").map_or(false, is_gzip)
    || headers.get("Transfer-Encoding").map_or(false, is_gzip)
}

pub fn gunzip(data: &[u8]) -> Result<Vec<u8>, Error> {
    let capacity = min(data.len().saturating_mul(4), 65536);
    let mut result = Vec::with_capacity(capacity);
    GzDecoder::new(data).take(MAX_BODY_SIZE as u64 + 1)
        .read_to_end(&mut result)
        .map_err(Error::Gzip)?;
    if result.len() > MAX_BODY_SIZE {
        return Err(Error::BodyTooLarge(result.len() as u64, MAX_BODY_SIZE));
    }
    Ok(result)
}

/// Applies content decoding to an already de-framed body
///
/// Empty bodies are passed as is, redirects often carry a gzip coding
/// header without any data.
pub fn decode_body(headers: &HeaderMap, body: Vec<u8>)
    -> Result<Vec<u8>, Error>
{
    if body.is_empty() || !is_gzipped(headers) {
        return Ok(body);
    }
    gunzip(&body)
}

#[cfg(test)]
mod test {
    use std::io::Write;

    use flate2::Compression;
    use flate2::write::GzEncoder;

    use super::{decode_body, gunzip};
    use crate::client::{Error, ErrorKind};
    use crate::shared::HeaderMap;

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_content_encoding() {
        let mut headers = HeaderMap::new();
        headers.insert("Content-Encoding", "gzip");
        let body = decode_body(&headers, gzip(b"<p>hi</p>")).unwrap();
        assert_eq!(body, b"<p>hi</p>");
    }

    #[test]
    fn test_transfer_encoding() {
        let mut headers = HeaderMap::new();
        headers.insert("Transfer-Encoding", "gzip, chunked");
        let body = decode_body(&headers, gzip(b"data")).unwrap();
        assert_eq!(body, b"data");
    }

    #[test]
    fn test_identity() {
        let headers = HeaderMap::new();
        assert_eq!(decode_body(&headers, b"plain".to_vec()).unwrap(),
                   b"plain");
    }

    #[test]
    fn test_empty_gzip_body() {
        let mut headers = HeaderMap::new();
        headers.insert("Content-Encoding", "gzip");
        assert_eq!(decode_body(&headers, Vec::new()).unwrap(), b"");
    }

    #[test]
    fn test_high_ratio() {
        // Inflates far beyond the initial buffer capacity
        let data = vec![b'x'; 4 << 20];
        let packed = gzip(&data);
        assert!(packed.len() * 4 < data.len());
        assert_eq!(gunzip(&packed).unwrap(), data);
    }

    #[test]
    fn test_corrupt() {
        let err = gunzip(b"definitely not gzip").unwrap_err();
        assert!(matches!(err, Error::Gzip(_)));
        assert_eq!(err.kind(), ErrorKind::Read);
    }
}
