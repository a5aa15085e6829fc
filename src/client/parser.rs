use std::cmp::min;
use std::io::{self, BufRead, Read};

use log::debug;

use crate::shared::{BodyKind, HeaderMap, Version};
use crate::shared::headers::{is_chunked, is_close};
use super::{MAX_HEADERS_SIZE, MAX_HEADERS_NUM, MAX_CHUNK_HEAD};
use super::MAX_BODY_SIZE;
use super::Error;
use super::decode::decode_body;
use super::head::Head;
use super::response::Response;
use super::url::Scheme;


fn scan_headers(code: u16, headers: &HeaderMap)
    -> Result<(BodyKind, bool), Error>
{
    // Framing per RFC 7230 section 3.3.3, first match wins: statuses
    // without a body, chunked as the final transfer coding, Content-Length,
    // then read-until-close. Returns the framing and whether the connection
    // must be closed afterwards.
    use crate::shared::BodyKind::*;
    let mut close = headers.get("Connection").map_or(false, is_close);
    if (code >= 100 && code < 200) || code == 204 || code == 304 {
        return Ok((Fixed(0), close));
    }
    if headers.get("Transfer-Encoding").map_or(false, is_chunked) {
        if headers.contains("Content-Length") {
            // transfer-encoding has preference and don't allow keep-alive
            close = true;
        }
        return Ok((Chunked, close));
    }
    if let Some(value) = headers.get("Content-Length") {
        let len = value.parse()
            .map_err(|_| Error::InvalidContentLength(value.to_string()))?;
        return Ok((Fixed(len), close));
    }
    Ok((Eof, true))
}

fn eof_means(context: &'static str) -> impl Fn(io::Error) -> Error {
    move |e| {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            Error::UnexpectedEof(context)
        } else {
            Error::Io(e)
        }
    }
}

/// Reads a single line including line ending, but no more than `limit`
fn read_line<R: BufRead>(reader: &mut R, buf: &mut Vec<u8>, limit: usize,
    context: &'static str)
    -> Result<(), Error>
{
    let start = buf.len();
    reader.by_ref().take(limit as u64).read_until(b'\n', buf)?;
    let line = &buf[start..];
    if line.last() == Some(&b'\n') {
        Ok(())
    } else if line.len() >= limit {
        Err(Error::HeadersTooLarge(limit))
    } else {
        Err(Error::UnexpectedEof(context))
    }
}

fn is_blank(line: &[u8]) -> bool {
    line == b"\r\n" || line == b"\n"
}

/// Reads and parses status line and headers
pub fn read_head<R: BufRead>(reader: &mut R) -> Result<Head, Error> {
    let mut buf = Vec::with_capacity(512);
    loop {
        let start = buf.len();
        let limit = MAX_HEADERS_SIZE - start;
        let context = if start == 0 { "status line" } else { "headers" };
        read_line(reader, &mut buf, limit, context)
            .map_err(|e| match e {
                Error::HeadersTooLarge(_)
                => Error::HeadersTooLarge(MAX_HEADERS_SIZE),
                e => e,
            })?;
        if is_blank(&buf[start..]) {
            if start == 0 {
                // Stray line ending left from the previous message
                buf.clear();
                continue;
            }
            break;
        }
    }
    let status_end = buf.iter().position(|&x| x == b'\n').unwrap_or(0);
    let status = String::from_utf8_lossy(&buf[..status_end])
        .trim_end_matches('\r').to_string();

    let mut headers = [httparse::EMPTY_HEADER; MAX_HEADERS_NUM];
    let (version, code, map) = {
        let mut raw = httparse::Response::new(&mut headers);
        match raw.parse(&buf)? {
            httparse::Status::Complete(_) => {}
            // We've seen the empty line, so only a lone `\n` gets here
            httparse::Status::Partial
            => return Err(Error::InvalidHead(httparse::Error::NewLine)),
        }
        let mut map = HeaderMap::new();
        for header in raw.headers.iter() {
            let value = String::from_utf8_lossy(header.value);
            map.insert(header.name, value.trim());
        }
        (Version::from_minor(raw.version.unwrap_or(1)),
         raw.code.unwrap_or(0), map)
    };
    let (body_kind, close) = scan_headers(code, &map)?;
    Ok(Head {
        version: version,
        code: code,
        status: status,
        headers: map,
        body_kind: body_kind,
        // For HTTP/1.0 we could implement Connection: Keep-Alive
        // but hopefully it's rare enough to ignore nowadays
        close: close || version == Version::Http10,
    })
}

fn read_chunked<R: BufRead>(reader: &mut R) -> Result<Vec<u8>, Error> {
    let mut body = Vec::new();
    let mut line = Vec::with_capacity(MAX_CHUNK_HEAD);
    loop {
        line.clear();
        read_line(reader, &mut line, MAX_CHUNK_HEAD, "chunk size")
            .map_err(|e| match e {
                Error::HeadersTooLarge(_)
                => Error::InvalidChunkSize(httparse::InvalidChunkSize),
                e => e,
            })?;
        let size = match httparse::parse_chunk_size(&line)? {
            httparse::Status::Complete((_, size)) => size,
            httparse::Status::Partial
            => return Err(Error::UnexpectedEof("chunk size")),
        };
        if size == 0 {
            break;
        }
        let total = body.len() as u64 + size;
        if total > MAX_BODY_SIZE as u64 {
            return Err(Error::BodyTooLarge(total, MAX_BODY_SIZE));
        }
        let start = body.len();
        body.resize(start + size as usize, 0);
        reader.read_exact(&mut body[start..])
            .map_err(eof_means("chunk data"))?;
        line.clear();
        read_line(reader, &mut line, MAX_CHUNK_HEAD, "chunk data")?;
    }
    // Trailer fields are not interesting, skip up to the final empty line
    loop {
        line.clear();
        read_line(reader, &mut line, MAX_HEADERS_SIZE, "trailers")?;
        if is_blank(&line) {
            break;
        }
    }
    Ok(body)
}

/// Reads at most `limit` bytes, stopping early when the peer closes
///
/// A TLS peer that drops the socket without `close_notify` is reported by
/// rustls as `UnexpectedEof`. That ends the body like a clean close does,
/// bytes received before it are kept.
fn read_to_close<R: Read>(reader: &mut R, limit: u64, body: &mut Vec<u8>)
    -> Result<(), Error>
{
    match reader.by_ref().take(limit).read_to_end(body) {
        Ok(_) => Ok(()),
        Err(ref e) if e.kind() == io::ErrorKind::UnexpectedEof => {
            debug!("Stream ended abruptly after {} body bytes", body.len());
            Ok(())
        }
        Err(e) => Err(Error::Io(e)),
    }
}

/// Reads the body framed as `head.body_kind` says
///
/// Premature end of stream is fine for `Fixed` bodies, whatever has been
/// received is the body. The `head.close` is set in this case.
pub fn read_body<R: BufRead>(reader: &mut R, head: &mut Head)
    -> Result<Vec<u8>, Error>
{
    match head.body_kind {
        BodyKind::Fixed(len) => {
            if len > MAX_BODY_SIZE as u64 {
                return Err(Error::BodyTooLarge(len, MAX_BODY_SIZE));
            }
            let mut body = Vec::with_capacity(min(len as usize, 65536));
            read_to_close(reader, len, &mut body)?;
            if (body.len() as u64) < len {
                debug!("Connection closed after {} of {} body bytes",
                       body.len(), len);
                head.close = true;
            }
            Ok(body)
        }
        BodyKind::Chunked => read_chunked(reader),
        BodyKind::Eof => {
            let mut body = Vec::new();
            read_to_close(reader, MAX_BODY_SIZE as u64 + 1, &mut body)?;
            if body.len() > MAX_BODY_SIZE {
                return Err(Error::BodyTooLarge(body.len() as u64,
                                               MAX_BODY_SIZE));
            }
            head.close = true;
            Ok(body)
        }
    }
}

/// Reads a whole response and decodes its body
///
/// Interim `1xx` responses are skipped. Returns the response and whether
/// the connection may be used for the next request.
pub fn read_response<R: BufRead>(reader: &mut R, scheme: Scheme)
    -> Result<(Response, bool), Error>
{
    let mut head = read_head(reader)?;
    while head.is_informational() {
        debug!("Skipping interim response {:?}", head.status);
        head = read_head(reader)?;
    }
    let body = read_body(reader, &mut head)?;
    let body = decode_body(&head.headers, body)?;
    let response = Response {
        scheme: scheme,
        status: head.status,
        headers: head.headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    };
    Ok((response, !head.close))
}
