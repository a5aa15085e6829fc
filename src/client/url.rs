use std::fmt::{self, Display};
use std::str::FromStr;

use super::Error;


/// Url scheme, which also selects the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    Http,
    Https,
    /// Local file, the path is kept in the `host` field
    File,
    /// Inline data, media type is in the `host` and payload in the `path`
    Data,
    /// Fetched as `https` but the body is meant to be shown verbatim
    ViewSource,
}

/// Components of a parsed url
///
/// For `file` and `data` schemes the fields are reinterpreted, see
/// `Scheme`. The port is zero for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Url {
    pub scheme: Scheme,
    pub host: String,
    pub port: u16,
    pub path: String,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        use self::Scheme::*;
        match *self {
            Http => "http",
            Https => "https",
            File => "file",
            Data => "data",
            ViewSource => "view-source",
        }
    }
    /// Port used when url has none
    pub fn default_port(&self) -> u16 {
        match *self {
            Scheme::Http => 80,
            _ => 443,
        }
    }
    /// True for schemes that are fetched over the network
    pub fn is_network(&self) -> bool {
        use self::Scheme::*;
        match *self {
            Http | Https | ViewSource => true,
            File | Data => false,
        }
    }
}

impl FromStr for Scheme {
    type Err = Error;
    fn from_str(s: &str) -> Result<Scheme, Error> {
        use self::Scheme::*;
        match &s.to_ascii_lowercase()[..] {
            "http" => Ok(Http),
            "https" => Ok(Https),
            "file" => Ok(File),
            "data" => Ok(Data),
            "view-source" => Ok(ViewSource),
            _ => Err(Error::UnsupportedScheme(s.to_string())),
        }
    }
}

impl Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Splits `host[:port]`, keeping colons of bracketed IPv6 literals
fn split_port(authority: &str) -> Option<(&str, Option<&str>)> {
    let host_end = if authority.starts_with('[') {
        authority.find(']').map_or(authority.len(), |x| x + 1)
    } else {
        authority.find(':').unwrap_or(authority.len())
    };
    let (host, tail) = authority.split_at(host_end);
    if tail.is_empty() {
        Some((host, None))
    } else if tail.starts_with(':') {
        Some((host, Some(&tail[1..])))
    } else {
        None
    }
}

/// Parses the url forms understood by the user agent:
///
/// * `scheme://[www.]host[:port][/path]` for `http`, `https`, `view-source`
/// * `file://path`
/// * `data:mediatype,payload`
pub fn parse(url: &str) -> Result<Url, Error> {
    if url.get(..5).map_or(false, |x| x.eq_ignore_ascii_case("data:")) {
        let rest = &url[5..];
        let comma = rest.find(',')
            .ok_or_else(|| Error::InvalidUrl(url.to_string()))?;
        return Ok(Url {
            scheme: Scheme::Data,
            host: rest[..comma].to_string(),
            port: 0,
            path: rest[comma+1..].to_string(),
        });
    }
    let sep = url.find("://")
        .ok_or_else(|| Error::InvalidUrl(url.to_string()))?;
    let scheme: Scheme = url[..sep].parse()?;
    let rest = &url[sep+3..];
    match scheme {
        Scheme::File => {
            return Ok(Url {
                scheme: scheme,
                host: rest.to_string(),
                port: 0,
                path: String::new(),
            });
        }
        Scheme::Data => return Err(Error::InvalidUrl(url.to_string())),
        Scheme::Http | Scheme::Https | Scheme::ViewSource => {}
    }

    let rest = if rest.starts_with("www.") { &rest[4..] } else { rest };
    let (authority, path) = match rest.find('/') {
        Some(slash) => (&rest[..slash], &rest[slash..]),
        None => (rest, "/"),
    };
    let (host, port) = split_port(authority)
        .ok_or_else(|| Error::InvalidUrl(url.to_string()))?;
    if host.is_empty() {
        return Err(Error::InvalidUrl(url.to_string()));
    }
    let port = match port {
        Some(port) => port.parse()
            .map_err(|e| Error::InvalidPort(port.to_string(), e))?,
        None => scheme.default_port(),
    };
    Ok(Url {
        scheme: scheme,
        host: host.to_string(),
        port: port,
        path: path.to_string(),
    })
}

#[cfg(test)]
mod test {
    use super::{parse, Scheme, Url};
    use crate::client::ErrorKind;

    fn url(scheme: Scheme, host: &str, port: u16, path: &str) -> Url {
        Url {
            scheme: scheme,
            host: host.to_string(),
            port: port,
            path: path.to_string(),
        }
    }

    #[test]
    fn test_http() {
        assert_eq!(parse("http://example.com/a/b").unwrap(),
                   url(Scheme::Http, "example.com", 80, "/a/b"));
        assert_eq!(parse("http://example.com").unwrap(),
                   url(Scheme::Http, "example.com", 80, "/"));
    }

    #[test]
    fn test_https_port() {
        assert_eq!(parse("https://example.com:8443").unwrap(),
                   url(Scheme::Https, "example.com", 8443, "/"));
        assert_eq!(parse("https://example.com:8443/x?y=1").unwrap(),
                   url(Scheme::Https, "example.com", 8443, "/x?y=1"));
        assert_eq!(parse("https://example.com/").unwrap().port, 443);
    }

    #[test]
    fn test_strip_www() {
        assert_eq!(parse("https://www.example.com/index.html").unwrap(),
                   url(Scheme::Https, "example.com", 443, "/index.html"));
    }

    #[test]
    fn test_colon_in_path() {
        assert_eq!(parse("http://example.com/a:b").unwrap(),
                   url(Scheme::Http, "example.com", 80, "/a:b"));
    }

    #[test]
    fn test_ipv6() {
        assert_eq!(parse("http://[::1]:8080/").unwrap(),
                   url(Scheme::Http, "[::1]", 8080, "/"));
        assert_eq!(parse("http://[::1]/").unwrap(),
                   url(Scheme::Http, "[::1]", 80, "/"));
    }

    #[test]
    fn test_view_source() {
        assert_eq!(parse("view-source://example.com/page").unwrap(),
                   url(Scheme::ViewSource, "example.com", 443, "/page"));
    }

    #[test]
    fn test_file() {
        assert_eq!(parse("file:///etc/hosts").unwrap(),
                   url(Scheme::File, "/etc/hosts", 0, ""));
        assert_eq!(parse("file://test.html").unwrap(),
                   url(Scheme::File, "test.html", 0, ""));
    }

    #[test]
    fn test_data() {
        assert_eq!(parse("data:text/plain,hello").unwrap(),
                   url(Scheme::Data, "text/plain", 0, "hello"));
        assert_eq!(parse("data:text/html,a,b").unwrap(),
                   url(Scheme::Data, "text/html", 0, "a,b"));
        assert_eq!(parse("data:text/plain,see http://x/").unwrap(),
                   url(Scheme::Data, "text/plain", 0, "see http://x/"));
    }

    #[test]
    fn test_errors() {
        for bad in &["example.com", "data:nocomma", "http://",
                     "http://:80/", "http://[::1]x/"]
        {
            assert_eq!(parse(bad).unwrap_err().kind(), ErrorKind::Format,
                       "{}", bad);
        }
        assert!(matches!(parse("ftp://example.com"),
                         Err(crate::client::Error::UnsupportedScheme(_))));
        assert!(matches!(parse("http://example.com:port/"),
                         Err(crate::client::Error::InvalidPort(..))));
        assert!(matches!(parse("http://example.com:70000/"),
                         Err(crate::client::Error::InvalidPort(..))));
    }
}
