use std::sync::Arc;

use crate::shared::{HeaderMap, Version};
use super::{Config, Error, ResponseCache};
use super::connection::{Connect, Connection, Net};
use super::url::{self, Scheme, Url};


/// Headers written first, in this order. The rest follows sorted by name.
const PREFERRED_ORDER: [&'static str; 3] = ["Host", "User-Agent", "Connection"];

/// A resource to fetch, together with the state kept between fetches
///
/// The request is created once and may be sent any number of times, e.g.
/// for polling the same url. Between sends it keeps an open connection
/// (reused while the scheme, host and port stay the same) and a response
/// cache.
///
/// For `file` requests `host` holds the filesystem path. For `data`
/// requests `host` holds the media type and `path` holds the payload.
pub struct Request {
    pub scheme: Scheme,
    pub host: String,
    pub port: u16,
    pub path: String,
    pub method: String,
    pub headers: HeaderMap,
    pub(super) connection: Option<Connection>,
    pub(super) redirects: usize,
    pub(super) cache: ResponseCache,
    pub(super) connector: Arc<dyn Connect + Send + Sync>,
}

/// Headers every network request starts with
pub fn default_headers(url: &Url, user_agent: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if url.scheme.is_network() {
        headers.insert("Host", url.host.clone());
        headers.insert("Connection", "keep-alive");
        headers.insert("User-Agent", user_agent);
        headers.insert("Accept-Encoding", "gzip");
    }
    headers
}

impl Request {
    /// Parses url into a request using default configuration
    pub fn parse(url: &str) -> Result<Request, Error> {
        Request::parse_with(url, Config::default())
    }
    /// Parses url into a request that dials with the `config`
    pub fn parse_with(url: &str, config: Config) -> Result<Request, Error> {
        let url = url::parse(url)?;
        let headers = default_headers(&url, &config.user_agent);
        Ok(Request::from_parts(url, headers, Arc::new(Net::new(config))))
    }
    fn from_parts(url: Url, headers: HeaderMap,
        connector: Arc<dyn Connect + Send + Sync>)
        -> Request
    {
        Request {
            scheme: url.scheme,
            host: url.host,
            port: url.port,
            path: url.path,
            method: "GET".to_string(),
            headers: headers,
            connection: None,
            redirects: 0,
            cache: ResponseCache::new(),
            connector: connector,
        }
    }
    /// Replaces the connector used to open network connections
    ///
    /// Any connection opened by the previous connector is closed.
    pub fn with_connector(mut self, connector: Arc<dyn Connect + Send + Sync>)
        -> Request
    {
        self.connector = connector;
        self.connection = None;
        self
    }
    /// Use the (possibly shared) cache instead of a private one
    pub fn with_cache(mut self, cache: ResponseCache) -> Request {
        self.cache = cache;
        self
    }
    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }
    /// Number of redirects followed by the fetch in progress or the last
    /// failed one. Zero after every successful fetch.
    pub fn redirects(&self) -> usize {
        self.redirects
    }
    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }
    /// Drops the open connection if there is one
    pub fn disconnect(&mut self) {
        self.connection = None;
    }
    /// Request line and headers as written to the network
    pub fn serialize(&self) -> Vec<u8> {
        let mut head = format!("{} {} {}\r\n",
                               self.method, self.path, Version::Http11);
        for name in PREFERRED_ORDER.iter() {
            if let Some(value) = self.headers.get(name) {
                head.push_str(&format!("{}: {}\r\n", name, value));
            }
        }
        let mut rest = self.headers.iter()
            .filter(|&(name, _)| {
                !PREFERRED_ORDER.iter().any(|x| x.eq_ignore_ascii_case(name))
            })
            .collect::<Vec<_>>();
        rest.sort();
        for (name, value) in rest {
            head.push_str(&format!("{}: {}\r\n", name, value));
        }
        head.push_str("\r\n");
        head.into_bytes()
    }
    /// Copy of the request that fetches with `scheme`
    ///
    /// The open connection moves into the copy, the cache handle is shared.
    /// Use `reclaim` to take the connection back afterwards.
    pub(super) fn fork(&mut self, scheme: Scheme) -> Request {
        Request {
            scheme: scheme,
            host: self.host.clone(),
            port: self.port,
            path: self.path.clone(),
            method: self.method.clone(),
            headers: self.headers.clone(),
            connection: self.connection.take(),
            redirects: self.redirects,
            cache: self.cache.clone(),
            connector: self.connector.clone(),
        }
    }
    /// Takes back state from a copy made by `fork`
    ///
    /// The connection is kept only if the copy didn't leave this request's
    /// endpoint, a redirect elsewhere is not remembered.
    pub(super) fn reclaim(&mut self, mut fork: Request) {
        self.redirects = fork.redirects;
        self.connection = fork.connection.take()
            .filter(|c| c.is_for(fork.scheme, &self.host, self.port));
    }
    /// Moves the request to another origin
    ///
    /// Everything describing the target is taken from `url`, including
    /// a fresh set of headers and an empty cache. The open connection is
    /// closed.
    pub(super) fn retarget(&mut self, url: Url) {
        let user_agent = self.headers.get("User-Agent")
            .map(|x| x.to_string())
            .unwrap_or_else(|| Config::default().user_agent);
        self.headers = default_headers(&url, &user_agent);
        self.scheme = url.scheme;
        self.host = url.host;
        self.port = url.port;
        self.path = url.path;
        self.method = "GET".to_string();
        self.connection = None;
        self.cache = ResponseCache::new();
    }
}

#[cfg(test)]
mod test {
    use std::str::from_utf8;
    use std::time::Duration;

    use super::Request;
    use crate::client::{Config, Response, Scheme};
    use crate::shared::HeaderMap;
    use crate::client::url;

    #[test]
    fn test_default_headers() {
        let req = Request::parse("http://www.example.com:8080/a").unwrap();
        assert_eq!(req.scheme, Scheme::Http);
        assert_eq!(req.host, "example.com");
        assert_eq!(req.port, 8080);
        assert_eq!(req.method, "GET");
        assert_eq!(req.headers.get("Host"), Some("example.com"));
        assert_eq!(req.headers.get("Connection"), Some("keep-alive"));
        assert_eq!(req.headers.get("Accept-Encoding"), Some("gzip"));
        assert!(req.headers.get("User-Agent").unwrap()
                .starts_with("wirefetch/"));
        assert!(!req.is_connected());
        assert_eq!(req.redirects(), 0);
    }

    #[test]
    fn test_local_schemes_have_no_headers() {
        assert!(Request::parse("file:///tmp/x").unwrap().headers.is_empty());
        assert!(Request::parse("data:text/plain,x").unwrap()
                .headers.is_empty());
    }

    #[test]
    fn test_serialize_order() {
        let mut config = Config::default();
        config.user_agent = "test-agent".to_string();
        let mut req = Request::parse_with("http://example.com/a/b", config)
            .unwrap();
        req.headers.insert("Accept", "text/html");
        assert_eq!(from_utf8(&req.serialize()).unwrap(),
            "GET /a/b HTTP/1.1\r\n\
             Host: example.com\r\n\
             User-Agent: test-agent\r\n\
             Connection: keep-alive\r\n\
             Accept: text/html\r\n\
             Accept-Encoding: gzip\r\n\
             \r\n");
    }

    #[test]
    fn test_retarget() {
        let mut req = Request::parse("https://example.com/a").unwrap();
        req.headers.insert("X-Custom", "1");
        let old_cache = req.cache().clone();
        old_cache.store("/a", Response::synthesized(Scheme::Https,
            HeaderMap::new(), "old".to_string()), Duration::new(60, 0));
        req.retarget(url::parse("http://other.example:8080/b").unwrap());
        assert_eq!(req.scheme, Scheme::Http);
        assert_eq!(req.host, "other.example");
        assert_eq!(req.port, 8080);
        assert_eq!(req.path, "/b");
        assert_eq!(req.headers.get("Host"), Some("other.example"));
        assert_eq!(req.headers.get("X-Custom"), None);
        // new origin gets its own cache
        assert!(req.cache().is_empty());
        assert_eq!(old_cache.len(), 1);
    }
}
