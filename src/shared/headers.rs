use std::collections::HashMap;
use std::collections::hash_map;


/// Header mapping with unique, case-insensitive names
///
/// The name is stored as it was last inserted so it's written back to the
/// wire in the same spelling. Inserting a name that is already present
/// (in any letter case) replaces both the spelling and the value, so the
/// last header of a duplicated pair wins.
///
/// Iteration order is unspecified. Serializers that need a particular order
/// must impose it themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    entries: HashMap<String, (String, String)>,
}

pub struct Iter<'a>(hash_map::Values<'a, String, (String, String)>);

impl HeaderMap {
    pub fn new() -> HeaderMap {
        HeaderMap { entries: HashMap::new() }
    }
    /// Set the header, returns previous value if there was one
    pub fn insert<N, V>(&mut self, name: N, value: V) -> Option<String>
        where N: Into<String>, V: Into<String>
    {
        let name = name.into();
        self.entries.insert(name.to_ascii_lowercase(), (name, value.into()))
            .map(|(_, old)| old)
    }
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(&name.to_ascii_lowercase())
            .map(|&(_, ref value)| &value[..])
    }
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&name.to_ascii_lowercase())
    }
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.entries.remove(&name.to_ascii_lowercase()).map(|(_, v)| v)
    }
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
    /// Iterate over `(name, value)` pairs in unspecified order
    pub fn iter(&self) -> Iter {
        Iter(self.entries.values())
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a str);
    fn next(&mut self) -> Option<(&'a str, &'a str)> {
        self.0.next().map(|&(ref name, ref value)| (&name[..], &value[..]))
    }
}

impl<'a> IntoIterator for &'a HeaderMap {
    type Item = (&'a str, &'a str);
    type IntoIter = Iter<'a>;
    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

fn tokens<'a>(val: &'a str) -> impl Iterator<Item=&'a str> + 'a {
    val.split(',').map(|x| x.trim()).filter(|x| !x.is_empty())
}

#[inline(always)]
// Transfer-Encoding value, only the last coding decides framing
pub fn is_chunked(val: &str) -> bool {
    tokens(val).last().map_or(false, |x| x.eq_ignore_ascii_case("chunked"))
}

#[inline(always)]
// Connection header value
pub fn is_close(val: &str) -> bool {
    tokens(val).any(|x| x.eq_ignore_ascii_case("close"))
}

#[inline(always)]
// Content-Encoding or Transfer-Encoding value
pub fn is_gzip(val: &str) -> bool {
    tokens(val).any(|x| {
        x.eq_ignore_ascii_case("gzip") || x.eq_ignore_ascii_case("x-gzip")
    })
}

/// Outcome of looking at a `Cache-Control` header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheDirective {
    /// `no-cache` or `no-store` present
    Forbidden,
    /// Cacheable for the number of seconds
    MaxAge(u64),
    /// Neither a prohibition nor a `max-age`
    Unspecified,
    /// `max-age` is there but it's not a number
    InvalidMaxAge,
}

pub fn cache_directive(val: &str) -> CacheDirective {
    use self::CacheDirective::*;
    let mut result = Unspecified;
    for token in tokens(val) {
        if token.eq_ignore_ascii_case("no-cache")
            || token.eq_ignore_ascii_case("no-store")
        {
            return Forbidden;
        }
        let mut pair = token.splitn(2, '=');
        let name = pair.next().unwrap_or("").trim();
        if name.eq_ignore_ascii_case("max-age") && result == Unspecified {
            let value = pair.next().unwrap_or("").trim().trim_matches('"');
            result = match value.parse() {
                Ok(secs) => MaxAge(secs),
                Err(_) => InvalidMaxAge,
            };
        }
    }
    result
}

#[cfg(test)]
mod test {
    use super::{HeaderMap, is_chunked, is_close, is_gzip};
    use super::{cache_directive, CacheDirective};

    #[test]
    fn test_case_insensitive_get() {
        let mut map = HeaderMap::new();
        map.insert("Content-Length", "5");
        assert_eq!(map.get("content-length"), Some("5"));
        assert_eq!(map.get("CONTENT-LENGTH"), Some("5"));
        assert!(map.contains("Content-length"));
        assert_eq!(map.get("Content-Type"), None);
    }

    #[test]
    fn test_last_wins() {
        let mut map = HeaderMap::new();
        assert_eq!(map.insert("X-Thing", "one"), None);
        assert_eq!(map.insert("x-thing", "two"), Some("one".to_string()));
        assert_eq!(map.len(), 1);
        assert_eq!(map.iter().collect::<Vec<_>>(), vec![("x-thing", "two")]);
    }

    #[test]
    fn test_chunked() {
        assert!(is_chunked("chunked"));
        assert!(is_chunked("Chunked"));
        assert!(is_chunked("chuNKED"));
        assert!(is_chunked("   CHUNKED  "));
        assert!(is_chunked("gzip, chunked"));
        assert!(!is_chunked("chunked, gzip"));
        assert!(!is_chunked("identity"));
        assert!(!is_chunked(""));
    }

    #[test]
    fn test_close() {
        assert!(is_close("close"));
        assert!(is_close("Close"));
        assert!(is_close("   close   "));
        assert!(is_close("keep-alive, close"));
        assert!(!is_close("keep-alive"));
    }

    #[test]
    fn test_gzip() {
        assert!(is_gzip("gzip"));
        assert!(is_gzip("GZIP"));
        assert!(is_gzip("x-gzip"));
        assert!(is_gzip("gzip, chunked"));
        assert!(!is_gzip("deflate"));
    }

    #[test]
    fn test_cache_directive() {
        use self::CacheDirective::*;
        assert_eq!(cache_directive("max-age=60"), MaxAge(60));
        assert_eq!(cache_directive("public, max-age=3600"), MaxAge(3600));
        assert_eq!(cache_directive("MAX-AGE=10, public"), MaxAge(10));
        assert_eq!(cache_directive("max-age=60, no-cache"), Forbidden);
        assert_eq!(cache_directive("no-store"), Forbidden);
        assert_eq!(cache_directive("private"), Unspecified);
        assert_eq!(cache_directive("max-age=soon"), InvalidMaxAge);
    }
}
