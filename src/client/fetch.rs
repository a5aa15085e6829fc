use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::shared::HeaderMap;
use crate::shared::headers::{cache_directive, CacheDirective};
use super::{Error, Request, Response, MAX_REDIRECTS};
use super::connection::Connection;
use super::parser::read_response;
use super::url::{self, Scheme};


impl Request {
    /// Fetches the resource, following redirects
    ///
    /// Blocks until the whole response is read. On success the redirect
    /// counter is back at zero, the connection is kept for the next call
    /// if the server allows that, and the response may have been put into
    /// the cache.
    pub fn send(&mut self) -> Result<Response, Error> {
        self.redirects = 0;
        self.dispatch()
    }

    fn dispatch(&mut self) -> Result<Response, Error> {
        match self.scheme {
            Scheme::ViewSource => self.send_view_source(),
            Scheme::Http | Scheme::Https => self.fetch_network(),
            Scheme::File => self.read_file(),
            Scheme::Data => Ok(self.inline_data()),
        }
    }

    fn send_view_source(&mut self) -> Result<Response, Error> {
        let mut fork = self.fork(Scheme::Https);
        let result = fork.dispatch();
        self.reclaim(fork);
        let mut response = result?;
        response.scheme = Scheme::ViewSource;
        Ok(response)
    }

    fn read_file(&self) -> Result<Response, Error> {
        let data = fs::read(&self.host)
            .map_err(|e| Error::LocalIo(PathBuf::from(&self.host), e))?;
        Ok(Response::synthesized(Scheme::File, HeaderMap::new(),
            String::from_utf8_lossy(&data).into_owned()))
    }

    fn inline_data(&self) -> Response {
        let mut headers = HeaderMap::new();
        headers.insert("Content-Type", self.host.clone());
        Response::synthesized(Scheme::Data, headers, self.path.clone())
    }

    fn fetch_network(&mut self) -> Result<Response, Error> {
        if let Some(response) = self.cache.lookup(&self.path, Instant::now()) {
            debug!("Cache hit for {}", self.path);
            return Ok(response);
        }
        let response = self.round_trip()?;
        // Empty `Location` is the same as none
        let location = response.headers.get("Location")
            .map(|x| x.trim())
            .filter(|x| !x.is_empty())
            .map(|x| x.to_string());
        if let Some(location) = location {
            return self.follow_redirect(&location);
        }
        self.redirects = 0;
        if let Some(value) = response.headers.get("Cache-Control") {
            match cache_directive(value) {
                CacheDirective::MaxAge(seconds) => {
                    debug!("Caching {} for {} seconds", self.path, seconds);
                    self.cache.store(&self.path, response.clone(),
                                     Duration::new(seconds, 0));
                }
                CacheDirective::InvalidMaxAge => {
                    warn!("Not caching {}, bad Cache-Control: {:?}",
                          self.path, value);
                }
                CacheDirective::Forbidden | CacheDirective::Unspecified => {}
            }
        }
        Ok(response)
    }

    /// Writes the request and reads the response on an owned connection
    ///
    /// The connection is put back only if the exchange succeeded and the
    /// server didn't ask to close it.
    fn round_trip(&mut self) -> Result<Response, Error> {
        let mut conn = match self.connection.take() {
            Some(conn) if conn.is_for(self.scheme, &self.host, self.port) => {
                debug!("Reusing connection to {}:{}", self.host, self.port);
                conn
            }
            _ => Connection::open(&*self.connector,
                                  self.scheme, &self.host, self.port)?,
        };
        let result = conn.write_head(&self.serialize())
            .and_then(|()| read_response(conn.reader(), self.scheme));
        match result {
            Ok((response, keep_alive)) => {
                if keep_alive {
                    self.connection = Some(conn);
                } else {
                    debug!("Connection to {}:{} is closed by the server",
                           self.host, self.port);
                }
                Ok(response)
            }
            Err(e) => {
                warn!("Dropping connection to {}:{}: {}",
                      self.host, self.port, e);
                Err(e)
            }
        }
    }

    fn follow_redirect(&mut self, location: &str) -> Result<Response, Error> {
        if self.redirects >= MAX_REDIRECTS {
            let hops = self.redirects;
            self.redirects = 0;
            return Err(Error::TooManyRedirects(hops));
        }
        self.redirects += 1;
        info!("Redirecting to {} (hop {})", location, self.redirects);

        if location.starts_with("//") {
            // Network-path reference, keeps the scheme only
            let absolute = format!("{}:{}", self.scheme, location);
            return self.follow_absolute(&absolute);
        }
        if location.starts_with('/') {
            self.path = location.to_string();
            return self.fetch_network();
        }
        self.follow_absolute(location)
    }

    fn follow_absolute(&mut self, location: &str) -> Result<Response, Error> {
        let target = url::parse(location)?;
        if !target.scheme.is_network() {
            return Err(Error::InvalidRedirect(location.to_string()));
        }
        if target.scheme != self.scheme || target.host != self.host
            || target.port != self.port
        {
            self.retarget(target);
            return self.dispatch();
        }
        self.path = target.path;
        self.fetch_network()
    }
}
