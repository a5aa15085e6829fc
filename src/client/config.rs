use std::time::Duration;


/// Settings for dialing connections
///
/// All the timeouts are optional. `None` means block as long as the
/// operating system lets us.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Time to wait for TCP connection to be established (per address)
    pub connect_timeout: Option<Duration>,
    /// Maximum time a single read or write on the socket may block
    pub read_timeout: Option<Duration>,
    /// Check server certificates against the webpki root store
    ///
    /// Off by default so that self-signed test servers work.
    pub verify_certificates: bool,
    /// Value of the `User-Agent` header of parsed requests
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            connect_timeout: Some(Duration::new(15, 0)),
            read_timeout: Some(Duration::new(120, 0)),
            verify_certificates: false,
            user_agent: concat!("wirefetch/", env!("CARGO_PKG_VERSION"))
                .to_string(),
        }
    }
}
