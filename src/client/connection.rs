use std::io::{self, BufReader, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::time::Duration;

use log::debug;
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified};
use rustls::client::danger::ServerCertVerifier;
use rustls::crypto::{self, CryptoProvider};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{ClientConfig, ClientConnection, DigitallySignedStruct};
use rustls::{RootCertStore, SignatureScheme, StreamOwned};

use super::{Config, Error};
use super::url::Scheme;


/// A byte stream a request can be written to and a response read from
pub trait Stream: Read + Write + Send {}

impl<T: Read + Write + Send> Stream for T {}

/// Opens byte streams for network schemes
///
/// The implementation is expected to return a stream that is ready for
/// writing a request, i.e. for TLS the handshake should already be done.
/// Nothing is retried on failure.
pub trait Connect {
    fn connect(&self, scheme: Scheme, host: &str, port: u16)
        -> Result<Box<dyn Stream>, Error>;
}

/// Default connector: plain TCP for `http`, rustls for everything else
#[derive(Debug, Clone, Default)]
pub struct Net {
    config: Config,
}

/// An open connection owned by a request
///
/// Remembers the endpoint it was dialed for, so it's only ever reused for
/// the same scheme, host and port.
pub struct Connection {
    scheme: Scheme,
    host: String,
    port: u16,
    stream: BufReader<Box<dyn Stream>>,
}

impl Net {
    pub fn new(config: Config) -> Net {
        Net { config: config }
    }
    pub fn config(&self) -> &Config {
        &self.config
    }
    fn dial(&self, host: &str, port: u16) -> Result<TcpStream, Error> {
        let addr = format!("{}:{}", host, port);
        let bare = host.trim_start_matches('[').trim_end_matches(']');
        debug!("Dialing {}", addr);
        let sock = match self.config.connect_timeout {
            Some(timeout) => connect_timeout(bare, port, timeout),
            None => TcpStream::connect((bare, port)),
        }.map_err(|e| Error::Connect(addr.clone(), e))?;
        sock.set_read_timeout(self.config.read_timeout)
            .and_then(|()| sock.set_write_timeout(self.config.read_timeout))
            .and_then(|()| sock.set_nodelay(true))
            .map_err(|e| Error::Connect(addr, e))?;
        Ok(sock)
    }
    fn tls_config(&self) -> Result<ClientConfig, Error> {
        let provider = Arc::new(crypto::ring::default_provider());
        let builder = ClientConfig::builder_with_provider(provider.clone())
            .with_safe_default_protocol_versions()?;
        let config = if self.config.verify_certificates {
            let mut roots = RootCertStore::empty();
            roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
            builder.with_root_certificates(roots).with_no_client_auth()
        } else {
            builder.dangerous()
                .with_custom_certificate_verifier(
                    Arc::new(AcceptAnyCertificate(provider)))
                .with_no_client_auth()
        };
        Ok(config)
    }
    fn handshake(&self, host: &str, port: u16, mut sock: TcpStream)
        -> Result<StreamOwned<ClientConnection, TcpStream>, Error>
    {
        let bare = host.trim_start_matches('[').trim_end_matches(']');
        let name = ServerName::try_from(bare.to_string())
            .map_err(|_| Error::InvalidServerName(host.to_string()))?;
        let mut conn = ClientConnection::new(
            Arc::new(self.tls_config()?), name)?;
        while conn.is_handshaking() {
            conn.complete_io(&mut sock)
                .map_err(|e| Error::Connect(format!("{}:{}", host, port), e))?;
        }
        Ok(StreamOwned::new(conn, sock))
    }
}

fn connect_timeout(host: &str, port: u16, timeout: Duration)
    -> io::Result<TcpStream>
{
    let mut last_error = None;
    for addr in (host, port).to_socket_addrs()? {
        match TcpStream::connect_timeout(&addr, timeout) {
            Ok(sock) => return Ok(sock),
            Err(e) => last_error = Some(e),
        }
    }
    Err(last_error.unwrap_or_else(|| {
        io::Error::new(io::ErrorKind::NotFound, "host resolved to nothing")
    }))
}

impl Connect for Net {
    fn connect(&self, scheme: Scheme, host: &str, port: u16)
        -> Result<Box<dyn Stream>, Error>
    {
        let sock = self.dial(host, port)?;
        if scheme == Scheme::Http {
            Ok(Box::new(sock))
        } else {
            Ok(Box::new(self.handshake(host, port, sock)?))
        }
    }
}

impl Connection {
    pub fn open(connector: &dyn Connect, scheme: Scheme, host: &str,
        port: u16)
        -> Result<Connection, Error>
    {
        let stream = connector.connect(scheme, host, port)?;
        Ok(Connection {
            scheme: scheme,
            host: host.to_string(),
            port: port,
            stream: BufReader::new(stream),
        })
    }
    /// Returns true if connection was opened to exactly this endpoint
    pub fn is_for(&self, scheme: Scheme, host: &str, port: u16) -> bool {
        self.scheme == scheme && self.port == port && self.host == host
    }
    /// Writes full request head and flushes it to the network
    pub fn write_head(&mut self, head: &[u8]) -> Result<(), Error> {
        let stream = self.stream.get_mut();
        stream.write_all(head)?;
        stream.flush()?;
        Ok(())
    }
    /// Buffered reading side of the connection
    ///
    /// The buffer lives as long as the connection does, so bytes of the
    /// next response that were read ahead are not lost on reuse.
    pub fn reader(&mut self) -> &mut BufReader<Box<dyn Stream>> {
        &mut self.stream
    }
}

/// Certificate verifier that accepts any certificate chain
///
/// Handshake signatures are still checked, so the peer must own the key
/// of the certificate it presents. Only used when verification is off.
#[derive(Debug)]
struct AcceptAnyCertificate(Arc<CryptoProvider>);

impl ServerCertVerifier for AcceptAnyCertificate {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        crypto::verify_tls12_signature(message, cert, dss,
            &self.0.signature_verification_algorithms)
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        crypto::verify_tls13_signature(message, cert, dss,
            &self.0.signature_verification_algorithms)
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.0.signature_verification_algorithms.supported_schemes()
    }
}
