use std::io::{self, Write};
use std::process::exit;
use std::thread::sleep;
use std::time::Duration;

use argparse::{ArgumentParser, Store, StoreOption, StoreTrue};
use log::debug;

use wirefetch::{Config, Request};
use wirefetch::render::render;


fn main() {
    env_logger::init();

    let mut url = "file://test.html".to_string();
    let mut repeat = 1u32;
    let mut interval = 1u64;
    let mut verify = false;
    let mut connect_timeout = None::<u64>;
    let mut read_timeout = None::<u64>;
    {
        let mut ap = ArgumentParser::new();
        ap.set_description("Fetches a url and prints it as plain text");
        ap.refer(&mut url)
            .add_argument("url", Store,
                "Url to fetch: http, https, file, data or view-source");
        ap.refer(&mut repeat)
            .add_option(&["-n", "--repeat"], Store,
                "Fetch the url this many times (default 1)");
        ap.refer(&mut interval)
            .add_option(&["--interval"], Store,
                "Seconds to sleep between repeated fetches (default 1)");
        ap.refer(&mut verify)
            .add_option(&["--verify-certs"], StoreTrue,
                "Verify TLS certificates against the webpki roots");
        ap.refer(&mut connect_timeout)
            .add_option(&["--connect-timeout"], StoreOption,
                "Connection timeout in seconds (default 15)");
        ap.refer(&mut read_timeout)
            .add_option(&["--read-timeout"], StoreOption,
                "Socket read and write timeout in seconds (default 120)");
        ap.parse_args_or_exit();
    }

    let mut config = Config::default();
    config.verify_certificates = verify;
    if let Some(secs) = connect_timeout {
        config.connect_timeout = Some(Duration::new(secs, 0));
    }
    if let Some(secs) = read_timeout {
        config.read_timeout = Some(Duration::new(secs, 0));
    }

    let mut req = match Request::parse_with(&url, config) {
        Ok(req) => req,
        Err(e) => {
            eprintln!("wirefetch: {}", e);
            exit(1);
        }
    };
    for i in 0..repeat {
        if i > 0 {
            sleep(Duration::new(interval, 0));
        }
        match req.send() {
            Ok(resp) => {
                debug!("Fetched {}: {:?}", url, resp.status);
                print!("{}", render(&resp));
                io::stdout().flush().ok();
            }
            Err(e) => {
                eprintln!("wirefetch: {}", e);
                exit(2);
            }
        }
    }
}
