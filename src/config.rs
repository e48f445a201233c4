//! Service configuration, read from the process environment.
//!
//! | Variable | Default |
//! |---|---|
//! | `HOST` | `0.0.0.0` |
//! | `PORT` | `3000` |
//! | `API_KEY` | `mysecretapikey` |
//! | `SEED_SAMPLE_DATA` | `true` |

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

use crate::error::Error;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_API_KEY: &str = "mysecretapikey";

#[derive(Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    /// Pre-shared key required on mutating product requests.
    pub api_key: String,
    /// Start with the sample catalogue instead of an empty store.
    pub seed_sample_data: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            api_key: DEFAULT_API_KEY.to_owned(),
            seed_sample_data: true,
        }
    }
}

impl Config {
    /// Reads the process environment. Unset variables take their defaults;
    /// set but unparseable ones are an error.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Config::from_env) over any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let defaults = Self::default();
        Ok(Self {
            host: parse(&lookup, "HOST")?.unwrap_or(defaults.host),
            port: parse(&lookup, "PORT")?.unwrap_or(defaults.port),
            api_key: lookup("API_KEY").unwrap_or(defaults.api_key),
            seed_sample_data: parse_flag(&lookup, "SEED_SAMPLE_DATA")?
                .unwrap_or(defaults.seed_sample_data),
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("api_key", &"<redacted>")
            .field("seed_sample_data", &self.seed_sample_data)
            .finish()
    }
}

fn parse<T>(lookup: &impl Fn(&str) -> Option<String>, key: &'static str) -> Result<Option<T>, Error>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let Some(value) = lookup(key) else { return Ok(None) };
    let parsed = value.trim().parse::<T>();
    match parsed {
        Ok(v) => Ok(Some(v)),
        Err(e) => Err(Error::Config { key, value, reason: e.to_string() }),
    }
}

fn parse_flag(lookup: &impl Fn(&str) -> Option<String>, key: &'static str) -> Result<Option<bool>, Error> {
    let Some(value) = lookup(key) else { return Ok(None) };
    let flag = value.trim().to_ascii_lowercase();
    match flag.as_str() {
        "1" | "true" | "yes" | "on" => Ok(Some(true)),
        "0" | "false" | "no" | "off" => Ok(Some(false)),
        _ => Err(Error::Config { key, value, reason: "expected a boolean".to_owned() }),
    }
}
