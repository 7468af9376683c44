use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:5000/api";
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Backend base path, without a trailing slash.
    pub api_base: String,
    pub host: IpAddr,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_base = lookup("NUTRITION_API_BASE")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let host = lookup("HOST")
            .and_then(|value| value.parse::<IpAddr>().ok())
            .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST));

        let port = lookup("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        Self {
            api_base: api_base.trim_end_matches('/').to_string(),
            host,
            port,
        }
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
