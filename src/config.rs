use crate::storage::resolve_data_path;
use std::{
    env,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_PROXY_PORT: u16 = 8081;
pub const DEFAULT_UPSTREAM_ORIGIN: &str = "http://127.0.0.1:8080/";
pub const DEFAULT_PROXY_HOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub addr: SocketAddr,
    pub data_path: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, std::io::Error> {
        Ok(Self {
            addr: SocketAddr::from(([0, 0, 0, 0], port_from_env("PORT", DEFAULT_PORT))),
            data_path: resolve_data_path()?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub addr: SocketAddr,
    pub upstream_origin: String,
}

impl ProxyConfig {
    pub fn from_env() -> Self {
        let upstream_origin =
            env::var("UPSTREAM_ORIGIN").unwrap_or_else(|_| DEFAULT_UPSTREAM_ORIGIN.to_string());
        Self {
            addr: SocketAddr::new(
                host_or(env::var("PROXY_HOST").ok().as_deref(), DEFAULT_PROXY_HOST),
                port_from_env("PROXY_PORT", DEFAULT_PROXY_PORT),
            ),
            upstream_origin,
        }
    }
}

fn port_from_env(var: &str, default: u16) -> u16 {
    env::var(var)
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(default)
}

fn host_or(value: Option<&str>, default: IpAddr) -> IpAddr {
    value
        .and_then(|value| value.parse::<IpAddr>().ok())
        .unwrap_or(default)
}
