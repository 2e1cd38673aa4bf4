use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Runtime settings read from the environment (and `.env`, via dotenvy).
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub peers: Vec<String>,
    pub peer_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port: u16 = lookup("PORT").and_then(|v| v.parse().ok()).unwrap_or(8080);
        let data_dir = lookup("CHAIN_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("data"));
        let peers = lookup("CHAIN_PEERS")
            .map(|v| parse_peers(&v))
            .unwrap_or_default();
        let timeout_ms: u64 = lookup("CHAIN_PEER_TIMEOUT_MS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(2000);

        Self {
            host,
            port,
            data_dir,
            peers,
            peer_timeout: Duration::from_millis(timeout_ms),
        }
    }
}

fn parse_peers(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|p| p.trim().trim_end_matches('/'))
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}
