use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

pub mod cors;
pub mod security;

pub use cors::create_cors_layer;
pub use security::{apply_security_headers, hsts_enabled_from_env};

const DEFAULT_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SNAPSHOT: &str = "eventhub.json";

pub struct Config {
    pub bind_addr: SocketAddr,
    pub snapshot_path: PathBuf,
    pub seed_demo: bool,
}

impl Config {
    pub fn from_env() -> Self {
        let bind_addr = env::var("EVENTHUB_ADDR")
            .ok()
            .and_then(|raw| match raw.parse() {
                Ok(addr) => Some(addr),
                Err(e) => {
                    tracing::warn!("Invalid EVENTHUB_ADDR '{}': {}", raw, e);
                    None
                }
            })
            .unwrap_or_else(|| {
                DEFAULT_ADDR
                    .parse()
                    .unwrap_or_else(|_| SocketAddr::from(([0, 0, 0, 0], 8080)))
            });

        let snapshot_path = env::var("EVENTHUB_SNAPSHOT")
            .unwrap_or_else(|_| DEFAULT_SNAPSHOT.to_string())
            .into();

        let seed_demo = env::var("EVENTHUB_SEED")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Self {
            bind_addr,
            snapshot_path,
            seed_demo,
        }
    }
}
