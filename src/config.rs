//! src/config.rs
//!
//! Defines the strongly-typed `Config` struct for all runtime parameters.
//! Resolution order, lowest to highest priority: hard-coded defaults, an
//! optional `config.toml`, `GOSSIP_`-prefixed environment variables, then
//! the deployment-topology facts carried by the mandatory positional CLI
//! arguments (`process_id`, `n_processes`, `port_no`), which always win for
//! the fields they cover.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Top-level struct holding all application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Historical compatibility field; not required to equal `port_no`.
    /// The node's `PeerId` is always derived from `port_no`.
    pub process_id: u32,
    pub n_processes: u16,
    pub port_no: u16,
    pub base_port: u16,
    pub gossip_interval_ms: u64,
    pub connect_timeout_ms: u64,
    pub max_frame_size: usize,
    pub enable_liveness_probe: bool,
}

/// The three positional CLI arguments: `<processID> <nProcesses> <portNo>`.
pub struct CliArgs {
    pub process_id: u32,
    pub n_processes: u16,
    pub port_no: u16,
}

impl Config {
    /// Loads configuration, merging `cli` in last so its fields always win.
    pub fn load(cli: CliArgs) -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("GOSSIP_"))
            .merge(Serialized::defaults(CliOverride {
                process_id: cli.process_id,
                n_processes: cli.n_processes,
                port_no: cli.port_no,
            }))
            .extract()
    }
}

/// Mirrors `CliArgs` but only the fields the CLI is authoritative for, so
/// merging it in leaves every other field from the lower-priority layers
/// untouched.
#[derive(Serialize)]
struct CliOverride {
    process_id: u32,
    n_processes: u16,
    port_no: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            process_id: 0,
            n_processes: 1,
            port_no: 20000,
            base_port: 20000,
            gossip_interval_ms: 10_000,
            connect_timeout_ms: 2_000,
            max_frame_size: 1024,
            enable_liveness_probe: true,
        }
    }
}
