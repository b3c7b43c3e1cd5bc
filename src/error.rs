//! src/error.rs
//!
//! Defines the library's custom, comprehensive `Error` enum using `thiserror`.

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] figment::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid peer id {0:?}: must be non-empty and whitespace-free")]
    InvalidPeerId(String),

    #[error("port {port} is outside the deployment roster [{base}, {max})")]
    PortOutsideRoster { port: u16, base: u16, max: u16 },
}
