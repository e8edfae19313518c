pub mod config;
pub mod error;
pub mod estimate;
pub mod server;
pub mod vision;

pub use error::{Error, ErrorKind, Result};
