pub mod config;
pub mod db;
pub mod error;
pub mod server;
pub mod service;
mod utils;

pub use error::{CoreError, CoreResult, ErrorKind};
pub use service::{Principal, Workspace};
