//! Session, configuration and HTTP API behind the `codenn-vis` binary.

pub mod config;
pub mod flags;
pub mod http_api;
pub mod session;

pub use config::{DuplicatePolicy, SessionConfig, VisConfig, DEFAULT_CONFIG_FILE};
pub use http_api::{router, SharedSession};
pub use session::{SampleReport, Session};
