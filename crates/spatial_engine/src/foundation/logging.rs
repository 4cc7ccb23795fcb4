//! Logging setup
//!
//! The engine logs through the `log` facade. Hosts pick the backend; `init`
//! wires `env_logger` for binaries that have no opinion.

pub use log::{debug, error, info, trace, warn};

/// Initialize `env_logger`, honouring `RUST_LOG`
///
/// Safe to call more than once; later calls are ignored.
pub fn init() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
