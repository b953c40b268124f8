//! # Adapters
//!
//! Concrete implementations of the ports.
//!
//! ## Adapters Provided
//!
//! - `SystemTimeSource` - Production time source using the system clock
//! - `StaticConfigProvider` - Config built in code
//! - `TomlConfigProvider` - Config file loading (requires "toml-config" feature)
//! - `OutboxRegistry` / `ClientOutbox` - Per-identity outbound queues (requires "runtime")
//! - `BrokerRuntime` - tokio worker pool, sweep ticker and shutdown (requires "runtime")

/// Configuration providers
pub mod config;
/// Time source adapters
pub mod time;

#[cfg(feature = "runtime")]
pub mod outbox;
#[cfg(feature = "runtime")]
pub mod runtime;

pub use config::StaticConfigProvider;
pub use time::SystemTimeSource;

#[cfg(feature = "toml-config")]
pub use config::TomlConfigProvider;

#[cfg(feature = "runtime")]
pub use outbox::{ClientOutbox, OutboxRegistry};
#[cfg(feature = "runtime")]
pub use runtime::BrokerRuntime;

/// Errors from submitting work to a running broker.
#[cfg(feature = "runtime")]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
    /// Shutdown has started; no new packets are accepted.
    #[error("broker is shutting down")]
    ShuttingDown,

    /// The worker queue was closed before the packet could be queued.
    #[error("worker queue closed")]
    Closed,
}
