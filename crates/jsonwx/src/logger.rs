//! Injected logging capability.
//!
//! The fetcher, parser and polling loop report through an [`EventLog`] handed
//! to them at construction. [`LogFacade`] forwards to the `log` crate; the
//! binary wires that to `env_logger`.

use std::sync::Arc;

/// Sink for driver diagnostics.
pub trait EventLog: Send + Sync {
    fn debug(&self, msg: &str);
    fn info(&self, msg: &str);
    fn error(&self, msg: &str);
}

/// Shared handle passed to each component.
pub type SharedLog = Arc<dyn EventLog>;

/// Default [`EventLog`] backed by the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogFacade;

impl LogFacade {
    pub fn shared() -> SharedLog {
        Arc::new(Self)
    }
}

impl EventLog for LogFacade {
    fn debug(&self, msg: &str) {
        log::debug!(target: "jsonwx", "{msg}");
    }

    fn info(&self, msg: &str) {
        log::info!(target: "jsonwx", "{msg}");
    }

    fn error(&self, msg: &str) {
        log::error!(target: "jsonwx", "{msg}");
    }
}
