//! Default collaborators that report through `tracing`.

use ihome_common::{Navigator, Notifier};
use tracing::{error, info};

/// Emits user-facing messages as `error` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn error(&self, message: &str) {
        error!(target: "ihome::notify", %message, "user notification");
    }
}

/// Records redirects as `info` events; there is no UI to navigate.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingNavigator;

impl Navigator for LoggingNavigator {
    fn redirect(&self, route: &str) {
        info!(target: "ihome::navigate", %route, "redirect requested");
    }
}
