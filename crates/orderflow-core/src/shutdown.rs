use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::info;

/// Grace window allotted to servers and workers after a shutdown signal.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// Returns a token that is cancelled when the process receives SIGINT.
///
/// Every long-running loop should hold a child of this token and `select!`
/// on `cancelled()` at its suspension points.
pub fn shutdown_token() -> CancellationToken {
    let token = CancellationToken::new();
    let signal_token = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown signal received");
            signal_token.cancel();
        }
    });
    token
}
