// 服务器模块入口
// 提供连接接受循环和优雅停机

pub mod connection;
pub mod listener;
pub mod signal;

pub use listener::create_listener;
pub use signal::shutdown_signal;

use hyper_util::server::graceful::GracefulShutdown;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::AppState;
use crate::logger;

/// Accept connections until `shutdown` resolves, then drain in-flight connections
/// for up to the configured shutdown timeout.
pub async fn run<F>(listener: TcpListener, state: Arc<AppState>, shutdown: F)
where
    F: Future<Output = ()>,
{
    let graceful = GracefulShutdown::new();
    let active_connections = Arc::new(AtomicUsize::new(0));
    let shutdown_timeout = state.config.performance.shutdown_timeout();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        connection::accept_connection(
                            stream,
                            peer_addr,
                            &state,
                            &active_connections,
                            &graceful,
                        );
                    }
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            () = &mut shutdown => break,
        }
    }

    drop(listener);
    logger::log_shutdown_started(active_connections.load(Ordering::SeqCst));

    tokio::select! {
        () = graceful.shutdown() => tracing::info!("All connections closed"),
        () = tokio::time::sleep(shutdown_timeout) => {
            logger::log_warning(&format!(
                "Shutdown timeout after {} seconds, closing remaining connections",
                shutdown_timeout.as_secs()
            ));
        }
    }
}
