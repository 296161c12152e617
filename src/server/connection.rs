// Connection handling module
// Accepts a single TCP connection and serves it with hyper

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::{TokioIo, TokioTimer};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;

use crate::config::AppState;
use crate::handler;
use crate::http;
use crate::logger;

/// Check the connection limit, then serve the connection on its own task.
///
/// The counter is incremented before the limit check so concurrent accepts
/// cannot both slip under the limit.
pub fn accept_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<AppState>,
    conn_counter: &Arc<AtomicUsize>,
) {
    let prev_count = conn_counter.fetch_add(1, Ordering::SeqCst);

    if let Some(max_conn) = state.config.performance.max_connections {
        if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
            conn_counter.fetch_sub(1, Ordering::SeqCst);
            logger::log_warning(&format!(
                "Max connections reached: {prev_count}/{max_conn}. Connection rejected."
            ));
            drop(stream);
            return;
        }
    }

    logger::log_connection_accepted(&peer_addr);

    tokio::spawn(serve_connection(
        stream,
        peer_addr,
        Arc::clone(state),
        Arc::clone(conn_counter),
    ));
}

/// Serve HTTP/1.1 on the stream, then release the connection slot.
///
/// Waiting for the next request head on a kept-alive connection is bounded
/// by `keep_alive_timeout`; each request is bounded by
/// `max(read_timeout, write_timeout)`.
async fn serve_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
    conn_counter: Arc<AtomicUsize>,
) {
    let io = TokioIo::new(stream);

    let performance = &state.config.performance;
    let request_timeout =
        Duration::from_secs(std::cmp::max(performance.read_timeout, performance.write_timeout));
    let keep_alive = performance.keep_alive_timeout > 0;
    let header_timeout = if keep_alive {
        Duration::from_secs(performance.keep_alive_timeout)
    } else {
        Duration::from_secs(performance.read_timeout)
    };

    let mut builder = http1::Builder::new();
    builder
        .timer(TokioTimer::new())
        .keep_alive(keep_alive)
        .header_read_timeout(header_timeout);

    let service_state = Arc::clone(&state);
    let conn = builder.serve_connection(
        io,
        service_fn(move |req| {
            let state = Arc::clone(&service_state);
            async move {
                let handled = handler::handle_request(req, state, Some(peer_addr));
                match tokio::time::timeout(request_timeout, handled).await {
                    Ok(response) => response,
                    Err(_) => {
                        logger::log_warning(&format!(
                            "Request from {peer_addr} timed out after {} seconds",
                            request_timeout.as_secs()
                        ));
                        Ok(http::build_500_response())
                    }
                }
            }
        }),
    );

    if let Err(err) = conn.await {
        if err.is_timeout() {
            logger::log_debug(&format!("Idle connection from {peer_addr} closed: {err}"));
        } else {
            logger::log_connection_error(&err);
        }
    }

    conn_counter.fetch_sub(1, Ordering::SeqCst);
}
