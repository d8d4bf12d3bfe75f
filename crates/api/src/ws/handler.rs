use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use futures::StreamExt;
use tokio_util::sync::CancellationToken;
use xfer_core::tail::TailStreamer;
use xfer_core::truncation::TruncationListener;

use crate::error::AppResult;
use crate::state::AppState;
use crate::ws::sink::WsTailSink;

/// GET /ws/logs -- upgrade to a live tail of the log file.
///
/// The truncation listener is registered and the log is opened at
/// end-of-file *before* the upgrade completes, so the client never receives
/// content that predates the handshake. If the log cannot be opened the
/// request fails with a 500 instead of upgrading.
pub async fn logs_ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> AppResult<Response> {
    let truncations = state.truncation.subscribe().await;
    let streamer = TailStreamer::open(state.log_store.clone(), state.config.tail_config()).await?;

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, streamer, truncations, state)))
}

/// Drive one tail subscription until either side goes away.
///
/// The inbound half is drained on a separate task; a Close frame, a
/// receive error, or the end of the stream cancels the tail loop even while
/// it is waiting for new data.
async fn handle_socket(
    socket: WebSocket,
    streamer: TailStreamer,
    truncations: TruncationListener,
    state: AppState,
) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::debug!(conn_id = %conn_id, cursor = streamer.cursor(), "Log tail connected");

    let (sink, mut stream) = socket.split();

    let cancel: CancellationToken = state.shutdown.child_token();
    let recv_cancel = cancel.clone();
    let recv_conn_id = conn_id.clone();
    let recv_task = tokio::spawn(async move {
        while let Some(result) = stream.next().await {
            match result {
                Ok(Message::Close(_)) => break,
                Ok(_) => {}
                Err(e) => {
                    tracing::debug!(conn_id = %recv_conn_id, error = %e, "WebSocket receive error");
                    break;
                }
            }
        }
        recv_cancel.cancel();
    });

    let outcome = streamer
        .run(WsTailSink::new(sink), truncations, cancel)
        .await;

    recv_task.abort();
    tracing::debug!(conn_id = %conn_id, ?outcome, "Log tail disconnected");
}
