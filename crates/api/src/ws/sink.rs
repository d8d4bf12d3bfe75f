use axum::extract::ws::{close_code, CloseFrame, Message, WebSocket};
use futures::stream::SplitSink;
use futures::SinkExt;
use xfer_core::tail::{TailSink, TransportError};

/// Outbound half of a WebSocket connection used as a tail destination.
///
/// Each forwarded chunk becomes one text frame. A multi-byte character cut
/// by the read boundary is held back (at most 3 bytes) and sent with the
/// next chunk; genuinely invalid UTF-8 is replaced lossily.
pub struct WsTailSink {
    sink: SplitSink<WebSocket, Message>,
    pending: Vec<u8>,
}

impl WsTailSink {
    pub fn new(sink: SplitSink<WebSocket, Message>) -> Self {
        Self {
            sink,
            pending: Vec::new(),
        }
    }

    async fn send_text(&mut self, text: String) -> Result<(), TransportError> {
        self.sink
            .send(Message::Text(text.into()))
            .await
            .map_err(|e| TransportError(e.to_string()))
    }
}

impl TailSink for WsTailSink {
    async fn forward(&mut self, chunk: &[u8]) -> Result<(), TransportError> {
        self.pending.extend_from_slice(chunk);
        match take_complete_text(&mut self.pending) {
            Some(text) => self.send_text(text).await,
            None => Ok(()),
        }
    }

    async fn close(&mut self, reason: Option<String>) {
        if !self.pending.is_empty() {
            let rest = String::from_utf8_lossy(&self.pending).into_owned();
            self.pending.clear();
            let _ = self.send_text(rest).await;
        }
        let frame = reason.map(|reason| CloseFrame {
            code: close_code::ERROR,
            reason: reason.into(),
        });
        let _ = self.sink.send(Message::Close(frame)).await;
    }
}

/// Drain the longest sendable prefix of `pending` as text.
///
/// An incomplete sequence at the very end stays in `pending`. Returns
/// `None` when there is nothing to send yet.
fn take_complete_text(pending: &mut Vec<u8>) -> Option<String> {
    let ready = match std::str::from_utf8(pending) {
        Ok(_) => pending.len(),
        Err(e) if e.error_len().is_none() => e.valid_up_to(),
        Err(_) => pending.len(),
    };
    if ready == 0 {
        return None;
    }
    let rest = pending.split_off(ready);
    let text = String::from_utf8_lossy(pending).into_owned();
    *pending = rest;
    Some(text)
}
