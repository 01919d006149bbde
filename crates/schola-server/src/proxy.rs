//! The AI proxy endpoint.
//!
//! A single POST interface that forwards chat-completion payloads to the
//! upstream provider. `stream=false` returns the completion object as
//! one JSON body; `stream=true` returns a `text/event-stream` of
//! `data: <json>` frames, terminated implicitly by connection close.

use crate::bootstrap::AppContext;
use crate::routes::{error_body, header, respond_json};
use schola_interaction::ChatCompletionRequest;
use std::io::Read;
use std::sync::Arc;
use std::sync::mpsc;
use tiny_http::{Request, Response, StatusCode};
use tokio::runtime::Handle;

/// Frames one JSON payload as a server-sent event.
pub(crate) fn sse_frame(json: &str) -> String {
    format!("data: {json}\n\n")
}

/// Bridges the async upstream stream into tiny_http's blocking response
/// writer.
struct ChannelReader {
    rx: mpsc::Receiver<Vec<u8>>,
    pending: Vec<u8>,
    offset: usize,
}

impl ChannelReader {
    fn new(rx: mpsc::Receiver<Vec<u8>>) -> Self {
        Self {
            rx,
            pending: Vec::new(),
            offset: 0,
        }
    }
}

impl Read for ChannelReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        if self.offset >= self.pending.len() {
            match self.rx.recv() {
                Ok(chunk) => {
                    self.pending = chunk;
                    self.offset = 0;
                }
                // All senders dropped: the stream is complete.
                Err(_) => return Ok(0),
            }
        }
        let available = &self.pending[self.offset..];
        let n = available.len().min(buf.len());
        buf[..n].copy_from_slice(&available[..n]);
        self.offset += n;
        Ok(n)
    }
}

/// Handles `POST /api/ai-proxy`.
pub fn handle(mut request: Request, ctx: Arc<AppContext>, handle: Handle) {
    let mut body = String::new();
    if request.as_reader().read_to_string(&mut body).is_err() {
        respond_json(
            request,
            400,
            &error_body("invalid request body", "body is not readable UTF-8"),
        );
        return;
    }

    let chat_request: ChatCompletionRequest = match serde_json::from_str(&body) {
        Ok(parsed) => parsed,
        Err(e) => {
            respond_json(request, 400, &error_body("invalid request body", e));
            return;
        }
    };

    let Some(client) = ctx.proxy_client.clone() else {
        respond_json(
            request,
            500,
            &error_body("chat provider offline", "OPENAI_API_KEY is not configured"),
        );
        return;
    };

    if chat_request.stream {
        stream_completion(request, client, chat_request, handle);
    } else {
        match handle.block_on(client.chat(&chat_request)) {
            Ok(completion) => respond_json(request, 200, &completion),
            Err(e) => {
                tracing::warn!("[Proxy] Upstream completion failed: {e}");
                respond_json(request, 500, &error_body("upstream provider error", e));
            }
        }
    }
}

fn stream_completion(
    request: Request,
    client: schola_interaction::OpenAiApiClient,
    chat_request: ChatCompletionRequest,
    handle: Handle,
) {
    let mut upstream = match handle.block_on(client.stream_chat(&chat_request)) {
        Ok(rx) => rx,
        Err(e) => {
            tracing::warn!("[Proxy] Upstream stream failed to start: {e}");
            respond_json(request, 500, &error_body("upstream provider error", e));
            return;
        }
    };

    let (tx, rx) = mpsc::channel::<Vec<u8>>();
    handle.spawn(async move {
        while let Some(item) = upstream.recv().await {
            match item {
                Ok(chunk) => {
                    let frame = sse_frame(&chunk.to_string());
                    if tx.send(frame.into_bytes()).is_err() {
                        // Client hung up; stop forwarding.
                        return;
                    }
                }
                Err(e) => {
                    // Dropping the sender closes the response stream.
                    tracing::warn!("[Proxy] Upstream stream interrupted: {e}");
                    return;
                }
            }
        }
    });

    let response = Response::new(
        StatusCode(200),
        vec![
            header("Content-Type", "text/event-stream"),
            header("Cache-Control", "no-cache"),
        ],
        ChannelReader::new(rx),
        None,
        None,
    );
    let _ = request.respond(response);
}
