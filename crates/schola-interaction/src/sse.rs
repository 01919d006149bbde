//! Incremental decoder for `text/event-stream` payloads.
//!
//! Provider chunks arrive split at arbitrary byte boundaries; the decoder
//! buffers until a full event (terminated by a blank line) is available
//! and yields the concatenated `data:` payload of each event.

/// Streaming SSE decoder.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: String,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds raw bytes and returns the data payloads of every event
    /// completed by this chunk.
    ///
    /// Non-UTF-8 input is replaced lossily; provider streams are UTF-8.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buffer
            .push_str(&String::from_utf8_lossy(bytes).replace('\r', ""));

        let mut payloads = Vec::new();
        while let Some(boundary) = self.buffer.find("\n\n") {
            let event: String = self.buffer.drain(..boundary + 2).collect();
            let data_lines: Vec<&str> = event
                .lines()
                .filter_map(|line| line.strip_prefix("data:"))
                .map(|payload| payload.strip_prefix(' ').unwrap_or(payload))
                .collect();
            if !data_lines.is_empty() {
                payloads.push(data_lines.join("\n"));
            }
        }
        payloads
    }
}
