//! Streaming chat support: progress events and incremental text decoding.

use natter_core::NatterError;

/// Progress of one streamed chat exchange.
#[derive(Debug, Clone)]
pub enum ChatEvent {
    /// The response status was checked and the body stream is open.
    Opened,
    /// A decoded piece of assistant text.
    Chunk(String),
    /// The stream ended normally.
    Done,
    /// The request or the stream failed.
    Failed(NatterError),
}

/// Incremental UTF-8 decoder for streamed response bodies.
///
/// The service chunks its response at arbitrary byte boundaries, so a
/// multi-byte sequence may arrive split across chunks. Incomplete trailing
/// bytes are held back until the sequence completes; genuinely invalid
/// bytes are replaced rather than failing the stream.
#[derive(Debug, Default)]
pub struct StreamDecoder {
    pending: Vec<u8>,
}

impl StreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes the next chunk, returning all text that is complete so far.
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        self.pending.extend_from_slice(chunk);
        match std::str::from_utf8(&self.pending) {
            Ok(text) => {
                let out = text.to_string();
                self.pending.clear();
                out
            }
            Err(err) if err.error_len().is_none() => {
                // incomplete trailing sequence: hold it for the next chunk
                let valid = err.valid_up_to();
                let out = String::from_utf8_lossy(&self.pending[..valid]).into_owned();
                self.pending.drain(..valid);
                out
            }
            Err(_) => {
                let out = String::from_utf8_lossy(&self.pending).into_owned();
                self.pending.clear();
                out
            }
        }
    }

    /// Flushes whatever is still held back at end of stream.
    pub fn finish(&mut self) -> String {
        if self.pending.is_empty() {
            return String::new();
        }
        let out = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        out
    }
}
