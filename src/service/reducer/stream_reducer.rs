use super::decoder::Utf8Decoder;
use super::sse::{classify_line, SseLine};
use crate::entities::StreamChunk;

/// Reduces a chat-completion event stream into one assistant message.
///
/// Bytes go in through [`feed`](Self::feed) as they arrive; each call returns
/// the content fragments it completed, in arrival order. The accumulated text
/// is identical however the byte stream was segmented.
///
/// A `data:` line that is not valid JSON is held at the front of the buffer
/// until more bytes arrive. If another complete line shows up behind it, or
/// the stream ends, it can no longer resolve and is dropped with a warning.
#[derive(Debug, Default)]
pub struct StreamReducer {
    decoder: Utf8Decoder,
    buffer: String,
    content: String,
    done: bool,
    eof: bool,
    anomalies: usize,
}

impl StreamReducer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        if self.done || self.eof {
            return Vec::new();
        }
        let text = self.decoder.decode(chunk);
        self.buffer.push_str(&text);
        self.drain_lines()
    }

    /// Signals end of input; a trailing line without `\n` still counts.
    pub fn finish(&mut self) -> Vec<String> {
        if self.done || self.eof {
            return Vec::new();
        }
        let tail = self.decoder.finish();
        self.buffer.push_str(&tail);
        self.eof = true;
        if !self.buffer.is_empty() && !self.buffer.ends_with('\n') {
            self.buffer.push('\n');
        }
        let fragments = self.drain_lines();
        self.buffer.clear();
        fragments
    }

    /// `true` once `[DONE]` has been seen. Later bytes are ignored.
    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn into_content(self) -> String {
        self.content
    }

    /// Lines dropped because they never became valid JSON.
    pub fn anomalies(&self) -> usize {
        self.anomalies
    }

    fn drain_lines(&mut self) -> Vec<String> {
        let mut fragments = Vec::new();
        while !self.done {
            let Some(newline) = self.buffer.find('\n') else {
                break;
            };
            let raw: String = self.buffer.drain(..=newline).collect();
            let line = &raw[..raw.len() - 1];

            match classify_line(line) {
                SseLine::Skip => {}
                SseLine::Done => {
                    self.done = true;
                    self.buffer.clear();
                }
                SseLine::Data(payload) => match parse_payload(payload) {
                    Ok(Some(fragment)) => {
                        self.content.push_str(&fragment);
                        fragments.push(fragment);
                    }
                    Ok(None) => {}
                    Err(e) if self.eof || self.buffer.contains('\n') => {
                        self.anomalies += 1;
                        log::warn!("Dropping unparseable stream line ({}): {}", e, payload);
                    }
                    Err(_) => {
                        self.buffer.insert_str(0, &raw);
                        break;
                    }
                },
            }
        }
        fragments
    }
}

/// `choices[0].delta.content` of a payload. Valid JSON of any other shape
/// carries no content.
fn parse_payload(payload: &str) -> serde_json::Result<Option<String>> {
    let value: serde_json::Value = serde_json::from_str(payload)?;
    Ok(serde_json::from_value::<StreamChunk>(value)
        .ok()
        .and_then(|chunk| chunk.content().map(str::to_string)))
}
