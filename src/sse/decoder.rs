//! Push-style line decoder for the chat event stream.

use super::error::SseError;
use super::{StreamEvent, StreamRecord, MAX_LINE_BYTES};

const DATA_MARKER: &str = "data:";

/// Incremental decoder: feed raw bytes, collect decoded events.
///
/// Bytes are buffered until a `\n` arrives, so a UTF-8 sequence or a JSON record
/// split across network chunks decodes correctly. Once a `complete` record has
/// been decoded the decoder is finished and ignores all further input.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    /// Prefix of `buffer` already searched for `\n`.
    scanned: usize,
    finished: bool,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once a `complete` record was seen.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Consume a chunk of bytes and return every event completed by it.
    ///
    /// Any line longer than [`MAX_LINE_BYTES`], terminated or not, fails with
    /// [`SseError::LineTooLong`] and discards the buffered input.
    pub fn feed(&mut self, bytes: &[u8]) -> Result<Vec<StreamEvent>, SseError> {
        let mut events = Vec::new();
        if self.finished {
            return Ok(events);
        }

        self.buffer.extend_from_slice(bytes);

        let mut start = 0;
        let mut search_from = self.scanned;
        while let Some(offset) = self.buffer[search_from..].iter().position(|&b| b == b'\n') {
            let end = search_from + offset;
            if end - start > MAX_LINE_BYTES {
                return Err(self.overflow());
            }
            let line = String::from_utf8_lossy(&self.buffer[start..end]).into_owned();
            start = end + 1;
            search_from = start;

            decode_line(&line, &mut events);
            if events.last() == Some(&StreamEvent::Complete) {
                self.finished = true;
                self.buffer.clear();
                self.scanned = 0;
                return Ok(events);
            }
        }
        self.buffer.drain(..start);
        self.scanned = self.buffer.len();

        if self.buffer.len() > MAX_LINE_BYTES {
            return Err(self.overflow());
        }

        Ok(events)
    }

    /// Flush a trailing unterminated line at end of stream.
    pub fn finish(&mut self) -> Vec<StreamEvent> {
        let mut events = Vec::new();
        if self.finished || self.buffer.is_empty() {
            return events;
        }
        let line = String::from_utf8_lossy(&self.buffer).into_owned();
        self.buffer.clear();
        self.scanned = 0;
        decode_line(&line, &mut events);
        if events.last() == Some(&StreamEvent::Complete) {
            self.finished = true;
        }
        events
    }

    fn overflow(&mut self) -> SseError {
        self.buffer.clear();
        self.scanned = 0;
        SseError::LineTooLong(MAX_LINE_BYTES)
    }
}

/// Decode one line into zero, one or two events.
pub fn decode_line(line: &str, events: &mut Vec<StreamEvent>) {
    let line = line.trim();
    if line.is_empty() {
        return;
    }

    let payload = line.strip_prefix(DATA_MARKER).map(str::trim_start).unwrap_or(line);
    if payload.is_empty() {
        return;
    }

    let record: StreamRecord = match serde_json::from_str(payload) {
        Ok(record) => record,
        Err(e) => {
            tracing::trace!(error = %e, "Dropping undecodable stream line");
            return;
        }
    };

    match record.kind.as_str() {
        "content" => events.push(StreamEvent::Content(record.content)),
        "complete" => {
            if !record.content.is_empty() {
                events.push(StreamEvent::Content(record.content));
            }
            events.push(StreamEvent::Complete);
        }
        "error" => events.push(StreamEvent::Error(record.content)),
        "usage" => {}
        other => tracing::debug!(record_type = other, "Ignoring unknown stream record type"),
    }
}
