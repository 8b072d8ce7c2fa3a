//! Stdin escape-sequence buffering.
//!
//! Bytes arrive in arbitrary chunks. The buffer emits one string per complete
//! key sequence and holds back an incomplete escape tail until either the rest
//! arrives or the timeout passes, at which point the tail is emitted verbatim
//! (a lone `ESC` then decodes as Cancel).

use std::time::{Duration, Instant};

const ESC: u8 = 0x1b;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StdinBufferOptions {
    pub timeout_ms: u64,
}

impl Default for StdinBufferOptions {
    fn default() -> Self {
        Self { timeout_ms: 10 }
    }
}

#[derive(Debug)]
enum SequenceStatus {
    Complete,
    Incomplete,
    NotEscape,
}

#[derive(Debug)]
struct SequenceSplit {
    sequences: Vec<String>,
    remainder: String,
}

/// Buffers stdin input and emits complete sequences.
#[derive(Debug)]
pub struct StdinBuffer {
    buffer: String,
    /// Trailing bytes of a UTF-8 character split across reads.
    pending_utf8: Vec<u8>,
    timeout_ms: u64,
    flush_deadline: Option<Instant>,
}

impl StdinBuffer {
    pub fn new(timeout_ms: u64) -> Self {
        Self {
            buffer: String::new(),
            pending_utf8: Vec::new(),
            timeout_ms,
            flush_deadline: None,
        }
    }

    pub fn with_options(options: StdinBufferOptions) -> Self {
        Self::new(options.timeout_ms)
    }

    pub fn process(&mut self, data: &[u8]) -> Vec<String> {
        self.process_at(data, Instant::now())
    }

    /// Like [`process`](Self::process) with an explicit clock reading.
    pub fn process_at(&mut self, data: &[u8], now: Instant) -> Vec<String> {
        self.flush_deadline = None;

        let mut bytes = std::mem::take(&mut self.pending_utf8);
        bytes.extend_from_slice(data);
        let text = self.decode_utf8(bytes);
        self.buffer.push_str(&text);

        let result = extract_complete_sequences(&self.buffer);
        // Incomplete escape tails stay buffered until the deadline so bytes
        // are never dropped or reordered.
        self.buffer = result.remainder;
        if !self.buffer.is_empty() {
            self.flush_deadline = Some(now + Duration::from_millis(self.timeout_ms));
        }
        result.sequences
    }

    pub fn flush_due(&mut self, now: Instant) -> Vec<String> {
        if self.buffer.is_empty() {
            self.flush_deadline = None;
            return Vec::new();
        }

        if let Some(deadline) = self.flush_deadline {
            if now >= deadline {
                return self.flush();
            }
        }

        Vec::new()
    }

    /// Milliseconds the caller may block before [`flush_due`](Self::flush_due)
    /// has work, capped at `default_ms` (`-1` blocks indefinitely).
    pub fn next_timeout_ms(&self, now: Instant, default_ms: i32) -> i32 {
        if let Some(deadline) = self.flush_deadline {
            let remaining = deadline.saturating_duration_since(now);
            let ms = remaining.as_millis().min(i32::MAX as u128) as i32;
            if default_ms < 0 {
                return ms;
            }
            return ms.min(default_ms).max(0);
        }
        default_ms
    }

    pub fn flush(&mut self) -> Vec<String> {
        self.flush_deadline = None;
        if self.buffer.is_empty() {
            return Vec::new();
        }
        vec![std::mem::take(&mut self.buffer)]
    }

    pub fn clear(&mut self) {
        self.flush_deadline = None;
        self.buffer.clear();
        self.pending_utf8.clear();
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    fn decode_utf8(&mut self, bytes: Vec<u8>) -> String {
        match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(err) => {
                let utf8_error = err.utf8_error();
                let bytes = err.into_bytes();
                let valid_up_to = utf8_error.valid_up_to();
                if utf8_error.error_len().is_none() {
                    // Truncated character at the end: keep its bytes for the next read.
                    self.pending_utf8 = bytes[valid_up_to..].to_vec();
                    String::from_utf8_lossy(&bytes[..valid_up_to]).into_owned()
                } else {
                    String::from_utf8_lossy(&bytes).into_owned()
                }
            }
        }
    }
}

fn extract_complete_sequences(buffer: &str) -> SequenceSplit {
    let mut sequences = Vec::new();
    let mut pos = 0;
    let bytes = buffer.as_bytes();

    while pos < bytes.len() {
        if bytes[pos] == ESC {
            let mut seq_end = pos + 1;
            let mut completed = false;

            while seq_end <= bytes.len() {
                if !buffer.is_char_boundary(seq_end) {
                    seq_end += 1;
                    continue;
                }
                let candidate = &buffer[pos..seq_end];
                match is_complete_sequence(candidate) {
                    SequenceStatus::Complete | SequenceStatus::NotEscape => {
                        sequences.push(candidate.to_string());
                        pos = seq_end;
                        completed = true;
                        break;
                    }
                    SequenceStatus::Incomplete => {
                        seq_end += 1;
                    }
                }
            }

            if !completed {
                return SequenceSplit {
                    sequences,
                    remainder: buffer[pos..].to_string(),
                };
            }
        } else if bytes[pos] == b'\r' && bytes.get(pos + 1) == Some(&b'\n') {
            sequences.push("\r\n".to_string());
            pos += 2;
        } else {
            let Some(ch) = buffer[pos..].chars().next() else {
                break;
            };
            sequences.push(ch.to_string());
            pos += ch.len_utf8();
        }
    }

    SequenceSplit {
        sequences,
        remainder: String::new(),
    }
}

fn is_complete_sequence(data: &str) -> SequenceStatus {
    if !data.starts_with(ESC as char) {
        return SequenceStatus::NotEscape;
    }

    if data.len() == 1 {
        return SequenceStatus::Incomplete;
    }

    let after = &data[1..];

    if after.starts_with('[') {
        return is_complete_csi_sequence(data);
    }

    if after.starts_with('O') {
        return if after.len() >= 2 {
            SequenceStatus::Complete
        } else {
            SequenceStatus::Incomplete
        };
    }

    SequenceStatus::Complete
}

fn is_complete_csi_sequence(data: &str) -> SequenceStatus {
    if data.len() < 3 {
        return SequenceStatus::Incomplete;
    }

    let payload = &data[2..];
    let Some(last_byte) = payload.as_bytes().last().copied() else {
        return SequenceStatus::Incomplete;
    };

    if (0x40..=0x7e).contains(&last_byte) {
        return SequenceStatus::Complete;
    }

    SequenceStatus::Incomplete
}
