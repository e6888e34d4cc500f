use std::fmt;
use std::io::{self, ErrorKind, Read};
use std::mem;

const READ_CHUNK: usize = 512;

/// The demonstration beacon sent in RAW-OUT mode.
const BEACON: [u8; 14] = [
    0x8d, 0x4b, 0x96, 0x96, 0x99, 0x15, 0x56, 0x00, 0xe8, 0x74, 0x06, 0xf5, 0xb6, 0x9f,
];

/// Result of one bounded line read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineRead {
    /// A line, terminator included when one was seen within the limit.
    Line(Vec<u8>),
    /// Nothing arrived before the read timeout.
    Idle,
    /// The peer closed the stream.
    Closed,
}

/// Splits a byte stream into bounded lines.
///
/// Bytes past a returned line stay buffered for the next call, so a read
/// timeout in the middle of a line loses nothing.
pub struct LineReader<R> {
    inner: R,
    pending: Vec<u8>,
}

impl<R: Read> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            pending: Vec::new(),
        }
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    /// Reads up to `limit` bytes ending at the first `\n`.
    ///
    /// A line longer than `limit` is handed out in `limit` sized pieces.
    pub fn read_line(&mut self, limit: usize) -> io::Result<LineRead> {
        let limit = limit.max(1);
        loop {
            if let Some(line) = self.take_line(limit) {
                return Ok(LineRead::Line(line));
            }
            let mut chunk = [0u8; READ_CHUNK];
            match self.inner.read(&mut chunk) {
                Ok(0) => {
                    if self.pending.is_empty() {
                        return Ok(LineRead::Closed);
                    }
                    return Ok(LineRead::Line(mem::take(&mut self.pending)));
                }
                Ok(n) => self.pending.extend_from_slice(&chunk[..n]),
                Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                    return Ok(LineRead::Idle);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    fn take_line(&mut self, limit: usize) -> Option<Vec<u8>> {
        let end = match self.pending.iter().take(limit).position(|&b| b == b'\n') {
            Some(pos) => pos + 1,
            None if self.pending.len() >= limit => limit,
            None => return None,
        };
        Some(self.pending.drain(..end).collect())
    }
}

/// A raw Mode-S frame, `*<hex>;` on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame {
    payload: Vec<u8>,
}

impl RawFrame {
    pub fn beacon() -> Self {
        Self {
            payload: BEACON.to_vec(),
        }
    }

    /// Parses `*<hex>;` or bare hex.
    pub fn from_hex(text: &str) -> Result<Self, hex::FromHexError> {
        let text = text.trim();
        let text = text.strip_prefix('*').unwrap_or(text);
        let text = text.strip_suffix(';').unwrap_or(text);
        if text.is_empty() {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        Ok(Self {
            payload: hex::decode(text)?,
        })
    }

    /// Bytes as sent, newline terminated.
    pub fn to_wire(&self) -> Vec<u8> {
        format!("{self}\n").into_bytes()
    }
}

impl fmt::Display for RawFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "*{};", hex::encode(&self.payload))
    }
}
