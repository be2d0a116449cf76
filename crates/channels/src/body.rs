//! Request bodies buffered once and replayed to each consumer.

use std::io::{Cursor, Read};

use {bytes::Bytes, serde::de::DeserializeOwned};

use crate::Result;

/// The full, unmodified bytes of an inbound request.
///
/// Signature verification and JSON decoding each take their own cursor over
/// the same buffer, so neither can observe a body the other has consumed.
#[derive(Debug, Clone, Default)]
pub struct ReplayBody {
    bytes: Bytes,
}

impl ReplayBody {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Drain a reader into a new buffer.
    pub fn read_from(mut reader: impl Read) -> std::io::Result<Self> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        Ok(Self::new(buf))
    }

    /// A fresh cursor positioned at the first byte.
    pub fn reader(&self) -> Cursor<Bytes> {
        Cursor::new(self.bytes.clone())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Decode the body as JSON from an independent cursor.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_reader(self.reader())?)
    }

    /// Body as text, replacing invalid UTF-8, for logging.
    pub fn to_text_lossy(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readers_are_independent() {
        let body = ReplayBody::new(&b"{\"a\":1}"[..]);
        let mut first = String::new();
        body.reader().read_to_string(&mut first).unwrap();

        let value: serde_json::Value = body.json().unwrap();
        assert_eq!(first, "{\"a\":1}");
        assert_eq!(value["a"], 1);
        assert_eq!(body.len(), 7);
    }

    #[test]
    fn read_from_buffers_everything() {
        let body = ReplayBody::read_from(&b"hello world"[..]).unwrap();
        assert_eq!(body.as_bytes(), b"hello world");
        assert_eq!(body.to_text_lossy(), "hello world");
    }
}
