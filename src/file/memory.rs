//! Backend for images handed in as a byte buffer.

use super::Backend;

/// An image owned as a plain byte buffer, as read by the caller or synthesised in tests.
#[derive(Debug)]
pub struct Memory(Vec<u8>);

impl From<Vec<u8>> for Memory {
    fn from(data: Vec<u8>) -> Self {
        Memory(data)
    }
}

impl Backend for Memory {
    fn data(&self) -> &[u8] {
        &self.0
    }
}
