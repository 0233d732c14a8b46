//! 32-byte word assembly and hex word slicing
//!
//! Safe initializer calldata is a sequence of left-padded 32-byte words after a
//! 4-byte selector. The writer builds that layout byte by byte; the reader
//! splits hex text into 64-character chunks and reads fixed offsets.

use std::str::FromStr;

use alloy::primitives::{Address, Bytes, B256, U256};

use crate::error::{Error, Result};

/// Hex characters per 32-byte word
pub(crate) const WORD_HEX: usize = 64;

/// Hex characters of a 4-byte selector
pub(crate) const SELECTOR_HEX: usize = 8;

/// Left-pads an address into a word
pub(crate) fn address_word(address: Address) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(address.as_slice());
    word
}

pub(crate) struct WordWriter {
    buf: Vec<u8>,
}

impl WordWriter {
    pub fn with_selector(selector: [u8; 4]) -> Self {
        let mut buf = Vec::with_capacity(4 + 32 * 16);
        buf.extend_from_slice(&selector);
        Self { buf }
    }

    pub fn push_word(&mut self, word: [u8; 32]) -> &mut Self {
        self.buf.extend_from_slice(&word);
        self
    }

    pub fn push_u256(&mut self, value: U256) -> &mut Self {
        self.push_word(value.to_be_bytes::<32>())
    }

    pub fn push_usize(&mut self, value: usize) -> &mut Self {
        self.push_u256(U256::from(value))
    }

    pub fn push_address(&mut self, address: Address) -> &mut Self {
        self.push_word(address_word(address))
    }

    /// Length word followed by `data`, zero-padded to a word boundary
    pub fn push_bytes(&mut self, data: &[u8]) -> &mut Self {
        self.push_usize(data.len());
        self.buf.extend_from_slice(data);
        let padding = (32 - data.len() % 32) % 32;
        self.buf.resize(self.buf.len() + padding, 0);
        self
    }

    pub fn finish(self) -> Bytes {
        Bytes::from(self.buf)
    }
}

/// Read-only view of hex text as 32-byte words
#[derive(Debug, Clone, Copy)]
pub(crate) struct WordReader<'a> {
    hex: &'a str,
    words: usize,
}

impl<'a> WordReader<'a> {
    /// Splits `hex` (no `0x`, no selector) into words
    pub fn new(hex: &'a str) -> Result<Self> {
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(Error::MalformedCalldata("non-hex characters".into()));
        }
        if hex.len() % WORD_HEX != 0 {
            return Err(Error::MalformedCalldata(format!(
                "{} hex characters do not split into 32-byte words",
                hex.len()
            )));
        }
        Ok(Self {
            hex,
            words: hex.len() / WORD_HEX,
        })
    }

    pub fn len(&self) -> usize {
        self.words
    }

    pub fn word(&self, index: usize) -> Result<B256> {
        if index >= self.words {
            return Err(Error::MalformedCalldata(format!(
                "word {} out of range ({} words)",
                index, self.words
            )));
        }
        let chunk = &self.hex[index * WORD_HEX..(index + 1) * WORD_HEX];
        B256::from_str(chunk).map_err(|e| Error::MalformedCalldata(e.to_string()))
    }

    pub fn u256(&self, index: usize) -> Result<U256> {
        Ok(U256::from_be_bytes(self.word(index)?.0))
    }

    pub fn u64(&self, index: usize) -> Result<u64> {
        let word = self.word(index)?;
        if word[..24].iter().any(|b| *b != 0) {
            return Err(Error::MalformedCalldata(format!(
                "word {} does not fit in 64 bits",
                index
            )));
        }
        let mut low = [0u8; 8];
        low.copy_from_slice(&word[24..]);
        Ok(u64::from_be_bytes(low))
    }

    pub fn usize(&self, index: usize) -> Result<usize> {
        let value = self.u64(index)?;
        usize::try_from(value).map_err(|e| Error::MalformedCalldata(e.to_string()))
    }

    /// Lower 20 bytes of a word
    pub fn address(&self, index: usize) -> Result<Address> {
        Ok(Address::from_word(self.word(index)?))
    }

    /// Hex text of `byte_len` bytes starting at word `start`
    pub fn hex_bytes(&self, start: usize, byte_len: usize) -> Result<&'a str> {
        let begin = start.checked_mul(WORD_HEX);
        let end = byte_len
            .checked_mul(2)
            .and_then(|len| begin.and_then(|b| b.checked_add(len)));
        match (begin, end) {
            (Some(begin), Some(end)) if end <= self.hex.len() => Ok(&self.hex[begin..end]),
            _ => Err(Error::MalformedCalldata(format!(
                "{} bytes at word {} exceed calldata",
                byte_len, start
            ))),
        }
    }
}
