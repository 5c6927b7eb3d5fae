//! Canonical MessagePack writer for transaction encoding.
//!
//! Only the shapes transactions need are supported: maps with string keys,
//! unsigned integers, strings, binary blobs and arrays of binary blobs.
//! Canonical form uses the smallest representation for every header and
//! integer, sorts map keys bytewise and omits empty values.

/// A value stored under a map key.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Field<'a> {
    Uint(u64),
    Str(&'a str),
    /// Fixed-width digest or key, omitted when all zero.
    Bin(&'a [u8]),
    /// Variable-length byte string, omitted only when empty.
    Bytes(&'a [u8]),
    BinArray(&'a [Vec<u8>]),
}

impl Field<'_> {
    /// Empty values are omitted from canonical maps.
    fn is_empty(&self) -> bool {
        match self {
            Self::Uint(value) => *value == 0,
            Self::Str(value) => value.is_empty(),
            Self::Bin(value) => value.iter().all(|byte| *byte == 0),
            Self::Bytes(value) => value.is_empty(),
            Self::BinArray(values) => values.is_empty(),
        }
    }
}

/// Encodes `entries` as a canonical map.
pub(crate) fn encode_map(entries: &[(&str, Field<'_>)]) -> Vec<u8> {
    let mut present: Vec<&(&str, Field<'_>)> =
        entries.iter().filter(|(_, field)| !field.is_empty()).collect();
    present.sort_by(|(left, _), (right, _)| left.as_bytes().cmp(right.as_bytes()));

    let mut writer = Writer::default();
    writer.map_header(present.len());
    for (key, field) in present {
        writer.str(key);
        match field {
            Field::Uint(value) => writer.uint(*value),
            Field::Str(value) => writer.str(value),
            Field::Bin(value) | Field::Bytes(value) => writer.bin(value),
            Field::BinArray(values) => {
                writer.array_header(values.len());
                for value in *values {
                    writer.bin(value);
                }
            }
        }
    }
    writer.into_bytes()
}

#[derive(Debug, Default)]
struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    fn uint(&mut self, value: u64) {
        if let Ok(small) = u8::try_from(value) {
            if small < 0x80 {
                self.buf.push(small);
            } else {
                self.buf.extend_from_slice(&[0xcc, small]);
            }
        } else if let Ok(word) = u16::try_from(value) {
            self.buf.push(0xcd);
            self.buf.extend_from_slice(&word.to_be_bytes());
        } else if let Ok(dword) = u32::try_from(value) {
            self.buf.push(0xce);
            self.buf.extend_from_slice(&dword.to_be_bytes());
        } else {
            self.buf.push(0xcf);
            self.buf.extend_from_slice(&value.to_be_bytes());
        }
    }

    fn str(&mut self, value: &str) {
        let len = value.len();
        match u8::try_from(len) {
            Ok(short) if short < 32 => self.buf.push(0xa0 | short),
            Ok(short) => self.buf.extend_from_slice(&[0xd9, short]),
            Err(_) => self.sized_header(len, 0xda, 0xdb),
        }
        self.buf.extend_from_slice(value.as_bytes());
    }

    fn bin(&mut self, value: &[u8]) {
        let len = value.len();
        match u8::try_from(len) {
            Ok(short) => self.buf.extend_from_slice(&[0xc4, short]),
            Err(_) => self.sized_header(len, 0xc5, 0xc6),
        }
        self.buf.extend_from_slice(value);
    }

    fn array_header(&mut self, len: usize) {
        match u8::try_from(len) {
            Ok(short) if short < 16 => self.buf.push(0x90 | short),
            _ => self.sized_header(len, 0xdc, 0xdd),
        }
    }

    fn map_header(&mut self, len: usize) {
        match u8::try_from(len) {
            Ok(short) if short < 16 => self.buf.push(0x80 | short),
            _ => self.sized_header(len, 0xde, 0xdf),
        }
    }

    /// Writes a 16-bit or 32-bit length header. Lengths beyond `u32::MAX`
    /// cannot occur for values that fit in a ledger transaction.
    fn sized_header(&mut self, len: usize, marker16: u8, marker32: u8) {
        if let Ok(word) = u16::try_from(len) {
            self.buf.push(marker16);
            self.buf.extend_from_slice(&word.to_be_bytes());
        } else {
            self.buf.push(marker32);
            let dword = u32::try_from(len).unwrap_or(u32::MAX);
            self.buf.extend_from_slice(&dword.to_be_bytes());
        }
    }
}
