//! Unpadded RFC 4648 base32, the textual form of addresses and transaction
//! identifiers.

const ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";
const SYMBOL_BITS: u32 = 5;
const SYMBOL_MASK: u16 = 0x1f;

/// Encodes bytes without trailing `=` padding.
pub(crate) fn encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len().saturating_mul(8).div_ceil(5));
    let mut buffer: u16 = 0;
    let mut bits: u32 = 0;

    for &byte in bytes {
        buffer = (buffer << 8) | u16::from(byte);
        bits += 8;
        while bits >= SYMBOL_BITS {
            bits -= SYMBOL_BITS;
            out.push(symbol((buffer >> bits) & SYMBOL_MASK));
        }
        buffer &= (1 << bits) - 1;
    }

    if bits > 0 {
        out.push(symbol((buffer << (SYMBOL_BITS - bits)) & SYMBOL_MASK));
    }
    out
}

/// Decodes unpadded base32.
///
/// Returns `None` on characters outside the alphabet or when the unused
/// trailing bits are not zero.
pub(crate) fn decode(text: &str) -> Option<Vec<u8>> {
    let mut out = Vec::with_capacity(text.len());
    let mut buffer: u16 = 0;
    let mut bits: u32 = 0;

    for ch in text.bytes() {
        let value = ALPHABET.iter().position(|candidate| *candidate == ch)?;
        buffer = (buffer << SYMBOL_BITS) | u16::try_from(value).ok()?;
        bits += SYMBOL_BITS;
        if bits >= 8 {
            bits -= 8;
            out.push(u8::try_from(buffer >> bits).ok()?);
            buffer &= (1 << bits) - 1;
        }
    }

    (buffer == 0).then_some(out)
}

fn symbol(index: u16) -> char {
    ALPHABET
        .get(usize::from(index))
        .copied()
        .map_or('=', char::from)
}
