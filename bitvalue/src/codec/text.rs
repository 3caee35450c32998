//! Hexadecimal, octal and binary digit text.

use crate::error::{CreationError, Error, InterpretError, Result};
use crate::store::ByteStore;
use crate::value::BitValue;

/// Strips whitespace and lowercases.
fn tidy(text: &str) -> String {
    text.split_whitespace().collect::<String>().to_lowercase()
}

fn digits(text: &str, prefix: &str, radix: u32, encoding: &'static str) -> Result<Vec<u8>> {
    let tidied = tidy(text);
    let body = tidied.strip_prefix(prefix).unwrap_or(&tidied);
    body.chars()
        .map(|character| {
            character
                .to_digit(radix)
                .map(|digit| digit as u8)
                .ok_or_else(|| Error::from(CreationError::InvalidCharacter { encoding, character }))
        })
        .collect()
}

/// Packs bits MSB-first into a store at offset 0.
pub(crate) fn pack_bits(bits: impl IntoIterator<Item = bool>) -> ByteStore {
    let mut bytes = Vec::new();
    let mut length = 0;
    for bit in bits {
        if length % 8 == 0 {
            bytes.push(0);
        }
        if bit {
            if let Some(last) = bytes.last_mut() {
                *last |= 0x80 >> (length % 8);
            }
        }
        length += 1;
    }
    ByteStore::new(bytes, length, 0)
}

/// Parses hex digits, ignoring case, whitespace and a leading `0x`.
///
/// # Errors
/// Fails on any non-hex character.
pub fn create_hex(text: &str) -> Result<ByteStore> {
    let nibbles = digits(text, "0x", 16, "hex")?;
    let bytes = nibbles
        .chunks(2)
        .map(|pair| (pair[0] << 4) | pair.get(1).copied().unwrap_or(0))
        .collect();
    Ok(ByteStore::new(bytes, nibbles.len() * 4, 0))
}

/// Parses octal digits, ignoring whitespace and a leading `0o`.
///
/// # Errors
/// Fails on any non-octal character.
pub fn create_oct(text: &str) -> Result<ByteStore> {
    let octal = digits(text, "0o", 8, "oct")?;
    Ok(pack_bits(
        octal.into_iter().flat_map(|digit| (0..3).rev().map(move |shift| (digit >> shift) & 1 == 1)),
    ))
}

/// Parses `0`/`1` text, ignoring whitespace and a leading `0b`.
///
/// # Errors
/// Fails on any other character.
pub fn create_bin(text: &str) -> Result<ByteStore> {
    let binary = digits(text, "0b", 2, "bin")?;
    Ok(pack_bits(binary.into_iter().map(|digit| digit == 1)))
}

fn check_granularity(encoding: &'static str, length: usize, granularity: usize) -> Result<()> {
    if length % granularity != 0 {
        return Err(InterpretError::Granularity {
            encoding,
            length,
            granularity,
        }
        .into());
    }
    Ok(())
}

/// # Errors
/// Fails unless `length` is a multiple of 4.
pub fn read_hex(value: &BitValue, start: usize, length: usize) -> Result<String> {
    check_granularity("hex", length, 4)?;
    let bytes = value.store.extract(start, start + length).to_bytes();
    let mut text: String = bytes.iter().map(|byte| format!("{byte:02x}")).collect();
    if (length / 4) % 2 == 1 {
        text.pop();
    }
    Ok(text)
}

/// # Errors
/// Fails unless `length` is a multiple of 3.
pub fn read_oct(value: &BitValue, start: usize, length: usize) -> Result<String> {
    check_granularity("oct", length, 3)?;
    let store = &value.store;
    Ok((start..start + length)
        .step_by(3)
        .map(|position| {
            let digit = (0..3).fold(0u8, |acc, bit| (acc << 1) | u8::from(store.bit_unchecked(position + bit)));
            char::from(b'0' + digit)
        })
        .collect())
}

#[must_use]
pub fn read_bin(value: &BitValue, start: usize, length: usize) -> String {
    (start..start + length)
        .map(|position| if value.store.bit_unchecked(position) { '1' } else { '0' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_is_case_and_space_insensitive() {
        let store = create_hex("0x12 3 4").unwrap();
        assert_eq!(store.bit_len(), 16);
        assert_eq!(store.raw_bytes(), &[0x12, 0x34]);
        assert_eq!(create_hex("AbC").unwrap().raw_bytes(), &[0xAB, 0xC0]);
        assert!(matches!(
            create_hex("12g4"),
            Err(Error::Creation(CreationError::InvalidCharacter { character: 'g', .. }))
        ));
    }

    #[test]
    fn hex_reads_odd_nibbles() {
        let value = BitValue::from_store(create_hex("abc").unwrap());
        assert_eq!(read_hex(&value, 0, 12).unwrap(), "abc");
        assert_eq!(read_hex(&value, 4, 8).unwrap(), "bc");
        assert!(read_hex(&value, 0, 6).is_err());
    }

    #[test]
    fn octal_uses_three_bits_per_digit() {
        let store = create_oct("0o752").unwrap();
        assert_eq!(store.bit_len(), 9);
        let value = BitValue::from_store(store);
        assert_eq!(read_bin(&value, 0, 9), "111101010");
        assert_eq!(read_oct(&value, 0, 9).unwrap(), "752");
        assert!(create_oct("8").is_err());
        assert!(read_oct(&value, 0, 8).is_err());
    }

    #[test]
    fn binary_text() {
        let value = BitValue::from_store(create_bin("0b 1011 001").unwrap());
        assert_eq!(value.len(), 7);
        assert_eq!(read_bin(&value, 0, 7), "1011001");
        assert_eq!(read_bin(&value, 2, 3), "110");
        assert!(create_bin("0b102").is_err());
        assert_eq!(create_bin("").unwrap().bit_len(), 0);
    }
}
