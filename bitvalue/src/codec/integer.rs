//! Fixed-width integers in big-endian, little-endian and native byte order.
//!
//! Values are carried as `u128`/`i128`. Longer fields are zero or sign
//! extended on construction and must be pure extensions to be read back.

use crate::error::{CreationError, InterpretError, Result};
use crate::store::tables::head_mask;
use crate::store::{ByteStore, offset_copy};
use crate::value::BitValue;

const MAX_WIDTH: usize = u128::BITS as usize;

/// Right-aligned big-endian layout of `value` in `length` bits, filling any
/// bytes above the 128-bit representation with `fill`.
fn right_aligned(value: u128, length: usize, fill: u8) -> ByteStore {
    let offset = (8 - length % 8) % 8;
    let count = (offset + length) / 8;
    let mut bytes = vec![fill; count];
    let representation = value.to_be_bytes();
    let taken = count.min(representation.len());
    bytes[count - taken..].copy_from_slice(&representation[representation.len() - taken..]);
    ByteStore::new(bytes, length, offset)
}

fn require_whole_bytes(encoding: &'static str, length: usize) -> Result<()> {
    if length % 8 != 0 {
        return Err(CreationError::NotWholeByte { encoding, length }.into());
    }
    Ok(())
}

fn check_whole_bytes(encoding: &'static str, length: usize) -> Result<()> {
    if length % 8 != 0 {
        return Err(InterpretError::Granularity {
            encoding,
            length,
            granularity: 8,
        }
        .into());
    }
    Ok(())
}

fn reverse_bytes(mut store: ByteStore) -> ByteStore {
    debug_assert_eq!(store.offset(), 0);
    store.bytes.reverse();
    store
}

/// # Errors
/// Fails when `length` is zero or `value` needs more than `length` bits.
pub fn create_uint(value: u128, length: usize) -> Result<ByteStore> {
    if length == 0 {
        return Err(CreationError::LengthRequired("uint").into());
    }
    if length < MAX_WIDTH && value >> length != 0 {
        return Err(CreationError::ValueOutOfRange {
            value: value.to_string(),
            length,
            min: "0".to_string(),
            max: ((1u128 << length) - 1).to_string(),
        }
        .into());
    }
    Ok(right_aligned(value, length, 0))
}

/// # Errors
/// Fails when `length` is zero or `value` lies outside the two's-complement range.
pub fn create_int(value: i128, length: usize) -> Result<ByteStore> {
    if length == 0 {
        return Err(CreationError::LengthRequired("int").into());
    }
    if length < MAX_WIDTH {
        let max = (1i128 << (length - 1)) - 1;
        let min = -(1i128 << (length - 1));
        if value < min || value > max {
            return Err(CreationError::ValueOutOfRange {
                value: value.to_string(),
                length,
                min: min.to_string(),
                max: max.to_string(),
            }
            .into());
        }
    }
    let fill = if value < 0 { 0xFF } else { 0x00 };
    Ok(right_aligned(value as u128, length, fill))
}

pub fn create_uintbe(value: u128, length: usize) -> Result<ByteStore> {
    require_whole_bytes("uintbe", length)?;
    create_uint(value, length)
}

pub fn create_intbe(value: i128, length: usize) -> Result<ByteStore> {
    require_whole_bytes("intbe", length)?;
    create_int(value, length)
}

pub fn create_uintle(value: u128, length: usize) -> Result<ByteStore> {
    require_whole_bytes("uintle", length)?;
    create_uint(value, length).map(reverse_bytes)
}

pub fn create_intle(value: i128, length: usize) -> Result<ByteStore> {
    require_whole_bytes("intle", length)?;
    create_int(value, length).map(reverse_bytes)
}

pub fn create_uintne(value: u128, length: usize) -> Result<ByteStore> {
    if cfg!(target_endian = "little") {
        create_uintle(value, length)
    } else {
        create_uintbe(value, length)
    }
}

pub fn create_intne(value: i128, length: usize) -> Result<ByteStore> {
    if cfg!(target_endian = "little") {
        create_intle(value, length)
    } else {
        create_intbe(value, length)
    }
}

/// Reads `length` bits at `start` as an unsigned big-endian integer.
///
/// # Errors
/// Fails for an empty field, or a field over 128 bits with set high bits.
pub fn read_uint(value: &BitValue, start: usize, length: usize) -> Result<u128> {
    if length == 0 {
        return Err(InterpretError::Empty("uint").into());
    }
    let (start, length) = if length > MAX_WIDTH {
        let excess = length - MAX_WIDTH;
        if value.store.extract(start, start + excess).count_ones() != 0 {
            return Err(InterpretError::TooWide {
                encoding: "uint",
                length,
            }
            .into());
        }
        (start + excess, MAX_WIDTH)
    } else {
        (start, length)
    };
    let field = offset_copy(&value.store.extract(start, start + length), (8 - length % 8) % 8);
    let mut bytes = field.raw_bytes().iter().copied();
    let first = bytes.next().map_or(0, |byte| byte & head_mask(field.offset()));
    Ok(bytes.fold(u128::from(first), |acc, byte| (acc << 8) | u128::from(byte)))
}

/// Reads `length` bits at `start` as a two's-complement big-endian integer.
///
/// # Errors
/// Fails for an empty field, or a field over 128 bits that is not a sign extension.
pub fn read_int(value: &BitValue, start: usize, length: usize) -> Result<i128> {
    if length == 0 {
        return Err(InterpretError::Empty("int").into());
    }
    if length > MAX_WIDTH {
        let excess = length - MAX_WIDTH;
        let ones = value.store.extract(start, start + excess + 1).count_ones();
        if ones != 0 && ones != excess + 1 {
            return Err(InterpretError::TooWide {
                encoding: "int",
                length,
            }
            .into());
        }
        return read_int(value, start + excess, MAX_WIDTH);
    }
    let unsigned = read_uint(value, start, length)?;
    if length == MAX_WIDTH || unsigned >> (length - 1) == 0 {
        return Ok(unsigned as i128);
    }
    Ok((unsigned | (u128::MAX << length)) as i128)
}

pub fn read_uintbe(value: &BitValue, start: usize, length: usize) -> Result<u128> {
    check_whole_bytes("uintbe", length)?;
    read_uint(value, start, length)
}

pub fn read_intbe(value: &BitValue, start: usize, length: usize) -> Result<i128> {
    check_whole_bytes("intbe", length)?;
    read_int(value, start, length)
}

fn byte_reversed(value: &BitValue, start: usize, length: usize) -> BitValue {
    let field = offset_copy(&value.store.extract(start, start + length), 0);
    BitValue::from_store(reverse_bytes(field))
}

pub fn read_uintle(value: &BitValue, start: usize, length: usize) -> Result<u128> {
    check_whole_bytes("uintle", length)?;
    read_uint(&byte_reversed(value, start, length), 0, length)
}

pub fn read_intle(value: &BitValue, start: usize, length: usize) -> Result<i128> {
    check_whole_bytes("intle", length)?;
    read_int(&byte_reversed(value, start, length), 0, length)
}

pub fn read_uintne(value: &BitValue, start: usize, length: usize) -> Result<u128> {
    if cfg!(target_endian = "little") {
        read_uintle(value, start, length)
    } else {
        read_uintbe(value, start, length)
    }
}

pub fn read_intne(value: &BitValue, start: usize, length: usize) -> Result<i128> {
    if cfg!(target_endian = "little") {
        read_intle(value, start, length)
    } else {
        read_intbe(value, start, length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn value(store: ByteStore) -> BitValue {
        BitValue::from_store(store)
    }

    #[test]
    fn uint_is_right_aligned() {
        let store = create_uint(5, 3).unwrap();
        assert_eq!(store.offset(), 5);
        assert_eq!(store.raw_bytes(), &[0b0000_0101]);
        assert_eq!(read_uint(&value(store), 0, 3).unwrap(), 5);
    }

    #[test]
    fn uint_range_is_checked() {
        assert_eq!(create_uint(255, 8).unwrap().raw_bytes(), &[0xFF]);
        assert!(matches!(
            create_uint(256, 8),
            Err(Error::Creation(CreationError::ValueOutOfRange { .. }))
        ));
        assert!(matches!(
            create_uint(0, 0),
            Err(Error::Creation(CreationError::LengthRequired("uint")))
        ));
    }

    #[test]
    fn int_round_trips_at_boundaries() {
        for length in [1usize, 2, 7, 8, 13, 64, 127, 128] {
            let max = if length == 128 { i128::MAX } else { (1i128 << (length - 1)) - 1 };
            let min = if length == 128 { i128::MIN } else { -(1i128 << (length - 1)) };
            for number in [min, -1, 0, max] {
                let encoded = value(create_int(number, length).unwrap());
                assert_eq!(encoded.len(), length);
                assert_eq!(read_int(&encoded, 0, length).unwrap(), number, "length {length}");
            }
        }
        assert!(create_int(4, 3).is_err());
        assert!(create_int(-5, 3).is_err());
    }

    #[test]
    fn wide_fields_extend() {
        let unsigned = value(create_uint(0xABCD, 200).unwrap());
        assert_eq!(unsigned.len(), 200);
        assert_eq!(read_uint(&unsigned, 0, 200).unwrap(), 0xABCD);

        let signed = value(create_int(-3, 150).unwrap());
        assert_eq!(read_int(&signed, 0, 150).unwrap(), -3);

        let mut wide = unsigned.clone();
        wide.set(0, true).unwrap();
        assert!(matches!(
            read_uint(&wide, 0, 200),
            Err(Error::Interpret(InterpretError::TooWide { .. }))
        ));
    }

    #[test]
    fn little_endian_reverses_bytes() {
        let store = create_uintle(0x0102, 16).unwrap();
        assert_eq!(store.raw_bytes(), &[0x02, 0x01]);
        assert_eq!(read_uintle(&value(store.clone()), 0, 16).unwrap(), 0x0102);
        assert_eq!(read_uintbe(&value(store), 0, 16).unwrap(), 0x0201);

        let negative = value(create_intle(-2, 16).unwrap());
        assert_eq!(negative.to_bytes(), vec![0xFE, 0xFF]);
        assert_eq!(read_intle(&negative, 0, 16).unwrap(), -2);
    }

    #[test]
    fn byte_order_forms_need_whole_bytes() {
        assert!(matches!(
            create_uintbe(1, 12),
            Err(Error::Creation(CreationError::NotWholeByte { .. }))
        ));
        let twelve = value(create_uint(1, 12).unwrap());
        assert!(matches!(
            read_intle(&twelve, 0, 12),
            Err(Error::Interpret(InterpretError::Granularity { granularity: 8, .. }))
        ));
    }

    #[test]
    fn native_matches_target() {
        let native = value(create_uintne(0x0A0B_0C0D, 32).unwrap());
        assert_eq!(native.to_bytes(), 0x0A0B_0C0Du32.to_ne_bytes().to_vec());
        assert_eq!(read_uintne(&native, 0, 32).unwrap(), 0x0A0B_0C0D);
        let native = value(create_intne(-70, 16).unwrap());
        assert_eq!(read_intne(&native, 0, 16).unwrap(), -70);
    }

    #[test]
    fn reads_at_unaligned_positions() {
        let mut host = BitValue::zeros(3);
        host.append(&value(create_uint(0x1F3, 9).unwrap()));
        host.append(&BitValue::zeros(5));
        assert_eq!(read_uint(&host, 3, 9).unwrap(), 0x1F3);
        assert_eq!(read_int(&host, 3, 9).unwrap(), 0x1F3 - 512);
    }
}
