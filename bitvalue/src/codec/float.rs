//! IEEE-754 binary32 and binary64 in big-endian, little-endian and native order.

use crate::error::{CreationError, InterpretError, Result};
use crate::store::ByteStore;
use crate::value::BitValue;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ByteOrder {
    Big,
    Little,
}

impl ByteOrder {
    pub const NATIVE: ByteOrder = if cfg!(target_endian = "little") {
        ByteOrder::Little
    } else {
        ByteOrder::Big
    };
}

/// # Errors
/// Fails unless `length` is 32 or 64.
pub fn create_float(value: f64, length: usize, order: ByteOrder) -> Result<ByteStore> {
    let bytes = match (length, order) {
        (32, ByteOrder::Big) => (value as f32).to_be_bytes().to_vec(),
        (32, ByteOrder::Little) => (value as f32).to_le_bytes().to_vec(),
        (64, ByteOrder::Big) => value.to_be_bytes().to_vec(),
        (64, ByteOrder::Little) => value.to_le_bytes().to_vec(),
        (0, _) => return Err(CreationError::LengthRequired("float").into()),
        _ => return Err(CreationError::FloatLength(length).into()),
    };
    Ok(ByteStore::new(bytes, length, 0))
}

/// # Errors
/// Fails unless `length` is 32 or 64.
pub fn read_float(value: &BitValue, start: usize, length: usize, order: ByteOrder) -> Result<f64> {
    let wrong_length = || InterpretError::ExactLength {
        encoding: "float",
        expected: "32 or 64",
        length,
    };
    if length != 32 && length != 64 {
        return Err(wrong_length().into());
    }
    let bytes = value.store.extract(start, start + length).to_bytes();
    let number = if length == 32 {
        let raw: [u8; 4] = bytes.as_slice().try_into().map_err(|_| wrong_length())?;
        f64::from(match order {
            ByteOrder::Big => f32::from_be_bytes(raw),
            ByteOrder::Little => f32::from_le_bytes(raw),
        })
    } else {
        let raw: [u8; 8] = bytes.as_slice().try_into().map_err(|_| wrong_length())?;
        match order {
            ByteOrder::Big => f64::from_be_bytes(raw),
            ByteOrder::Little => f64::from_le_bytes(raw),
        }
    };
    Ok(number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn single_precision_layout() {
        let store = create_float(1.0, 32, ByteOrder::Big).unwrap();
        assert_eq!(store.raw_bytes(), &[0x3F, 0x80, 0x00, 0x00]);
        let store = create_float(1.0, 32, ByteOrder::Little).unwrap();
        assert_eq!(store.raw_bytes(), &[0x00, 0x00, 0x80, 0x3F]);
    }

    #[test]
    fn round_trip_both_orders() {
        for order in [ByteOrder::Big, ByteOrder::Little, ByteOrder::NATIVE] {
            for number in [0.0, -2.5, 1.0e300, f64::INFINITY] {
                let value = BitValue::from_store(create_float(number, 64, order).unwrap());
                assert_eq!(read_float(&value, 0, 64, order).unwrap(), number);
            }
            let value = BitValue::from_store(create_float(0.15625, 32, order).unwrap());
            assert_eq!(read_float(&value, 0, 32, order).unwrap(), 0.15625);
        }
    }

    #[test]
    fn only_two_widths() {
        assert_eq!(
            create_float(1.0, 16, ByteOrder::Big).unwrap_err(),
            Error::Creation(CreationError::FloatLength(16))
        );
        let value = BitValue::zeros(48);
        assert!(matches!(
            read_float(&value, 0, 48, ByteOrder::Big),
            Err(Error::Interpret(InterpretError::ExactLength { .. }))
        ));
    }
}
