//! Exponential-Golomb codes, plain and interleaved, unsigned and signed.
//!
//! Every decoder takes a bit position and returns the decoded number with the
//! position just past the code. Zero encodes to the single bit `1` under all
//! four codes; the signed forms never append a sign bit to it.

use crate::codec::text::pack_bits;
use crate::error::{CreationError, ReadError, Result};
use crate::store::ByteStore;
use crate::value::BitValue;

fn zero_code() -> ByteStore {
    pack_bits([true])
}

fn bit(value: &BitValue, position: usize, encoding: &'static str) -> Result<bool> {
    value
        .store
        .get_bit(position)
        .map_err(|_| ReadError::PastEnd { encoding, position }.into())
}

/// Leading zeros, a set bit, then `codenum + 1 - 2^k` in `k` bits.
///
/// # Errors
/// Fails for `u128::MAX`, whose successor does not fit.
pub fn create_ue(number: u128) -> Result<ByteStore> {
    if number == 0 {
        return Ok(zero_code());
    }
    let successor = number
        .checked_add(1)
        .ok_or_else(|| CreationError::Overflow(number.to_string()))?;
    let prefix = (u128::BITS - 1 - successor.leading_zeros()) as usize;
    let remainder = successor - (1u128 << prefix);
    let zeros = std::iter::repeat_n(false, prefix);
    let payload = (0..prefix).rev().map(|shift| (remainder >> shift) & 1 == 1);
    Ok(pack_bits(zeros.chain(std::iter::once(true)).chain(payload)))
}

/// Zig-zag onto `ue`: positive `i` to `2i - 1`, the rest to `-2i`.
///
/// # Errors
/// Fails when the zig-zagged code number overflows.
pub fn create_se(number: i128) -> Result<ByteStore> {
    if number == 0 {
        return Ok(zero_code());
    }
    let magnitude = number.unsigned_abs();
    let overflow = || CreationError::Overflow(number.to_string());
    let codenum = if number > 0 {
        magnitude.checked_mul(2).map(|doubled| doubled - 1)
    } else {
        magnitude.checked_mul(2)
    }
    .ok_or_else(overflow)?;
    create_ue(codenum)
}

/// Each payload bit of `number + 1` after its leading one, preceded by a
/// `0` continuation bit, then a terminating `1`.
///
/// # Errors
/// Fails for `u128::MAX`, whose successor does not fit.
pub fn create_uie(number: u128) -> Result<ByteStore> {
    if number == 0 {
        return Ok(zero_code());
    }
    let successor = number
        .checked_add(1)
        .ok_or_else(|| CreationError::Overflow(number.to_string()))?;
    let payload_bits = (u128::BITS - 1 - successor.leading_zeros()) as usize;
    let interleaved = (0..payload_bits)
        .rev()
        .flat_map(|shift| [false, (successor >> shift) & 1 == 1]);
    Ok(pack_bits(interleaved.chain(std::iter::once(true))))
}

/// `uie` of the magnitude followed by a sign bit, `1` for negative.
///
/// # Errors
/// Fails when the magnitude overflows the unsigned code.
pub fn create_sie(number: i128) -> Result<ByteStore> {
    if number == 0 {
        return Ok(zero_code());
    }
    let mut store = create_uie(number.unsigned_abs())?;
    store.append(&pack_bits([number < 0]));
    Ok(store)
}

/// # Errors
/// Fails with [`ReadError`] when the code runs past the end or exceeds 128 bits.
pub fn read_ue(value: &BitValue, start: usize) -> Result<(u128, usize)> {
    let mut position = start;
    while !bit(value, position, "ue")? {
        position += 1;
    }
    let prefix = position - start;
    if prefix == 0 {
        return Ok((0, position + 1));
    }
    if prefix >= u128::BITS as usize {
        return Err(ReadError::CodeOverflow {
            encoding: "ue",
            position: start,
        }
        .into());
    }
    if position + prefix + 1 > value.len() {
        return Err(ReadError::PastEnd {
            encoding: "ue",
            position: value.len(),
        }
        .into());
    }
    let remainder = crate::codec::integer::read_uint(value, position + 1, prefix)?;
    Ok(((1u128 << prefix) - 1 + remainder, position + prefix + 1))
}

/// # Errors
/// Fails with [`ReadError`] when the underlying `ue` code does.
pub fn read_se(value: &BitValue, start: usize) -> Result<(i128, usize)> {
    let (codenum, position) = read_ue(value, start)?;
    let magnitude = codenum / 2 + codenum % 2;
    let magnitude = i128::try_from(magnitude).map_err(|_| ReadError::CodeOverflow {
        encoding: "se",
        position: start,
    })?;
    if codenum % 2 == 1 {
        Ok((magnitude, position))
    } else {
        Ok((-magnitude, position))
    }
}

/// # Errors
/// Fails with [`ReadError`] when the stream ends mid-code or the number exceeds 128 bits.
pub fn read_uie(value: &BitValue, start: usize) -> Result<(u128, usize)> {
    let overflow = || ReadError::CodeOverflow {
        encoding: "uie",
        position: start,
    };
    let mut codenum: u128 = 1;
    let mut position = start;
    while !bit(value, position, "uie")? {
        position += 1;
        let payload = u128::from(bit(value, position, "uie")?);
        codenum = codenum.checked_mul(2).ok_or_else(overflow)? + payload;
        position += 1;
    }
    Ok((codenum - 1, position + 1))
}

/// # Errors
/// Fails with [`ReadError`] when the magnitude or its sign bit runs past the end.
pub fn read_sie(value: &BitValue, start: usize) -> Result<(i128, usize)> {
    let (magnitude, position) = read_uie(value, start)?;
    if magnitude == 0 {
        return Ok((0, position));
    }
    let magnitude = i128::try_from(magnitude).map_err(|_| ReadError::CodeOverflow {
        encoding: "sie",
        position: start,
    })?;
    if bit(value, position, "sie")? {
        Ok((-magnitude, position + 1))
    } else {
        Ok((magnitude, position + 1))
    }
}
