use std::ops::{Add, AddAssign, Not};

use crate::error::{Error, Result};
use crate::store::offset_copy;
use crate::value::BitValue;

impl BitValue {
    /// Combines `other` into `self` byte by byte after realigning `other` to
    /// this value's offset.
    fn combine_assign(&mut self, other: &BitValue, combine: impl Fn(u8, u8) -> u8) -> Result<()> {
        if self.len() != other.len() {
            return Err(Error::LengthMismatch {
                left: self.len(),
                right: other.len(),
            });
        }
        let aligned = offset_copy(&other.store, self.store.offset);
        for (byte, &operand) in self.store.bytes.iter_mut().zip(&aligned.bytes) {
            *byte = combine(*byte, operand);
        }
        Ok(())
    }

    /// ANDs `other` into this value in place.
    ///
    /// ```
    /// use bitvalue::BitValue;
    ///
    /// let mut value = BitValue::from_bin("1100")?;
    /// value.and_assign(&BitValue::from_bin("1010")?)?;
    /// assert_eq!(value.bin(), "1000");
    /// # Ok::<(), bitvalue::Error>(())
    /// ```
    ///
    /// # Errors
    /// [`Error::LengthMismatch`] when the lengths differ.
    pub fn and_assign(&mut self, other: &BitValue) -> Result<()> {
        self.combine_assign(other, |left, right| left & right)
    }

    /// # Errors
    /// [`Error::LengthMismatch`] when the lengths differ.
    pub fn or_assign(&mut self, other: &BitValue) -> Result<()> {
        self.combine_assign(other, |left, right| left | right)
    }

    /// # Errors
    /// [`Error::LengthMismatch`] when the lengths differ.
    pub fn xor_assign(&mut self, other: &BitValue) -> Result<()> {
        self.combine_assign(other, |left, right| left ^ right)
    }

    /// # Errors
    /// [`Error::LengthMismatch`] when the lengths differ.
    pub fn and(&self, other: &BitValue) -> Result<BitValue> {
        let mut result = self.clone();
        result.and_assign(other)?;
        Ok(result)
    }

    /// # Errors
    /// [`Error::LengthMismatch`] when the lengths differ.
    pub fn or(&self, other: &BitValue) -> Result<BitValue> {
        let mut result = self.clone();
        result.or_assign(other)?;
        Ok(result)
    }

    /// # Errors
    /// [`Error::LengthMismatch`] when the lengths differ.
    pub fn xor(&self, other: &BitValue) -> Result<BitValue> {
        let mut result = self.clone();
        result.xor_assign(other)?;
        Ok(result)
    }

    /// Inverts every bit.
    pub fn invert(&mut self) {
        self.store.invert_all();
    }
}

impl Not for &BitValue {
    type Output = BitValue;

    fn not(self) -> BitValue {
        let mut inverted = self.clone();
        inverted.invert();
        inverted
    }
}

impl Not for BitValue {
    type Output = BitValue;

    fn not(mut self) -> BitValue {
        self.invert();
        self
    }
}

impl Add<&BitValue> for &BitValue {
    type Output = BitValue;

    fn add(self, other: &BitValue) -> BitValue {
        let mut joined = self.clone();
        joined.append(other);
        joined
    }
}

impl Add for BitValue {
    type Output = BitValue;

    fn add(mut self, other: BitValue) -> BitValue {
        self.append(&other);
        self
    }
}

impl AddAssign<&BitValue> for BitValue {
    fn add_assign(&mut self, other: &BitValue) {
        self.append(other);
    }
}
