use std::ops::{Bound, RangeBounds};

use crate::error::{Error, Result};
use crate::store::tables::{BYTE_REVERSAL, head_mask, tail_mask};
use crate::store::{ByteStore, offset_copy};
use crate::value::BitValue;

fn out_of_range(position: usize, length: usize) -> Error {
    Error::OutOfRange { position, length }
}

fn blend(byte: &mut u8, source: u8, mask: u8) {
    *byte = (*byte & !mask) | (source & mask);
}

impl BitValue {
    fn check_position(&self, position: usize) -> Result<()> {
        if position > self.len() {
            return Err(out_of_range(position, self.len()));
        }
        Ok(())
    }

    /// Adds the bits of `other` after the last bit, whatever either
    /// value's alignment.
    ///
    /// # Example
    ///
    /// ```
    /// use bitvalue::BitValue;
    ///
    /// let mut value = BitValue::from_bin("101")?.aligned(6);
    /// value.append(&BitValue::from_bin("0011")?.aligned(2));
    /// assert_eq!(value.bin(), "1010011");
    /// # Ok::<(), bitvalue::Error>(())
    /// ```
    pub fn append(&mut self, other: &BitValue) {
        self.store.append(&other.store);
    }

    /// Adds the bits of `other` before the first bit.
    ///
    /// # Example
    ///
    /// ```
    /// use bitvalue::BitValue;
    ///
    /// let mut value = BitValue::from_bin("11")?;
    /// value.prepend(&BitValue::from_bin("000")?);
    /// assert_eq!(value.bin(), "00011");
    /// # Ok::<(), bitvalue::Error>(())
    /// ```
    pub fn prepend(&mut self, other: &BitValue) {
        self.store.prepend(&other.store);
    }

    /// Removes every bit.
    pub fn clear(&mut self) {
        self.store = ByteStore::empty();
    }

    /// Drops the first `bits` bits.
    ///
    /// # Errors
    /// [`Error::OutOfRange`] when `bits` exceeds the length.
    pub fn truncate_start(&mut self, bits: usize) -> Result<()> {
        self.check_position(bits)?;
        self.store.truncate_start(bits);
        Ok(())
    }

    /// Drops the last `bits` bits.
    ///
    /// # Errors
    /// [`Error::OutOfRange`] when `bits` exceeds the length.
    pub fn truncate_end(&mut self, bits: usize) -> Result<()> {
        self.check_position(bits)?;
        self.store.truncate_end(bits);
        Ok(())
    }

    /// An independently owned copy of the bits in `range`.
    ///
    /// # Errors
    /// [`Error::OutOfRange`] when the range reaches past the end or is reversed.
    pub fn slice(&self, range: impl RangeBounds<usize>) -> Result<BitValue> {
        let start = match range.start_bound() {
            Bound::Included(&start) => start,
            Bound::Excluded(&start) => start + 1,
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(&end) => end + 1,
            Bound::Excluded(&end) => end,
            Bound::Unbounded => self.len(),
        };
        self.check_position(end)?;
        if start > end {
            return Err(out_of_range(start, self.len()));
        }
        Ok(BitValue::from_store(self.store.extract(start, end)))
    }

    /// Inserts `other` before bit `position`, moving whichever side of the
    /// insertion point is shorter.
    ///
    /// # Errors
    /// [`Error::OutOfRange`] when `position` exceeds the length.
    pub fn insert(&mut self, other: &BitValue, position: usize) -> Result<()> {
        self.check_position(position)?;
        if other.is_empty() {
            return Ok(());
        }
        let length = self.len();
        if 2 * position >= length {
            let tail = self.store.extract(position, length);
            self.store.truncate_end(length - position);
            self.store.append(&other.store);
            self.store.append(&tail);
        } else {
            let head = self.store.extract(0, position);
            self.store.truncate_start(position);
            self.store.prepend(&other.store);
            self.store.prepend(&head);
        }
        Ok(())
    }

    /// Replaces the bits from `position` with those of `other`, in place.
    ///
    /// # Errors
    /// [`Error::OutOfRange`] when `other` would run past the end.
    pub fn overwrite(&mut self, other: &BitValue, position: usize) -> Result<()> {
        let end = position + other.len();
        self.check_position(end)?;
        if other.is_empty() {
            return Ok(());
        }
        let absolute = self.store.offset + position;
        let first = absolute / 8;
        let source = offset_copy(&other.store, absolute % 8);
        let head = head_mask(source.offset);
        let tail = tail_mask(source.offset + source.bit_length);
        let target = &mut self.store.bytes[first..first + source.bytes.len()];
        match source.bytes.as_slice() {
            [only] => blend(&mut target[0], *only, head & tail),
            [front, interior @ .., back] => {
                let count = target.len();
                blend(&mut target[0], *front, head);
                target[1..count - 1].copy_from_slice(interior);
                blend(&mut target[count - 1], *back, tail);
            }
            [] => {}
        }
        Ok(())
    }

    /// Removes `bits` bits starting at `position`.
    ///
    /// # Errors
    /// [`Error::OutOfRange`] when the deleted range runs past the end.
    pub fn delete(&mut self, bits: usize, position: usize) -> Result<()> {
        let end = position + bits;
        self.check_position(end)?;
        let length = self.len();
        if bits == 0 {
            return Ok(());
        }
        if position == 0 {
            self.store.truncate_start(bits);
        } else if end == length {
            self.store.truncate_end(bits);
        } else if position > length - end {
            let tail = self.store.extract(end, length);
            self.store.truncate_end(length - position);
            self.store.append(&tail);
        } else {
            let head = self.store.extract(0, position);
            self.store.truncate_start(end);
            self.store.prepend(&head);
        }
        Ok(())
    }

    /// Reverses the order of all bits.
    pub fn reverse(&mut self) {
        if self.is_empty() {
            return;
        }
        let store = &mut self.store;
        store.bytes.reverse();
        for byte in &mut store.bytes {
            *byte = BYTE_REVERSAL[*byte as usize];
        }
        store.offset = (8 - (store.offset + store.bit_length) % 8) % 8;
    }

    /// Logical left shift by `bits`, filling with zeros. Shifts past the
    /// length clear every bit.
    pub fn shift_left(&mut self, bits: usize) {
        let bits = bits.min(self.len());
        if bits == 0 {
            return;
        }
        self.store.append(&ByteStore::zeros(bits));
        self.store.truncate_start(bits);
    }

    /// Logical right shift by `bits`, filling with zeros. Shifts past the
    /// length clear every bit.
    pub fn shift_right(&mut self, bits: usize) {
        let bits = bits.min(self.len());
        if bits == 0 {
            return;
        }
        self.store.prepend(&ByteStore::zeros(bits));
        self.store.truncate_end(bits);
    }

    /// Concatenates `count` copies in place by repeated doubling.
    pub fn repeat_in_place(&mut self, count: usize) {
        if count == 0 {
            self.clear();
            return;
        }
        let unit = self.len();
        let mut copies = 1;
        while copies * 2 < count {
            let doubled = self.store.clone();
            self.store.append(&doubled);
            copies *= 2;
        }
        let rest = self.store.extract(0, (count - copies) * unit);
        self.store.append(&rest);
    }

    /// `count` copies of this value, end to end.
    ///
    /// # Example
    ///
    /// ```
    /// use bitvalue::BitValue;
    ///
    /// let unit = BitValue::from_bin("10")?;
    /// assert_eq!(unit.repeat(3).bin(), "101010");
    /// assert!(unit.repeat(0).is_empty());
    /// # Ok::<(), bitvalue::Error>(())
    /// ```
    pub fn repeat(&self, count: usize) -> BitValue {
        let mut repeated = self.clone();
        repeated.repeat_in_place(count);
        repeated
    }
}
