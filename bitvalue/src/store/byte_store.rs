use crate::error::{CreationError, Error, Result};
use crate::store::offset_copy;
use crate::store::tables::{BIT_COUNT, head_mask, tail_mask};

/// Bit-addressable backing buffer.
///
/// Holds `bit_length` bits starting `offset` bits into the first byte of `bytes`.
///
/// # Invariants
/// - `offset < 8`, and `offset == 0` whenever `bit_length == 0`
/// - `bytes.len() == ceil((offset + bit_length) / 8)`, no slack bytes
/// - bits of the first and last byte outside the logical range carry no meaning
#[must_use]
#[derive(Clone, Debug, Default)]
pub struct ByteStore {
    pub(crate) bytes: Vec<u8>,
    pub(crate) offset: usize,
    pub(crate) bit_length: usize,
}

/// Number of bytes spanned by `bit_length` bits starting `offset` bits in.
#[inline]
#[must_use]
pub(crate) const fn span(offset: usize, bit_length: usize) -> usize {
    if bit_length == 0 { 0 } else { (offset + bit_length).div_ceil(8) }
}

impl ByteStore {
    pub(crate) fn new(bytes: Vec<u8>, bit_length: usize, offset: usize) -> ByteStore {
        if bit_length == 0 {
            return ByteStore::empty();
        }
        debug_assert!(offset < 8, "offset {offset} must be below 8");
        debug_assert_eq!(bytes.len(), span(offset, bit_length));
        ByteStore {
            bytes,
            offset,
            bit_length,
        }
    }

    pub fn empty() -> ByteStore {
        ByteStore::default()
    }

    pub fn zeros(bit_length: usize) -> ByteStore {
        ByteStore::new(vec![0; span(0, bit_length)], bit_length, 0)
    }

    /// Copies `bit_length` bits out of `data`, starting `offset` bits in.
    ///
    /// With no length, everything after the offset is taken. Whole bytes
    /// skipped by the offset and unused trailing bytes are dropped.
    ///
    /// # Errors
    /// Returns [`CreationError::NotEnoughData`] when `data` is too short.
    pub fn from_bytes(data: &[u8], bit_length: Option<usize>, offset: usize) -> Result<ByteStore> {
        let available = data.len() * 8;
        let bit_length = match bit_length {
            Some(length) => length,
            None => available.saturating_sub(offset),
        };
        if offset + bit_length > available {
            return Err(CreationError::NotEnoughData {
                required: offset + bit_length,
                available,
            }
            .into());
        }
        let first = offset / 8;
        let offset = offset % 8;
        let bytes = data[first..first + span(offset, bit_length)].to_vec();
        Ok(ByteStore::new(bytes, bit_length, offset))
    }

    #[inline]
    #[must_use]
    pub fn bit_len(&self) -> usize {
        self.bit_length
    }

    #[inline]
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    #[must_use]
    pub fn byte_len(&self) -> usize {
        span(self.offset, self.bit_length)
    }

    #[inline]
    #[must_use]
    pub fn raw_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[inline]
    fn locate(&self, position: usize) -> Result<(usize, u8)> {
        if position >= self.bit_length {
            return Err(Error::OutOfRange {
                position,
                length: self.bit_length,
            });
        }
        let absolute = self.offset + position;
        Ok((absolute / 8, 0x80 >> (absolute % 8)))
    }

    /// # Errors
    /// Returns [`Error::OutOfRange`] when `position` is not below the bit length.
    pub fn get_bit(&self, position: usize) -> Result<bool> {
        let (byte, mask) = self.locate(position)?;
        Ok(self.bytes[byte] & mask != 0)
    }

    /// # Errors
    /// Returns [`Error::OutOfRange`] when `position` is not below the bit length.
    pub fn set_bit(&mut self, position: usize) -> Result<()> {
        let (byte, mask) = self.locate(position)?;
        self.bytes[byte] |= mask;
        Ok(())
    }

    /// # Errors
    /// Returns [`Error::OutOfRange`] when `position` is not below the bit length.
    pub fn unset_bit(&mut self, position: usize) -> Result<()> {
        let (byte, mask) = self.locate(position)?;
        self.bytes[byte] &= !mask;
        Ok(())
    }

    /// # Errors
    /// Returns [`Error::OutOfRange`] when `position` is not below the bit length.
    pub fn invert_bit(&mut self, position: usize) -> Result<()> {
        let (byte, mask) = self.locate(position)?;
        self.bytes[byte] ^= mask;
        Ok(())
    }

    /// Bit at `position`, which the caller has already bounds-checked.
    #[inline]
    pub(crate) fn bit_unchecked(&self, position: usize) -> bool {
        debug_assert!(position < self.bit_length);
        let absolute = self.offset + position;
        self.bytes[absolute / 8] & (0x80 >> (absolute % 8)) != 0
    }

    /// Raw byte `index` of the backing buffer, padding bits included.
    ///
    /// # Panics
    /// If `index` is not below [`ByteStore::byte_len`].
    #[inline]
    #[must_use]
    pub fn get_byte(&self, index: usize) -> u8 {
        self.bytes[index]
    }

    /// Overwrites raw byte `index`. Padding bits written here are ignored.
    ///
    /// # Panics
    /// If `index` is not below [`ByteStore::byte_len`].
    #[inline]
    pub fn set_byte(&mut self, index: usize, value: u8) {
        self.bytes[index] = value;
    }

    /// # Panics
    /// If `start > end` or `end` exceeds [`ByteStore::byte_len`].
    #[inline]
    #[must_use]
    pub fn byte_slice(&self, start: usize, end: usize) -> &[u8] {
        &self.bytes[start..end]
    }

    /// # Panics
    /// If the written range runs past [`ByteStore::byte_len`].
    pub fn set_byte_slice(&mut self, start: usize, values: &[u8]) {
        self.bytes[start..start + values.len()].copy_from_slice(values);
    }

    /// Appends the bits of `other`, blending the boundary byte.
    pub fn append(&mut self, other: &ByteStore) {
        if other.bit_length == 0 {
            return;
        }
        if self.bit_length == 0 {
            *self = other.clone();
            return;
        }
        let other = offset_copy(other, (self.offset + self.bit_length) % 8);
        match self.bytes.last_mut() {
            Some(last) if other.offset != 0 => {
                let low = head_mask(other.offset);
                *last = (*last & !low) | (other.bytes[0] & low);
                self.bytes.extend_from_slice(&other.bytes[1..]);
            }
            _ => self.bytes.extend_from_slice(&other.bytes),
        }
        self.bit_length += other.bit_length;
    }

    /// Prepends the bits of `other`, blending the boundary byte.
    pub fn prepend(&mut self, other: &ByteStore) {
        if other.bit_length == 0 {
            return;
        }
        if self.bit_length == 0 {
            *self = other.clone();
            return;
        }
        let mut front = offset_copy(other, (self.offset + 8 - other.bit_length % 8) % 8);
        debug_assert_eq!((front.offset + front.bit_length) % 8, self.offset);
        match front.bytes.last_mut() {
            Some(last) if self.offset != 0 => {
                let low = head_mask(self.offset);
                *last = (*last & !low) | (self.bytes[0] & low);
                front.bytes.extend_from_slice(&self.bytes[1..]);
            }
            _ => front.bytes.extend_from_slice(&self.bytes),
        }
        self.bytes = front.bytes;
        self.offset = front.offset;
        self.bit_length += front.bit_length;
    }

    /// Drops the first `bits` bits.
    pub(crate) fn truncate_start(&mut self, bits: usize) {
        debug_assert!(bits <= self.bit_length);
        if bits == 0 {
            return;
        }
        if bits >= self.bit_length {
            *self = ByteStore::empty();
            return;
        }
        let absolute = self.offset + bits;
        self.bytes.drain(..absolute / 8);
        self.offset = absolute % 8;
        self.bit_length -= bits;
    }

    /// Drops the last `bits` bits.
    pub(crate) fn truncate_end(&mut self, bits: usize) {
        debug_assert!(bits <= self.bit_length);
        if bits == 0 {
            return;
        }
        if bits >= self.bit_length {
            *self = ByteStore::empty();
            return;
        }
        self.bit_length -= bits;
        self.bytes.truncate(span(self.offset, self.bit_length));
    }

    /// Copies bits `[start, end)` into an independently owned store.
    pub(crate) fn extract(&self, start: usize, end: usize) -> ByteStore {
        debug_assert!(start <= end && end <= self.bit_length);
        if start == end {
            return ByteStore::empty();
        }
        let first = (self.offset + start) / 8;
        let last = (self.offset + end - 1) / 8;
        ByteStore::new(
            self.bytes[first..=last].to_vec(),
            end - start,
            (self.offset + start) % 8,
        )
    }

    pub(crate) fn invert_all(&mut self) {
        for byte in &mut self.bytes {
            *byte = !*byte;
        }
    }

    /// Number of set bits inside the logical range.
    #[must_use]
    pub fn count_ones(&self) -> usize {
        let (Some(&first), Some(&last)) = (self.bytes.first(), self.bytes.last()) else {
            return 0;
        };
        let total: usize = self.bytes.iter().map(|&byte| usize::from(BIT_COUNT[byte as usize])).sum();
        let before = first & !head_mask(self.offset);
        let after = last & !tail_mask(self.offset + self.bit_length);
        total - usize::from(BIT_COUNT[before as usize]) - usize::from(BIT_COUNT[after as usize])
    }

    /// Bytes of the logical range realigned to offset 0, padding bits cleared.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = offset_copy(self, 0).bytes;
        if let Some(last) = bytes.last_mut() {
            *last &= tail_mask(self.bit_length);
        }
        bytes
    }

    /// Logical equality, independent of either store's offset.
    #[must_use]
    pub fn equal(&self, other: &ByteStore) -> bool {
        if self.bit_length != other.bit_length {
            return false;
        }
        if std::ptr::eq(self, other) || self.bit_length == 0 {
            return true;
        }
        if self.offset == other.offset {
            return equal_aligned(self, other);
        }
        equal_aligned(self, &offset_copy(other, self.offset))
    }
}

fn equal_aligned(left: &ByteStore, right: &ByteStore) -> bool {
    debug_assert_eq!(left.offset, right.offset);
    debug_assert_eq!(left.bytes.len(), right.bytes.len());
    let head = head_mask(left.offset);
    let tail = tail_mask(left.offset + left.bit_length);
    let count = left.bytes.len();
    if count == 1 {
        let mask = head & tail;
        return left.bytes[0] & mask == right.bytes[0] & mask;
    }
    left.bytes[0] & head == right.bytes[0] & head
        && left.bytes[1..count - 1] == right.bytes[1..count - 1]
        && left.bytes[count - 1] & tail == right.bytes[count - 1] & tail
}
