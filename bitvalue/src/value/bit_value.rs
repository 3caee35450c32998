use sorted_iter::{SortedIterator, assume::AssumeSortedByItemExt};

use crate::codec::float::{self, ByteOrder};
use crate::codec::{Encoding, LengthRule, Value, golomb, integer, text};
use crate::error::{Error, InterpretError, Result};
use crate::store::{ByteStore, offset_copy};

/// An ordered sequence of bits of arbitrary length.
///
/// `BitValue` owns a byte buffer holding its bits, starting anywhere within the
/// first byte. Two values are equal when they hold the same bits, whatever their
/// backing alignment, and every slice or copy owns its own bytes.
///
/// # Construction
///
/// Values are built from one encoding of the catalogue, from initialiser text,
/// or from raw bytes:
///
/// ```
/// use bitvalue::{BitValue, Encoding};
///
/// let byte = BitValue::from_uint(255, 8)?;
/// assert_eq!(byte.to_bytes(), vec![0xFF]);
///
/// let parsed: BitValue = "uint:8=255".parse()?;
/// assert_eq!(parsed, byte);
///
/// let little = BitValue::from_encoding(Encoding::UintLe, 0x0102u128, Some(16))?;
/// assert_eq!(little.to_bytes(), vec![0x02, 0x01]);
///
/// let hex = BitValue::from_hex("1234")?;
/// assert_eq!(hex.len(), 16);
/// assert_eq!(hex.bin(), "0001001000110100");
/// # Ok::<(), bitvalue::Error>(())
/// ```
///
/// # Interpretation
///
/// Any value can be read back under a compatible encoding. Reads never modify
/// the value and fail with [`InterpretError`] when its length does not suit:
///
/// ```
/// use bitvalue::{BitValue, Encoding, Value};
///
/// let value = BitValue::from_int(-3, 12)?;
/// assert_eq!(value.int()?, -3);
/// assert_eq!(value.uint()?, 4093);
/// assert_eq!(value.interpret(Encoding::Hex)?, Value::Text("ffd".into()));
/// assert!(value.float().is_err());
/// # Ok::<(), bitvalue::Error>(())
/// ```
///
/// # Editing
///
/// ```
/// use bitvalue::BitValue;
///
/// let mut value = BitValue::from_bin("1111")?;
/// value.insert(&BitValue::from_bin("00")?, 2)?;
/// assert_eq!(value.bin(), "110011");
/// value.reverse();
/// value.delete(2, 0)?;
/// assert_eq!(value.bin(), "0011");
/// # Ok::<(), bitvalue::Error>(())
/// ```
#[must_use]
#[derive(Clone, Default)]
pub struct BitValue {
    pub(crate) store: ByteStore,
}

impl BitValue {
    pub(crate) fn from_store(store: ByteStore) -> BitValue {
        BitValue { store }
    }

    /// Creates a value of no bits.
    ///
    /// # Example
    ///
    /// ```
    /// use bitvalue::BitValue;
    ///
    /// let value = BitValue::empty();
    /// assert!(value.is_empty());
    /// assert_eq!(value.to_string(), "");
    /// ```
    pub fn empty() -> BitValue {
        BitValue::default()
    }

    /// Creates a value of `length` bits, all zero.
    ///
    /// # Example
    ///
    /// ```
    /// use bitvalue::BitValue;
    ///
    /// let value = BitValue::zeros(12);
    /// assert_eq!(value.len(), 12);
    /// assert!(value.all(false));
    /// ```
    pub fn zeros(length: usize) -> BitValue {
        BitValue::from_store(ByteStore::zeros(length))
    }

    /// Creates a value of `length` bits, all one.
    ///
    /// # Example
    ///
    /// ```
    /// use bitvalue::BitValue;
    ///
    /// let value = BitValue::ones(5);
    /// assert_eq!(value.count(true), 5);
    /// assert_eq!(value.bin(), "11111");
    /// ```
    pub fn ones(length: usize) -> BitValue {
        let mut value = BitValue::zeros(length);
        value.store.invert_all();
        value
    }

    /// Uniformly random bits.
    ///
    /// # Example
    ///
    /// ```
    /// use bitvalue::BitValue;
    /// use rand::{SeedableRng, rngs::StdRng};
    ///
    /// let mut random_number_generator = StdRng::seed_from_u64(7);
    /// let value = BitValue::random(100, &mut random_number_generator);
    /// assert_eq!(value.len(), 100);
    /// ```
    pub fn random(length: usize, random_number_generator: &mut impl rand::Rng) -> BitValue {
        let mut bytes = vec![0u8; length.div_ceil(8)];
        random_number_generator.fill(bytes.as_mut_slice());
        BitValue::from_store(ByteStore::new(bytes, length, 0))
    }

    /// Builds a value under `encoding`.
    ///
    /// # Errors
    /// Any [`CreationError`](crate::CreationError) the encoding raises for `value` and `length`.
    pub fn from_encoding(encoding: Encoding, value: impl Into<Value>, length: Option<usize>) -> Result<BitValue> {
        encoding.create(&value.into(), length)
    }

    /// Unsigned big-endian integer of exactly `length` bits.
    ///
    /// # Example
    ///
    /// ```
    /// use bitvalue::BitValue;
    ///
    /// assert_eq!(BitValue::from_uint(5, 4)?.bin(), "0101");
    /// assert!(BitValue::from_uint(16, 4).is_err());
    /// # Ok::<(), bitvalue::Error>(())
    /// ```
    ///
    /// # Errors
    /// Fails when `value` needs more than `length` bits, or `length` is zero.
    pub fn from_uint(value: u128, length: usize) -> Result<BitValue> {
        integer::create_uint(value, length).map(BitValue::from_store)
    }

    /// # Errors
    /// Fails when `value` is outside the `length`-bit two's-complement range, or `length` is zero.
    pub fn from_int(value: i128, length: usize) -> Result<BitValue> {
        integer::create_int(value, length).map(BitValue::from_store)
    }

    /// Big-endian IEEE-754 value of 32 or 64 bits.
    ///
    /// # Errors
    /// Fails for any other length.
    pub fn from_float(value: f64, length: usize) -> Result<BitValue> {
        float::create_float(value, length, ByteOrder::Big).map(BitValue::from_store)
    }

    /// Four bits per hex digit.
    ///
    /// # Example
    ///
    /// ```
    /// use bitvalue::BitValue;
    ///
    /// let value = BitValue::from_hex("0xA 5")?;
    /// assert_eq!(value.bin(), "10100101");
    /// # Ok::<(), bitvalue::Error>(())
    /// ```
    ///
    /// # Errors
    /// Fails on characters other than hex digits, whitespace and a leading `0x`.
    pub fn from_hex(text: &str) -> Result<BitValue> {
        text::create_hex(text).map(BitValue::from_store)
    }

    /// # Errors
    /// Fails on characters other than octal digits, whitespace and a leading `0o`.
    pub fn from_oct(text: &str) -> Result<BitValue> {
        text::create_oct(text).map(BitValue::from_store)
    }

    /// # Errors
    /// Fails on characters other than `0`, `1`, whitespace and a leading `0b`.
    pub fn from_bin(text: &str) -> Result<BitValue> {
        text::create_bin(text).map(BitValue::from_store)
    }

    /// A single bit.
    pub fn from_bool(value: bool) -> BitValue {
        BitValue::from_store(text::pack_bits([value]))
    }

    /// All the bits of `data`, eight per byte.
    ///
    /// # Example
    ///
    /// ```
    /// use bitvalue::BitValue;
    ///
    /// let value = BitValue::from_bytes(&[0x0F, 0x80]);
    /// assert_eq!(value.len(), 16);
    /// assert_eq!(value.hex()?, "0f80");
    /// # Ok::<(), bitvalue::Error>(())
    /// ```
    pub fn from_bytes(data: &[u8]) -> BitValue {
        BitValue::from_store(ByteStore::new(data.to_vec(), data.len() * 8, 0))
    }

    /// Copies `length` bits of `data` starting `offset` bits in; without a
    /// length everything after the offset is taken.
    ///
    /// # Errors
    /// Fails when `data` holds fewer than `offset + length` bits.
    pub fn from_bytes_with(data: &[u8], length: Option<usize>, offset: usize) -> Result<BitValue> {
        ByteStore::from_bytes(data, length, offset).map(BitValue::from_store)
    }

    /// Unsigned Exponential-Golomb code of `value`.
    ///
    /// # Example
    ///
    /// ```
    /// use bitvalue::BitValue;
    ///
    /// assert_eq!(BitValue::from_ue(0)?.bin(), "1");
    /// assert_eq!(BitValue::from_ue(3)?.bin(), "00100");
    /// # Ok::<(), bitvalue::Error>(())
    /// ```
    ///
    /// # Errors
    /// Fails only for `u128::MAX`.
    pub fn from_ue(value: u128) -> Result<BitValue> {
        golomb::create_ue(value).map(BitValue::from_store)
    }

    /// # Errors
    /// Fails when the zig-zagged code number does not fit in 128 bits.
    pub fn from_se(value: i128) -> Result<BitValue> {
        golomb::create_se(value).map(BitValue::from_store)
    }

    /// # Errors
    /// Fails only for `u128::MAX`.
    pub fn from_uie(value: u128) -> Result<BitValue> {
        golomb::create_uie(value).map(BitValue::from_store)
    }

    /// # Errors
    /// Fails only for values whose magnitude is `u128::MAX`.
    pub fn from_sie(value: i128) -> Result<BitValue> {
        golomb::create_sie(value).map(BitValue::from_store)
    }

    /// Replaces the contents with `value` under `encoding`. Encodings that need a
    /// length reuse the current one.
    ///
    /// # Errors
    /// As [`BitValue::from_encoding`]; on failure the value is unchanged.
    pub fn reassign(&mut self, encoding: Encoding, value: impl Into<Value>) -> Result<()> {
        let length = match encoding.codec().length_rule {
            LengthRule::Required => Some(self.len()),
            LengthRule::Optional | LengthRule::Implied => None,
        };
        *self = encoding.create(&value.into(), length)?;
        Ok(())
    }

    /// Number of bits.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.bit_len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bit offset of the first bit inside the backing buffer.
    #[inline]
    #[must_use]
    pub fn offset(&self) -> usize {
        self.store.offset()
    }

    /// The bit at `position`, counting from the first bit.
    ///
    /// # Example
    ///
    /// ```
    /// use bitvalue::BitValue;
    ///
    /// let value = BitValue::from_bin("0100")?;
    /// assert!(value.get(1)?);
    /// assert!(value.get(4).is_err());
    /// # Ok::<(), bitvalue::Error>(())
    /// ```
    ///
    /// # Errors
    /// [`Error::OutOfRange`] when `position` is not below the length.
    pub fn get(&self, position: usize) -> Result<bool> {
        self.store.get_bit(position)
    }

    /// Sets the bit at `position` to `value`.
    ///
    /// # Errors
    /// [`Error::OutOfRange`] when `position` is not below the length.
    pub fn set(&mut self, position: usize, value: bool) -> Result<()> {
        if value {
            self.store.set_bit(position)
        } else {
            self.store.unset_bit(position)
        }
    }

    /// # Errors
    /// [`Error::OutOfRange`] when `position` is not below the length.
    pub fn invert_bit(&mut self, position: usize) -> Result<()> {
        self.store.invert_bit(position)
    }

    /// The bits in order, first bit first.
    ///
    /// # Example
    ///
    /// ```
    /// use bitvalue::BitValue;
    ///
    /// let value = BitValue::from_bin("101")?;
    /// assert_eq!(value.iter().collect::<Vec<_>>(), vec![true, false, true]);
    /// # Ok::<(), bitvalue::Error>(())
    /// ```
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len()).map(|position| self.store.bit_unchecked(position))
    }

    /// Positions of the set bits, in increasing order.
    ///
    /// # Example
    ///
    /// ```
    /// use bitvalue::BitValue;
    ///
    /// let value = BitValue::from_bin("0110001")?;
    /// assert_eq!(value.support().collect::<Vec<_>>(), vec![1, 2, 6]);
    /// # Ok::<(), bitvalue::Error>(())
    /// ```
    pub fn support(&self) -> impl SortedIterator<Item = usize> + '_ {
        self.iter()
            .enumerate()
            .filter(|pair| pair.1)
            .map(|pair| pair.0)
            .assume_sorted_by_item()
    }

    /// Raw bytes, with the final partial byte padded with zeros.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.store.to_bytes()
    }

    /// The same bits stored starting `offset % 8` bits into the first byte.
    pub fn aligned(&self, offset: usize) -> BitValue {
        BitValue::from_store(offset_copy(&self.store, offset % 8))
    }

    /// Number of bits equal to `value`.
    #[must_use]
    pub fn count(&self, value: bool) -> usize {
        let ones = self.store.count_ones();
        if value { ones } else { self.len() - ones }
    }

    /// Whether every bit equals `value`. True for the empty value.
    #[must_use]
    pub fn all(&self, value: bool) -> bool {
        self.count(value) == self.len()
    }

    /// Whether some bit equals `value`.
    #[must_use]
    pub fn any(&self, value: bool) -> bool {
        self.count(value) > 0
    }

    /// Whether every listed position holds `value`.
    ///
    /// # Errors
    /// [`Error::OutOfRange`] for the first position past the end.
    pub fn all_at(&self, value: bool, positions: impl IntoIterator<Item = usize>) -> Result<bool> {
        for position in positions {
            if self.get(position)? != value {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Whether some listed position holds `value`.
    ///
    /// # Errors
    /// [`Error::OutOfRange`] for the first position past the end.
    pub fn any_at(&self, value: bool, positions: impl IntoIterator<Item = usize>) -> Result<bool> {
        for position in positions {
            if self.get(position)? == value {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Whether the first bits equal `prefix`.
    #[must_use]
    pub fn starts_with(&self, prefix: &BitValue) -> bool {
        prefix.len() <= self.len() && self.store.extract(0, prefix.len()).equal(&prefix.store)
    }

    /// Whether the last bits equal `suffix`.
    #[must_use]
    pub fn ends_with(&self, suffix: &BitValue) -> bool {
        suffix.len() <= self.len() && self.store.extract(self.len() - suffix.len(), self.len()).equal(&suffix.store)
    }

    /// Reads the whole value under `encoding`.
    ///
    /// # Errors
    /// [`InterpretError`] when the length does not suit the encoding, or when a
    /// variable-length code does not span exactly the whole value.
    pub fn interpret(&self, encoding: Encoding) -> Result<Value> {
        if encoding.codec().fixed_width {
            return encoding.read(self, 0, self.len()).map(|(value, _)| value);
        }
        self.single_code(encoding.codec().name, |value| encoding.read(value, 0, 0))
    }

    fn single_code<T>(&self, name: &'static str, read: impl FnOnce(&BitValue) -> Result<(T, usize)>) -> Result<T> {
        match read(self) {
            Ok((value, end)) if end == self.len() => Ok(value),
            Ok(_) | Err(Error::Read(_)) => Err(InterpretError::NotSingleCode(name).into()),
            Err(error) => Err(error),
        }
    }

    /// # Errors
    /// Fails for the empty value and for values over 128 bits with high bits set.
    pub fn uint(&self) -> Result<u128> {
        integer::read_uint(self, 0, self.len())
    }

    /// # Errors
    /// Fails for the empty value and for values over 128 bits that are not sign extensions.
    pub fn int(&self) -> Result<i128> {
        integer::read_int(self, 0, self.len())
    }

    /// Big-endian IEEE-754 interpretation.
    ///
    /// # Errors
    /// Fails unless the length is 32 or 64.
    pub fn float(&self) -> Result<f64> {
        float::read_float(self, 0, self.len(), ByteOrder::Big)
    }

    /// # Errors
    /// Fails unless the length is a multiple of 4.
    pub fn hex(&self) -> Result<String> {
        text::read_hex(self, 0, self.len())
    }

    /// # Errors
    /// Fails unless the length is a multiple of 3.
    pub fn oct(&self) -> Result<String> {
        text::read_oct(self, 0, self.len())
    }

    #[must_use]
    pub fn bin(&self) -> String {
        text::read_bin(self, 0, self.len())
    }

    /// # Errors
    /// Fails unless the length is a multiple of 8.
    pub fn bytes(&self) -> Result<Vec<u8>> {
        if self.len() % 8 != 0 {
            return Err(InterpretError::Granularity {
                encoding: "bytes",
                length: self.len(),
                granularity: 8,
            }
            .into());
        }
        Ok(self.to_bytes())
    }

    /// # Errors
    /// Fails unless the length is exactly 1.
    pub fn bool(&self) -> Result<bool> {
        if self.len() != 1 {
            return Err(InterpretError::ExactLength {
                encoding: "bool",
                expected: "1",
                length: self.len(),
            }
            .into());
        }
        Ok(self.store.bit_unchecked(0))
    }

    /// # Errors
    /// Fails unless the value is exactly one `ue` code.
    pub fn ue(&self) -> Result<u128> {
        self.single_code("ue", |value| golomb::read_ue(value, 0))
    }

    /// # Errors
    /// Fails unless the value is exactly one `se` code.
    pub fn se(&self) -> Result<i128> {
        self.single_code("se", |value| golomb::read_se(value, 0))
    }

    /// # Errors
    /// Fails unless the value is exactly one `uie` code.
    pub fn uie(&self) -> Result<u128> {
        self.single_code("uie", |value| golomb::read_uie(value, 0))
    }

    /// # Errors
    /// Fails unless the value is exactly one `sie` code.
    pub fn sie(&self) -> Result<i128> {
        self.single_code("sie", |value| golomb::read_sie(value, 0))
    }

    /// Bounded-sample hash: every bit of values up to 160 bits long, otherwise
    /// the first and last 80 bits.
    #[must_use]
    pub fn digest(&self) -> u32 {
        let sample = if self.len() <= 160 {
            self.to_bytes()
        } else {
            let mut sample = self.store.extract(0, 80);
            sample.append(&self.store.extract(self.len() - 80, self.len()));
            sample.to_bytes()
        };
        let folded = sample.into_iter().fold(0u32, |hash, byte| {
            let hash = (hash << 4).wrapping_add(u32::from(byte));
            let high = hash & 0xF000_0000;
            if high == 0 { hash } else { (hash ^ (high >> 24)) & !high }
        });
        folded % 1_442_968_193
    }
}

impl PartialEq for BitValue {
    fn eq(&self, other: &Self) -> bool {
        self.store.equal(&other.store)
    }
}

impl Eq for BitValue {}

impl std::hash::Hash for BitValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        self.digest().hash(state);
    }
}

impl FromIterator<bool> for BitValue {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        BitValue::from_store(text::pack_bits(iter))
    }
}

impl From<&[u8]> for BitValue {
    fn from(data: &[u8]) -> Self {
        BitValue::from_bytes(data)
    }
}
