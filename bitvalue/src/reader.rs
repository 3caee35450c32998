//! Sequential decoding from a bit cursor.

use tracing::trace;

use crate::codec::token::{FieldFormat, FieldKind, parse_format, parse_formats};
use crate::codec::{Encoding, Value};
use crate::error::{Error, ReadError, Result};
use crate::value::BitValue;

/// Reads fields one after another from a borrowed [`BitValue`].
///
/// A read that fails leaves the cursor where it was.
///
/// ```
/// use bitvalue::{BitReader, BitValue, Value};
///
/// let packet: BitValue = "uint:4=9, ue=5, hex=beef".parse()?;
/// let mut reader = BitReader::new(&packet);
/// assert_eq!(reader.read("uint:4")?, Value::Uint(9));
/// assert_eq!(reader.read("ue")?, Value::Uint(5));
/// assert_eq!(reader.read("hex:16")?, Value::Text("beef".into()));
/// assert_eq!(reader.bits_remaining(), 0);
/// # Ok::<(), bitvalue::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct BitReader<'a> {
    value: &'a BitValue,
    position: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(value: &'a BitValue) -> Self {
        Self { value, position: 0 }
    }

    #[must_use]
    pub fn pos(&self) -> usize {
        self.position
    }

    /// # Errors
    /// [`Error::OutOfRange`] for a position past the end.
    pub fn set_pos(&mut self, position: usize) -> Result<()> {
        if position > self.value.len() {
            return Err(Error::OutOfRange {
                position,
                length: self.value.len(),
            });
        }
        self.position = position;
        Ok(())
    }

    #[must_use]
    pub fn bits_remaining(&self) -> usize {
        self.value.len() - self.position
    }

    /// Moves to the next byte boundary, or the end, and returns the bits skipped.
    pub fn byte_align(&mut self) -> usize {
        let skipped = ((8 - self.position % 8) % 8).min(self.bits_remaining());
        self.position += skipped;
        skipped
    }

    fn require(&self, requested: usize) -> Result<()> {
        if requested > self.bits_remaining() {
            return Err(ReadError::InsufficientBits {
                requested,
                position: self.position,
                available: self.bits_remaining(),
            }
            .into());
        }
        Ok(())
    }

    /// # Errors
    /// [`ReadError::InsufficientBits`] when fewer than `count` bits remain.
    pub fn read_bits(&mut self, count: usize) -> Result<BitValue> {
        self.require(count)?;
        let bits = self.value.slice(self.position..self.position + count)?;
        self.position += count;
        Ok(bits)
    }

    /// Decodes one field under `encoding`. Fixed-width encodings take `length`
    /// bits (`bool` defaults to one); codes consume exactly what they span.
    ///
    /// # Errors
    /// [`ReadError`] for fields past the end or a missing length, and
    /// [`InterpretError`](crate::InterpretError) for lengths the encoding refuses.
    pub fn read_encoding(&mut self, encoding: Encoding, length: Option<usize>) -> Result<Value> {
        let codec = encoding.codec();
        let (value, end) = if codec.fixed_width {
            let length = match (length, encoding) {
                (Some(length), _) => length,
                (None, Encoding::Bool) => 1,
                (None, _) => return Err(ReadError::LengthRequired(codec.name).into()),
            };
            self.require(length)?;
            encoding.read(self.value, self.position, length)?
        } else {
            encoding.read(self.value, self.position, 0)?
        };
        trace!(%encoding, from = self.position, to = end, "field read");
        self.position = end;
        Ok(value)
    }

    fn read_field(&mut self, field: FieldFormat) -> Result<Value> {
        match field.kind {
            FieldKind::Bits => {
                let count = field.length.ok_or(ReadError::LengthRequired("bits"))?;
                self.read_bits(count).map(Value::Bits)
            }
            // Byte fields are sized in bytes.
            FieldKind::Encoding(Encoding::Bytes) => {
                self.read_encoding(Encoding::Bytes, field.length.map(|bytes| bytes * 8))
            }
            FieldKind::Encoding(encoding) => self.read_encoding(encoding, field.length),
        }
    }

    /// Decodes one field described by a format such as `uint:8`, `bits:5`,
    /// `bytes:2` (two bytes), `se` or `bool`.
    ///
    /// # Errors
    /// As [`BitReader::read_encoding`], or a creation error for a bad format.
    pub fn read(&mut self, format: &str) -> Result<Value> {
        self.read_field(parse_format(format)?)
    }

    /// Decodes a comma separated list of fields. On failure the cursor is
    /// restored to where the list started.
    ///
    /// # Errors
    /// As [`BitReader::read`], for the first field that fails.
    pub fn read_list(&mut self, formats: &str) -> Result<Vec<Value>> {
        let fields = parse_formats(formats)?;
        let start = self.position;
        let values: Result<Vec<Value>> = fields.into_iter().map(|field| self.read_field(field)).collect();
        if values.is_err() {
            self.position = start;
        }
        values
    }

    /// Decodes a field without moving the cursor.
    ///
    /// # Errors
    /// As [`BitReader::read`].
    pub fn peek(&mut self, format: &str) -> Result<Value> {
        let start = self.position;
        let value = self.read(format);
        self.position = start;
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InterpretError;

    fn stream(text: &str) -> BitValue {
        text.parse().unwrap()
    }

    #[test]
    fn reads_mixed_fields() {
        let value = stream("uint:3=5, int:9=-100, se=-7, bool=1, floatle:32=1.5, bytes=ok");
        let mut reader = BitReader::new(&value);
        assert_eq!(reader.read("uint:3").unwrap(), Value::Uint(5));
        assert_eq!(reader.read("int:9").unwrap(), Value::Int(-100));
        assert_eq!(reader.read("se").unwrap(), Value::Int(-7));
        assert_eq!(reader.read("bool").unwrap(), Value::Bool(true));
        assert_eq!(reader.read("floatle:32").unwrap(), Value::Float(1.5));
        assert_eq!(reader.read("bytes:2").unwrap(), Value::Bytes(b"ok".to_vec()));
        assert_eq!(reader.bits_remaining(), 0);
    }

    #[test]
    fn failed_reads_keep_the_cursor() {
        let value = stream("0b0001");
        let mut reader = BitReader::new(&value);
        reader.set_pos(1).unwrap();
        assert!(matches!(reader.read("ue"), Err(Error::Read(ReadError::PastEnd { .. }))));
        assert!(matches!(
            reader.read("uint:4"),
            Err(Error::Read(ReadError::InsufficientBits {
                requested: 4,
                position: 1,
                available: 3
            }))
        ));
        assert!(matches!(
            reader.read("hex:3"),
            Err(Error::Interpret(InterpretError::Granularity { .. }))
        ));
        assert!(matches!(reader.read("hex"), Err(Error::Read(ReadError::LengthRequired("hex")))));
        assert_eq!(reader.pos(), 1);
        assert!(reader.set_pos(5).is_err());
    }

    #[test]
    fn list_reads_are_all_or_nothing() {
        let value = stream("ue=2, uie=2, 0b1");
        let mut reader = BitReader::new(&value);
        assert_eq!(reader.peek("ue").unwrap(), Value::Uint(2));
        assert_eq!(reader.pos(), 0);
        assert!(reader.read_list("ue, uie, uint:2").is_err());
        assert_eq!(reader.pos(), 0);
        assert_eq!(
            reader.read_list("ue, uie, bits:1").unwrap(),
            vec![Value::Uint(2), Value::Uint(2), Value::Bits(stream("0b1"))]
        );
    }

    #[test]
    fn byte_alignment() {
        let value = BitValue::zeros(20);
        let mut reader = BitReader::new(&value);
        assert_eq!(reader.byte_align(), 0);
        reader.read_bits(3).unwrap();
        assert_eq!(reader.byte_align(), 5);
        assert_eq!(reader.pos(), 8);
        reader.set_pos(17).unwrap();
        assert_eq!(reader.byte_align(), 3);
        assert_eq!(reader.bits_remaining(), 0);
    }
}
