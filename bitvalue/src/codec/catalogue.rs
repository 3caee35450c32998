use derive_more::{Display, From};
use std::str::FromStr;

use crate::codec::float::{self, ByteOrder};
use crate::codec::{golomb, integer, text};
use crate::error::{CreationError, Error, InterpretError, Result};
use crate::store::ByteStore;
use crate::value::BitValue;

/// Tag of every named encoding a bit value can be built from or read as.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash)]
pub enum Encoding {
    #[display("uint")]
    Uint,
    #[display("int")]
    Int,
    #[display("uintbe")]
    UintBe,
    #[display("intbe")]
    IntBe,
    #[display("uintle")]
    UintLe,
    #[display("intle")]
    IntLe,
    #[display("uintne")]
    UintNe,
    #[display("intne")]
    IntNe,
    #[display("float")]
    Float,
    #[display("floatbe")]
    FloatBe,
    #[display("floatle")]
    FloatLe,
    #[display("floatne")]
    FloatNe,
    #[display("hex")]
    Hex,
    #[display("oct")]
    Oct,
    #[display("bin")]
    Bin,
    #[display("bytes")]
    Bytes,
    #[display("bool")]
    Bool,
    #[display("ue")]
    Ue,
    #[display("se")]
    Se,
    #[display("uie")]
    Uie,
    #[display("sie")]
    Sie,
}

/// A decoded value, or the input to an encoding.
#[derive(Clone, Debug, PartialEq, From)]
pub enum Value {
    Uint(u128),
    Int(i128),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Bool(bool),
    Bits(BitValue),
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_string())
    }
}

/// What kind of literal an encoding accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueKind {
    Unsigned,
    Signed,
    Float,
    Text,
    Bytes,
    Bool,
}

/// How an encoding uses an explicit length.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LengthRule {
    /// The length is part of the encoding and must be given
    Required,
    /// The length may trim the data it is built from
    Optional,
    /// The data determines the length; a given length must agree with it
    Implied,
}

type Create = fn(&Value, Option<usize>) -> Result<ByteStore>;
type Read = fn(&BitValue, usize, usize) -> Result<(Value, usize)>;

/// One row of the catalogue: an encoding's name, construction and interpretation.
pub struct Codec {
    pub encoding: Encoding,
    pub name: &'static str,
    pub kind: ValueKind,
    pub length_rule: LengthRule,
    /// Whether a read consumes a caller-given length rather than a self-delimiting code
    pub fixed_width: bool,
    pub create: Create,
    pub read: Read,
}

fn invalid(encoding: Encoding, value: &Value) -> Error {
    CreationError::InvalidLiteral {
        encoding: encoding.codec().name,
        literal: format!("{value:?}"),
    }
    .into()
}

fn unsigned(encoding: Encoding, value: &Value) -> Result<u128> {
    match value {
        Value::Uint(number) => Ok(*number),
        Value::Int(number) if *number < 0 => Err(CreationError::Negative {
            encoding: encoding.codec().name,
        }
        .into()),
        Value::Int(number) => Ok(number.unsigned_abs()),
        Value::Bool(flag) => Ok(u128::from(*flag)),
        other => Err(invalid(encoding, other)),
    }
}

fn signed(encoding: Encoding, value: &Value) -> Result<i128> {
    match value {
        Value::Int(number) => Ok(*number),
        Value::Uint(number) => i128::try_from(*number).map_err(|_| CreationError::Overflow(number.to_string()).into()),
        Value::Bool(flag) => Ok(i128::from(*flag)),
        other => Err(invalid(encoding, other)),
    }
}

fn floating(encoding: Encoding, value: &Value) -> Result<f64> {
    match value {
        Value::Float(number) => Ok(*number),
        Value::Int(number) => Ok(*number as f64),
        Value::Uint(number) => Ok(*number as f64),
        other => Err(invalid(encoding, other)),
    }
}

fn textual(encoding: Encoding, value: &Value) -> Result<&str> {
    match value {
        Value::Text(text) => Ok(text),
        other => Err(invalid(encoding, other)),
    }
}

fn length_required(encoding: Encoding, length: Option<usize>) -> Result<usize> {
    match length {
        Some(length) if length > 0 => Ok(length),
        _ => Err(CreationError::LengthRequired(encoding.codec().name).into()),
    }
}

macro_rules! unsigned_codec {
    ($encoding:ident, $name:literal, $create:path, $read:path) => {
        Codec {
            encoding: Encoding::$encoding,
            name: $name,
            kind: ValueKind::Unsigned,
            length_rule: LengthRule::Required,
            fixed_width: true,
            create: |value, length| {
                let length = length_required(Encoding::$encoding, length)?;
                $create(unsigned(Encoding::$encoding, value)?, length)
            },
            read: |bits, start, length| Ok((Value::Uint($read(bits, start, length)?), start + length)),
        }
    };
}

macro_rules! signed_codec {
    ($encoding:ident, $name:literal, $create:path, $read:path) => {
        Codec {
            encoding: Encoding::$encoding,
            name: $name,
            kind: ValueKind::Signed,
            length_rule: LengthRule::Required,
            fixed_width: true,
            create: |value, length| {
                let length = length_required(Encoding::$encoding, length)?;
                $create(signed(Encoding::$encoding, value)?, length)
            },
            read: |bits, start, length| Ok((Value::Int($read(bits, start, length)?), start + length)),
        }
    };
}

macro_rules! float_codec {
    ($encoding:ident, $name:literal, $order:expr) => {
        Codec {
            encoding: Encoding::$encoding,
            name: $name,
            kind: ValueKind::Float,
            length_rule: LengthRule::Required,
            fixed_width: true,
            create: |value, length| {
                let length = length_required(Encoding::$encoding, length)?;
                float::create_float(floating(Encoding::$encoding, value)?, length, $order)
            },
            read: |bits, start, length| {
                Ok((Value::Float(float::read_float(bits, start, length, $order)?), start + length))
            },
        }
    };
}

macro_rules! text_codec {
    ($encoding:ident, $name:literal, $create:path, $read:path) => {
        Codec {
            encoding: Encoding::$encoding,
            name: $name,
            kind: ValueKind::Text,
            length_rule: LengthRule::Implied,
            fixed_width: true,
            create: |value, _| $create(textual(Encoding::$encoding, value)?),
            read: |bits, start, length| Ok((Value::Text($read(bits, start, length)?), start + length)),
        }
    };
}

macro_rules! golomb_codec {
    ($encoding:ident, $name:literal, $kind:ident, $convert:ident, $create:path, $read:path, $variant:ident) => {
        Codec {
            encoding: Encoding::$encoding,
            name: $name,
            kind: ValueKind::$kind,
            length_rule: LengthRule::Implied,
            fixed_width: false,
            create: |value, _| $create($convert(Encoding::$encoding, value)?),
            read: |bits, start, _| {
                let (number, end) = $read(bits, start)?;
                Ok((Value::$variant(number), end))
            },
        }
    };
}

fn read_bin(bits: &BitValue, start: usize, length: usize) -> Result<String> {
    Ok(text::read_bin(bits, start, length))
}

fn create_bytes(value: &Value, length: Option<usize>) -> Result<ByteStore> {
    match value {
        Value::Bytes(data) => ByteStore::from_bytes(data, length, 0),
        Value::Text(text) => ByteStore::from_bytes(text.as_bytes(), length, 0),
        other => Err(invalid(Encoding::Bytes, other)),
    }
}

fn read_bytes(bits: &BitValue, start: usize, length: usize) -> Result<(Value, usize)> {
    if length % 8 != 0 {
        return Err(InterpretError::Granularity {
            encoding: "bytes",
            length,
            granularity: 8,
        }
        .into());
    }
    Ok((Value::Bytes(bits.store.extract(start, start + length).to_bytes()), start + length))
}

fn create_bool(value: &Value, _: Option<usize>) -> Result<ByteStore> {
    let flag = match value {
        Value::Bool(flag) => *flag,
        Value::Uint(0) | Value::Int(0) => false,
        Value::Uint(1) | Value::Int(1) => true,
        Value::Text(text) => match text.trim() {
            "True" | "true" | "1" => true,
            "False" | "false" | "0" => false,
            _ => return Err(invalid(Encoding::Bool, value)),
        },
        other => return Err(invalid(Encoding::Bool, other)),
    };
    Ok(text::pack_bits([flag]))
}

fn read_bool(bits: &BitValue, start: usize, length: usize) -> Result<(Value, usize)> {
    if length != 1 {
        return Err(InterpretError::ExactLength {
            encoding: "bool",
            expected: "1",
            length,
        }
        .into());
    }
    Ok((Value::Bool(bits.store.bit_unchecked(start)), start + 1))
}

/// Every encoding, in [`Encoding`] declaration order.
pub static CATALOGUE: [Codec; 21] = [
    unsigned_codec!(Uint, "uint", integer::create_uint, integer::read_uint),
    signed_codec!(Int, "int", integer::create_int, integer::read_int),
    unsigned_codec!(UintBe, "uintbe", integer::create_uintbe, integer::read_uintbe),
    signed_codec!(IntBe, "intbe", integer::create_intbe, integer::read_intbe),
    unsigned_codec!(UintLe, "uintle", integer::create_uintle, integer::read_uintle),
    signed_codec!(IntLe, "intle", integer::create_intle, integer::read_intle),
    unsigned_codec!(UintNe, "uintne", integer::create_uintne, integer::read_uintne),
    signed_codec!(IntNe, "intne", integer::create_intne, integer::read_intne),
    float_codec!(Float, "float", ByteOrder::Big),
    float_codec!(FloatBe, "floatbe", ByteOrder::Big),
    float_codec!(FloatLe, "floatle", ByteOrder::Little),
    float_codec!(FloatNe, "floatne", ByteOrder::NATIVE),
    text_codec!(Hex, "hex", text::create_hex, text::read_hex),
    text_codec!(Oct, "oct", text::create_oct, text::read_oct),
    text_codec!(Bin, "bin", text::create_bin, read_bin),
    Codec {
        encoding: Encoding::Bytes,
        name: "bytes",
        kind: ValueKind::Bytes,
        length_rule: LengthRule::Optional,
        fixed_width: true,
        create: create_bytes,
        read: read_bytes,
    },
    Codec {
        encoding: Encoding::Bool,
        name: "bool",
        kind: ValueKind::Bool,
        length_rule: LengthRule::Implied,
        fixed_width: true,
        create: create_bool,
        read: read_bool,
    },
    golomb_codec!(Ue, "ue", Unsigned, unsigned, golomb::create_ue, golomb::read_ue, Uint),
    golomb_codec!(Se, "se", Signed, signed, golomb::create_se, golomb::read_se, Int),
    golomb_codec!(Uie, "uie", Unsigned, unsigned, golomb::create_uie, golomb::read_uie, Uint),
    golomb_codec!(Sie, "sie", Signed, signed, golomb::create_sie, golomb::read_sie, Int),
];

impl Encoding {
    pub const ALL: [Encoding; 21] = [
        Encoding::Uint,
        Encoding::Int,
        Encoding::UintBe,
        Encoding::IntBe,
        Encoding::UintLe,
        Encoding::IntLe,
        Encoding::UintNe,
        Encoding::IntNe,
        Encoding::Float,
        Encoding::FloatBe,
        Encoding::FloatLe,
        Encoding::FloatNe,
        Encoding::Hex,
        Encoding::Oct,
        Encoding::Bin,
        Encoding::Bytes,
        Encoding::Bool,
        Encoding::Ue,
        Encoding::Se,
        Encoding::Uie,
        Encoding::Sie,
    ];

    #[must_use]
    pub fn codec(self) -> &'static Codec {
        &CATALOGUE[self as usize]
    }

    /// Looks an encoding up by its catalogue name.
    ///
    /// # Errors
    /// Returns [`CreationError::UnknownEncoding`] for names outside the catalogue.
    pub fn from_name(name: &str) -> Result<Encoding> {
        CATALOGUE
            .iter()
            .find(|codec| codec.name == name)
            .map(|codec| codec.encoding)
            .ok_or_else(|| CreationError::UnknownEncoding(name.to_string()).into())
    }

    /// Parses literal text into the kind of value this encoding takes.
    ///
    /// # Errors
    /// Fails when the literal is not a number of the right kind.
    pub fn parse_literal(self, literal: &str) -> Result<Value> {
        let literal = literal.trim();
        let invalid = || -> Error {
            CreationError::InvalidLiteral {
                encoding: self.codec().name,
                literal: literal.to_string(),
            }
            .into()
        };
        match self.codec().kind {
            ValueKind::Unsigned if literal.starts_with('-') => {
                literal.parse::<i128>().map(Value::Int).map_err(|_| invalid())
            }
            ValueKind::Unsigned => literal.parse::<u128>().map(Value::Uint).map_err(|_| invalid()),
            ValueKind::Signed => literal.parse::<i128>().map(Value::Int).map_err(|_| invalid()),
            ValueKind::Float => literal.parse::<f64>().map(Value::Float).map_err(|_| invalid()),
            ValueKind::Text | ValueKind::Bool => Ok(Value::Text(literal.to_string())),
            ValueKind::Bytes => Ok(Value::Bytes(literal.as_bytes().to_vec())),
        }
    }

    /// Builds a value under this encoding.
    ///
    /// # Errors
    /// Fails when `value` does not suit the encoding or `length` breaks its rule.
    pub fn create(self, value: &Value, length: Option<usize>) -> Result<BitValue> {
        let codec = self.codec();
        let store = (codec.create)(value, length)?;
        if let (LengthRule::Implied, Some(length)) = (codec.length_rule, length) {
            if length != store.bit_len() {
                return Err(CreationError::UnexpectedLength { encoding: codec.name }.into());
            }
        }
        Ok(BitValue::from_store(store))
    }

    /// Reads a field at `start`. Fixed-width encodings consume `length` bits,
    /// which the caller guarantees are present; codes consume what they need.
    ///
    /// # Errors
    /// Interpretation errors for fixed fields, read errors for codes.
    pub fn read(self, bits: &BitValue, start: usize, length: usize) -> Result<(Value, usize)> {
        (self.codec().read)(bits, start, length)
    }
}

impl FromStr for Encoding {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        Encoding::from_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_follows_declaration_order() {
        for encoding in Encoding::ALL {
            assert_eq!(encoding.codec().encoding, encoding);
            assert_eq!(encoding.codec().name, encoding.to_string());
            assert_eq!(Encoding::from_name(&encoding.to_string()).unwrap(), encoding);
        }
    }

    #[test]
    fn unknown_names_are_creation_errors() {
        assert_eq!(
            "bits".parse::<Encoding>().unwrap_err(),
            Error::Creation(CreationError::UnknownEncoding("bits".to_string()))
        );
    }

    #[test]
    fn literals_follow_kind() {
        assert_eq!(Encoding::Uint.parse_literal("255").unwrap(), Value::Uint(255));
        assert_eq!(Encoding::Ue.parse_literal("-1").unwrap(), Value::Int(-1));
        assert_eq!(Encoding::Se.parse_literal("+7").unwrap(), Value::Int(7));
        assert_eq!(Encoding::FloatLe.parse_literal("0.5").unwrap(), Value::Float(0.5));
        assert_eq!(Encoding::Hex.parse_literal(" ab ").unwrap(), Value::from("ab"));
        assert!(Encoding::Int.parse_literal("ten").is_err());
    }

    #[test]
    fn negative_unsigned_is_refused() {
        assert_eq!(
            Encoding::Ue.create(&Value::Int(-1), None).unwrap_err(),
            Error::Creation(CreationError::Negative { encoding: "ue" })
        );
    }

    #[test]
    fn implied_length_must_agree() {
        assert!(Encoding::Hex.create(&Value::from("ff"), Some(8)).is_ok());
        assert!(Encoding::Hex.create(&Value::from("ff"), Some(12)).is_err());
    }

    #[test]
    fn bool_literals() {
        for (literal, expected) in [("True", true), ("False", false), ("1", true), ("0", false)] {
            let value = Encoding::Bool.create(&Value::from(literal), None).unwrap();
            assert_eq!(value.len(), 1);
            assert_eq!(value.bool().unwrap(), expected);
        }
        assert!(Encoding::Bool.create(&Value::from("yes"), None).is_err());
        assert!(Encoding::Bool.create(&Value::Uint(2), None).is_err());
    }
}
