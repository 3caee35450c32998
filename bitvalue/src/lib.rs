//! Bit-precision values.
//!
//! A [`BitValue`] is an ordered sequence of bits of any length, stored in a
//! byte buffer that may start part way into its first byte. Values are built
//! from and read back under a closed catalogue of [`Encoding`]s: fixed-width
//! integers in three byte orders, IEEE floats, hex, octal and binary text, raw
//! bytes, single-bit booleans, and four Exponential-Golomb codes.
//!
//! ```
//! use bitvalue::{BitReader, BitValue, Value};
//!
//! let mut value: BitValue = "0xff, se=-2".parse()?;
//! value.insert(&BitValue::from_bin("01")?, 4)?;
//! assert_eq!(value.bin(), "111101111100101");
//!
//! let mut reader = BitReader::new(&value);
//! assert_eq!(reader.read("bits:10")?, Value::Bits(BitValue::from_bin("1111011111")?));
//! assert_eq!(reader.read("se")?, Value::Int(-2));
//! # Ok::<(), bitvalue::Error>(())
//! ```

pub mod codec;
pub use codec::{ByteOrder, Encoding, Value};

pub mod config;
pub use config::Config;

pub mod error;
pub use error::{CreationError, Error, InterpretError, ReadError, Result};

pub mod reader;
pub use reader::BitReader;

pub mod store;

pub mod value;
pub use value::{BitValue, FindAll};

#[cfg(feature = "serde")]
mod serde;
