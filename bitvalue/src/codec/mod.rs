mod catalogue;
pub mod float;
pub mod golomb;
pub mod integer;
pub mod text;
pub mod token;

pub use catalogue::{CATALOGUE, Codec, Encoding, LengthRule, Value, ValueKind};
pub use float::ByteOrder;
