mod bit_value;
mod logical;
mod mutation;
mod render;
mod search;

pub use bit_value::BitValue;
pub use search::FindAll;
