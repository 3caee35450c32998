mod byte_store;
mod offset_copy;
pub mod tables;

pub use byte_store::ByteStore;
pub use offset_copy::offset_copy;
