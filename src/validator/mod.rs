// file: src/validator/mod.rs
// description: address validation against trusted reference data
// reference: internal module structure

pub mod address;
pub mod similarity;

pub use address::{AddressValidator, SIMILARITY_THRESHOLD};
pub use similarity::similarity_ratio;
