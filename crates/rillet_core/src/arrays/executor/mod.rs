pub mod aggregate;
pub mod hash;
