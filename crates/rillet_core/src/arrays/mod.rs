pub mod array;
pub mod bitmap;
pub mod compare;
pub mod datatype;
pub mod distinct;
pub mod executor;
pub mod testutil;
