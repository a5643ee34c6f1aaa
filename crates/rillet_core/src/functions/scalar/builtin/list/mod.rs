pub mod array_distinct;
