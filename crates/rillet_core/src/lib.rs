pub mod arrays;
pub mod config;
pub mod functions;
