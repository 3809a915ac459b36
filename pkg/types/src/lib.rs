pub mod config;
pub mod lease;
pub mod object;
pub mod validate;
