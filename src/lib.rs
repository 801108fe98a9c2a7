pub mod config;
pub mod core;
pub mod criterion;
pub mod error;
pub mod index;
pub mod query;
pub mod source;
