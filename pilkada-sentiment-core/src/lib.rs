pub mod config;
pub mod corpus;
pub mod dictionary;
pub mod entity;
pub mod error;

pub use error::{Error, Result};
