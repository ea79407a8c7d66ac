// src/xbrl/mod.rs
pub mod concepts;
pub mod facts;
pub mod resolver;
pub mod statement;

pub use facts::FactStore;
pub use resolver::{resolve, Resolution};
pub use statement::income_statement;
