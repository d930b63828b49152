pub mod statement;

pub use statement::{generate_statement, usage};
