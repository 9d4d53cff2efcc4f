//! Terminal abstraction and text helpers.

pub mod terminal;
pub mod text;
