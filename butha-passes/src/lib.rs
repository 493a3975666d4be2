//! AST to AST passes.

pub mod optimize;
pub mod stats;

pub use optimize::optimize;
