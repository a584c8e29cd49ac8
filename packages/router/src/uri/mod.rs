//! URI templates: compiling, testing and parameter extraction.

mod join;
pub use join::*;

mod matcher;
pub use matcher::*;
