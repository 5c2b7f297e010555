//! Report module - console tables, charts and JSON export

pub mod evaluation;
pub mod export;
pub mod plots;
pub mod summary;

pub use evaluation::*;
pub use export::*;
pub use plots::*;
pub use summary::*;
