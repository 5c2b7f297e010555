//! Pipeline module - loading, exploration and preprocessing steps

pub mod correlation;
pub mod eda;
pub mod encoding;
pub mod loader;
pub mod preprocess;
pub mod scaling;
pub mod split;

pub use correlation::*;
pub use eda::*;
pub use encoding::LabelEncoder;
pub use loader::*;
pub use preprocess::*;
pub use scaling::StandardScaler;
pub use split::*;
