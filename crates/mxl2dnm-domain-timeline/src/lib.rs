pub mod cursor;
pub mod divisions;
pub mod error;
pub mod format;
pub mod measure;
pub mod model;
pub mod readers;
pub mod traversal;

pub use cursor::*;
pub use divisions::*;
pub use error::*;
pub use format::*;
pub use measure::*;
pub use model::*;
pub use readers::*;
pub use traversal::*;
