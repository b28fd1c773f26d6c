pub mod event;
pub mod settings;
pub mod source;
pub mod tree;
pub mod types;

pub use event::*;
pub use settings::*;
pub use source::*;
pub use tree::*;
pub use types::*;
