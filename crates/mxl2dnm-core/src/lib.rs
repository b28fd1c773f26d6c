pub mod converter;
pub mod diagnostics;
pub mod settings;

pub use converter::*;
pub use diagnostics::*;
pub use settings::*;
