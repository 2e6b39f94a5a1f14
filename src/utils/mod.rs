pub mod display;
pub mod logging;

pub use display::{Color, ColorOutput, ResultFormatter};
pub use logging::init_logging;
