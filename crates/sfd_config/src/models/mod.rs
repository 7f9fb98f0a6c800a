pub mod browser;
pub mod directory;
pub mod geo;
pub mod logging;
