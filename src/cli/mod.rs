
/// Contains the core CLI and shared functionality
pub mod core;
/// Contains the settings for the overlap analysis
pub mod overlap;
