pub mod chart;
pub mod date_range;
pub mod performance;
pub mod settings;
pub mod ticker;
