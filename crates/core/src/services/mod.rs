pub mod backtest_service;
pub mod chart_service;
pub mod display_formatter;
pub mod series_reducer;
pub mod time_codec;
pub mod validation_controller;
