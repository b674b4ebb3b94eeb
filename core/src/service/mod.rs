pub mod aggregator;
pub mod dto;
pub mod log_service;
pub mod net_calorie;
pub mod summary;
