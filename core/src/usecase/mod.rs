pub mod dashboard;

pub use dashboard::DashboardUseCase;
