pub mod file;
pub mod traits;

pub use file::FileLogRepository;
pub use traits::LogStore;
