pub mod entry;
pub mod meal;
pub mod user;
pub mod window;

pub use entry::{CalorieField, CardioLog, FoodLog, LogEntry, LogKind};
pub use meal::MealType;
pub use user::UserId;
pub use window::{days_in_month, DateRange, Window};
