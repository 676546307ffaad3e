mod app_error;

pub use app_error::{AppError, AppResult, convert_diesel_error};
