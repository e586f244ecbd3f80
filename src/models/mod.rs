pub mod assignments;
pub mod common;
pub mod courses;
pub mod enrollments;
pub mod grades;
pub mod profiles;
pub mod submissions;

pub use common::error_code::ErrorCode;
pub use common::response::ApiResponse;
