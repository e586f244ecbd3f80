pub mod grades;

pub use grades::configure_grade_routes;
