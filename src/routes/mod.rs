pub mod attendances;
pub mod auth;
pub mod behaviors;
pub mod calendar;
pub mod courses;
pub mod family;
pub mod fees;
pub mod grades;
pub mod maintenance;
pub mod messages;
pub mod stats;
pub mod system;
pub mod users;

pub use attendances::configure_attendance_routes;
pub use auth::configure_auth_routes;
pub use behaviors::configure_behavior_routes;
pub use calendar::configure_calendar_routes;
pub use courses::configure_course_routes;
pub use family::configure_family_routes;
pub use fees::configure_fee_routes;
pub use grades::configure_grade_routes;
pub use maintenance::configure_maintenance_routes;
pub use messages::configure_message_routes;
pub use stats::configure_stats_routes;
pub use system::configure_system_routes;
pub use users::configure_user_routes;
