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

pub use attendances::AttendanceService;
pub use auth::AuthService;
pub use behaviors::BehaviorService;
pub use calendar::CalendarService;
pub use courses::CourseService;
pub use family::FamilyService;
pub use fees::FeeService;
pub use grades::GradeService;
pub use maintenance::MaintenanceService;
pub use messages::MessageService;
pub use stats::StatsService;
pub use system::SystemService;
pub use users::UserService;
