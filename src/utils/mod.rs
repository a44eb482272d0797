pub mod calendar;
pub mod extractor;
pub mod fees;
pub mod jwt;
pub mod parameter_error_handler;
pub mod password;
pub mod sql;
pub mod stats;
pub mod timeslot;
pub mod validate;

pub use extractor::{
    SafeCourseIdI64, SafeIDI64, SafeSessionIdI64, SafeStudentIdI64, SafeTeacherIdI64,
};
pub use parameter_error_handler::json_error_handler;
pub use parameter_error_handler::query_error_handler;
pub use sql::escape_like_pattern;
