pub mod dates;
pub mod error;
pub mod ids;
pub mod models;

// Re-export the core types to provide a clean public API.
pub use dates::{day_bounds, format_timestamp, parse_calendar_date, start_of_day};
pub use error::CoreError;
pub use ids::{is_valid_object_id, parse_object_id};
pub use models::{
    AttendanceEntry, AttendanceRecord, Course, ExtraFields, MarkAttendance, MarkAttendanceResponse,
    NewCourse, NewStudent, ProcessedRecord, StatusMessage, Student,
};
