use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fields supplied at creation beyond the required ones. Stored and returned verbatim.
pub type ExtraFields = Map<String, Value>;

const STUDENT_FIELDS: &str = "student_id, first_name, last_name, email";
const COURSE_FIELDS: &str = "course_code, course_name";
const ATTENDANCE_FIELDS: &str = "course_id, date, records";

// --- Students ---

/// A validated request to create a student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewStudent {
    pub student_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl NewStudent {
    /// Builds a student from a raw JSON object, requiring every mandatory field to be a
    /// non-empty string.
    pub fn from_payload(mut payload: Map<String, Value>) -> Result<Self, CoreError> {
        if payload.is_empty() {
            return Err(CoreError::EmptyPayload);
        }
        let missing = || CoreError::MissingFields(STUDENT_FIELDS);
        let student_id = required_string(&payload, "student_id").ok_or_else(missing)?;
        let first_name = required_string(&payload, "first_name").ok_or_else(missing)?;
        let last_name = required_string(&payload, "last_name").ok_or_else(missing)?;
        let email = required_string(&payload, "email").ok_or_else(missing)?;

        for key in ["student_id", "first_name", "last_name", "email"] {
            payload.remove(key);
        }
        Ok(Self {
            student_id,
            first_name,
            last_name,
            email,
            extra: strip_reserved(payload),
        })
    }
}

/// A stored student, with its store identifier rendered as a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    #[serde(rename = "_id")]
    pub id: String,
    pub student_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl Student {
    pub fn from_new(id: String, new: NewStudent) -> Self {
        Self {
            id,
            student_id: new.student_id,
            first_name: new.first_name,
            last_name: new.last_name,
            email: new.email,
            extra: new.extra,
        }
    }
}

// --- Courses ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCourse {
    pub course_code: String,
    pub course_name: String,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl NewCourse {
    pub fn from_payload(mut payload: Map<String, Value>) -> Result<Self, CoreError> {
        if payload.is_empty() {
            return Err(CoreError::EmptyPayload);
        }
        let missing = || CoreError::MissingFields(COURSE_FIELDS);
        let course_code = required_string(&payload, "course_code").ok_or_else(missing)?;
        let course_name = required_string(&payload, "course_name").ok_or_else(missing)?;

        payload.remove("course_code");
        payload.remove("course_name");
        Ok(Self {
            course_code,
            course_name,
            extra: strip_reserved(payload),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    #[serde(rename = "_id")]
    pub id: String,
    pub course_code: String,
    pub course_name: String,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl Course {
    pub fn from_new(id: String, new: NewCourse) -> Self {
        Self {
            id,
            course_code: new.course_code,
            course_name: new.course_name,
            extra: new.extra,
        }
    }
}

// --- Attendance ---

/// A stored attendance record. References and the date are rendered as strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub student_id: String,
    pub course_id: String,
    pub date: String,
    pub status: String,
    pub notes: String,
}

/// The top-level body of a mark-attendance request.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkAttendance {
    pub course_id: String,
    pub date: String,
    /// Entries are kept raw so each one is validated in order, at the point it is processed.
    pub records: Vec<Value>,
}

impl MarkAttendance {
    pub fn from_payload(mut payload: Map<String, Value>) -> Result<Self, CoreError> {
        if payload.is_empty() {
            return Err(CoreError::EmptyPayload);
        }
        let missing = || CoreError::MissingFields(ATTENDANCE_FIELDS);
        let course_id = required_string(&payload, "course_id").ok_or_else(missing)?;
        let date = required_string(&payload, "date").ok_or_else(missing)?;
        let records = match payload.remove("records") {
            Some(Value::Array(records)) if !records.is_empty() => records,
            _ => return Err(missing()),
        };
        Ok(Self { course_id, date, records })
    }
}

/// One entry of a mark-attendance batch.
///
/// `notes` is always a string: a non-string value in the request is stored as its JSON text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceEntry {
    pub student_id: String,
    pub status: String,
    pub notes: String,
}

impl AttendanceEntry {
    /// Returns `None` unless the entry is an object with non-empty `student_id` and `status`.
    /// Absent or null `notes` become an empty string; any other non-string `notes` value is
    /// kept as its JSON text rather than as the raw value.
    pub fn from_value(entry: &Value) -> Option<Self> {
        let entry = entry.as_object()?;
        let student_id = required_string(entry, "student_id")?;
        let status = required_string(entry, "status")?;
        let notes = match entry.get("notes") {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(notes)) => notes.clone(),
            Some(other) => other.to_string(),
        };
        Some(Self { student_id, status, notes })
    }
}

/// Echo of a successfully upserted entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedRecord {
    pub student_id: String,
    pub course_id: String,
    pub date: String,
    pub status: String,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkAttendanceResponse {
    pub message: String,
    pub processed_records: Vec<ProcessedRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMessage {
    pub message: String,
}

fn required_string(payload: &Map<String, Value>, key: &str) -> Option<String> {
    match payload.get(key) {
        Some(Value::String(value)) if !value.is_empty() => Some(value.clone()),
        _ => None,
    }
}

// `_id` is assigned by the store; a client-supplied one is dropped.
fn strip_reserved(mut extra: ExtraFields) -> ExtraFields {
    extra.remove("_id");
    extra
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected an object, got {other}"),
        }
    }

    #[test]
    fn test_new_student_keeps_extra_fields() {
        let student = NewStudent::from_payload(object(json!({
            "student_id": "S001",
            "first_name": "Ada",
            "last_name": "Lovelace",
            "email": "ada@example.com",
            "year": 2,
            "_id": "client-chosen"
        })))
        .unwrap();

        assert_eq!(student.student_id, "S001");
        assert_eq!(student.extra.get("year"), Some(&json!(2)));
        assert!(!student.extra.contains_key("_id"));
        assert!(!student.extra.contains_key("email"));
    }

    #[test]
    fn test_new_student_requires_non_empty_strings() {
        assert_eq!(NewStudent::from_payload(Map::new()), Err(CoreError::EmptyPayload));

        let err = NewStudent::from_payload(object(json!({
            "student_id": "S001",
            "first_name": "",
            "last_name": "Lovelace",
            "email": "ada@example.com"
        })))
        .unwrap_err();
        assert_eq!(err.to_string(), "Missing required fields: student_id, first_name, last_name, email");

        let err = NewStudent::from_payload(object(json!({ "student_id": "S001" }))).unwrap_err();
        assert!(matches!(err, CoreError::MissingFields(_)));
    }

    #[test]
    fn test_course_serializes_flat_with_id() {
        let new = NewCourse::from_payload(object(json!({
            "course_code": "CS101",
            "course_name": "Intro",
            "credits": 3
        })))
        .unwrap();
        let course = Course::from_new("65a1b2c3d4e5f60718293a4b".into(), new);
        let rendered = serde_json::to_value(&course).unwrap();
        assert_eq!(
            rendered,
            json!({
                "_id": "65a1b2c3d4e5f60718293a4b",
                "course_code": "CS101",
                "course_name": "Intro",
                "credits": 3
            })
        );
    }

    #[test]
    fn test_mark_attendance_requires_non_empty_records() {
        let err = MarkAttendance::from_payload(object(json!({
            "course_id": "65a1b2c3d4e5f60718293a4b",
            "date": "2024-01-15",
            "records": []
        })))
        .unwrap_err();
        assert_eq!(err.to_string(), "Missing required fields: course_id, date, records");

        let request = MarkAttendance::from_payload(object(json!({
            "course_id": "65a1b2c3d4e5f60718293a4b",
            "date": "2024-01-15",
            "records": [{ "student_id": "x", "status": "present" }]
        })))
        .unwrap();
        assert_eq!(request.records.len(), 1);
    }

    #[test]
    fn test_attendance_entry_defaults_notes() {
        let entry = AttendanceEntry::from_value(&json!({ "student_id": "a", "status": "present" })).unwrap();
        assert_eq!(entry.notes, "");

        let entry =
            AttendanceEntry::from_value(&json!({ "student_id": "a", "status": "late", "notes": "bus" })).unwrap();
        assert_eq!(entry.notes, "bus");

        assert!(AttendanceEntry::from_value(&json!({ "student_id": "a" })).is_none());
        assert!(AttendanceEntry::from_value(&json!({ "student_id": "", "status": "present" })).is_none());
        assert!(AttendanceEntry::from_value(&json!("a")).is_none());
    }
}
