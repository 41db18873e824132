use crate::DbError;
use crate::store::{Collection, DocumentStore, UpsertOutcome};
use bson::{Bson, DateTime as BsonDateTime, Document, doc};
use core_types::{
    AttendanceEntry, AttendanceRecord, Course, NewCourse, NewStudent, ProcessedRecord, Student,
    day_bounds, format_timestamp, parse_calendar_date, parse_object_id, start_of_day,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

/// The `DbRepository` provides a high-level, application-specific interface
/// to the document store. It owns every query and update shape the API issues.
///
/// Uniqueness checks and the attendance batch are sequences of independent store
/// operations, not transactions: a concurrent request can slip between a check and
/// the insert that follows it, and a batch that fails part-way keeps the entries it
/// already wrote.
#[derive(Debug, Clone)]
pub struct DbRepository<S> {
    store: S,
}

impl<S: DocumentStore> DbRepository<S> {
    /// Creates a new `DbRepository` over a shared store handle.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // --- Students ---

    /// Fetches every student in store-default order.
    pub async fn list_students(&self) -> Result<Vec<Student>, DbError> {
        let documents = self.store.find(Collection::Students, Document::new()).await?;
        documents.into_iter().map(from_document).collect()
    }

    /// Inserts a student after checking `student_id` and then `email` for collisions.
    pub async fn create_student(&self, student: NewStudent) -> Result<Student, DbError> {
        if self
            .store
            .find_one(Collection::Students, doc! { "student_id": student.student_id.as_str() })
            .await?
            .is_some()
        {
            warn!(student_id = %student.student_id, "Rejected student with duplicate student_id");
            return Err(DbError::Conflict("Student with this ID already exists".to_string()));
        }
        if self
            .store
            .find_one(Collection::Students, doc! { "email": student.email.as_str() })
            .await?
            .is_some()
        {
            warn!(email = %student.email, "Rejected student with duplicate email");
            return Err(DbError::Conflict("Student with this email already exists".to_string()));
        }

        let document = bson::to_document(&student)?;
        let id = self.store.insert_one(Collection::Students, document).await?;
        info!(id = %id, student_id = %student.student_id, "Created student");
        Ok(Student::from_new(id.to_hex(), student))
    }

    // --- Courses ---

    pub async fn list_courses(&self) -> Result<Vec<Course>, DbError> {
        let documents = self.store.find(Collection::Courses, Document::new()).await?;
        documents.into_iter().map(from_document).collect()
    }

    /// Inserts a course unless its `course_code` is already taken.
    pub async fn create_course(&self, course: NewCourse) -> Result<Course, DbError> {
        if self
            .store
            .find_one(Collection::Courses, doc! { "course_code": course.course_code.as_str() })
            .await?
            .is_some()
        {
            warn!(course_code = %course.course_code, "Rejected course with duplicate course_code");
            return Err(DbError::Conflict("Course with this code already exists".to_string()));
        }

        let document = bson::to_document(&course)?;
        let id = self.store.insert_one(Collection::Courses, document).await?;
        info!(id = %id, course_code = %course.course_code, "Created course");
        Ok(Course::from_new(id.to_hex(), course))
    }

    // --- Attendance ---

    pub async fn list_attendance(&self) -> Result<Vec<AttendanceRecord>, DbError> {
        let documents = self.store.find(Collection::Attendance, Document::new()).await?;
        documents.iter().map(attendance_from_document).collect()
    }

    /// Fetches the records of one course whose date falls on the given calendar day.
    pub async fn list_attendance_for_day(
        &self,
        course_id: &str,
        date: &str,
    ) -> Result<Vec<AttendanceRecord>, DbError> {
        let course = parse_object_id(course_id)
            .ok_or_else(|| DbError::Validation("Invalid course_id format".to_string()))?;
        let day = parse_calendar_date(date)?;
        let (start, end) = day_bounds(day);

        let filter = doc! {
            "course_id": course,
            "date": {
                "$gte": BsonDateTime::from_chrono(start),
                "$lt": BsonDateTime::from_chrono(end),
            },
        };
        let documents = self.store.find(Collection::Attendance, filter).await?;
        documents.iter().map(attendance_from_document).collect()
    }

    /// Upserts one record per entry, keyed on (student, course, date).
    ///
    /// Entries are processed in order. The first invalid entry, unknown student or
    /// unknown course stops the batch with an error; entries before it stay written.
    pub async fn mark_attendance(
        &self,
        course_id: &str,
        date: &str,
        entries: &[Value],
    ) -> Result<Vec<ProcessedRecord>, DbError> {
        let course = parse_object_id(course_id)
            .ok_or_else(|| DbError::Validation("Invalid course_id".to_string()))?;
        let marked_on = start_of_day(parse_calendar_date(date)?);
        let stored_date = BsonDateTime::from_chrono(marked_on);

        let mut processed = Vec::with_capacity(entries.len());
        for (position, raw) in entries.iter().enumerate() {
            let entry = AttendanceEntry::from_value(raw).ok_or_else(|| {
                warn!(
                    position,
                    committed = processed.len(),
                    "Attendance batch stopped at an incomplete record"
                );
                DbError::Validation("Each record must include student_id and status".to_string())
            })?;

            let student = parse_object_id(&entry.student_id)
                .ok_or_else(|| DbError::Validation(format!("Invalid student_id: {}", entry.student_id)))?;

            if self
                .store
                .find_one(Collection::Students, doc! { "_id": student })
                .await?
                .is_none()
            {
                warn!(
                    position,
                    committed = processed.len(),
                    student_id = %entry.student_id,
                    "Attendance batch stopped at an unknown student"
                );
                return Err(DbError::NotFound(format!("Student not found: {}", entry.student_id)));
            }
            if self
                .store
                .find_one(Collection::Courses, doc! { "_id": course })
                .await?
                .is_none()
            {
                warn!(
                    position,
                    committed = processed.len(),
                    course_id,
                    "Attendance batch stopped at an unknown course"
                );
                return Err(DbError::NotFound(format!("Course not found: {course_id}")));
            }

            let outcome = self
                .store
                .upsert_one(
                    Collection::Attendance,
                    doc! { "student_id": student, "course_id": course, "date": stored_date },
                    doc! { "status": entry.status.as_str(), "notes": entry.notes.as_str() },
                )
                .await?;
            debug!(
                student_id = %entry.student_id,
                course_id,
                inserted = outcome == UpsertOutcome::Inserted,
                "Marked attendance"
            );

            processed.push(ProcessedRecord {
                student_id: entry.student_id,
                course_id: course_id.to_string(),
                date: format_timestamp(marked_on),
                status: entry.status,
                notes: entry.notes,
            });
        }

        info!(course_id, date, records = processed.len(), "Saved attendance batch");
        Ok(processed)
    }
}

/// Renders a stored document as JSON with `_id` as a plain string, then reads it into
/// a typed record. Extra fields survive through the record's flattened map.
fn from_document<T: DeserializeOwned>(mut document: Document) -> Result<T, DbError> {
    let id = document.get_object_id("_id")?;
    document.remove("_id");

    let mut json = Bson::Document(document).into_relaxed_extjson();
    if let Value::Object(fields) = &mut json {
        fields.insert("_id".to_string(), Value::String(id.to_hex()));
    }
    Ok(serde_json::from_value(json)?)
}

fn attendance_from_document(document: &Document) -> Result<AttendanceRecord, DbError> {
    Ok(AttendanceRecord {
        id: document.get_object_id("_id")?.to_hex(),
        student_id: document.get_object_id("student_id")?.to_hex(),
        course_id: document.get_object_id("course_id")?.to_hex(),
        date: format_timestamp(document.get_datetime("date")?.to_chrono()),
        status: document.get_str("status")?.to_string(),
        notes: document.get_str("notes").unwrap_or_default().to_string(),
    })
}
