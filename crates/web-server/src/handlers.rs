use crate::{AppState, error::AppError};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use core_types::{
    AttendanceRecord, Course, CoreError, MarkAttendance, MarkAttendanceResponse, NewCourse,
    NewStudent, StatusMessage, Student,
};
use database::DocumentStore;
use serde_json::{Map, Value};
use std::sync::Arc;

/// A JSON object body. Absent, non-JSON or non-object bodies arrive as `None`.
type Payload = Option<Json<Map<String, Value>>>;

fn into_object(payload: Payload) -> Result<Map<String, Value>, AppError> {
    match payload {
        Some(Json(object)) if !object.is_empty() => Ok(object),
        _ => Err(CoreError::EmptyPayload.into()),
    }
}

/// # GET /
pub async fn home() -> Json<StatusMessage> {
    Json(StatusMessage {
        message: "Backend connected to the document store".to_string(),
    })
}

/// # GET /students
pub async fn get_students<S: DocumentStore>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<Student>>, AppError> {
    let students = state.db_repo.list_students().await?;
    Ok(Json(students))
}

/// # POST /students
pub async fn create_student<S: DocumentStore>(
    State(state): State<Arc<AppState<S>>>,
    payload: Payload,
) -> Result<(StatusCode, Json<Student>), AppError> {
    let new_student = NewStudent::from_payload(into_object(payload)?)?;
    let student = state.db_repo.create_student(new_student).await?;
    Ok((StatusCode::CREATED, Json(student)))
}

/// # GET /courses
pub async fn get_courses<S: DocumentStore>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<Course>>, AppError> {
    let courses = state.db_repo.list_courses().await?;
    Ok(Json(courses))
}

/// # POST /courses
pub async fn create_course<S: DocumentStore>(
    State(state): State<Arc<AppState<S>>>,
    payload: Payload,
) -> Result<(StatusCode, Json<Course>), AppError> {
    let new_course = NewCourse::from_payload(into_object(payload)?)?;
    let course = state.db_repo.create_course(new_course).await?;
    Ok((StatusCode::CREATED, Json(course)))
}

/// # GET /attendance
pub async fn get_attendance<S: DocumentStore>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<AttendanceRecord>>, AppError> {
    let records = state.db_repo.list_attendance().await?;
    Ok(Json(records))
}

/// # GET /attendance/:course_id/:date_str
/// Records of one course on one calendar day (`YYYY-MM-DD`).
pub async fn get_attendance_for_day<S: DocumentStore>(
    Path((course_id, date_str)): Path<(String, String)>,
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<AttendanceRecord>>, AppError> {
    let records = state
        .db_repo
        .list_attendance_for_day(&course_id, &date_str)
        .await?;
    Ok(Json(records))
}

/// # POST /attendance
/// Marks or updates attendance for every entry in `records`, stopping at the first failure.
pub async fn mark_attendance<S: DocumentStore>(
    State(state): State<Arc<AppState<S>>>,
    payload: Payload,
) -> Result<Json<MarkAttendanceResponse>, AppError> {
    let request = MarkAttendance::from_payload(into_object(payload)?)?;
    let processed_records = state
        .db_repo
        .mark_attendance(&request.course_id, &request.date, &request.records)
        .await?;
    Ok(Json(MarkAttendanceResponse {
        message: "Attendance saved successfully".to_string(),
        processed_records,
    }))
}
