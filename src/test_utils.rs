//! Shared test utilities for the gradebook.
//!
//! This module provides helpers for setting up in-memory test databases,
//! building input structs with sensible defaults, and constructing plain
//! entity rows for the pure grading and reporting functions.

use crate::{
    core::{
        assessment::{self, NewAssessment},
        exam_type::{self, NewExamType},
        grading::academic_year_for,
        school::{self, SchoolInfo},
        student::{self, NewStudent},
        subject::{self, NewSubject},
    },
    entities::{self, school::SCHOOL_ROW_ID},
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all store tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Routes `tracing` output through the test harness so it shows up for
/// failing tests. Safe to call from several tests.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("gradebook=debug")
        .with_test_writer()
        .try_init();
}

/// Fixed date used for every record created in tests (academic year 2024-2025).
pub fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 7, 1).unwrap_or_default()
}

/// School details used by every test that needs a header.
pub fn test_school_info() -> SchoolInfo {
    SchoolInfo {
        name: "Model Primary School".to_string(),
        name_local: "आदर्श प्राथमिक शाळा".to_string(),
        address: "Shivaji Nagar".to_string(),
        city: "Pune".to_string(),
        state: "Maharashtra".to_string(),
        pincode: "411005".to_string(),
        registration_code: "PN-1234".to_string(),
        phone_number: "020-12345678".to_string(),
        email: "office@modelschool.example".to_string(),
        principal_name: "S. Patil".to_string(),
    }
}

/// Input for a new student.
///
/// # Defaults
/// * `guardian_name`: "Guardian of `name`"
/// * `admission_date`: [`test_date`]
pub fn new_student(name: &str, class_label: &str, roll_number: i32) -> NewStudent {
    NewStudent {
        name: name.to_string(),
        guardian_name: format!("Guardian of {name}"),
        class_label: class_label.to_string(),
        roll_number,
        admission_date: test_date(),
    }
}

/// Input for a new subject. The local name mirrors the English one.
pub fn new_subject(name: &str, max_marks: i32, passing_marks: i32, display_order: i32) -> NewSubject {
    NewSubject {
        name: name.to_string(),
        name_local: name.to_string(),
        max_marks,
        passing_marks,
        display_order,
    }
}

/// Input for a new exam type. The local name mirrors the English one.
pub fn new_exam_type(name: &str, weightage: f64, display_order: i32) -> NewExamType {
    NewExamType {
        name: name.to_string(),
        name_local: name.to_string(),
        weightage,
        display_order,
    }
}

/// Records marks dated [`test_date`].
pub async fn record_test_assessment(
    db: &DatabaseConnection,
    student_id: i64,
    subject_id: i64,
    exam_type_id: i64,
    marks: f64,
) -> Result<entities::assessment::Model> {
    assessment::record_assessment(
        db,
        NewAssessment {
            student_id,
            subject_id,
            exam_type_id,
            marks,
        },
        test_date(),
    )
    .await
}

/// Records created by [`setup_with_roster`].
#[derive(Debug, Clone)]
pub struct TestRoster {
    /// Amit (class 5), Priya (class 5), Rahul (class 6)
    pub students: Vec<entities::student::Model>,
    /// Maths (100 max, 35 to pass), Drawing (50 max, 18 to pass)
    pub subjects: Vec<entities::subject::Model>,
    /// A single "Monthly" exam
    pub exam_type: entities::exam_type::Model,
    /// The saved school
    pub school: entities::school::Model,
}

/// Sets up a database with three students, two subjects, one exam type and
/// the school. Returns (db, roster) for the common store scenarios.
pub async fn setup_with_roster() -> Result<(DatabaseConnection, TestRoster)> {
    let db = setup_test_db().await?;

    let students = vec![
        student::add_student(&db, new_student("Amit", "5", 1)).await?,
        student::add_student(&db, new_student("Priya", "5", 2)).await?,
        student::add_student(&db, new_student("Rahul", "6", 1)).await?,
    ];
    let subjects = vec![
        subject::add_subject(&db, new_subject("Maths", 100, 35, 1)).await?,
        subject::add_subject(&db, new_subject("Drawing", 50, 18, 2)).await?,
    ];
    let exam_type = exam_type::add_exam_type(&db, new_exam_type("Monthly", 20.0, 1)).await?;
    let school = school::save_school(&db, test_school_info()).await?;

    Ok((
        db,
        TestRoster {
            students,
            subjects,
            exam_type,
            school,
        },
    ))
}

/// A student row for the pure functions, named "Student `id`".
pub fn student_row(id: i64, class_label: &str) -> entities::student::Model {
    entities::student::Model {
        id,
        name: format!("Student {id}"),
        guardian_name: format!("Guardian {id}"),
        class_label: class_label.to_string(),
        roll_number: i32::try_from(id).unwrap_or(1),
        admission_date: test_date(),
    }
}

/// A subject row named "Subject `id`", displayed in id order.
pub fn subject_row(id: i64, max_marks: i32, passing_marks: i32) -> entities::subject::Model {
    entities::subject::Model {
        id,
        name: format!("Subject {id}"),
        name_local: format!("विषय {id}"),
        max_marks,
        passing_marks,
        display_order: i32::try_from(id).unwrap_or(0),
    }
}

/// An exam type row with zero weightage.
pub fn exam_type_row(id: i64, name: &str) -> entities::exam_type::Model {
    entities::exam_type::Model {
        id,
        name: name.to_string(),
        name_local: name.to_string(),
        weightage: 0.0,
        display_order: i32::try_from(id).unwrap_or(0),
    }
}

/// An assessment row for exam type 1, dated [`test_date`].
pub fn assessment_row(
    id: i64,
    student_id: i64,
    subject_id: i64,
    marks: f64,
    max_marks: f64,
) -> entities::assessment::Model {
    entities::assessment::Model {
        id,
        student_id,
        subject_id,
        exam_type_id: 1,
        marks,
        max_marks,
        recorded_on: test_date(),
        academic_year: academic_year_for(test_date()),
    }
}

/// The school row matching [`test_school_info`].
pub fn school_row() -> entities::school::Model {
    let info = test_school_info();
    entities::school::Model {
        id: SCHOOL_ROW_ID,
        name: info.name,
        name_local: info.name_local,
        address: info.address,
        city: info.city,
        state: info.state,
        pincode: info.pincode,
        registration_code: info.registration_code,
        phone_number: info.phone_number,
        email: info.email,
        principal_name: info.principal_name,
    }
}
