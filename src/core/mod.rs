//! Core business logic, independent of the command line.
//!
//! The record store modules (`student`, `subject`, `exam_type`, `assessment`,
//! `school`) are async functions over a SeaORM connection. Everything that
//! grades, ranks or aggregates (`grading`, `report`, `analysis`) is pure and
//! works on a [`snapshot::Snapshot`] taken from the store.

/// Class and subject analytics
pub mod analysis;
/// Assessment recording and correction
pub mod assessment;
/// Exam type records
pub mod exam_type;
/// Percentages, grades, pass/fail and rank
pub mod grading;
/// Language-dependent number and date formatting
pub mod locale;
/// Report card assembly
pub mod report;
/// School singleton
pub mod school;
/// First-run seeding from configuration
pub mod seed;
/// In-memory view of every record
pub mod snapshot;
/// Student roster
pub mod student;
/// Subject records
pub mod subject;
