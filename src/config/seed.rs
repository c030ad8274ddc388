//! Seed configuration loading from config.toml
//!
//! `config.toml` describes the school, the subjects and exam types it offers,
//! the classes shown in analytics, and report-card defaults. Subjects, exam
//! types and the school are written to the database on first run by
//! [`crate::core::seed::seed_defaults`].

use crate::{
    core::{
        analysis::ClassOption, exam_type::NewExamType, locale::Locale, report::PeerScope,
        school::SchoolInfo, subject::NewSubject,
    },
    errors::{Error, Result},
};
use serde::Deserialize;
use std::path::Path;

/// Default location of the configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// School header printed on report cards
    pub school: SchoolInfo,
    /// Subjects to seed when none exist
    #[serde(default)]
    pub subjects: Vec<SubjectConfig>,
    /// Exam types to seed when none exist
    #[serde(default)]
    pub exam_types: Vec<ExamTypeConfig>,
    /// Classes offered, in display order
    #[serde(default)]
    pub classes: Vec<ClassOption>,
    /// Report card defaults
    #[serde(default)]
    pub report: ReportConfig,
}

/// Configuration for a single subject
#[derive(Debug, Clone, Deserialize)]
pub struct SubjectConfig {
    /// English name
    pub name: String,
    /// Marathi name
    #[serde(default)]
    pub name_local: String,
    /// Maximum marks per assessment
    pub max_marks: i32,
    /// Marks needed to pass
    pub passing_marks: i32,
    /// Listing position
    pub display_order: i32,
}

impl SubjectConfig {
    /// Input for [`crate::core::subject::add_subject`].
    #[must_use]
    pub fn to_new_subject(&self) -> NewSubject {
        NewSubject {
            name: self.name.clone(),
            name_local: self.name_local.clone(),
            max_marks: self.max_marks,
            passing_marks: self.passing_marks,
            display_order: self.display_order,
        }
    }
}

/// Configuration for a single exam type
#[derive(Debug, Clone, Deserialize)]
pub struct ExamTypeConfig {
    /// English name
    pub name: String,
    /// Marathi name
    #[serde(default)]
    pub name_local: String,
    /// Percentage contribution (stored, not applied to totals)
    #[serde(default)]
    pub weightage: f64,
    /// Listing position
    pub display_order: i32,
}

impl ExamTypeConfig {
    /// Input for [`crate::core::exam_type::add_exam_type`].
    #[must_use]
    pub fn to_new_exam_type(&self) -> NewExamType {
        NewExamType {
            name: self.name.clone(),
            name_local: self.name_local.clone(),
            weightage: self.weightage,
            display_order: self.display_order,
        }
    }
}

/// `[report]` table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct ReportConfig {
    /// Peer set used for ranking; `all_students` or `same_class`
    #[serde(default)]
    pub peer_scope: PeerScope,
    /// Language of descriptive text; `marathi` or `english`
    #[serde(default)]
    pub locale: Locale,
}

impl Config {
    /// Display label for a stored class value, falling back to the value itself.
    #[must_use]
    pub fn class_display_label<'a>(&'a self, value: &'a str) -> &'a str {
        self.classes
            .iter()
            .find(|c| c.value == value)
            .map_or(value, |c| c.label.as_str())
    }
}

/// Loads the configuration from a TOML file
///
/// # Errors
/// Returns `Error::Config` if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!(
            "Failed to read config file {}: {e}",
            path.as_ref().display()
        ),
    })?;

    parse_config(&contents)
}

/// Parses configuration from TOML text.
///
/// # Errors
/// Returns `Error::Config` for invalid TOML or missing fields.
pub fn parse_config(contents: &str) -> Result<Config> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads the configuration from the default location (./config.toml)
///
/// # Errors
/// See [`load_config`].
pub fn load_default_config() -> Result<Config> {
    load_config(DEFAULT_CONFIG_PATH)
}
