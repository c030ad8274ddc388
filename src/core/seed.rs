//! First-run seeding of subjects, exam types and the school from config.

use crate::{
    config::seed::Config,
    core::{exam_type, school, subject},
    errors::Result,
};
use sea_orm::{DatabaseConnection, TransactionTrait};
use tracing::{debug, info, instrument};

/// What [`seed_defaults`] wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    /// Subjects inserted
    pub subjects_added: usize,
    /// Exam types inserted
    pub exam_types_added: usize,
    /// Whether the school record was created
    pub school_saved: bool,
}

/// Seeds configured subjects and exam types when their tables are empty, and
/// the school when it has never been saved. Existing records are left alone,
/// so running this repeatedly is harmless.
///
/// Everything is written in one transaction.
///
/// # Errors
/// Returns a validation error for a bad configured subject or exam type, or a
/// database error. Nothing is written in either case.
#[instrument(skip(db, config))]
pub async fn seed_defaults(db: &DatabaseConnection, config: &Config) -> Result<SeedSummary> {
    let txn = db.begin().await?;
    let mut summary = SeedSummary::default();

    if subject::list_subjects(&txn).await?.is_empty() {
        for cfg in &config.subjects {
            debug!("Seeding subject '{}'", cfg.name);
            subject::add_subject(&txn, cfg.to_new_subject()).await?;
            summary.subjects_added += 1;
        }
    } else {
        debug!("Subjects already present, skipping");
    }

    if exam_type::list_exam_types(&txn).await?.is_empty() {
        for cfg in &config.exam_types {
            debug!("Seeding exam type '{}'", cfg.name);
            exam_type::add_exam_type(&txn, cfg.to_new_exam_type()).await?;
            summary.exam_types_added += 1;
        }
    } else {
        debug!("Exam types already present, skipping");
    }

    if school::get_school(&txn).await?.is_none() {
        school::save_school(&txn, config.school.clone()).await?;
        summary.school_saved = true;
    }

    txn.commit().await?;
    info!(
        "Seeding finished: {} subjects, {} exam types, school saved: {}",
        summary.subjects_added, summary.exam_types_added, summary.school_saved
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::config::seed::parse_config;
    use crate::errors::Error;
    use crate::test_utils::*;

    const CONFIG: &str = r#"
        [school]
        name = "Model Primary School"

        [[subjects]]
        name = "Marathi"
        max_marks = 100
        passing_marks = 35
        display_order = 1

        [[subjects]]
        name = "Drawing"
        max_marks = 50
        passing_marks = 18
        display_order = 2

        [[exam_types]]
        name = "Annual"
        weightage = 40.0
        display_order = 1
    "#;

    #[tokio::test]
    async fn test_seed_defaults_is_idempotent() -> Result<()> {
        init_test_tracing();
        let db = setup_test_db().await?;
        let config = parse_config(CONFIG)?;

        let first = seed_defaults(&db, &config).await?;
        assert_eq!(
            first,
            SeedSummary {
                subjects_added: 2,
                exam_types_added: 1,
                school_saved: true,
            }
        );

        let second = seed_defaults(&db, &config).await?;
        assert_eq!(second, SeedSummary::default());

        assert_eq!(subject::list_subjects(&db).await?.len(), 2);
        assert_eq!(exam_type::list_exam_types(&db).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_seed_keeps_saved_school() -> Result<()> {
        let db = setup_test_db().await?;
        school::save_school(
            &db,
            school::SchoolInfo {
                name: "Already Here".to_string(),
                ..Default::default()
            },
        )
        .await?;

        let summary = seed_defaults(&db, &parse_config(CONFIG)?).await?;
        assert!(!summary.school_saved);
        assert_eq!(
            school::get_school(&db).await?.map(|s| s.name),
            Some("Already Here".to_string())
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_seed_rolls_back_on_invalid_subject() -> Result<()> {
        let db = setup_test_db().await?;
        let mut config = parse_config(CONFIG)?;
        config.subjects[1].passing_marks = 80;

        let result = seed_defaults(&db, &config).await;
        assert!(matches!(result, Err(Error::Validation { .. })));
        assert!(subject::list_subjects(&db).await?.is_empty());
        assert!(school::get_school(&db).await?.is_none());
        Ok(())
    }
}
