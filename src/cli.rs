//! Command-line surface.
//!
//! [`Cli`] is parsed in `main`; [`execute`] runs one command against the
//! database and returns the text to print. Handlers only translate arguments
//! into calls on [`crate::core`] and format the results.

use crate::{
    config::seed::{Config, DEFAULT_CONFIG_PATH},
    core::{
        analysis,
        assessment::{self, NewAssessment},
        exam_type,
        grading::academic_year_for,
        locale::{Locale, format_number},
        report::{self, PeerScope, ReportCard, ReportOptions},
        seed,
        snapshot::load_snapshot,
        student::{self, NewStudent, StudentUpdate},
        subject,
    },
    errors::{Error, Result},
    render::html::report_card_html,
};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use sea_orm::DatabaseConnection;
use std::{fmt::Write, path::PathBuf};
use tracing::{info, instrument};

#[derive(Parser, Debug)]
#[command(
    name = "gradebook",
    version,
    about = "Marks, grades and report cards for a primary school"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
#[allow(missing_docs)]
pub enum Commands {
    /// Seed subjects, exam types and the school from the configuration
    Init,
    /// Manage the student roster
    #[command(subcommand)]
    Student(StudentCommand),
    /// List subjects
    Subjects,
    /// List exam types
    Exams,
    /// Record and correct marks
    #[command(subcommand)]
    Marks(MarksCommand),
    /// Write HTML report cards
    Report(ReportCommand),
    /// Show class and subject analytics
    Analysis(AnalysisCommand),
}

#[derive(Subcommand, Debug)]
#[allow(missing_docs)]
pub enum StudentCommand {
    /// Add a student
    Add(StudentAddArgs),
    /// List students, optionally for one class
    List {
        #[arg(long)]
        class: Option<String>,
    },
    /// Change some of a student's details
    Update(StudentUpdateArgs),
    /// Remove a student and their marks
    Remove { id: i64 },
}

#[derive(Args, Debug)]
#[allow(missing_docs)]
pub struct StudentAddArgs {
    pub name: String,
    #[arg(long)]
    pub class: String,
    #[arg(long)]
    pub roll: i32,
    #[arg(long)]
    pub guardian: String,
    /// Admission date (YYYY-MM-DD), today if omitted
    #[arg(long)]
    pub admitted: Option<NaiveDate>,
}

#[derive(Args, Debug)]
#[allow(missing_docs)]
pub struct StudentUpdateArgs {
    pub id: i64,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub guardian: Option<String>,
    #[arg(long)]
    pub class: Option<String>,
    #[arg(long)]
    pub roll: Option<i32>,
    #[arg(long)]
    pub admitted: Option<NaiveDate>,
}

#[derive(Subcommand, Debug)]
#[allow(missing_docs)]
pub enum MarksCommand {
    /// Record marks for a student
    Add(MarksAddArgs),
    /// List recorded marks
    List {
        #[arg(long)]
        student: Option<i64>,
    },
    /// Correct the marks on an assessment
    Update { id: i64, marks: f64 },
    /// Delete an assessment
    Remove { id: i64 },
}

#[derive(Args, Debug)]
#[allow(missing_docs)]
pub struct MarksAddArgs {
    pub student: i64,
    pub subject: i64,
    pub exam: i64,
    pub marks: f64,
    /// Date of the assessment (YYYY-MM-DD), today if omitted
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

/// Language for report cards.
#[derive(Clone, Copy, Debug, ValueEnum)]
#[allow(missing_docs)]
pub enum LocaleArg {
    Marathi,
    English,
}

impl From<LocaleArg> for Locale {
    fn from(arg: LocaleArg) -> Self {
        match arg {
            LocaleArg::Marathi => Self::Marathi,
            LocaleArg::English => Self::English,
        }
    }
}

/// Peer set for ranking.
#[derive(Clone, Copy, Debug, ValueEnum)]
#[allow(missing_docs)]
pub enum ScopeArg {
    AllStudents,
    SameClass,
}

impl From<ScopeArg> for PeerScope {
    fn from(arg: ScopeArg) -> Self {
        match arg {
            ScopeArg::AllStudents => Self::AllStudents,
            ScopeArg::SameClass => Self::SameClass,
        }
    }
}

#[derive(Args, Debug)]
#[allow(missing_docs)]
pub struct ReportCommand {
    /// Student to report on
    #[arg(required_unless_present = "all", conflicts_with = "all")]
    pub student: Option<i64>,
    /// Report on every student
    #[arg(long)]
    pub all: bool,
    /// Directory the HTML files are written to
    #[arg(long, default_value = "reports")]
    pub out: PathBuf,
    /// Overrides `[report] locale`
    #[arg(long, value_enum)]
    pub locale: Option<LocaleArg>,
    /// Overrides `[report] peer_scope`
    #[arg(long, value_enum)]
    pub scope: Option<ScopeArg>,
    /// Academic year label, derived from today if omitted
    #[arg(long)]
    pub year: Option<String>,
}

#[derive(Args, Debug)]
#[allow(missing_docs)]
pub struct AnalysisCommand {
    /// Analyse a single class instead of the whole school
    #[arg(long)]
    pub class: Option<String>,
}

/// What every command needs besides its arguments.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    /// Open database
    pub db: &'a DatabaseConnection,
    /// Loaded configuration
    pub config: &'a Config,
    /// Reference date for defaults and printed dates
    pub today: NaiveDate,
}

fn num(value: f64) -> String {
    format_number(value, Locale::English)
}

/// Runs one command and returns its output.
#[instrument(skip(ctx))]
pub async fn execute(command: Commands, ctx: &Context<'_>) -> Result<String> {
    match command {
        Commands::Init => init(ctx).await,
        Commands::Student(cmd) => student_command(cmd, ctx).await,
        Commands::Subjects => list_subjects(ctx).await,
        Commands::Exams => list_exam_types(ctx).await,
        Commands::Marks(cmd) => marks_command(cmd, ctx).await,
        Commands::Report(cmd) => write_reports(cmd, ctx).await,
        Commands::Analysis(cmd) => show_analysis(cmd, ctx).await,
    }
}

async fn init(ctx: &Context<'_>) -> Result<String> {
    let summary = seed::seed_defaults(ctx.db, ctx.config).await?;
    let mut out = String::new();
    writeln!(out, "Subjects added: {}", summary.subjects_added)?;
    writeln!(out, "Exam types added: {}", summary.exam_types_added)?;
    writeln!(
        out,
        "School: {}",
        if summary.school_saved {
            "saved"
        } else {
            "already configured"
        }
    )?;
    Ok(out)
}

async fn student_command(cmd: StudentCommand, ctx: &Context<'_>) -> Result<String> {
    let mut out = String::new();
    match cmd {
        StudentCommand::Add(args) => {
            let created = student::add_student(
                ctx.db,
                NewStudent {
                    name: args.name,
                    guardian_name: args.guardian,
                    class_label: args.class,
                    roll_number: args.roll,
                    admission_date: args.admitted.unwrap_or(ctx.today),
                },
            )
            .await?;
            writeln!(out, "Added student {} (ID: {})", created.name, created.id)?;
        }
        StudentCommand::List { class } => {
            let students = match class {
                Some(class) => student::list_students_in_class(ctx.db, &class).await?,
                None => student::list_students(ctx.db).await?,
            };
            if students.is_empty() {
                writeln!(out, "No students found.")?;
            }
            for s in students {
                writeln!(
                    out,
                    "{:>4}  {:<12} roll {:>3}  {} (guardian: {})",
                    s.id,
                    ctx.config.class_display_label(&s.class_label),
                    s.roll_number,
                    s.name,
                    s.guardian_name
                )?;
            }
        }
        StudentCommand::Update(args) => {
            let updated = student::update_student(
                ctx.db,
                args.id,
                StudentUpdate {
                    name: args.name,
                    guardian_name: args.guardian,
                    class_label: args.class,
                    roll_number: args.roll,
                    admission_date: args.admitted,
                },
            )
            .await?;
            writeln!(out, "Updated student {} (ID: {})", updated.name, updated.id)?;
        }
        StudentCommand::Remove { id } => {
            student::delete_student(ctx.db, id).await?;
            writeln!(out, "Removed student {id} and their marks")?;
        }
    }
    Ok(out)
}

async fn list_subjects(ctx: &Context<'_>) -> Result<String> {
    let mut out = String::new();
    for s in subject::list_subjects(ctx.db).await? {
        writeln!(
            out,
            "{:>4}  {} ({})  max {}  pass {}",
            s.id, s.name, s.name_local, s.max_marks, s.passing_marks
        )?;
    }
    Ok(out)
}

async fn list_exam_types(ctx: &Context<'_>) -> Result<String> {
    let mut out = String::new();
    for e in exam_type::list_exam_types(ctx.db).await? {
        writeln!(
            out,
            "{:>4}  {} ({})  weightage {}%",
            e.id,
            e.name,
            e.name_local,
            num(e.weightage)
        )?;
    }
    Ok(out)
}

async fn marks_command(cmd: MarksCommand, ctx: &Context<'_>) -> Result<String> {
    let mut out = String::new();
    match cmd {
        MarksCommand::Add(args) => {
            let created = assessment::record_assessment(
                ctx.db,
                NewAssessment {
                    student_id: args.student,
                    subject_id: args.subject,
                    exam_type_id: args.exam,
                    marks: args.marks,
                },
                args.date.unwrap_or(ctx.today),
            )
            .await?;
            writeln!(
                out,
                "Recorded {}/{} (assessment ID: {}, {})",
                num(created.marks),
                num(created.max_marks),
                created.id,
                created.academic_year
            )?;
        }
        MarksCommand::List { student } => {
            let rows = match student {
                Some(id) => assessment::list_assessments_for_student(ctx.db, id).await?,
                None => assessment::list_assessments(ctx.db).await?,
            };
            if rows.is_empty() {
                writeln!(out, "No marks recorded.")?;
            }
            for a in rows {
                writeln!(
                    out,
                    "{:>4}  student {:>4}  subject {:>3}  exam {:>3}  {}/{}  {}",
                    a.id,
                    a.student_id,
                    a.subject_id,
                    a.exam_type_id,
                    num(a.marks),
                    num(a.max_marks),
                    a.recorded_on
                )?;
            }
        }
        MarksCommand::Update { id, marks } => {
            let updated = assessment::update_assessment_marks(ctx.db, id, marks).await?;
            writeln!(
                out,
                "Assessment {} now {}/{}",
                updated.id,
                num(updated.marks),
                num(updated.max_marks)
            )?;
        }
        MarksCommand::Remove { id } => {
            assessment::delete_assessment(ctx.db, id).await?;
            writeln!(out, "Deleted assessment {id}")?;
        }
    }
    Ok(out)
}

fn report_file_name(card: &ReportCard) -> String {
    format!("report-{}.html", card.student.id)
}

async fn write_reports(cmd: ReportCommand, ctx: &Context<'_>) -> Result<String> {
    let snapshot = load_snapshot(ctx.db).await?;
    let options = ReportOptions {
        academic_year: cmd.year.unwrap_or_else(|| academic_year_for(ctx.today)),
        peer_scope: cmd
            .scope
            .map_or(ctx.config.report.peer_scope, PeerScope::from),
    };
    let locale = cmd.locale.map_or(ctx.config.report.locale, Locale::from);

    let cards = match (cmd.student, cmd.all) {
        (_, true) => report::build_report_cards(&snapshot, &options)?,
        (Some(id), false) => vec![report::build_report_card(&snapshot, id, &options)?],
        (None, false) => {
            return Err(Error::Validation {
                message: "Give a student id or --all".to_string(),
            });
        }
    };

    std::fs::create_dir_all(&cmd.out)?;
    let mut out = String::new();
    for card in &cards {
        let path = cmd.out.join(report_file_name(card));
        std::fs::write(&path, report_card_html(card, ctx.today, locale))?;
        info!("Wrote report card for student {} to {}", card.student.id, path.display());
        let rank = card
            .rank
            .map_or_else(|| "-".to_string(), |r| r.to_string());
        writeln!(
            out,
            "{}: {}% {} rank {} -> {}",
            card.student.name,
            num(card.percentage),
            card.grade,
            rank,
            path.display()
        )?;
    }
    Ok(out)
}

async fn show_analysis(cmd: AnalysisCommand, ctx: &Context<'_>) -> Result<String> {
    let snapshot = load_snapshot(ctx.db).await?;
    let mut out = String::new();

    if let Some(class) = cmd.class {
        let a = analysis::analyze_class(&snapshot, &class);
        writeln!(out, "Class {}", ctx.config.class_display_label(&a.class_label))?;
        writeln!(
            out,
            "Students: {}  passed: {}  failed: {}",
            a.total_students, a.passed_students, a.failed_students
        )?;
        writeln!(out, "Average: {}%", num(a.average_percentage))?;
        writeln!(
            out,
            "Total marks: highest {}  lowest {}",
            num(a.highest_marks),
            num(a.lowest_marks)
        )?;
        for s in &a.subject_wise_analysis {
            writeln!(
                out,
                "  {:<12} avg {:>6}  passed {}  failed {}  high {}  low {}",
                s.subject.name,
                num(s.average_marks),
                s.passed_students,
                s.failed_students,
                num(s.highest_marks),
                num(s.lowest_marks)
            )?;
        }
        return Ok(out);
    }

    let overview = analysis::overview(&snapshot);
    writeln!(out, "Students: {}", overview.total_students)?;
    writeln!(out, "Assessments: {}", overview.total_assessments)?;
    writeln!(out, "Average: {}%", num(overview.average_percentage))?;

    writeln!(out, "\nClass performance:")?;
    for c in analysis::class_performance(&snapshot, &ctx.config.classes) {
        writeln!(out, "  {:<16} {}%", c.display_label, num(c.percentage))?;
    }

    writeln!(out, "\nSubject performance:")?;
    for s in analysis::subject_performance(&snapshot) {
        writeln!(out, "  {:<16} {}%", s.name, num(s.percentage))?;
    }

    writeln!(out, "\nGrade distribution:")?;
    let distribution = analysis::grade_distribution(&snapshot.students, &snapshot.assessments);
    for (grade, count) in distribution.non_empty() {
        writeln!(out, "  {:<3} {count}", grade.label())?;
    }
    Ok(out)
}
