//! Class and subject analytics.
//!
//! Group percentages are computed by pooling marks and maxima over every
//! assessment in the group and dividing once, not by averaging student
//! percentages. The only exception is [`overall_average`], which is a mean of
//! per-student percentages.

use crate::{
    core::{
        grading::{Grade, calculate_student_total, is_overall_passed, is_subject_passed},
        report::student_percentages,
        snapshot::Snapshot,
    },
    entities::{AssessmentModel, StudentModel, SubjectModel},
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A class as offered by the school: the stored value and its display label.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClassOption {
    /// Value stored on students, e.g. `"5"`
    pub value: String,
    /// Label shown to users, e.g. `"5 वी"`
    pub label: String,
}

/// Pooled percentage for one class.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassPerformance {
    /// Class value
    pub class_label: String,
    /// Display label
    pub display_label: String,
    /// Pooled percentage, `0.0` when the class has no marks
    pub percentage: f64,
}

/// Pooled percentage for one subject.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectPerformance {
    /// Subject id
    pub subject_id: i64,
    /// English name
    pub name: String,
    /// Local name
    pub name_local: String,
    /// Pooled percentage, `0.0` when nobody has marks in the subject
    pub percentage: f64,
}

fn pooled_percentage<'a, I>(assessments: I) -> f64
where
    I: IntoIterator<Item = &'a AssessmentModel>,
{
    calculate_student_total(assessments).percentage()
}

/// Pooled percentage over every assessment of students in `class_label`.
#[must_use]
pub fn class_percentage(
    students: &[StudentModel],
    assessments: &[AssessmentModel],
    class_label: &str,
) -> f64 {
    let members: HashSet<i64> = students
        .iter()
        .filter(|s| s.class_label == class_label)
        .map(|s| s.id)
        .collect();
    pooled_percentage(assessments.iter().filter(|a| members.contains(&a.student_id)))
}

/// Pooled percentage over every assessment in one subject.
#[must_use]
pub fn subject_percentage(assessments: &[AssessmentModel], subject_id: i64) -> f64 {
    pooled_percentage(assessments.iter().filter(|a| a.subject_id == subject_id))
}

/// Performance of each configured class, in the order given.
#[must_use]
pub fn class_performance(snapshot: &Snapshot, classes: &[ClassOption]) -> Vec<ClassPerformance> {
    classes
        .iter()
        .map(|class| ClassPerformance {
            class_label: class.value.clone(),
            display_label: class.label.clone(),
            percentage: class_percentage(&snapshot.students, &snapshot.assessments, &class.value),
        })
        .collect()
}

/// Performance of every subject, in display order.
#[must_use]
pub fn subject_performance(snapshot: &Snapshot) -> Vec<SubjectPerformance> {
    snapshot
        .subjects
        .iter()
        .map(|subject| SubjectPerformance {
            subject_id: subject.id,
            name: subject.name.clone(),
            name_local: subject.name_local.clone(),
            percentage: subject_percentage(&snapshot.assessments, subject.id),
        })
        .collect()
}

/// Number of students in each grade band. All eight bands are always counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GradeDistribution {
    counts: [usize; 8],
}

impl GradeDistribution {
    fn index(grade: Grade) -> usize {
        Grade::ALL.iter().position(|g| *g == grade).unwrap_or_default()
    }

    fn add(&mut self, grade: Grade) {
        self.counts[Self::index(grade)] += 1;
    }

    /// Students in `grade`.
    #[must_use]
    pub fn count(&self, grade: Grade) -> usize {
        self.counts[Self::index(grade)]
    }

    /// Students counted across all bands.
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Every band with its count, best first, including empty ones.
    pub fn iter(&self) -> impl Iterator<Item = (Grade, usize)> + '_ {
        Grade::ALL.into_iter().zip(self.counts.iter().copied())
    }

    /// Only the bands with at least one student, as a chart would show them.
    #[must_use]
    pub fn non_empty(&self) -> Vec<(Grade, usize)> {
        self.iter().filter(|(_, count)| *count > 0).collect()
    }
}

/// Counts students by overall grade.
#[must_use]
pub fn grade_distribution(
    students: &[StudentModel],
    assessments: &[AssessmentModel],
) -> GradeDistribution {
    let percentages = student_percentages(students, assessments);
    let mut distribution = GradeDistribution::default();
    for student in students {
        let pct = percentages.get(&student.id).copied().unwrap_or_default();
        distribution.add(Grade::from_percentage(pct));
    }
    distribution
}

/// Mean of every student's percentage, rounded to a whole number. An empty
/// roster gives `0.0`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn overall_average(students: &[StudentModel], assessments: &[AssessmentModel]) -> f64 {
    if students.is_empty() {
        return 0.0;
    }
    let percentages = student_percentages(students, assessments);
    let sum: f64 = students
        .iter()
        .filter_map(|s| percentages.get(&s.id))
        .sum();
    (sum / students.len() as f64).round()
}

/// Headline numbers for the whole school.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    /// Students on the roster
    pub total_students: usize,
    /// Assessments recorded
    pub total_assessments: usize,
    /// See [`overall_average`]
    pub average_percentage: f64,
}

/// Builds the school-wide [`Overview`].
#[must_use]
pub fn overview(snapshot: &Snapshot) -> Overview {
    Overview {
        total_students: snapshot.students.len(),
        total_assessments: snapshot.assessments.len(),
        average_percentage: overall_average(&snapshot.students, &snapshot.assessments),
    }
}

/// How one class did in one subject.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectAnalysis {
    /// The subject
    pub subject: SubjectModel,
    /// Mean marks over the class's assessments in this subject
    pub average_marks: f64,
    /// Students with marks here who passed every one of them
    pub passed_students: usize,
    /// Students with marks here who failed at least one
    pub failed_students: usize,
    /// Best single assessment
    pub highest_marks: f64,
    /// Worst single assessment
    pub lowest_marks: f64,
}

/// Summary of one class.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassAnalysis {
    /// Class value
    pub class_label: String,
    /// Students in the class
    pub total_students: usize,
    /// Students passing overall
    pub passed_students: usize,
    /// Students failing overall
    pub failed_students: usize,
    /// Mean student percentage, two decimals
    pub average_percentage: f64,
    /// Highest student total marks
    pub highest_marks: f64,
    /// Lowest student total marks
    pub lowest_marks: f64,
    /// One entry per subject, in display order
    pub subject_wise_analysis: Vec<SubjectAnalysis>,
}

fn min_max(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    values.into_iter().fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

#[allow(clippy::cast_precision_loss)]
fn analyze_subject(subject: &SubjectModel, class_assessments: &[&AssessmentModel]) -> SubjectAnalysis {
    let rows: Vec<&AssessmentModel> = class_assessments
        .iter()
        .copied()
        .filter(|a| a.subject_id == subject.id)
        .collect();

    // student id -> passed every assessment so far
    let mut per_student: HashMap<i64, bool> = HashMap::new();
    for a in &rows {
        let ok = is_subject_passed(a.marks, f64::from(subject.passing_marks));
        per_student
            .entry(a.student_id)
            .and_modify(|passed| *passed &= ok)
            .or_insert(ok);
    }
    let passed_students = per_student.values().filter(|p| **p).count();

    let (lowest_marks, highest_marks) = min_max(rows.iter().map(|a| a.marks)).unwrap_or_default();
    let average_marks = if rows.is_empty() {
        0.0
    } else {
        let sum: f64 = rows.iter().map(|a| a.marks).sum();
        (sum / rows.len() as f64 * 100.0).round() / 100.0
    };

    SubjectAnalysis {
        subject: subject.clone(),
        average_marks,
        passed_students,
        failed_students: per_student.len() - passed_students,
        highest_marks,
        lowest_marks,
    }
}

/// Analyses one class: pass/fail counts, average percentage, spread of total
/// marks and a per-subject breakdown. An empty class gives zeros throughout.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn analyze_class(snapshot: &Snapshot, class_label: &str) -> ClassAnalysis {
    let members: Vec<&StudentModel> = snapshot
        .students
        .iter()
        .filter(|s| s.class_label == class_label)
        .collect();
    let member_ids: HashSet<i64> = members.iter().map(|s| s.id).collect();
    let class_assessments: Vec<&AssessmentModel> = snapshot
        .assessments
        .iter()
        .filter(|a| member_ids.contains(&a.student_id))
        .collect();

    let mut passed_students = 0;
    let mut percentage_sum = 0.0;
    let mut totals = Vec::with_capacity(members.len());
    for student in &members {
        let own: Vec<AssessmentModel> = snapshot.assessments_for(student.id).cloned().collect();
        let total = calculate_student_total(&own);
        if is_overall_passed(&own, &snapshot.subjects) {
            passed_students += 1;
        }
        percentage_sum += total.percentage();
        totals.push(total.total_marks);
    }

    let average_percentage = if members.is_empty() {
        0.0
    } else {
        (percentage_sum / members.len() as f64 * 100.0).round() / 100.0
    };
    let (lowest_marks, highest_marks) = min_max(totals).unwrap_or_default();

    ClassAnalysis {
        class_label: class_label.to_string(),
        total_students: members.len(),
        passed_students,
        failed_students: members.len() - passed_students,
        average_percentage,
        highest_marks,
        lowest_marks,
        subject_wise_analysis: snapshot
            .subjects
            .iter()
            .map(|subject| analyze_subject(subject, &class_assessments))
            .collect(),
    }
}
