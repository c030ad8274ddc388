//! Report card as a self-contained, printable HTML document.
//!
//! Headings are bilingual (Marathi with English underneath). The `locale`
//! decides how numbers and dates are written and which language grade
//! descriptions and pass/fail status use. Converting the document to PDF is
//! left to the browser or an external tool.

use crate::core::{
    grading::Grade,
    locale::{Locale, format_date, format_number, to_devanagari_digits},
    report::{ReportCard, SubjectRow},
};
use chrono::NaiveDate;

const STYLE: &str = r"
body { font-family: 'Noto Sans Devanagari', Arial, sans-serif; margin: 20px; background: #f9f9f9; }
.report-card { background: white; padding: 30px; max-width: 800px; margin: 0 auto; border-radius: 12px; }
.header { text-align: center; border-bottom: 3px solid #2196F3; padding-bottom: 20px; margin-bottom: 30px; }
.school-name { font-size: 28px; font-weight: bold; color: #1976D2; }
.school-name-en { font-size: 20px; color: #666; }
.school-details { font-size: 14px; color: #666; margin: 10px 0; }
.report-title { font-size: 24px; font-weight: bold; color: #FF9800; margin-top: 15px; }
.student-info { display: flex; justify-content: space-between; background: #E3F2FD; padding: 20px; margin-bottom: 30px; border-radius: 10px; }
.info-row { margin-bottom: 8px; font-size: 16px; }
.label { font-weight: bold; color: #1976D2; }
.marks-table { width: 100%; border-collapse: collapse; margin-bottom: 30px; }
.marks-table th { background: #1976D2; color: white; padding: 12px; }
.marks-table td { padding: 10px; text-align: center; border-bottom: 1px solid #E0E0E0; }
.subject-name { text-align: left !important; font-weight: bold; }
.total-row { background: #4CAF50; color: white; font-weight: bold; }
.pass { color: #4CAF50; font-weight: bold; }
.fail { color: #F44336; font-weight: bold; }
.summary { display: flex; justify-content: space-around; margin-bottom: 30px; }
.summary-card { background: #FF9800; color: white; padding: 20px; border-radius: 12px; text-align: center; flex: 1; margin: 0 10px; }
.summary-value { font-size: 24px; font-weight: bold; }
.footer { display: flex; justify-content: space-between; margin-top: 40px; }
.signature-line { border-top: 1px solid #666; margin-top: 50px; padding-top: 5px; width: 200px; text-align: center; font-size: 14px; color: #666; }
.print-date { font-size: 12px; color: #999; text-align: right; margin-top: 20px; }
";

/// Escapes text for use inside HTML element content or a quoted attribute.
#[must_use]
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

const fn status_text(passed: bool, locale: Locale) -> &'static str {
    match (locale, passed) {
        (Locale::Marathi, true) => "उत्तीर्ण",
        (Locale::Marathi, false) => "अनुत्तीर्ण",
        (Locale::English, true) => "Pass",
        (Locale::English, false) => "Fail",
    }
}

const fn status_class(passed: bool) -> &'static str {
    if passed { "pass" } else { "fail" }
}

fn format_rank(rank: Option<usize>, locale: Locale) -> String {
    match (rank, locale) {
        (None, _) => "-".to_string(),
        (Some(r), Locale::English) => r.to_string(),
        (Some(r), Locale::Marathi) => to_devanagari_digits(&r.to_string()),
    }
}

fn format_plain(value: i64, locale: Locale) -> String {
    match locale {
        Locale::English => value.to_string(),
        Locale::Marathi => to_devanagari_digits(&value.to_string()),
    }
}

fn subject_row_html(row: &SubjectRow, locale: Locale) -> String {
    let exam = row
        .exam_type_name
        .as_deref()
        .map(|name| format!("<br><small>{}</small>", escape_html(name)))
        .unwrap_or_default();
    format!(
        r#"<tr>
<td class="subject-name"><strong>{local}</strong><br><small>{name}</small>{exam}</td>
<td>{max}</td>
<td>{marks}</td>
<td>{pct}%</td>
<td style="color: {color}"><strong>{grade}</strong><br><small>{desc}</small></td>
<td class="{class}">{status}</td>
</tr>
"#,
        local = escape_html(&row.subject_name_local),
        name = escape_html(&row.subject_name),
        max = format_number(row.max_marks, locale),
        marks = format_number(row.marks, locale),
        pct = format_number(row.percentage, locale),
        color = row.grade.color(),
        grade = row.grade,
        desc = row.grade.description(locale),
        class = status_class(row.passed),
        status = status_text(row.passed, locale),
    )
}

fn header_html(card: &ReportCard, locale: Locale) -> String {
    let school = &card.school;
    let place: Vec<&str> = [
        school.address.as_str(),
        school.city.as_str(),
        school.state.as_str(),
    ]
    .into_iter()
    .filter(|s| !s.is_empty())
    .collect();
    let mut place = place.join(", ");
    if !school.pincode.is_empty() {
        place = format!("{place} - {}", school.pincode);
    }

    format!(
        r#"<div class="header">
<div class="school-name">{local}</div>
<div class="school-name-en">{name}</div>
<div class="school-details">{place}<br>दूरध्वनी / Phone: {phone} | ईमेल / Email: {email}<br>नोंदणी क्रमांक / Registration: {code}</div>
<div class="report-title">शैक्षणिक प्रगती अहवाल</div>
<div>Academic Progress Report</div>
</div>
"#,
        local = escape_html(&school.name_local),
        name = escape_html(&school.name),
        place = escape_html(&place),
        phone = escape_html(&school.phone_number),
        email = escape_html(&school.email),
        code = escape_html(&format_registration(&school.registration_code, locale)),
    )
}

fn format_registration(code: &str, locale: Locale) -> String {
    match locale {
        Locale::English => code.to_string(),
        Locale::Marathi => to_devanagari_digits(code),
    }
}

/// Renders the complete report card document.
///
/// `printed_on` is the date shown on the card; pass today's date from the
/// caller so the rendering itself stays deterministic.
#[must_use]
pub fn report_card_html(card: &ReportCard, printed_on: NaiveDate, locale: Locale) -> String {
    let student = &card.student;
    let printed = escape_html(&format_date(printed_on, locale));
    let rows: String = card
        .rows
        .iter()
        .map(|row| subject_row_html(row, locale))
        .collect();
    let overall_grade: Grade = card.grade;

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>रिपोर्ट कार्ड - {title}</title>
<style>{STYLE}</style>
</head>
<body>
<div class="report-card">
{header}
<div class="student-info">
<div>
<div class="info-row"><span class="label">विद्यार्थ्याचे नाव / Name:</span> {name}</div>
<div class="info-row"><span class="label">पालकांचे नाव / Guardian:</span> {guardian}</div>
<div class="info-row"><span class="label">हजेरी क्रमांक / Roll No.:</span> {roll}</div>
</div>
<div>
<div class="info-row"><span class="label">वर्ग / Class:</span> {class}</div>
<div class="info-row"><span class="label">शैक्षणिक वर्ष / Academic Year:</span> {year}</div>
<div class="info-row"><span class="label">दिनांक / Date:</span> {printed}</div>
</div>
</div>
<table class="marks-table">
<thead>
<tr>
<th>विषय<br>Subject</th>
<th>पूर्णांक<br>Max Marks</th>
<th>प्राप्त गुण<br>Marks Obtained</th>
<th>टक्केवारी<br>Percentage</th>
<th>श्रेणी<br>Grade</th>
<th>स्थिती<br>Status</th>
</tr>
</thead>
<tbody>
{rows}<tr class="total-row">
<td class="subject-name">एकूण (Total)</td>
<td>{total_max}</td>
<td>{total}</td>
<td>{pct}%</td>
<td>{grade}</td>
<td>{status}</td>
</tr>
</tbody>
</table>
<div class="summary">
<div class="summary-card"><div>एकूण टक्केवारी / Percentage</div><div class="summary-value">{pct}%</div></div>
<div class="summary-card"><div>श्रेणी / Grade</div><div class="summary-value">{grade}</div><div>{grade_desc}</div></div>
<div class="summary-card"><div>स्थान / Rank</div><div class="summary-value">{rank}</div></div>
</div>
<div class="footer">
<div class="signature-line">वर्गशिक्षक स्वाक्षरी<br>Class Teacher</div>
<div class="signature-line">पालक स्वाक्षरी<br>Parent's Signature</div>
<div class="signature-line">मुख्याध्यापक स्वाक्षरी<br>Principal {principal}</div>
</div>
<div class="print-date">मुद्रण दिनांक / Printed on: {printed}</div>
</div>
</body>
</html>
"#,
        title = escape_html(&student.name),
        header = header_html(card, locale),
        name = escape_html(&student.name),
        guardian = escape_html(&student.guardian_name),
        roll = format_plain(i64::from(student.roll_number), locale),
        class = escape_html(&student.class_label),
        year = escape_html(&card.academic_year),
        total_max = format_number(card.total_max_marks, locale),
        total = format_number(card.total_marks, locale),
        pct = format_number(card.percentage, locale),
        grade = overall_grade,
        grade_desc = overall_grade.description(locale),
        status = status_text(card.passed, locale),
        rank = format_rank(card.rank, locale),
        principal = escape_html(&card.school.principal_name),
    )
}
