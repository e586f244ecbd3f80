//! 导出格式化：CSV / JSON

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::errors::{GradebookError, Result};
use crate::models::grades::{
    entities::ExportFormat,
    rows::{ExportRow, FieldValue},
};

pub fn format(rows: &[ExportRow], format: ExportFormat, include_headers: bool) -> Result<String> {
    match format {
        ExportFormat::Csv => to_csv(rows, include_headers),
        ExportFormat::Json => to_json(rows),
    }
}

/// 所有行的列名并集，按首次出现的顺序
pub fn header_union(rows: &[Vec<(String, FieldValue)>]) -> Vec<String> {
    let mut headers: Vec<String> = Vec::new();
    for fields in rows {
        for (key, _) in fields {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }
    headers
}

fn to_csv(rows: &[ExportRow], include_headers: bool) -> Result<String> {
    if rows.is_empty() {
        return Ok(String::new());
    }

    let field_rows: Vec<Vec<(String, FieldValue)>> = rows.iter().map(ExportRow::fields).collect();
    let headers = header_union(&field_rows);

    // 所有单元格都加引号，内部引号双写
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .has_headers(false)
        .from_writer(Vec::new());

    if include_headers {
        writer.write_record(&headers)?;
    }
    for fields in &field_rows {
        let record = headers.iter().map(|header| {
            fields
                .iter()
                .find(|(key, _)| key == header)
                .map(|(_, value)| value.to_csv_string())
                .unwrap_or_default()
        });
        writer.write_record(record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| GradebookError::serialization(e.to_string()))?;
    // 每行（含最后一行）以换行结尾
    String::from_utf8(bytes).map_err(|e| GradebookError::serialization(e.to_string()))
}

fn to_json(rows: &[ExportRow]) -> Result<String> {
    Ok(serde_json::to_string_pretty(rows)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::grades::rows::{
        AllScopeAssignmentColumns, AllScopeRow, AssignmentScopeColumns, AssignmentScopeRow,
        CourseGradeCell, CourseScopeRow, CourseTotals, StudentColumns, SubmissionState,
    };
    use serde_json::Value;

    fn course_row(name: &str, cells: &[(&str, FieldValue)]) -> ExportRow {
        ExportRow::Course(CourseScopeRow {
            student_name: name.to_string(),
            student: None,
            cells: cells
                .iter()
                .map(|(title, value)| CourseGradeCell {
                    assignment_title: title.to_string(),
                    column: title.to_string(),
                    value: value.clone(),
                    feedback: None,
                })
                .collect(),
            totals: None,
        })
    }

    fn assignment_row(name: &str, grade: f64) -> ExportRow {
        ExportRow::Assignment(AssignmentScopeRow {
            student_name: name.to_string(),
            status: SubmissionState::Graded,
            grade: FieldValue::Number(grade),
            student: None,
            assignment: None,
            percentage: format!("{grade:.1}%"),
            feedback: None,
            submission_date: "2025-03-10".to_string(),
        })
    }

    #[test]
    fn test_empty_rows() {
        assert_eq!(format(&[], ExportFormat::Csv, true).unwrap(), "");
        assert_eq!(format(&[], ExportFormat::Json, true).unwrap(), "[]");
    }

    #[test]
    fn test_csv_quotes_every_cell() {
        let rows = vec![assignment_row("Ada \"The Countess\" Lovelace", 90.0)];
        let csv = format(&rows, ExportFormat::Csv, true).unwrap();
        assert!(csv.ends_with('\n'));
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines[0],
            "\"Student Name\",\"Status\",\"Grade\",\"Percentage\",\"Submission Date\""
        );
        assert_eq!(
            lines[1],
            "\"Ada \"\"The Countess\"\" Lovelace\",\"Graded\",\"90\",\"90.0%\",\"2025-03-10\""
        );
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_csv_header_is_union_of_keys() {
        let rows = vec![
            course_row("Ada", &[("Essay", FieldValue::Number(40.0))]),
            course_row(
                "Alan",
                &[
                    ("Essay", FieldValue::from("Not Submitted")),
                    ("Quiz", FieldValue::Number(10.0)),
                ],
            ),
        ];
        let csv = format(&rows, ExportFormat::Csv, true).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "\"Student Name\",\"Essay\",\"Quiz\"");
        // 缺失的列输出空字符串
        assert_eq!(lines[1], "\"Ada\",\"40\",\"\"");
        assert_eq!(lines[2], "\"Alan\",\"Not Submitted\",\"10\"");
    }

    #[test]
    fn test_csv_without_headers() {
        let rows = vec![assignment_row("Ada", 90.0)];
        let csv = format(&rows, ExportFormat::Csv, false).unwrap();
        assert_eq!(csv.lines().count(), 1);
        assert!(csv.starts_with("\"Ada\""));
    }

    #[test]
    fn test_json_array_of_objects() {
        let rows = vec![assignment_row("Ada", 90.0), assignment_row("Alan", 72.5)];
        let json = format(&rows, ExportFormat::Json, false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        let items = value.as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["Student Name"], "Ada");
        assert_eq!(items[0]["Grade"], 90);
        assert_eq!(items[1]["Grade"], 72.5);
        let keys: Vec<&String> = items[0].as_object().unwrap().keys().collect();
        assert_eq!(keys[0], "Student Name");
        assert_eq!(keys[1], "Status");
    }

    fn expected_value(value: &FieldValue) -> Value {
        match value {
            FieldValue::Text(s) => Value::from(s.as_str()),
            FieldValue::Number(n) if n.fract() == 0.0 => Value::from(*n as i64),
            FieldValue::Number(n) => Value::from(*n),
            FieldValue::Empty => Value::Null,
        }
    }

    #[test]
    fn test_json_preserves_every_field_in_order() {
        let rows = vec![
            ExportRow::All(AllScopeRow {
                student_name: "Ada \"The Countess\" Lovelace".to_string(),
                grade: 42.5,
                percentage: "85.0%".to_string(),
                student: Some(StudentColumns {
                    student_code: None,
                    email: "ada@example.edu".to_string(),
                }),
                assignment: Some(AllScopeAssignmentColumns {
                    title: "Essay".to_string(),
                    course_code: "CS101".to_string(),
                    course_title: "Algorithms".to_string(),
                    max_points: 50.0,
                }),
                feedback: Some("Said \"well done\"".to_string()),
            }),
            ExportRow::Course(CourseScopeRow {
                student_name: "Alan Turing".to_string(),
                student: Some(StudentColumns {
                    student_code: Some("S011".to_string()),
                    email: "alan@example.edu".to_string(),
                }),
                cells: vec![
                    CourseGradeCell {
                        assignment_title: "Homework 1".to_string(),
                        column: "Homework 1 (100pts)".to_string(),
                        value: FieldValue::Number(72.25),
                        feedback: Some(String::new()),
                    },
                    CourseGradeCell {
                        assignment_title: "Essay".to_string(),
                        column: "Essay (50pts)".to_string(),
                        value: FieldValue::from("Not Submitted"),
                        feedback: None,
                    },
                ],
                totals: Some(CourseTotals {
                    total_points: FieldValue::Number(72.25),
                    max_points: FieldValue::Number(100.0),
                    average: "72.3%".to_string(),
                }),
            }),
            ExportRow::Assignment(AssignmentScopeRow {
                student_name: "Grace Hopper".to_string(),
                status: SubmissionState::NotSubmitted,
                grade: FieldValue::from("N/A"),
                student: Some(StudentColumns {
                    student_code: Some("S012".to_string()),
                    email: "grace@example.edu".to_string(),
                }),
                assignment: Some(AssignmentScopeColumns {
                    title: "Homework 1".to_string(),
                    course_code: "CS101".to_string(),
                    max_points: 100.0,
                }),
                percentage: "N/A".to_string(),
                feedback: Some(String::new()),
                submission_date: "Not Submitted".to_string(),
            }),
        ];

        let json = format(&rows, ExportFormat::Json, true).unwrap();
        let parsed: Value = serde_json::from_str(&json).unwrap();
        let items = parsed.as_array().unwrap();
        assert_eq!(items.len(), rows.len());

        for (row, item) in rows.iter().zip(items) {
            let actual: Vec<(String, Value)> = item
                .as_object()
                .unwrap()
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            let expected: Vec<(String, Value)> = row
                .fields()
                .iter()
                .map(|(k, v)| (k.clone(), expected_value(v)))
                .collect();
            assert_eq!(actual, expected);
        }

        // 空值为 null，引号原样保留
        assert_eq!(items[0]["Student ID"], Value::Null);
        assert_eq!(items[0]["Feedback"], "Said \"well done\"");
        assert_eq!(items[1]["Homework 1 (100pts)"], 72.25);
    }
}
