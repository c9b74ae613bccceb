use crate::domain::School;
use crate::utils::error::Result;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
struct ReportRow<'a> {
    id: i64,
    first_name: &'a str,
    last_name: &'a str,
    disciplines: usize,
    average: String,
}

/// 將每位學生的平均成績寫成 CSV 報表
pub fn write_average_report<W: Write>(school: &School, writer: W) -> Result<()> {
    let students = school.students();
    let mut csv_writer = csv::Writer::from_writer(writer);

    for student in &students {
        csv_writer.serialize(ReportRow {
            id: student.id(),
            first_name: student.first_name(),
            last_name: student.last_name(),
            disciplines: student.discipline_count(),
            average: format!("{:.2}", student.calculate_average_grade()),
        })?;
    }

    // 沒有學生時 serialize 不會寫出標頭
    if students.is_empty() {
        csv_writer.write_record(["id", "first_name", "last_name", "disciplines", "average"])?;
    }

    csv_writer.flush()?;
    tracing::debug!("Average report written for {} students", students.len());
    Ok(())
}
