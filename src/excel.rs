//! Question import from Excel and CSV files
//!
//! The answers column holds either a JSON array (`["Bulls", "Chicago Bulls"]`)
//! or a `|`-separated list (`Bulls | Chicago Bulls`).

use std::io::Read;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};
use csv::ReaderBuilder;
#[cfg(feature = "python")]
use pyo3::prelude::*;

use crate::error::{MatchError, Result};
use crate::questions::{Question, DEFAULT_POINTS};

/// Load questions from a `.csv`, `.xlsx` or `.xls` file.
pub fn load_questions(file_path: impl AsRef<Path>) -> Result<Vec<Question>> {
    let path = file_path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let questions = match extension.as_str() {
        "xlsx" | "xls" => parse_excel(path)?,
        "csv" => parse_csv(std::fs::File::open(path)?)?,
        _ => return Err(MatchError::UnsupportedFormat(extension)),
    };

    info!("Loaded {} questions from {}", questions.len(), path.display());
    Ok(questions)
}

/// Column index mapping
#[derive(Debug, Default, Clone)]
struct ColumnMapping {
    id: Option<usize>,
    name: usize,
    description: Option<usize>,
    organization: Option<usize>,
    answers: usize,
    points: Option<usize>,
}

/// Detect column indices from header names
fn detect_columns(headers: &[String]) -> Result<ColumnMapping> {
    let mut mapping = ColumnMapping::default();
    let (mut name_found, mut answers_found) = (false, false);

    for (i, header) in headers.iter().enumerate() {
        match header.to_lowercase().trim() {
            "id" => mapping.id = Some(i),
            "name" | "event" | "question" => {
                mapping.name = i;
                name_found = true;
            }
            "description" => mapping.description = Some(i),
            "organization" | "organisation" => mapping.organization = Some(i),
            "acceptable_answers" | "acceptable answers" | "answers" | "answer" => {
                mapping.answers = i;
                answers_found = true;
            }
            "points" | "points_value" => mapping.points = Some(i),
            _ => {}
        }
    }

    if !name_found {
        return Err(MatchError::MissingColumn("name"));
    }
    if !answers_found {
        return Err(MatchError::MissingColumn("acceptable_answers"));
    }
    Ok(mapping)
}

/// Split an answers cell into individual answers.
fn parse_answers(cell: &str) -> Result<Vec<String>> {
    let cell = cell.trim();
    let answers: Vec<String> = if cell.starts_with('[') {
        serde_json::from_str(cell)?
    } else {
        cell.split('|').map(str::to_string).collect()
    };

    Ok(answers
        .into_iter()
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
        .collect())
}

/// Build a question from one row of cells; `None` for rows to skip.
fn build_question(
    mapping: &ColumnMapping,
    cells: &[String],
    row_number: usize,
) -> Result<Option<Question>> {
    let cell = |idx: usize| cells.get(idx).map(|s| s.trim()).unwrap_or("");
    let optional = |idx: Option<usize>| idx.map(cell).unwrap_or("");

    let name = cell(mapping.name);
    let acceptable_answers = parse_answers(cell(mapping.answers))?;
    if name.is_empty() || acceptable_answers.is_empty() {
        warn!("Skipping row {}: missing name or acceptable answers", row_number);
        return Ok(None);
    }

    // Fallback ids are row ordinals and may collide with explicit ids in the same file.
    let id = match mapping.id.map(cell) {
        None => row_number as u64,
        Some(raw) => match raw.parse::<f64>() {
            Ok(v) if v >= 0.0 && v.fract() == 0.0 => v as u64,
            _ => {
                warn!("Row {}: invalid id {:?}, using row number", row_number, raw);
                row_number as u64
            }
        },
    };
    let points_value = match optional(mapping.points) {
        "" => DEFAULT_POINTS,
        raw => raw.parse::<f64>().ok().map(|v| v as i64).unwrap_or(DEFAULT_POINTS),
    };

    Ok(Some(Question {
        id,
        name: name.to_string(),
        description: optional(mapping.description).to_string(),
        organization: optional(mapping.organization).to_string(),
        acceptable_answers,
        points_value,
    }))
}

/// Parse questions from CSV data with a header row.
pub fn parse_csv<R: Read>(input: R) -> Result<Vec<Question>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);

    let headers: Vec<String> = reader.headers()?.iter().map(|s| s.to_string()).collect();
    let mapping = detect_columns(&headers)?;

    let mut questions = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let record = result?;
        let cells: Vec<String> = record.iter().map(|s| s.to_string()).collect();
        if let Some(question) = build_question(&mapping, &cells, i + 1)? {
            questions.push(question);
        }
    }

    Ok(questions)
}

/// Parse questions from the first worksheet of an Excel workbook (`.xlsx` or legacy `.xls`).
pub fn parse_excel(file_path: &Path) -> Result<Vec<Question>> {
    let mut workbook = open_workbook_auto(file_path)?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(MatchError::EmptySheet)?;
    let range = workbook.worksheet_range(&sheet_name)?;

    parse_range(&range)
}

/// Parse questions from worksheet cells with a header row.
pub fn parse_range(range: &Range<Data>) -> Result<Vec<Question>> {
    let mut rows = range.rows();
    let header_row = rows.next().ok_or(MatchError::EmptySheet)?;
    let headers: Vec<String> = header_row.iter().map(get_cell_string).collect();
    let mapping = detect_columns(&headers)?;

    let mut questions = Vec::new();
    for (i, row) in rows.enumerate() {
        let cells: Vec<String> = row.iter().map(get_cell_string).collect();
        if let Some(question) = build_question(&mapping, &cells, i + 1)? {
            questions.push(question);
        }
    }

    Ok(questions)
}

/// Helper to extract string from Excel cell
fn get_cell_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(_) => String::new(),
        Data::Empty => String::new(),
    }
}

// ============= Python Bindings =============

#[cfg(feature = "python")]
#[pyfunction]
#[pyo3(name = "load_questions")]
pub fn py_load_questions(file_path: &str) -> PyResult<Vec<Question>> {
    Ok(load_questions(file_path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_with_json_answers() {
        let data = "\
id,name,description,acceptable_answers,points
10,Bulls Game,Team night,\"[\"\"Bulls\"\", \"\"Chicago Bulls\"\"]\",150
11,Spark Festival,,Spark | Spark Fest,
";
        let questions = parse_csv(data.as_bytes()).unwrap();
        assert_eq!(questions.len(), 2);

        assert_eq!(questions[0].id, 10);
        assert_eq!(questions[0].acceptable_answers, ["Bulls", "Chicago Bulls"]);
        assert_eq!(questions[0].points_value, 150);
        assert_eq!(questions[0].description, "Team night");

        assert_eq!(questions[1].acceptable_answers, ["Spark", "Spark Fest"]);
        assert_eq!(questions[1].points_value, DEFAULT_POINTS);
    }

    #[test]
    fn test_header_aliases_and_row_ids() {
        let data = "Event,Answers\nHomecoming,Homecoming\nDance Marathon,Dance Marathon|DM\n";
        let questions = parse_csv(data.as_bytes()).unwrap();
        assert_eq!(questions[0].id, 1);
        assert_eq!(questions[1].id, 2);
        assert_eq!(questions[1].acceptable_answers, ["Dance Marathon", "DM"]);
    }

    #[test]
    fn test_rows_without_answers_skipped() {
        let data = "name,answers\nEmpty Row,\n,Orphan\nKept,Kept\n";
        let questions = parse_csv(data.as_bytes()).unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].name, "Kept");
        assert_eq!(questions[0].id, 3);
    }

    #[test]
    fn test_short_rows_are_tolerated() {
        let data = "name,answers,points\nSpark,Spark\n";
        let questions = parse_csv(data.as_bytes()).unwrap();
        assert_eq!(questions[0].points_value, DEFAULT_POINTS);
    }

    #[test]
    fn test_missing_required_columns() {
        assert!(matches!(
            parse_csv("title,answers\nx,y\n".as_bytes()),
            Err(MatchError::MissingColumn("name"))
        ));
        assert!(matches!(
            parse_csv("name,points\nx,1\n".as_bytes()),
            Err(MatchError::MissingColumn("acceptable_answers"))
        ));
    }

    #[test]
    fn test_bad_json_answers() {
        let data = "name,answers\nBulls,\"[\"\"Bulls\"\"\"\n";
        assert!(matches!(parse_csv(data.as_bytes()), Err(MatchError::Json(_))));
    }

    #[test]
    fn test_invalid_id_falls_back_to_row_number() {
        let data = "id,name,answers\n5,Spark,Spark\nabc,Homecoming,Homecoming\n,Bulls,Bulls\n";
        let ids: Vec<u64> = parse_csv(data.as_bytes())
            .unwrap()
            .iter()
            .map(|q| q.id)
            .collect();
        assert_eq!(ids, [5, 2, 3]);
    }

    #[test]
    fn test_fallback_id_collision_is_reported_by_bank() {
        use crate::config::MatchConfig;
        use crate::questions::QuestionBank;

        let data = "id,name,answers\n2,Spark,Spark\nn/a,Homecoming,Homecoming\n";
        let questions = parse_csv(data.as_bytes()).unwrap();
        assert!(matches!(
            QuestionBank::new(questions, MatchConfig::default()),
            Err(MatchError::DuplicateQuestion(2))
        ));
    }

    fn sheet(rows: &[&[Data]]) -> Range<Data> {
        let width = rows.iter().map(|r| r.len()).max().unwrap_or(1) as u32;
        let mut range = Range::new((0, 0), (rows.len() as u32 - 1, width - 1));
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                range.set_value((r as u32, c as u32), value.clone());
            }
        }
        range
    }

    fn text(s: &str) -> Data {
        Data::String(s.to_string())
    }

    #[test]
    fn test_worksheet_with_numeric_cells() {
        let range = sheet(&[
            &[text("ID"), text(" Event "), text("Acceptable Answers"), text("Points")],
            &[
                Data::Float(10.0),
                text("Bulls Game"),
                text(r#"["Bulls", "Chicago Bulls"]"#),
                Data::Float(150.0),
            ],
            &[Data::Int(11), text("Spark Festival"), text("Spark|Spark Fest"), Data::Empty],
            &[Data::Empty, text("No Answers"), Data::Empty, Data::Empty],
        ]);

        let questions = parse_range(&range).unwrap();
        assert_eq!(questions.len(), 2);

        assert_eq!(questions[0].id, 10);
        assert_eq!(questions[0].name, "Bulls Game");
        assert_eq!(questions[0].acceptable_answers, ["Bulls", "Chicago Bulls"]);
        assert_eq!(questions[0].points_value, 150);

        assert_eq!(questions[1].id, 11);
        assert_eq!(questions[1].acceptable_answers, ["Spark", "Spark Fest"]);
        assert_eq!(questions[1].points_value, DEFAULT_POINTS);
    }

    #[test]
    fn test_fractional_float_id_falls_back() {
        let range = sheet(&[
            &[text("id"), text("name"), text("answers")],
            &[Data::Float(2.5), text("Homecoming"), text("Homecoming")],
        ]);
        assert_eq!(parse_range(&range).unwrap()[0].id, 1);
    }

    #[test]
    fn test_empty_worksheet() {
        let range: Range<Data> = Range::empty();
        assert!(matches!(parse_range(&range), Err(MatchError::EmptySheet)));
    }

    #[test]
    fn test_worksheet_missing_answers_column() {
        let range = sheet(&[&[text("name"), text("points")], &[text("Spark"), Data::Int(5)]]);
        assert!(matches!(
            parse_range(&range),
            Err(MatchError::MissingColumn("acceptable_answers"))
        ));
    }

    #[test]
    fn test_legacy_xls_goes_through_calamine() {
        let path = std::env::temp_dir().join(format!("trivia_match_{}.xls", std::process::id()));
        std::fs::write(&path, b"not a workbook").unwrap();

        let result = load_questions(&path);
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(MatchError::Excel(calamine::Error::Xls(_)))));
    }

    #[test]
    fn test_unsupported_extension() {
        assert!(matches!(
            load_questions("questions.txt"),
            Err(MatchError::UnsupportedFormat(ext)) if ext == "txt"
        ));
    }
}
