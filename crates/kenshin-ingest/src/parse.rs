use crate::IngestError;
use csv::ReaderBuilder;
use kenshin_model::{columns, RawRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A data row whose field count does not match the header. The row is
/// reported and excluded, never repaired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParseIssue {
    pub row: usize,
    pub expected: usize,
    pub found: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParseOutcome {
    pub records: Vec<RawRecord>,
    pub issues: Vec<ParseIssue>,
}

/// Parse uploaded CSV text into raw records.
///
/// The header row must contain every required column by exact, case-sensitive
/// name; extra columns are ignored. Rows keep input order.
pub fn parse_csv(text: &str) -> Result<ParseOutcome, IngestError> {
    if text.trim().is_empty() {
        return Err(IngestError::NoData);
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| IngestError::Csv(e.to_string()))?
        .clone();
    let header_len = headers.len();

    let mut index: BTreeMap<&str, usize> = BTreeMap::new();
    for (pos, name) in headers.iter().enumerate() {
        index.entry(name).or_insert(pos);
    }
    let missing: Vec<String> = columns::REQUIRED
        .iter()
        .filter(|name| !index.contains_key(**name))
        .map(|name| (*name).to_string())
        .collect();
    if !missing.is_empty() {
        return Err(IngestError::HeaderMismatch { missing });
    }

    let field = |record: &csv::StringRecord, name: &str| -> String {
        record.get(index[name]).unwrap_or_default().to_string()
    };

    let mut outcome = ParseOutcome::default();
    for (i, row) in reader.records().enumerate() {
        let row_number = i + 1;
        let record = row.map_err(|e| IngestError::Csv(e.to_string()))?;
        if record.len() != header_len {
            outcome.issues.push(ParseIssue {
                row: row_number,
                expected: header_len,
                found: record.len(),
            });
            continue;
        }
        outcome.records.push(RawRecord {
            subject_id: field(&record, columns::ID),
            bmi: field(&record, columns::BMI),
            s_bp: field(&record, columns::S_BP),
            d_bp: field(&record, columns::D_BP),
            bs: field(&record, columns::BS),
            hba1c: field(&record, columns::HBA1C),
            ldl: field(&record, columns::LDL),
            tg: field(&record, columns::TG),
            ast: field(&record, columns::AST),
            alt: field(&record, columns::ALT),
            gtp: field(&record, columns::GTP),
        });
    }

    if outcome.records.is_empty() && outcome.issues.is_empty() {
        return Err(IngestError::NoData);
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "ID,BMI,sBP,dBP,BS,HbA1c,LDL,TG,AST,ALT,GTP";

    #[test]
    fn parses_every_well_formed_row() {
        let text = format!(
            "{HEADER}\n1234,22,120,80,90,5.5,100,150,20,20,30\n5678,25,130,85,95,6.0,120,180,25,30,40\n"
        );
        let outcome = parse_csv(&text).expect("parse");
        assert_eq!(outcome.records.len(), 2);
        assert!(outcome.issues.is_empty());
        assert_eq!(outcome.records[0].subject_id, "1234");
        assert_eq!(outcome.records[0].hba1c, "5.5");
        assert_eq!(outcome.records[1].gtp, "40");
    }

    #[test]
    fn empty_input_is_no_data() {
        assert_eq!(parse_csv(""), Err(IngestError::NoData));
        assert_eq!(parse_csv("   \n  "), Err(IngestError::NoData));
    }

    #[test]
    fn header_only_input_is_no_data() {
        assert_eq!(parse_csv(HEADER), Err(IngestError::NoData));
    }

    #[test]
    fn missing_required_column_fails_before_row_processing() {
        let text = "ID,BMI,sBP,dBP,BS,HbA1c,LDL,TG,AST,ALT\n1234,22,120,80,90,5.5,100,150,20,20\n";
        assert_eq!(
            parse_csv(text),
            Err(IngestError::HeaderMismatch {
                missing: vec!["GTP".to_string()]
            })
        );
    }

    #[test]
    fn header_matching_is_case_sensitive() {
        let text = "id,BMI,sBP,dBP,BS,HbA1c,LDL,TG,AST,ALT,GTP\n";
        let err = parse_csv(text).expect_err("lowercase id must not match");
        assert_eq!(
            err,
            IngestError::HeaderMismatch {
                missing: vec!["ID".to_string()]
            }
        );
    }

    #[test]
    fn short_row_is_reported_and_excluded() {
        let text = format!(
            "{HEADER}\n1234,22,120,80,90,5.5,100,150,20,20,30\n5678,25,130,85,95,6.0,120,180,25,30\n"
        );
        let outcome = parse_csv(&text).expect("parse");
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(
            outcome.issues,
            vec![ParseIssue {
                row: 2,
                expected: 11,
                found: 10
            }]
        );
    }

    #[test]
    fn extra_columns_are_ignored_for_record_building() {
        let text = "Note,ID,BMI,sBP,dBP,BS,HbA1c,LDL,TG,AST,ALT,GTP\nx,1234,22,120,80,90,5.5,100,150,20,20,30\n";
        let outcome = parse_csv(text).expect("parse");
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].subject_id, "1234");
        assert_eq!(outcome.records[0].bmi, "22");
    }

    #[test]
    fn single_row_without_trailing_newline_parses() {
        let text = "ID,BMI,sBP,dBP,BS,HbA1c,LDL,TG,AST,ALT,GTP\n1234,22,120,80,90,5.5,100,150,20,20,30";
        let outcome = parse_csv(text).expect("parse");
        assert_eq!(outcome.records.len(), 1);
        assert!(outcome.issues.is_empty());
    }
}
