use kenshin_model::{
    columns, RawRecord, SubjectId, ValidationError, ValidationOutcome, ValidationReason,
};

/// Inclusive plausibility range per numeric column, in validation order.
pub const FIELD_RANGES: [(&str, f64, f64); 10] = [
    (columns::BMI, 10.0, 50.0),
    (columns::S_BP, 60.0, 200.0),
    (columns::D_BP, 40.0, 130.0),
    (columns::BS, 50.0, 200.0),
    (columns::HBA1C, 4.0, 10.0),
    (columns::LDL, 30.0, 300.0),
    (columns::TG, 30.0, 1000.0),
    (columns::AST, 10.0, 200.0),
    (columns::ALT, 10.0, 200.0),
    (columns::GTP, 10.0, 500.0),
];

/// Validate a parsed batch. Side-effect free and exhaustive: every field of
/// every row is checked, so a single row can produce several findings.
/// Error order is row order, then numeric field order, then the id check.
#[must_use]
pub fn validate_records(records: &[RawRecord]) -> ValidationOutcome {
    let mut errors = Vec::new();
    for (i, record) in records.iter().enumerate() {
        let row = i + 1;
        for ((column, raw), (_, min, max)) in record.numeric_fields().iter().zip(FIELD_RANGES) {
            let (column, raw) = (*column, *raw);
            match raw.trim().parse::<f64>() {
                Ok(value) if value.is_finite() => {
                    if value < min || value > max {
                        errors.push(ValidationError::new(
                            row,
                            column,
                            raw,
                            ValidationReason::OutOfRange,
                        ));
                    }
                }
                _ => errors.push(ValidationError::new(
                    row,
                    column,
                    raw,
                    ValidationReason::NotANumber,
                )),
            }
        }
        if SubjectId::parse(&record.subject_id).is_err() {
            errors.push(ValidationError::new(
                row,
                columns::ID,
                &record.subject_id,
                ValidationReason::BadIdFormat,
            ));
        }
    }
    ValidationOutcome::new(errors, records.len())
}
