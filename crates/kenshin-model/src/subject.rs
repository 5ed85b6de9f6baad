// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub const SUBJECT_ID_MIN_LEN: usize = 4;
pub const SUBJECT_ID_MAX_LEN: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SubjectIdError {
    BadLength(usize),
    NonDigit,
}

impl Display for SubjectIdError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadLength(len) => write!(
                f,
                "subject id must be {SUBJECT_ID_MIN_LEN}-{SUBJECT_ID_MAX_LEN} digits, got {len} characters"
            ),
            Self::NonDigit => f.write_str("subject id must contain only ASCII digits"),
        }
    }
}

impl std::error::Error for SubjectIdError {}

/// Checkup subject identifier: 4 to 10 ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct SubjectId(String);

impl SubjectId {
    pub fn parse(input: &str) -> Result<Self, SubjectIdError> {
        let len = input.chars().count();
        if !(SUBJECT_ID_MIN_LEN..=SUBJECT_ID_MAX_LEN).contains(&len) {
            return Err(SubjectIdError::BadLength(len));
        }
        if !input.bytes().all(|b| b.is_ascii_digit()) {
            return Err(SubjectIdError::NonDigit);
        }
        Ok(Self(input.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for SubjectId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
