// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ApiErrorCode {
    EmptyInput,
    InvalidRequestBody,
    MissingField,
    HeaderMismatch,
    RowStructure,
    ParseFailed,
    InvalidPercentage,
    Unauthenticated,
    MissingConfiguration,
    StoreFailure,
    Internal,
}

impl ApiErrorCode {
    /// HTTP status this code maps to at the handler boundary.
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::EmptyInput
            | Self::InvalidRequestBody
            | Self::MissingField
            | Self::HeaderMismatch
            | Self::RowStructure
            | Self::InvalidPercentage => 400,
            Self::Unauthenticated => 401,
            Self::ParseFailed | Self::MissingConfiguration | Self::StoreFailure | Self::Internal => {
                500
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
    pub details: Value,
}

impl ApiError {
    #[must_use]
    pub fn new(code: ApiErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
        }
    }

    #[must_use]
    pub fn empty_input() -> Self {
        Self::new(
            ApiErrorCode::EmptyInput,
            "リクエストボディが空です。",
            json!({}),
        )
    }

    #[must_use]
    pub fn invalid_body(reason: &str) -> Self {
        Self::new(
            ApiErrorCode::InvalidRequestBody,
            "リクエストボディが不正です。",
            json!({"reason": reason}),
        )
    }

    #[must_use]
    pub fn missing_field(field: &str) -> Self {
        Self::new(
            ApiErrorCode::MissingField,
            format!("必須項目がありません: {field}"),
            json!({"field": field}),
        )
    }

    #[must_use]
    pub fn invalid_percentage(raw: Value) -> Self {
        Self::new(
            ApiErrorCode::InvalidPercentage,
            "抽出割合が不正です。",
            json!({"percentage": raw}),
        )
    }

    #[must_use]
    pub fn header_mismatch(missing: &[String]) -> Self {
        Self::new(
            ApiErrorCode::HeaderMismatch,
            "ヘッダー行に必須列がありません。",
            json!({"missing": missing}),
        )
    }

    #[must_use]
    pub fn row_structure(issues: Value) -> Self {
        Self::new(
            ApiErrorCode::RowStructure,
            "列数が一致しない行があります。",
            json!({"errors": issues}),
        )
    }

    #[must_use]
    pub fn unauthenticated() -> Self {
        Self::new(
            ApiErrorCode::Unauthenticated,
            "認証されていません。",
            json!({}),
        )
    }

    #[must_use]
    pub fn missing_configuration(reason: &str) -> Self {
        Self::new(
            ApiErrorCode::MissingConfiguration,
            "スコアリングルールが設定されていません。",
            json!({"reason": reason}),
        )
    }

    #[must_use]
    pub fn store_failure() -> Self {
        Self::new(
            ApiErrorCode::StoreFailure,
            "データベース処理に失敗しました。",
            json!({}),
        )
    }

    #[must_use]
    pub fn parse_failed(reason: &str) -> Self {
        Self::new(
            ApiErrorCode::ParseFailed,
            "ファイルの解析に失敗しました。",
            json!({"reason": reason}),
        )
    }

    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    #[must_use]
    pub fn http_status(&self) -> u16 {
        self.code.http_status()
    }
}
