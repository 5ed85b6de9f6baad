// SPDX-License-Identifier: Apache-2.0

//! User-facing success messages. The UI shows these verbatim.

pub const PARSE_OK: &str = "ファイルを解析しました。";
pub const VALIDATE_OK: &str = "検証が完了しました。";
pub const SAVE_OK: &str = "データを保存しました。";
pub const EXTRACT_OK: &str = "上位データを抽出しました。";
pub const EXTRACT_NO_CANDIDATES: &str = "抽出対象のデータがありません。";
pub const RULE_SAVE_OK: &str = "スコアリングルールを保存しました。";
pub const CONFIG_UPDATE_OK: &str = "設定を更新しました。";
pub const LOG_WRITE_OK: &str = "ログを書き込みました。";
pub const LOGIN_OK: &str = "ログインしました。";
