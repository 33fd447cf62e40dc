//! GitHub commit listing wire types.
//!
//! Every field is optional. Elements are read one at a time with
//! [`GitHubCommit::from_value`], so a missing or wrongly typed field only turns
//! that field into a placeholder when converting to [`CommitRecord`].

use super::CommitRecord;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Placeholder for any missing text field.
pub const FIELD_PLACEHOLDER: &str = "N/A";
/// Date placeholder when the source date is missing or empty.
pub const DATE_EMPTY_PLACEHOLDER: &str = "Date string is null or empty.";
/// Date placeholder when the source date matches no accepted format.
pub const DATE_PARSE_FAILURE: &str = "Failed to parse datetime.";

const OUTPUT_FORMAT: &str = "%Y-%m-%d %H:%M";
const ISO_UTC_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";
const DAY_MONTH_YEAR_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// One element of `GET /repos/{owner}/{repo}/commits`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GitHubCommit {
    #[serde(default)]
    pub sha: Option<String>,
    #[serde(default)]
    pub commit: Option<GitHubCommitDetail>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GitHubCommitDetail {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub author: Option<GitHubCommitAuthor>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GitHubCommitAuthor {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

impl GitHubCommit {
    /// Read one listing element, keeping only fields of the expected type.
    pub fn from_value(value: &Value) -> Self {
        let text = |pointer: &str| value.pointer(pointer).and_then(Value::as_str).map(String::from);

        let author = value
            .pointer("/commit/author")
            .filter(|a| a.is_object())
            .map(|_| GitHubCommitAuthor {
                name: text("/commit/author/name"),
                date: text("/commit/author/date"),
            });
        let commit = value
            .get("commit")
            .filter(|c| c.is_object())
            .map(|_| GitHubCommitDetail {
                message: text("/commit/message"),
                author,
            });

        Self {
            sha: text("/sha"),
            commit,
        }
    }

    /// Convert into a transient, unstarred record for `owner/name`.
    pub fn into_record(self, repo_owner: &str, repo_name: &str) -> CommitRecord {
        let detail = self.commit.unwrap_or_default();
        let author = detail.author.unwrap_or_default();

        CommitRecord {
            id: self.sha.unwrap_or_else(|| FIELD_PLACEHOLDER.to_string()),
            message: detail
                .message
                .unwrap_or_else(|| FIELD_PLACEHOLDER.to_string()),
            date: normalize_commit_date(author.date.as_deref()),
            author: author.name.unwrap_or_else(|| FIELD_PLACEHOLDER.to_string()),
            repo_name: repo_name.to_string(),
            repo_owner: repo_owner.to_string(),
            starred: false,
            starred_time: None,
        }
    }
}

/// Normalize a commit date to `YYYY-MM-DD HH:MM`.
///
/// Accepts `2024-04-08T06:13:59Z` (UTC) and `8/04/2024 06:13:59`. Anything
/// else yields a placeholder string instead of an error.
pub fn normalize_commit_date(raw: Option<&str>) -> String {
    let raw = match raw.map(str::trim) {
        Some(s) if !s.is_empty() => s,
        _ => return DATE_EMPTY_PLACEHOLDER.to_string(),
    };

    NaiveDateTime::parse_from_str(raw, ISO_UTC_FORMAT)
        .ok()
        .or_else(|| parse_day_month_year(raw))
        .map(|dt| dt.format(OUTPUT_FORMAT).to_string())
        .unwrap_or_else(|| DATE_PARSE_FAILURE.to_string())
}

/// `d/MM/yyyy HH:mm:ss`: day may be one digit, month is always two.
fn parse_day_month_year(raw: &str) -> Option<NaiveDateTime> {
    let month = raw.split('/').nth(1)?;
    if month.len() != 2 {
        return None;
    }
    NaiveDateTime::parse_from_str(raw, DAY_MONTH_YEAR_FORMAT).ok()
}
