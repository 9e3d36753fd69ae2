// src/models/job.rs

//! Job listing data structures.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Source-assigned job identifier.
///
/// The API sends integers, but snapshots written by other tools may carry
/// strings, so both forms are accepted. `1` and `"1"` are distinct ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JobId {
    Number(i64),
    Text(String),
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobId::Number(n) => write!(f, "{n}"),
            JobId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for JobId {
    fn from(n: i64) -> Self {
        JobId::Number(n)
    }
}

impl From<i32> for JobId {
    fn from(n: i32) -> Self {
        JobId::Number(n.into())
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        JobId::Text(s.to_string())
    }
}

/// A job listing reduced to the fields the watcher tracks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Job {
    /// Identifier, unique within one board
    pub id: JobId,

    /// Job title
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,

    /// Link to the posting
    #[serde(default, deserialize_with = "null_as_empty")]
    pub url: String,

    /// Company display name
    #[serde(default, deserialize_with = "null_as_empty")]
    pub company: String,
}

/// Older snapshots carry `null` or omit fields the API left unset.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Job {
    pub fn new(
        id: impl Into<JobId>,
        title: impl Into<String>,
        url: impl Into<String>,
        company: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            url: url.into(),
            company: company.into(),
        }
    }

    /// Whether both jobs refer to the same listing. Only the id is compared.
    pub fn same_listing(&self, other: &Job) -> bool {
        self.id == other.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_numeric_and_text_ids() {
        let jobs: Vec<Job> = serde_json::from_str(
            r#"[{"id":1,"title":"a","url":"u","company":"c"},
                {"id":"x-2","title":"b","url":"v","company":"d"}]"#,
        )
        .unwrap();
        assert_eq!(jobs[0].id, JobId::Number(1));
        assert_eq!(jobs[1].id, JobId::Text("x-2".into()));
    }

    #[test]
    fn test_null_and_missing_text_fields_become_empty() {
        let jobs: Vec<Job> = serde_json::from_str(
            r#"[{"id":1,"title":null,"url":"u","company":"Acme"},
                {"id":2,"title":"Dev","company":"Acme"}]"#,
        )
        .unwrap();
        assert_eq!(jobs[0], Job::new(1, "", "u", "Acme"));
        assert_eq!(jobs[1], Job::new(2, "Dev", "", "Acme"));
    }

    #[test]
    fn test_id_is_still_required() {
        let result: serde_json::Result<Job> =
            serde_json::from_str(r#"{"title":"Dev","url":"u","company":"Acme"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_number_and_string_ids_differ() {
        assert_ne!(JobId::from(1), JobId::from("1"));
        assert_eq!(JobId::from(1).to_string(), JobId::from("1").to_string());
    }

    #[test]
    fn test_same_listing_ignores_other_fields() {
        let a = Job::new(7, "Engineer", "https://a", "Acme");
        let b = Job::new(7, "Senior Engineer", "https://b", "Acme Inc");
        assert!(a.same_listing(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn test_serialized_shape() {
        let job = Job::new(3, "Dev", "https://x/3", "Co");
        let json = serde_json::to_string(&job).unwrap();
        assert_eq!(
            json,
            r#"{"id":3,"title":"Dev","url":"https://x/3","company":"Co"}"#
        );
    }
}
