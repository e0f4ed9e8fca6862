use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::YeouidoError;

/// One sitting legislator as recorded in the roster file. All fields other
/// than `name` default to empty; the roster site does not fill every column
/// for every member.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LegislatorRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub party: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub committees: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub election_count: String,
    #[serde(default)]
    pub election_method: String,
    #[serde(default)]
    pub photo_url: String,
    #[serde(default)]
    pub photo_filename: String,
}

/// Load the roster file (JSON array of legislator records). Records without
/// a name are dropped with a warning; they cannot key a graph node or match
/// a mention.
pub fn load_roster(path: impl AsRef<Path>) -> Result<Vec<LegislatorRecord>, YeouidoError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .map_err(|e| YeouidoError::Roster(format!("failed to read {}: {e}", path.display())))?;

    let records: Vec<LegislatorRecord> = serde_json::from_str(&raw)
        .map_err(|e| YeouidoError::Roster(format!("failed to parse {}: {e}", path.display())))?;

    let total = records.len();
    let records: Vec<LegislatorRecord> = records
        .into_iter()
        .filter(|r| !r.name.is_empty())
        .collect();

    if records.len() < total {
        warn!(
            dropped = total - records.len(),
            "Roster records without a name were ignored"
        );
    }
    info!(members = records.len(), path = %path.display(), "Roster loaded");

    Ok(records)
}

/// The name list used for mention detection.
pub fn roster_names(records: &[LegislatorRecord]) -> Vec<String> {
    records.iter().map(|r| r.name.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(tag: &str, content: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir();
        let path = dir.join(format!(
            "yeouido-roster-test-{}-{tag}.json",
            std::process::id()
        ));
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_records_and_skips_missing_names() {
        let path = write_temp(
            "ok",
            r#"[
                {"name": "이재명", "party": "더불어민주당", "region": "인천 계양구을"},
                {"party": "국민의힘"},
                {"name": "한동훈", "party": "국민의힘", "gender": "남"}
            ]"#,
        );
        let records = load_roster(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(records.len(), 2);
        assert_eq!(roster_names(&records), vec!["이재명", "한동훈"]);
        assert_eq!(records[1].gender, "남");
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = load_roster("/nonexistent/roster.json").unwrap_err();
        assert!(matches!(err, YeouidoError::Roster(_)));
    }

    #[test]
    fn malformed_json_is_an_error() {
        let path = write_temp("malformed", "{not json");
        let err = load_roster(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, YeouidoError::Roster(_)));
    }
}
