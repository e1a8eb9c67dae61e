//! Cassette data structures for recording and replaying interactions.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single recorded interaction with an external port.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Interaction {
    /// Sequence number (assigned automatically by the recorder).
    pub seq: u64,
    /// Port name (e.g. "executive", "web").
    pub port: String,
    /// Method name invoked on the port.
    pub method: String,
    /// Input data sent to the port.
    pub input: serde_json::Value,
    /// Output data returned from the port.
    pub output: serde_json::Value,
}

/// A cassette containing a sequence of recorded interactions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cassette {
    /// Human-readable name for this cassette.
    pub name: String,
    /// When this cassette was recorded.
    pub recorded_at: DateTime<Utc>,
    /// Source revision of the checkout the recording was made in.
    pub revision: String,
    /// Ordered list of interactions.
    pub interactions: Vec<Interaction>,
}

impl Cassette {
    /// Reads and parses a cassette file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a cassette.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read cassette file {}: {e}", path.display()))?;
        serde_yaml::from_str(&content)
            .map_err(|e| format!("Failed to parse cassette file {}: {e}", path.display()))
    }

    /// Names of the ports that appear in this cassette, sorted and deduplicated.
    #[must_use]
    pub fn ports(&self) -> Vec<&str> {
        let mut ports: Vec<&str> = self.interactions.iter().map(|i| i.port.as_str()).collect();
        ports.sort_unstable();
        ports.dedup();
        ports
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_cassette() -> Cassette {
        Cassette {
            name: "devhost-session".into(),
            recorded_at: Utc::now(),
            revision: "r108000".into(),
            interactions: vec![
                Interaction {
                    seq: 0,
                    port: "executive".into(),
                    method: "run_command".into(),
                    input: json!({"argv": ["git", "rev-parse", "HEAD"], "cwd": null}),
                    output: json!({"Ok": {"exit_code": 0, "stdout": "abc123\n", "stderr": ""}}),
                },
                Interaction {
                    seq: 1,
                    port: "web".into(),
                    method: "get_text".into(),
                    input: json!({"url": "https://build.webkit.org/json/builders"}),
                    output: json!({"Err": "connection refused"}),
                },
            ],
        }
    }

    #[test]
    fn yaml_keeps_result_convention_readable() {
        let cassette = sample_cassette();
        let yaml = serde_yaml::to_string(&cassette).expect("serialize");
        assert!(yaml.contains("port: executive"));
        assert!(yaml.contains("Err: connection refused"));
        let deserialized: Cassette = serde_yaml::from_str(&yaml).expect("deserialize");
        assert_eq!(cassette, deserialized);
    }

    #[test]
    fn ports_are_sorted_and_unique() {
        let mut cassette = sample_cassette();
        cassette.interactions.push(cassette.interactions[0].clone());
        assert_eq!(cassette.ports(), vec!["executive", "web"]);
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Cassette::load(Path::new("/no/such/cassette.yaml")).unwrap_err();
        assert!(err.contains("Failed to read cassette file"));
    }
}
