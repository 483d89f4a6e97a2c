use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::errors::WardenError;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Statement {
    #[serde(default)]
    pub sid: Option<String>,
    pub effect: Effect,
    #[serde(default)]
    pub subjects: Vec<String>,
    #[serde(default)]
    pub actions: Vec<String>,
    #[serde(default)]
    pub resources: Vec<String>,
}

impl Statement {
    pub fn get_start_delimiter(&self) -> char {
        '<'
    }

    pub fn get_end_delimiter(&self) -> char {
        '>'
    }

    pub(crate) fn name(&self) -> String {
        self.sid.clone().unwrap_or_else(|| format!("{:?}", self))
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Effect {
    Allow,
    Deny,
}

#[derive(Debug, Default, Deserialize)]
struct PolicyFile {
    #[serde(default)]
    statements: Vec<Statement>,
}

/// Reads statements from a `.toml` file (`[[statements]]` tables) or a JSON
/// document of the shape `{"statements": [...]}`.
pub fn load(path: &Path) -> Result<Vec<Statement>, WardenError> {
    let content = fs::read_to_string(path).map_err(|source| WardenError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parse_err = |reason: String| WardenError::Parse {
        path: path.to_path_buf(),
        reason,
    };
    let file: PolicyFile = match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => {
            toml::from_str(&content).map_err(|err| parse_err(err.to_string()))?
        }
        _ => serde_json::from_str(&content)
            .map_err(|err| parse_err(err.to_string()))?,
    };
    Ok(file.statements)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn load_toml() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[[statements]]
sid = "readers"
effect = "allow"
subjects = ["alice", "<bob|carol>"]
actions = ["read"]
resources = ['doc<\d+>']
"#
        )
        .unwrap();

        let statements = load(file.path()).unwrap();
        assert_eq!(statements.len(), 1);
        assert_eq!(statements[0].effect, Effect::Allow);
        assert_eq!(statements[0].sid.as_deref(), Some("readers"));
        assert_eq!(statements[0].resources, vec![r"doc<\d+>".to_owned()]);
    }

    #[test]
    fn load_json() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{"statements": [{{"effect": "deny", "subjects": ["mallory"]}}]}}"#
        )
        .unwrap();

        let statements = load(file.path()).unwrap();
        assert_eq!(statements[0].effect, Effect::Deny);
        assert!(statements[0].actions.is_empty());
    }

    #[test]
    fn load_reports_bad_files() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(load(file.path()), Err(WardenError::Parse { .. })));
        assert!(matches!(
            load(Path::new("/nonexistent/policies.json")),
            Err(WardenError::Read { .. })
        ));
    }
}
