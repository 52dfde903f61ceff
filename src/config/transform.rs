use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Downstream SQL transformation tool, run by the `transform` subcommand.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TransformConfig {
    /// Executable to invoke. TOML: `transform.program`. Default: `dbt`.
    #[serde(default = "default_program")]
    pub program: String,

    /// Working directory for every step (the dbt project). Default: current directory.
    #[serde(default)]
    pub project_dir: Option<PathBuf>,

    /// Sub-commands run in order; the first failure stops the sequence. Each
    /// entry is split on whitespace into arguments (`"run --select staging"`).
    /// TOML: `transform.steps`. Default: `["run", "test"]`.
    #[serde(default = "default_steps")]
    pub steps: Vec<String>,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            project_dir: None,
            steps: default_steps(),
        }
    }
}

fn default_program() -> String {
    "dbt".to_string()
}

fn default_steps() -> Vec<String> {
    vec!["run".to_string(), "test".to_string()]
}
