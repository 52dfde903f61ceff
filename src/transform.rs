//! Runs the downstream SQL transformation tool (`dbt run`, `dbt test`).

use tokio::process::Command;
use tracing::{error, info};

use crate::config::TransformConfig;
use crate::error::TransformError;

/// Runs every configured step in order; stops at the first failure.
pub async fn run_transform(cfg: &TransformConfig) -> Result<(), TransformError> {
    if cfg.steps.is_empty() {
        return Err(TransformError::NoSteps);
    }

    for step in &cfg.steps {
        run_step(cfg, step).await?;
    }
    info!(program = %cfg.program, steps = cfg.steps.len(), "Transformation finished");
    Ok(())
}

async fn run_step(cfg: &TransformConfig, step: &str) -> Result<(), TransformError> {
    let mut cmd = Command::new(&cfg.program);
    cmd.args(step.split_whitespace());
    if let Some(dir) = cfg.project_dir.as_ref() {
        cmd.current_dir(dir);
    }

    info!(program = %cfg.program, step, "Running transform step");
    let status = cmd.status().await.map_err(|source| TransformError::Spawn {
        program: cfg.program.clone(),
        step: step.to_string(),
        source,
    })?;

    if !status.success() {
        error!(program = %cfg.program, step, %status, "Transform step failed");
        return Err(TransformError::StepFailed {
            program: cfg.program.clone(),
            step: step.to_string(),
            status,
        });
    }
    info!(program = %cfg.program, step, "Transform step completed");
    Ok(())
}
