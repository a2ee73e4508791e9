use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("failed to launch worker: {0}")]
    Launch(#[from] std::io::Error),
}

/// Launches exactly one asynchronous compute task per schedule request. The
/// task only receives the job id; it pulls `input/{id}.json` from the
/// artifact store on its own and reports back through the metadata store.
#[async_trait]
pub trait Dispatch: Send + Sync {
    async fn dispatch(&self, job_id: Uuid) -> Result<(), DispatchError>;
}

/// Dispatcher that spawns the optimizer worker as a local process, handing
/// it the job id through the `JOB_ID` environment variable. Stands in for a
/// remote compute cluster; the contract is identical.
pub struct ProcessDispatcher {
    command: String,
    args: Vec<String>,
    env: HashMap<String, String>,
}

impl ProcessDispatcher {
    pub fn new(command: String, args: Vec<String>, env: HashMap<String, String>) -> Self {
        ProcessDispatcher { command, args, env }
    }
}

#[async_trait]
impl Dispatch for ProcessDispatcher {
    async fn dispatch(&self, job_id: Uuid) -> Result<(), DispatchError> {
        let mut child = Command::new(&self.command)
            .args(&self.args)
            .envs(&self.env)
            .env("JOB_ID", job_id.to_string())
            .spawn()?;

        log::info!("Worker spawned for job {} (PID: {:?})", job_id, child.id());

        // Reap the worker and record how it went; its real result arrives
        // through the metadata store, not the exit code.
        tokio::spawn(async move {
            match child.wait().await {
                Ok(status) => log::info!("Worker for job {} exited: {}", job_id, status),
                Err(e) => log::error!("Worker wait error for job {}: {}", job_id, e),
            }
        });

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn launch_failure_propagates() {
        let dispatcher = ProcessDispatcher::new(
            "/nonexistent/optimizer-worker".into(),
            Vec::new(),
            HashMap::new(),
        );
        let result = dispatcher.dispatch(Uuid::new_v4()).await;
        assert!(matches!(result, Err(DispatchError::Launch(_))));
    }
}
