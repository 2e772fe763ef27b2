use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, trace};
use tokio::process::Command;
use tokio::time;

use crate::{Error, Invocation, Output, Result};

#[async_trait]
pub trait Runner: Send + Sync {
    async fn run(&self, invocation: &Invocation) -> Result<Output>;
}

/// Runs invocations as child processes, killing them once `timeout` passes.
pub struct ProcessRunner {
    timeout: Duration,
}

impl ProcessRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl Runner for ProcessRunner {
    async fn run(&self, invocation: &Invocation) -> Result<Output> {
        let mut command = Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        if let Some(dir) = &invocation.current_dir {
            command.current_dir(dir);
        }

        debug!("running {invocation}");

        let output = match time::timeout(self.timeout, command.output()).await {
            Ok(output) => output.map_err(|err| Error::Spawn(invocation.to_string(), err))?,
            Err(_) => return Err(Error::Timeout(invocation.to_string(), self.timeout)),
        };

        let output = Output {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        trace!("{invocation}: {output:?}");

        Ok(output)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_captures_output() {
        let runner = ProcessRunner::new(Duration::from_secs(5));
        let invocation = Invocation::new("sh").arg("-c").arg("echo out; echo err >&2; exit 3");

        let output = runner.run(&invocation).await.unwrap();
        assert_eq!(output.code, Some(3));
        assert_eq!(output.stdout, "out\n");
        assert_eq!(output.stderr, "err\n");
        assert!(!output.success());
    }

    #[tokio::test]
    async fn test_run_in_directory() {
        let runner = ProcessRunner::new(Duration::from_secs(5));
        let invocation = Invocation::new("pwd").current_dir("/");

        let output = runner.run(&invocation).await.unwrap();
        assert!(output.success());
        assert_eq!(output.stdout.trim(), "/");
    }

    #[tokio::test]
    async fn test_missing_program() {
        let runner = ProcessRunner::new(Duration::from_secs(5));
        let invocation = Invocation::new("definitely-not-an-installed-tool");

        assert!(matches!(
            runner.run(&invocation).await,
            Err(Error::Spawn(_, _))
        ));
    }

    #[tokio::test]
    async fn test_timeout() {
        let runner = ProcessRunner::new(Duration::from_millis(100));
        let invocation = Invocation::new("sleep").arg("5");

        assert!(matches!(
            runner.run(&invocation).await,
            Err(Error::Timeout(_, _))
        ));
    }
}
