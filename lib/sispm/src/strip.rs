use std::sync::Arc;

use exec::{Invocation, Runner};
use log::{debug, info};

use crate::{Error, OutletState, Result};

/// A multi-socket USB power strip driven through the `sispmctl` CLI.
#[derive(Clone)]
pub struct PowerStrip {
    tool: String,
    slots: u8,
    runner: Arc<dyn Runner>,
}

impl PowerStrip {
    pub fn new(tool: impl Into<String>, slots: u8, runner: Arc<dyn Runner>) -> Self {
        Self {
            tool: tool.into(),
            slots,
            runner,
        }
    }

    pub fn slots(&self) -> u8 {
        self.slots
    }

    fn check_slot(&self, slot: u8) -> Result<()> {
        if slot == 0 || slot > self.slots {
            Err(Error::InvalidSlot {
                slot,
                slots: self.slots,
            })
        } else {
            Ok(())
        }
    }

    pub fn switch_invocation(&self, slot: u8, state: OutletState) -> Invocation {
        Invocation::new(&self.tool)
            .arg(state.flag())
            .arg(slot.to_string())
    }

    pub fn status_invocation(&self, slot: u8) -> Invocation {
        Invocation::new(&self.tool).arg("-g").arg(slot.to_string())
    }

    /// Succeeds when the tool exits with zero. The strip itself gives no
    /// confirmation, use [`PowerStrip::status`] to read the state back.
    pub async fn switch(&self, slot: u8, state: OutletState) -> Result<()> {
        self.check_slot(slot)?;

        let invocation = self.switch_invocation(slot, state);
        self.runner.run(&invocation).await?.check(&invocation)?;

        info!("outlet {slot} switched {state}");

        Ok(())
    }

    pub async fn status(&self, slot: u8) -> Result<OutletState> {
        self.check_slot(slot)?;

        let invocation = self.status_invocation(slot);
        let output = self.runner.run(&invocation).await?.check(&invocation)?;

        let state = parse_status(&output.stdout, slot)?;
        debug!("outlet {slot} reports {state}");

        Ok(state)
    }
}

/// Parses `Status of outlet 3:\ton` out of `sispmctl -g 3` output.
fn parse_status(stdout: &str, slot: u8) -> Result<OutletState> {
    let prefix = format!("Status of outlet {slot}:");

    stdout
        .lines()
        .find_map(|line| line.trim().strip_prefix(&prefix))
        .and_then(|value| value.trim().parse().ok())
        .ok_or_else(|| Error::UnexpectedOutput(stdout.trim().to_string()))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    use async_trait::async_trait;
    use exec::Output;
    use tokio::sync::Mutex;

    #[derive(Default)]
    pub struct RecordingRunner {
        pub calls: Mutex<Vec<Invocation>>,
        pub code: i32,
        pub stdout: String,
    }

    #[async_trait]
    impl Runner for RecordingRunner {
        async fn run(&self, invocation: &Invocation) -> exec::Result<Output> {
            self.calls.lock().await.push(invocation.clone());

            Ok(Output {
                code: Some(self.code),
                stdout: self.stdout.clone(),
                stderr: String::new(),
            })
        }
    }

    #[tokio::test]
    async fn test_switch_on_slot_three() {
        let runner = Arc::new(RecordingRunner::default());
        let strip = PowerStrip::new("sispmctl", 4, runner.clone());

        strip.switch(3, OutletState::On).await.unwrap();

        let calls = runner.calls.lock().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program, "sispmctl");
        assert!(calls[0].args.contains(&"-o".to_string()));
        assert!(calls[0].args.contains(&"3".to_string()));
    }

    #[tokio::test]
    async fn test_switch_off_uses_configured_tool() {
        let runner = Arc::new(RecordingRunner::default());
        let strip = PowerStrip::new("syspmctl", 6, runner.clone());

        strip.switch(6, OutletState::Off).await.unwrap();

        let calls = runner.calls.lock().await;
        assert_eq!(calls[0].to_string(), "syspmctl -f 6");
    }

    #[tokio::test]
    async fn test_switch_failure() {
        let runner = Arc::new(RecordingRunner {
            code: 1,
            ..Default::default()
        });
        let strip = PowerStrip::new("sispmctl", 4, runner);

        assert!(matches!(
            strip.switch(1, OutletState::On).await,
            Err(Error::Exec(exec::Error::Failed { code: Some(1), .. }))
        ));
    }

    #[tokio::test]
    async fn test_invalid_slot_never_runs() {
        let runner = Arc::new(RecordingRunner::default());
        let strip = PowerStrip::new("sispmctl", 4, runner.clone());

        assert!(matches!(
            strip.switch(0, OutletState::On).await,
            Err(Error::InvalidSlot { slot: 0, slots: 4 })
        ));
        assert!(matches!(
            strip.switch(5, OutletState::On).await,
            Err(Error::InvalidSlot { slot: 5, slots: 4 })
        ));
        assert!(runner.calls.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_status() {
        let runner = Arc::new(RecordingRunner {
            stdout: "Accessing Gembird #0 USB device 002\nStatus of outlet 2:\ton\n".to_string(),
            ..Default::default()
        });
        let strip = PowerStrip::new("sispmctl", 4, runner.clone());

        assert_eq!(strip.status(2).await.unwrap(), OutletState::On);
        assert_eq!(runner.calls.lock().await[0].to_string(), "sispmctl -g 2");
    }

    #[test]
    fn test_parse_status() {
        assert_eq!(
            parse_status("Status of outlet 4:\toff\n", 4).unwrap(),
            OutletState::Off
        );
        assert!(parse_status("Status of outlet 1:\ton\n", 4).is_err());
        assert!(parse_status("No GEMBIRD SiS-PM found", 1).is_err());
    }
}
