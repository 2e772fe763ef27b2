use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use exec::{Invocation, ProcessRunner, Runner};
use remote::RemoteConfig;
use sispm::{OutletBoard, OutletState, PowerStrip};
use wol::MacAddr;

use crate::action::Action;
use crate::config::{Config, RemoteSettings};
use crate::devices::DeviceRegistry;
use crate::journal::Journal;
use crate::roof::Roof;
use crate::{Error, Result};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WakeMethod {
    Packet(SocketAddr),
    Tool(String),
}

/// Turns actions into their side effects. Each call leaves exactly one entry
/// in the journal, whatever the outcome.
pub struct Dispatcher {
    devices: DeviceRegistry,
    journal: Journal,
    board: OutletBoard,
    roof: Roof,
    wake: WakeMethod,
    remote: RemoteSettings,
    runner: Arc<dyn Runner>,
}

impl Dispatcher {
    pub fn new(
        devices: DeviceRegistry,
        journal: Journal,
        board: OutletBoard,
        roof: Roof,
        wake: WakeMethod,
        remote: RemoteSettings,
        runner: Arc<dyn Runner>,
    ) -> Self {
        Self {
            devices,
            journal,
            board,
            roof,
            wake,
            remote,
            runner,
        }
    }

    pub fn from_config(config: &Config, devices: DeviceRegistry, journal: Journal) -> Self {
        let runner: Arc<dyn Runner> = Arc::new(ProcessRunner::new(config.outlets.timeout));
        let roof_runner: Arc<dyn Runner> = Arc::new(ProcessRunner::new(config.roof.timeout));

        let strip = PowerStrip::new(&config.outlets.tool, config.outlets.slots, runner.clone());
        let board = OutletBoard::new(strip, &config.outlets.names);
        let roof = Roof::new(&config.roof.dir, &config.roof.script, roof_runner);

        let wake = match &config.wake.tool {
            Some(tool) => WakeMethod::Tool(tool.clone()),
            None => WakeMethod::Packet(config.wake.target),
        };

        Self::new(
            devices,
            journal,
            board,
            roof,
            wake,
            config.remote.clone(),
            runner,
        )
    }

    pub fn devices(&self) -> &DeviceRegistry {
        &self.devices
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    pub fn board(&self) -> &OutletBoard {
        &self.board
    }

    pub fn remote_config_path(&self) -> &Path {
        &self.remote.path
    }

    pub async fn execute(&self, action: &Action) -> Result<String> {
        let result = match action {
            Action::Wake(target) => self.wake(target).await,
            Action::Outlet { slot, state } => self.switch_outlet(*slot, *state).await,
            Action::OutletStatus(slot) => self.outlet_status(*slot).await,
            Action::Roof => self.move_roof().await,
            Action::Remote(name) => self.run_remote(name).await,
        };

        match &result {
            Ok(message) => self.journal.info(message.as_str()),
            Err(err) => self.journal.error(format!("{action} failed: {err}")),
        }

        result
    }

    async fn wake(&self, target: &str) -> Result<String> {
        let (label, mac) = match self.devices.find(target) {
            Some(device) => (format!("{} ({})", device.name, device.mac), device.mac),
            None if looks_like_mac(target) => {
                let mac: MacAddr = target.parse()?;
                (mac.to_string(), mac)
            }
            None => return Err(Error::UnknownDevice(target.to_string())),
        };

        match &self.wake {
            WakeMethod::Packet(addr) => wol::wake(&mac, *addr).await?,
            WakeMethod::Tool(tool) => {
                let invocation = Invocation::new(tool).arg(mac.to_string());
                self.runner.run(&invocation).await?.check(&invocation)?;
            }
        }

        Ok(format!("Wake-on-LAN sent to {label}"))
    }

    async fn outlet_label(&self, slot: u8) -> String {
        match self.board.name(slot).await {
            Some(name) => format!("outlet {slot} ({name})"),
            None => format!("outlet {slot}"),
        }
    }

    async fn switch_outlet(&self, slot: u8, state: OutletState) -> Result<String> {
        self.board.switch(slot, state).await?;

        Ok(format!("{} switched {state}", self.outlet_label(slot).await))
    }

    async fn outlet_status(&self, slot: u8) -> Result<String> {
        let state = self.board.refresh(slot).await?;

        Ok(format!("{} is {state}", self.outlet_label(slot).await))
    }

    async fn move_roof(&self) -> Result<String> {
        let output = self.roof.run().await?;

        let stdout = output.stdout.trim();
        if stdout.is_empty() {
            Ok("roof script finished".to_string())
        } else {
            Ok(format!("roof script finished: {stdout}"))
        }
    }

    async fn run_remote(&self, name: &str) -> Result<String> {
        let config = RemoteConfig::load(&self.remote.path)?;
        let command = config.command(name)?;
        let connection =
            config.connection(self.remote.connect_timeout, self.remote.command_timeout)?;

        let output = connection.execute(command).await?;

        let output = output.output.trim();
        if output.is_empty() {
            Ok(format!("remote command {name} finished"))
        } else {
            Ok(format!("remote command {name} finished: {output}"))
        }
    }
}

/// Separated hex, or at least 12 bare hex digits. Shorter bare input such
/// as `C15` is taken for a device name.
fn looks_like_mac(target: &str) -> bool {
    let target = target.trim();
    let separated = target.contains([':', '-']);

    target
        .chars()
        .all(|c| c.is_ascii_hexdigit() || c == ':' || c == '-')
        && (separated || target.len() >= 12)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::time::Duration;

    use super::*;

    use async_trait::async_trait;
    use exec::Output;
    use tokio::net::UdpSocket;
    use tokio::sync::Mutex;
    use tokio::time::timeout;

    #[derive(Default)]
    struct FakeRunner {
        calls: Mutex<Vec<Invocation>>,
        code: i32,
    }

    #[async_trait]
    impl Runner for FakeRunner {
        async fn run(&self, invocation: &Invocation) -> exec::Result<Output> {
            self.calls.lock().await.push(invocation.clone());
            Ok(Output {
                code: Some(self.code),
                ..Default::default()
            })
        }
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("{name}-{}", uuid::Uuid::new_v4()))
    }

    fn dispatcher(wake: WakeMethod, runner: Arc<FakeRunner>, remote: PathBuf) -> Dispatcher {
        let names = vec!["none(1)".to_string(), "AZ2000(2)".to_string(), "C14(3)".to_string()];
        let board = OutletBoard::new(PowerStrip::new("sispmctl", 4, runner.clone()), &names);
        let roof = Roof::new("/opt/roof", "./strecha_on.sh", runner.clone());

        Dispatcher::new(
            DeviceRegistry::builtin(),
            Journal::new(None),
            board,
            roof,
            wake,
            RemoteSettings {
                path: remote,
                connect_timeout: Duration::from_secs(2),
                command_timeout: None,
            },
            runner,
        )
    }

    #[tokio::test]
    async fn test_wake_known_device() {
        let receiver = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let dispatcher = dispatcher(
            WakeMethod::Packet(receiver.local_addr().unwrap()),
            Arc::new(FakeRunner::default()),
            temp_path("remote"),
        );

        let message = dispatcher
            .execute(&Action::Wake("c14".to_string()))
            .await
            .unwrap();
        assert_eq!(message, "Wake-on-LAN sent to C14 (e0:d5:5e:37:4f:ad)");

        let mut buffer = [0u8; 256];
        let (size, _) = timeout(Duration::from_secs(5), receiver.recv_from(&mut buffer))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(size, 102);
        assert_eq!(buffer[6..12], [0xe0, 0xd5, 0x5e, 0x37, 0x4f, 0xad]);

        assert_eq!(dispatcher.journal().len(), 1);
    }

    #[tokio::test]
    async fn test_wake_invalid_mac_sends_nothing() {
        let receiver = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let dispatcher = dispatcher(
            WakeMethod::Packet(receiver.local_addr().unwrap()),
            Arc::new(FakeRunner::default()),
            temp_path("remote"),
        );

        let result = dispatcher
            .execute(&Action::Wake("e0:d5:5e:37:4f".to_string()))
            .await;
        assert!(matches!(result, Err(Error::Wol(wol::Error::InvalidLength(10)))));

        let entries = dispatcher.journal().entries();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].message.starts_with("wake e0:d5:5e:37:4f failed"));

        let mut buffer = [0u8; 256];
        assert!(
            timeout(Duration::from_millis(200), receiver.recv_from(&mut buffer))
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_wake_unknown_device() {
        let dispatcher = dispatcher(
            WakeMethod::Tool("wakeonlan".to_string()),
            Arc::new(FakeRunner::default()),
            temp_path("remote"),
        );

        assert!(matches!(
            dispatcher.execute(&Action::Wake("guider".to_string())).await,
            Err(Error::UnknownDevice(name)) if name == "guider"
        ));
        assert!(matches!(
            dispatcher.execute(&Action::Wake("C15".to_string())).await,
            Err(Error::UnknownDevice(name)) if name == "C15"
        ));
        assert_eq!(dispatcher.journal().len(), 2);
    }

    #[test]
    fn test_looks_like_mac() {
        assert!(looks_like_mac("e0:d5:5e:37:4f:ad"));
        assert!(looks_like_mac("00-C0-08-AA-35-12"));
        assert!(looks_like_mac("e0d55e374fad"));
        assert!(looks_like_mac("e0:d5"));
        assert!(looks_like_mac("e0d55e374fad00"));
        assert!(!looks_like_mac("C15"));
        assert!(!looks_like_mac("abc"));
        assert!(!looks_like_mac("VNT"));
    }

    #[tokio::test]
    async fn test_wake_with_external_tool() {
        let runner = Arc::new(FakeRunner::default());
        let dispatcher = dispatcher(
            WakeMethod::Tool("wakeonlan".to_string()),
            runner.clone(),
            temp_path("remote"),
        );

        dispatcher
            .execute(&Action::Wake("00-C0-08-AA-35-12".to_string()))
            .await
            .unwrap();

        let calls = runner.calls.lock().await;
        assert_eq!(calls[0].to_string(), "wakeonlan 00:c0:08:aa:35:12");
    }

    #[tokio::test]
    async fn test_outlet_on() {
        let runner = Arc::new(FakeRunner::default());
        let dispatcher = dispatcher(
            WakeMethod::Tool("wakeonlan".to_string()),
            runner.clone(),
            temp_path("remote"),
        );

        let message = dispatcher.execute(&"outlet 3 on".parse().unwrap()).await.unwrap();
        assert_eq!(message, "outlet 3 (C14(3)) switched on");

        let calls = runner.calls.lock().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].args, vec!["-o", "3"]);
    }

    #[tokio::test]
    async fn test_outlet_failure_is_logged() {
        let runner = Arc::new(FakeRunner {
            code: 1,
            ..Default::default()
        });
        let dispatcher = dispatcher(
            WakeMethod::Tool("wakeonlan".to_string()),
            runner,
            temp_path("remote"),
        );

        assert!(dispatcher.execute(&"outlet 2 off".parse().unwrap()).await.is_err());

        let entries = dispatcher.journal().entries();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].message.contains("`sispmctl -f 2` exited with status 1"));
    }

    #[tokio::test]
    async fn test_roof() {
        let runner = Arc::new(FakeRunner::default());
        let dispatcher = dispatcher(
            WakeMethod::Tool("wakeonlan".to_string()),
            runner.clone(),
            temp_path("remote"),
        );

        let message = dispatcher.execute(&Action::Roof).await.unwrap();
        assert_eq!(message, "roof script finished");

        let calls = runner.calls.lock().await;
        assert_eq!(calls[0].to_string(), "cd /opt/roof && ./strecha_on.sh");
    }

    #[tokio::test]
    async fn test_remote_connection_failure_logs_once() {
        let remote = temp_path("remote");
        std::fs::write(
            &remote,
            "foo bar baz\nip 127.0.0.1\nport 1\nuser dpv\npsw secret\n",
        )
        .unwrap();

        let runner = Arc::new(FakeRunner::default());
        let dispatcher = dispatcher(
            WakeMethod::Tool("wakeonlan".to_string()),
            runner,
            remote,
        );

        let result = dispatcher.execute(&Action::Remote("foo".to_string())).await;
        assert!(matches!(
            result,
            Err(Error::Remote(remote::Error::Connect(_, _)))
        ));

        let entries = dispatcher.journal().entries();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].message.contains("unable to connect to 127.0.0.1:1"));

        // the dispatcher keeps serving actions afterwards
        dispatcher.execute(&Action::Roof).await.unwrap();
        assert_eq!(dispatcher.journal().len(), 2);
    }

    #[tokio::test]
    async fn test_remote_unknown_command_and_missing_file() {
        let runner = Arc::new(FakeRunner::default());
        let dispatcher = dispatcher(
            WakeMethod::Tool("wakeonlan".to_string()),
            runner,
            temp_path("remote"),
        );

        assert!(matches!(
            dispatcher.execute(&Action::Remote("foo".to_string())).await,
            Err(Error::Remote(remote::Error::Io(_)))
        ));
        assert_eq!(dispatcher.journal().len(), 1);
    }
}
