use std::path::{Path, PathBuf};

use log::{debug, info};
use remote::RemoteConfig;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::mpsc;
use tokio::task;

use crate::action::Action;
use crate::dispatcher::Dispatcher;
use crate::Result;

const HELP: &[&str] = &[
    "wake <device|mac>           send a Wake-on-LAN packet",
    "outlet <slot> on|off        switch a power strip outlet",
    "outlet <slot> status        read an outlet state from the strip",
    "roof                        run the roof script",
    "remote <command>            run a command on the remote host",
    "devices                     list known devices",
    "outlets                     read back every outlet",
    "commands                    list remote commands",
    "log                         show the operator log",
    "save                        append the operator log to the log file",
    "quit                        leave the console",
];

#[derive(Debug, PartialEq, Eq)]
pub enum Reply {
    Lines(Vec<String>),
    Quit,
}

/// Interactive operator console reading one command per line.
pub struct Console<'a> {
    dispatcher: &'a Dispatcher,
    saved_log: PathBuf,
}

impl<'a> Console<'a> {
    pub fn new(dispatcher: &'a Dispatcher, saved_log: impl Into<PathBuf>) -> Self {
        Self {
            dispatcher,
            saved_log: saved_log.into(),
        }
    }

    pub async fn handle_line(&self, line: &str) -> Reply {
        let line = line.trim();

        let lines = match line.to_ascii_lowercase().as_str() {
            "" => vec![],
            "quit" | "exit" => return Reply::Quit,
            "help" | "?" => HELP.iter().map(|line| line.to_string()).collect(),
            "devices" => self
                .dispatcher
                .devices()
                .devices()
                .iter()
                .map(ToString::to_string)
                .collect(),
            "outlets" => self
                .dispatcher
                .board()
                .refresh_all()
                .await
                .into_iter()
                .map(|outlet| format!("{} {} {}", outlet.slot, outlet.name, outlet.state))
                .collect(),
            "commands" => list_commands(self.dispatcher.remote_config_path()),
            "log" => self
                .dispatcher
                .journal()
                .entries()
                .iter()
                .map(ToString::to_string)
                .collect(),
            "save" => vec![self.save_log()],
            _ => match line.parse::<Action>() {
                Ok(action) => match self.dispatcher.execute(&action).await {
                    Ok(message) => vec![message],
                    Err(err) => vec![format!("error: {err}")],
                },
                Err(err) => vec![format!("{err}, type help for the list of commands")],
            },
        };

        Reply::Lines(lines)
    }

    fn save_log(&self) -> String {
        match self.dispatcher.journal().save(&self.saved_log) {
            Ok(()) => format!("log saved to {}", self.saved_log.display()),
            Err(err) => format!("error: unable to save {}: {err}", self.saved_log.display()),
        }
    }

    /// Reads stdin until `quit`, end of input, Ctrl-C or SIGTERM.
    pub async fn run(&self) -> Result<()> {
        let stop = shutdown_signals()?;

        self.serve(BufReader::new(io::stdin()), io::stdout(), stop).await
    }

    /// Serves commands from `input` until it ends, `quit` is typed or a
    /// signal name arrives on `stop`. A signal also cancels the command in
    /// progress, dropping any child process it started.
    pub async fn serve<R, W>(
        &self,
        input: R,
        mut output: W,
        mut stop: mpsc::Receiver<&'static str>,
    ) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();

        output.write_all(b"type help for the list of commands\n").await?;

        loop {
            output.write_all(b"> ").await?;
            output.flush().await?;

            let line = tokio::select! {
                line = lines.next_line() => line?,
                signal = stop.recv() => {
                    info!("got {}, exiting...", signal.unwrap_or("shutdown"));
                    break;
                }
            };

            let Some(line) = line else {
                debug!("stdin closed");
                break;
            };

            let reply = tokio::select! {
                reply = self.handle_line(&line) => reply,
                signal = stop.recv() => {
                    let signal = signal.unwrap_or("shutdown");
                    self.dispatcher
                        .journal()
                        .error(format!("{} interrupted by {signal}", line.trim()));
                    break;
                }
            };

            match reply {
                Reply::Lines(replies) => {
                    for reply in replies {
                        output.write_all(reply.as_bytes()).await?;
                        output.write_all(b"\n").await?;
                    }
                }
                Reply::Quit => break,
            }
        }

        output.flush().await?;

        Ok(())
    }
}

/// Yields the name of the first SIGINT or SIGTERM the process receives. The
/// handlers stay installed for the whole session, so a signal that arrives
/// while a command runs is not lost.
fn shutdown_signals() -> Result<mpsc::Receiver<&'static str>> {
    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;
    let (sender, receiver) = mpsc::channel(1);

    task::spawn(async move {
        let name = tokio::select! {
            _ = interrupt.recv() => "SIGINT",
            _ = terminate.recv() => "SIGTERM",
        };
        let _ = sender.send(name).await;
    });

    Ok(receiver)
}

pub fn list_commands(path: &Path) -> Vec<String> {
    match RemoteConfig::load(path) {
        Ok(config) if config.commands.is_empty() => {
            vec![format!("no commands in {}", path.display())]
        }
        Ok(config) => config
            .commands
            .iter()
            .map(|(name, command)| format!("{name}: {command}"))
            .collect(),
        Err(err) => vec![format!("error: {}: {err}", path.display())],
    }
}
