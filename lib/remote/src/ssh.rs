use std::fmt;
use std::io::Read;
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use log::{debug, info};
use ssh2::{ExtendedData, Session};

use crate::{Error, Result};

#[derive(Clone)]
pub struct Connection {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    /// Bounds the TCP connect, the handshake and authentication.
    pub connect_timeout: Duration,
    /// Bounds every read while the command runs, `None` waits forever.
    pub command_timeout: Option<Duration>,
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("connect_timeout", &self.connect_timeout)
            .field("command_timeout", &self.command_timeout)
            .finish_non_exhaustive()
    }
}

/// Exit status and the combined stdout and stderr of a remote command.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub code: i32,
    pub output: String,
}

impl Connection {
    /// Runs `command` in a fresh session on the blocking pool.
    pub async fn execute(&self, command: &str) -> Result<CommandOutput> {
        let connection = self.clone();
        let command = command.to_string();

        tokio::task::spawn_blocking(move || connection.execute_blocking(&command)).await?
    }

    /// Connects, authenticates with the password, runs `command` and closes
    /// the session. The server host key is accepted without verification.
    pub fn execute_blocking(&self, command: &str) -> Result<CommandOutput> {
        let target = format!("{}:{}", self.host, self.port);

        let addr = (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|_| Error::Resolve(self.host.clone()))?
            .next()
            .ok_or_else(|| Error::Resolve(self.host.clone()))?;

        let tcp = TcpStream::connect_timeout(&addr, self.connect_timeout)
            .map_err(|err| Error::Connect(target.clone(), err))?;
        debug!("connected to {target}");

        let mut session = Session::new()?;
        session.set_tcp_stream(tcp);
        session.set_timeout(millis(Some(self.connect_timeout)));
        session.handshake()?;

        session.userauth_password(&self.user, &self.password)?;
        if !session.authenticated() {
            return Err(Error::AuthenticationFailed(self.user.clone()));
        }

        info!("running on {target}: {command}");

        let mut channel = session.channel_session()?;
        // one stream for stdout and stderr, drained by a single read
        channel.handle_extended_data(ExtendedData::Merge)?;
        channel.exec(command)?;

        session.set_timeout(millis(self.command_timeout));

        let mut output = vec![];
        channel.read_to_end(&mut output)?;

        channel.wait_close()?;
        let code = channel.exit_status()?;

        let output = CommandOutput {
            code,
            output: String::from_utf8_lossy(&output).into_owned(),
        };

        let _ = session.disconnect(None, "done", None);

        if output.code != 0 {
            return Err(Error::Exit {
                code: output.code,
                output: output.output,
            });
        }

        Ok(output)
    }
}

/// libssh2 takes milliseconds, 0 disables the timeout.
fn millis(timeout: Option<Duration>) -> u32 {
    timeout
        .map(|timeout| timeout.as_millis().clamp(1, u32::MAX as u128) as u32)
        .unwrap_or(0)
}
