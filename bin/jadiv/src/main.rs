use std::path::PathBuf;

use jadiv::action::Action;
use jadiv::config::Config;
use jadiv::console::{list_commands, Console};
use jadiv::devices::DeviceRegistry;
use jadiv::dispatcher::Dispatcher;
use jadiv::journal::Journal;
use jadiv::settings::Settings;
use jadiv::{update, Error};

use clap::{Parser, Subcommand, ValueEnum};
use log::{info, warn};
use sispm::OutletState;
use tokio::task;

type ErasedError = Box<dyn std::error::Error + Send + Sync + 'static>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Observatory device control: Wake-on-LAN, power strip outlets, roof
/// script and remote commands.
#[derive(Parser)]
#[command(version)]
struct Cli {
    /// Directory with settings, device and remote files, overrides JADIV_HOME
    #[arg(long)]
    home: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Send a Wake-on-LAN packet to a known device or a MAC address
    Wake { target: String },
    /// Switch an outlet or read its state
    Outlet {
        slot: u8,
        #[arg(value_enum)]
        op: OutletOp,
    },
    /// Read back every outlet
    Outlets,
    /// Run the roof script
    Roof,
    /// Run a named command on the remote host
    Remote { name: String },
    /// List remote commands
    Commands,
    /// List known devices
    Devices,
    /// Show or change the stored settings
    Settings {
        #[arg(long)]
        theme: Option<String>,
        #[arg(long)]
        view_mode: Option<String>,
    },
    /// Check for a newer version once
    Update,
    /// Interactive console, the default
    Console,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutletOp {
    On,
    Off,
    Status,
}

#[tokio::main]
async fn main() -> Result<(), ErasedError> {
    let filters = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    pretty_env_logger::formatted_timed_builder()
        .parse_filters(&filters)
        .init();

    let cli = Cli::parse();

    info!("jadiv version {VERSION}");

    let config = Config::from_env(cli.home.as_deref())?;

    let devices = match &config.devices_file {
        Some(path) => DeviceRegistry::load(path)?,
        None => DeviceRegistry::builtin(),
    };

    let journal = Journal::new(config.log_mirror.clone());
    let dispatcher = Dispatcher::from_config(&config, devices, journal.clone());

    match cli.command.unwrap_or(Command::Console) {
        Command::Wake { target } => run_action(&dispatcher, Action::Wake(target)).await?,
        Command::Outlet { slot, op } => {
            let action = match op {
                OutletOp::On => Action::Outlet {
                    slot,
                    state: OutletState::On,
                },
                OutletOp::Off => Action::Outlet {
                    slot,
                    state: OutletState::Off,
                },
                OutletOp::Status => Action::OutletStatus(slot),
            };
            run_action(&dispatcher, action).await?
        }
        Command::Roof => run_action(&dispatcher, Action::Roof).await?,
        Command::Remote { name } => run_action(&dispatcher, Action::Remote(name)).await?,
        Command::Outlets => {
            for outlet in dispatcher.board().refresh_all().await {
                println!("{} {} {}", outlet.slot, outlet.name, outlet.state);
            }
        }
        Command::Commands => {
            for line in list_commands(&config.remote.path) {
                println!("{line}");
            }
        }
        Command::Devices => {
            for device in dispatcher.devices().devices() {
                println!("{device}");
            }
        }
        Command::Settings { theme, view_mode } => {
            let mut settings = Settings::load(&config.settings_file)?;

            if theme.is_some() || view_mode.is_some() {
                if let Some(theme) = theme {
                    settings.theme = theme.parse()?;
                }
                if let Some(view_mode) = view_mode {
                    settings.view_mode = view_mode.parse()?;
                }
                settings.save(&config.settings_file)?;
            }

            println!("theme: {}", settings.theme);
            println!("view mode: {}", settings.view_mode);
        }
        Command::Update => {
            let update_config = config.update.as_ref().ok_or(Error::MissingVar("UPDATE_URL"))?;

            let updater = update::build_updater(update_config)?;
            let outcome = updater.run_once().await?;
            update::report(&journal, Ok(outcome));
        }
        Command::Console => {
            if let Some(path) = &config.snapshot_file {
                if let Err(err) = dispatcher.devices().save_snapshot(path) {
                    warn!("unable to write {}: {err}", path.display());
                }
            }

            let watcher = match &config.update {
                Some(update_config) => {
                    let updater = update::build_updater(update_config)?;
                    let interval = update_config.interval;
                    let journal = journal.clone();

                    Some(task::spawn(async move {
                        updater
                            .watch(interval, |result| update::report(&journal, result))
                            .await
                    }))
                }
                None => None,
            };

            Console::new(&dispatcher, &config.saved_log_file).run().await?;

            if let Some(watcher) = watcher {
                watcher.abort();
            }
        }
    }

    Ok(())
}

async fn run_action(dispatcher: &Dispatcher, action: Action) -> Result<(), Error> {
    let message = dispatcher.execute(&action).await?;
    println!("{message}");

    Ok(())
}
