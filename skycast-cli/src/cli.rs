use anyhow::{Context, bail};
use clap::{ArgAction, Parser, Subcommand};
use inquire::{Confirm, InquireError, Password, PasswordDisplayMode, Text};
use skycast_core::{
    Config, DisabledGeolocator, Geolocator, IpGeolocator, OpenWeatherProvider, PanelState, View,
    WeatherController, provider::provider_from_config,
};
use tokio::sync::watch;
use tracing::debug;

use crate::render::Panel;

type Controller = WeatherController<OpenWeatherProvider, Box<dyn Geolocator>>;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "Current weather and 5-day forecast")]
pub struct Cli {
    /// More log output on stderr (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key, default city and geolocation preference.
    Configure,

    /// Show weather once and exit.
    Show {
        /// City name; the configured default city when absent.
        city: Option<String>,

        /// Use this machine's location instead of a city. Wins over CITY.
        #[arg(long)]
        here: bool,

        /// Print the snapshot as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Keep a panel open: search cities, `:here` for your location, `:q` to quit.
    Interactive,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, here, json } => {
                let ctl = controller(&Config::load()?)?;
                show(&ctl, city, here, json).await
            }
            Command::Interactive => {
                let ctl = controller(&Config::load()?)?;
                interactive(&ctl).await
            }
        }
    }
}

fn controller(config: &Config) -> anyhow::Result<Controller> {
    let provider = provider_from_config(config)?;

    let geolocator: Box<dyn Geolocator> = if config.geolocation_enabled() {
        Box::new(IpGeolocator::new())
    } else {
        Box::new(DisabledGeolocator)
    };

    Ok(WeatherController::new(provider, geolocator).default_city(config.default_city()))
}

/// What a one-shot `show` looks up.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Target {
    Here,
    City(String),
    DefaultCity,
}

/// `--here` wins over a city given on the command line.
fn target(city: Option<String>, here: bool) -> Target {
    match (here, city) {
        (true, _) => Target::Here,
        (false, Some(city)) => Target::City(city),
        (false, None) => Target::DefaultCity,
    }
}

async fn show(ctl: &Controller, city: Option<String>, here: bool, json: bool) -> anyhow::Result<()> {
    let target = target(city, here);
    debug!(?target, "showing weather");

    match target {
        Target::Here => ctl.locate().await,
        Target::City(city) => ctl.search(&city).await,
        Target::DefaultCity => ctl.refresh_default().await,
    }

    let state = ctl.state();
    match state.view() {
        View::Ready(snapshot) if json => {
            let out = serde_json::to_string_pretty(snapshot)
                .context("Failed to serialize weather snapshot")?;
            println!("{out}");
        }
        view @ View::Ready(_) => print!("{}", Panel(view)),
        View::Error(message) => bail!("{message}"),
        View::Idle | View::Loading => bail!("Nothing to look up: the city name is empty"),
    }

    Ok(())
}

async fn interactive(ctl: &Controller) -> anyhow::Result<()> {
    let mut rx = ctl.subscribe();
    drive(ctl.refresh_default(), &mut rx).await;

    loop {
        let input = tokio::task::spawn_blocking(|| {
            Text::new("City:").with_help_message(":here uses your location, :q quits").prompt()
        })
        .await
        .context("Prompt task failed")?;

        let line = match input {
            Ok(line) => line,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err).context("Failed to read input"),
        };

        let line = line.trim();
        debug!(input = line, "panel input");

        match line {
            ":q" | ":quit" => break,
            ":here" => drive(ctl.locate(), &mut rx).await,
            city => drive(ctl.search(city), &mut rx).await,
        }
    }

    Ok(())
}

/// Run one panel operation, printing every state it passes through.
async fn drive(op: impl Future<Output = ()>, rx: &mut watch::Receiver<PanelState>) {
    tokio::pin!(op);

    loop {
        tokio::select! {
            biased;
            Ok(()) = rx.changed() => print!("{}", Panel(rx.borrow_and_update().view())),
            () = &mut op => break,
        }
    }

    if rx.has_changed().unwrap_or(false) {
        print!("{}", Panel(rx.borrow_and_update().view()));
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Leave empty to keep the current key")
        .prompt()?;
    if !api_key.trim().is_empty() {
        config.api_key = Some(api_key.trim().to_string());
    }

    let default_city = Text::new("Default city:").with_default(config.default_city()).prompt()?;
    config.default_city = Some(default_city.trim().to_string());

    let geolocation = Confirm::new("Allow IP-based geolocation for `--here` and `:here`?")
        .with_default(config.geolocation_enabled())
        .prompt()?;
    config.geolocation = Some(geolocation);

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn here_wins_over_city() {
        assert_eq!(target(Some("Paris".into()), true), Target::Here);
        assert_eq!(target(None, true), Target::Here);
    }

    #[test]
    fn city_is_used_without_here() {
        assert_eq!(target(Some("Paris".into()), false), Target::City("Paris".into()));
    }

    #[test]
    fn no_city_means_default() {
        assert_eq!(target(None, false), Target::DefaultCity);
    }

    #[test]
    fn show_accepts_city_and_here_together() {
        let cli = Cli::try_parse_from(["skycast", "show", "Paris", "--here", "--json"]).unwrap();
        let Command::Show { city, here, json } = cli.command else { panic!("expected show") };

        assert_eq!(target(city, here), Target::Here);
        assert!(json);
    }
}
