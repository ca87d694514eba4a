use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use inquire::{InquireError, Password, Text};

use weather_core::{
    Config, Coordinates, FixedPosition, Geolocator, IpGeolocator, ProxyClient, Widget,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather widget backed by the weather proxy")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key used by the proxy server.
    Configure,

    /// Show the current weather once.
    Show {
        /// Address or city name; the device position is used when omitted.
        location: Option<String>,

        #[command(flatten)]
        widget: WidgetArgs,
    },

    /// Keep prompting for locations until cancelled.
    Interactive {
        #[command(flatten)]
        widget: WidgetArgs,
    },
}

#[derive(Debug, Args)]
pub struct WidgetArgs {
    /// Base URL of the weather proxy.
    #[arg(long)]
    pub proxy: Option<String>,

    /// Use this latitude instead of looking the position up.
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Use this longitude instead of looking the position up.
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lon: Option<f64>,

    /// Behave as if the device cannot report its position.
    #[arg(long, conflicts_with_all = ["lat", "lon"])]
    pub no_geolocation: bool,
}

impl WidgetArgs {
    fn geolocator(&self) -> Option<Arc<dyn Geolocator>> {
        if self.no_geolocation {
            return None;
        }
        let geolocator: Arc<dyn Geolocator> = match (self.lat, self.lon) {
            (Some(latitude), Some(longitude)) => {
                Arc::new(FixedPosition(Coordinates { latitude, longitude }))
            }
            _ => Arc::new(IpGeolocator::new()),
        };
        Some(geolocator)
    }

    fn build_widget(&self, config: &Config) -> Widget {
        let proxy = self.proxy.as_deref().unwrap_or(config.proxy_url());
        tracing::debug!(proxy, "Using weather proxy");
        Widget::new(Arc::new(ProxyClient::new(proxy)), self.geolocator())
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { location, widget } => {
                let config = Config::load()?;
                let widget = widget.build_widget(&config);
                if let Some(location) = location {
                    widget.set_location(location);
                }
                print!("{}", widget.mount().await);
                Ok(())
            }
            Command::Interactive { widget } => {
                let config = Config::load()?;
                interactive(widget.build_widget(&config)).await
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let mut config = Config::load_file()?;
    config.set_api_key(api_key.trim().to_string());
    config.save()?;

    println!("Saved API key to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn interactive(widget: Widget) -> anyhow::Result<()> {
    println!("Loading...");
    print!("{}", widget.mount().await);

    loop {
        let input = Text::new("Location:")
            .with_placeholder("Enter city name or address")
            .with_help_message("Leave empty to use your current position, Esc to quit")
            .prompt();

        match input {
            Ok(text) => {
                widget.set_location(text);
                println!("Loading...");
                print!("{}", widget.submit().await);
            }
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err).context("Failed to read location"),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_accepts_negative_coordinates() {
        let cli = Cli::try_parse_from(["weather", "show", "--lat", "51.5", "--lon", "-0.12"])
            .expect("valid arguments");

        match cli.command {
            Command::Show { location, widget } => {
                assert!(location.is_none());
                assert_eq!(widget.lat, Some(51.5));
                assert_eq!(widget.lon, Some(-0.12));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn lat_requires_lon() {
        assert!(Cli::try_parse_from(["weather", "show", "--lat", "51.5"]).is_err());
    }

    #[test]
    fn no_geolocation_conflicts_with_coordinates() {
        let parsed =
            Cli::try_parse_from(["weather", "show", "--no-geolocation", "--lat", "1", "--lon", "2"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn no_geolocation_leaves_widget_without_geolocator() {
        let cli = Cli::try_parse_from(["weather", "interactive", "--no-geolocation"])
            .expect("valid arguments");

        let Command::Interactive { widget } = cli.command else {
            panic!("expected interactive command");
        };
        assert!(widget.geolocator().is_none());
    }

    #[test]
    fn explicit_proxy_wins_over_config() {
        let cli = Cli::try_parse_from(["weather", "show", "Paris", "--proxy", "http://proxy:9000"])
            .expect("valid arguments");

        let Command::Show { location, widget } = cli.command else {
            panic!("expected show command");
        };
        assert_eq!(location.as_deref(), Some("Paris"));
        assert_eq!(widget.proxy.as_deref(), Some("http://proxy:9000"));
    }
}
