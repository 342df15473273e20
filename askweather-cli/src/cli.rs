use std::sync::Arc;

use anyhow::{Context, Result};
use askweather_core::{
    Config, MeasurementSystem, NluClient, NluResponseParser, QueryError, SubmissionTracker,
    TempUnit, UnitPreference, WeatherProvider, WitClient, fetch_all,
    provider::{Fetched, provider_from_config},
};
use clap::{Parser, Subcommand, ValueEnum};
use inquire::{InquireError, Password, PasswordDisplayMode, Select, Text};

use crate::output;

const EXAMPLES: &str = "Realtime: \"Weather in LA in Fahrenheit in imperial\"\n\
    Forecast: \"5 day Boston weather forecast in F in miles\"\n\
    Sun: \"Sunset in Chicago\"\n\
    Moon: \"Moonrise in NY\"\n\
    Moon Phase: \"Moon phase in Atlanta\"";

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "askweather", version, about = "Get weather information with natural language")]
pub struct Cli {
    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure API credentials and default units.
    Configure,

    /// Answer a single weather question.
    Ask {
        /// The question, e.g. "3 day weather in LA in F in miles".
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Default temperature unit (overridden by units named in the query).
        #[arg(long, value_enum)]
        temp_unit: Option<TempArg>,

        /// Default measurement system (overridden by units named in the query).
        #[arg(long, value_enum)]
        system: Option<SystemArg>,
    },

    /// Ask questions in a loop until interrupted.
    Interactive,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TempArg {
    Celsius,
    Fahrenheit,
}

impl From<TempArg> for TempUnit {
    fn from(arg: TempArg) -> Self {
        match arg {
            TempArg::Celsius => TempUnit::Celsius,
            TempArg::Fahrenheit => TempUnit::Fahrenheit,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SystemArg {
    Metric,
    Imperial,
}

impl From<SystemArg> for MeasurementSystem {
    fn from(arg: SystemArg) -> Self {
        match arg {
            SystemArg::Metric => MeasurementSystem::Metric,
            SystemArg::Imperial => MeasurementSystem::Imperial,
        }
    }
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let config = Config::load()?;

        match self.command {
            Command::Configure => configure(config),
            Command::Ask { query, temp_unit, system } => {
                let mut defaults = config.default_units();
                if let Some(t) = temp_unit {
                    defaults.temp_unit = t.into();
                }
                if let Some(s) = system {
                    defaults.measurement_system = s.into();
                }

                let app = App::from_config(&config, defaults)?;
                app.ask(&query.join(" ")).await
            }
            Command::Interactive => {
                let app = App::from_config(&config, config.default_units())?;
                app.interactive().await
            }
        }
    }
}

fn configure(mut config: Config) -> Result<()> {
    let token = Password::new("wit.ai client access token:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Leave empty to keep the current value")
        .prompt()?;
    if !token.trim().is_empty() {
        config.nlu.access_token = Some(token.trim().to_string());
    }

    let key = Password::new("WeatherAPI.com API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Leave empty to keep the current value")
        .prompt()?;
    if !key.trim().is_empty() {
        config.weather.api_key = Some(key.trim().to_string());
    }

    let current = config.default_units();
    let temp_options = vec![TempUnit::Celsius, TempUnit::Fahrenheit];
    let temp_unit = Select::new("Default temperature unit:", temp_options.clone())
        .with_starting_cursor(temp_options.iter().position(|t| *t == current.temp_unit).unwrap_or(0))
        .prompt()?;

    let system_options = vec![MeasurementSystem::Metric, MeasurementSystem::Imperial];
    let measurement_system = Select::new("Default measurement system:", system_options.clone())
        .with_starting_cursor(
            system_options.iter().position(|s| *s == current.measurement_system).unwrap_or(0),
        )
        .prompt()?;

    config.set_default_units(UnitPreference::new(temp_unit, measurement_system));
    config.save()?;

    println!("Configuration saved to {}", Config::config_file_path()?.display());
    Ok(())
}

/// What a submission produced, once accepted as current.
enum Outcome {
    Rejected(QueryError),
    Reports(Vec<Fetched>),
}

struct App {
    defaults: UnitPreference,
    parser: NluResponseParser,
    nlu: Box<dyn NluClient>,
    provider: Arc<dyn WeatherProvider>,
    tracker: SubmissionTracker,
}

impl App {
    fn from_config(config: &Config, defaults: UnitPreference) -> Result<Self> {
        let token = config.nlu_access_token()?;
        Ok(Self {
            defaults,
            parser: NluResponseParser::new(config.entities.clone()),
            nlu: Box::new(WitClient::new(token, config.nlu.base_url.clone())),
            provider: provider_from_config(config)?,
            tracker: SubmissionTracker::new(),
        })
    }

    /// Runs one query end to end; `None` means a newer submission superseded it.
    async fn submit(&self, text: &str) -> Result<Option<Outcome>> {
        let id = self.tracker.begin();
        tracing::info!(?id, query = text, "submitting query");

        let result = self
            .nlu
            .classify(text)
            .await
            .context("Failed to get AI response")?;

        let requests = match self.parser.interpret(&result, self.defaults) {
            Ok(requests) => requests,
            Err(e) => return Ok(self.tracker.accept(id, Outcome::Rejected(e))),
        };

        let fetched = fetch_all(Arc::clone(&self.provider), requests).await;
        Ok(self.tracker.accept(id, Outcome::Reports(fetched)))
    }

    async fn ask(&self, text: &str) -> Result<()> {
        if let Some(outcome) = self.submit(text.trim()).await? {
            print_outcome(outcome);
        }
        Ok(())
    }

    async fn interactive(&self) -> Result<()> {
        println!("Supported features:\n{EXAMPLES}\n");

        loop {
            let input = Text::new("Ask about the weather:")
                .with_placeholder("3 day weather in LA in F in miles")
                .prompt();

            let query = match input {
                Ok(q) => q,
                Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
                Err(e) => return Err(e.into()),
            };

            let query = query.trim();
            if query.is_empty() {
                continue;
            }

            // Network failures end this query only, not the session.
            match self.submit(query).await {
                Ok(Some(outcome)) => print_outcome(outcome),
                Ok(None) => {}
                Err(e) => eprintln!("{e:#}"),
            }
        }

        Ok(())
    }
}

fn print_outcome(outcome: Outcome) {
    match outcome {
        Outcome::Rejected(e) => eprintln!("{}", e.user_message()),
        Outcome::Reports(fetched) => {
            for Fetched { request, report } in fetched {
                match report {
                    Ok(report) => println!("{}", output::render(&request, &report)),
                    Err(e) => eprintln!("{}", output::render_failure(&request, &e)),
                }
            }
        }
    }
}
