use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use moodnews_core::{App, Units, KNOWN_CATEGORIES};
use moodnews_news::{keywords_for_mood, mood_from_temp, Article, NewsClient};
use moodnews_services::{
    load_category_news, load_category_preview, AppState, HomeFeed, HomeScreen, LoadOutcome,
    LocationState,
};
use moodnews_weather::{FixedLocation, WeatherProvider};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file to use instead of the per-user default
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Forecast plus headlines matching today's mood
    Home {
        #[arg(long, allow_negative_numbers = true, requires = "lon")]
        lat: Option<f64>,
        #[arg(long, allow_negative_numbers = true, requires = "lat")]
        lon: Option<f64>,
    },
    /// Headlines for the selected categories
    News,
    /// First few headlines for the selected categories
    Preview,
    /// Show which mood and keywords a temperature selects
    Mood {
        #[arg(allow_negative_numbers = true)]
        temperature: f64,
        #[arg(long, default_value = "metric")]
        units: Units,
    },
    /// Show or change preferences
    Settings {
        #[command(subcommand)]
        command: Option<SettingsCommands>,
    },
}

#[derive(Subcommand, Debug)]
enum SettingsCommands {
    Show,
    /// Set the temperature units (metric or imperial)
    Units { units: Units },
    /// Replace the selected categories
    Categories {
        #[arg(required = true)]
        categories: Vec<String>,
    },
    /// Select or deselect one category
    Toggle { category: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    moodnews_core::init()?;
    let cli = Cli::parse();

    if run_without_app(&cli.command) {
        return Ok(());
    }

    let app = App::new(cli.config.as_deref())?;
    let state = AppState::load(app.preference_store())?;

    let result = match cli.command {
        Commands::Home { lat, lon } => run_home(&app, &state, lat, lon).await,
        Commands::News => run_news(&app, &state, false).await,
        Commands::Preview => run_news(&app, &state, true).await,
        Commands::Mood { temperature, units } => {
            run_mood(temperature, units);
            Ok(())
        }
        Commands::Settings { command } => {
            run_settings(&app, &state, command.unwrap_or(SettingsCommands::Show))
        }
    };

    app.shutdown();
    result
}

/// Run commands that need neither config nor preferences. Returns whether
/// `command` was one of them.
fn run_without_app(command: &Commands) -> bool {
    match *command {
        Commands::Mood { temperature, units } => {
            run_mood(temperature, units);
            true
        }
        _ => false,
    }
}

async fn run_home(app: &App, state: &AppState, lat: Option<f64>, lon: Option<f64>) -> Result<()> {
    let provider = FixedLocation::resolve(lat, lon, &app.config().location);
    if let LocationState::Failed(e) = state.acquire_location(&provider).await {
        if e.is_terminal() {
            bail!(
                "{}. Pass --lat and --lon, or set [location] in the config file.",
                e
            );
        }
        bail!("{}", e);
    }

    let weather = WeatherProvider::from_config(&app.config().weather)?;
    let news = NewsClient::from_config(&app.config().news)?;
    let screen = HomeScreen::new();

    match screen.reload_for(state, &weather, &news).await {
        Some(LoadOutcome::Applied) => {}
        Some(LoadOutcome::Failed(e)) => bail!("{}", e.user_message()),
        Some(LoadOutcome::Superseded) | None => bail!("Home screen was not loaded"),
    }

    if let Some(feed) = screen.feed() {
        print_weather(&feed);
        println!();
        println!("{}", feed.news_info());
        println!();
        print_articles(&feed.articles);
    }
    Ok(())
}

async fn run_news(app: &App, state: &AppState, preview: bool) -> Result<()> {
    let news = NewsClient::from_config(&app.config().news)?;
    let categories = state.categories();

    let loaded = if preview {
        load_category_preview(&news, &categories).await
    } else {
        load_category_news(&news, &categories).await
    };
    let articles = match loaded {
        Ok(articles) => articles,
        Err(e) => {
            tracing::error!("Category news failed: {}", e);
            bail!("{}", e.user_message());
        }
    };

    println!("Categories: {}", categories.join(", "));
    println!();
    print_articles(&articles);
    Ok(())
}

fn run_mood(temperature: f64, units: Units) {
    let celsius = units.to_celsius(temperature);
    let mood = mood_from_temp(celsius);
    println!(
        "{:.1}{} ({:.1}°C) is {}",
        temperature,
        units.symbol(),
        celsius,
        mood
    );
    for keyword in keywords_for_mood(mood) {
        println!("  {}", keyword);
    }
}

fn run_settings(app: &App, state: &AppState, command: SettingsCommands) -> Result<()> {
    match command {
        SettingsCommands::Show => {
            let prefs = state.preferences();
            println!("Units:      {}", prefs.units);
            println!("Categories: {}", prefs.categories.join(", "));
            println!("Available:  {}", KNOWN_CATEGORIES.join(", "));
            println!("Stored in:  {}", app.config().config_dir.display());
        }
        SettingsCommands::Units { units } => {
            state.set_units(units)?;
            println!("Units set to {}", units);
        }
        SettingsCommands::Categories { categories } => {
            for category in &categories {
                check_category(category)?;
            }
            state.set_categories(categories)?;
            println!("Categories: {}", state.categories().join(", "));
        }
        SettingsCommands::Toggle { category } => {
            check_category(&category)?;
            let selected = state.toggle_category(&category)?;
            println!(
                "{} {}",
                if selected { "Selected" } else { "Deselected" },
                category
            );
            println!("Categories: {}", state.categories().join(", "));
        }
    }
    Ok(())
}

fn check_category(category: &str) -> Result<()> {
    if !KNOWN_CATEGORIES.contains(&category) {
        bail!(
            "Unknown category '{}'. Choose from: {}",
            category,
            KNOWN_CATEGORIES.join(", ")
        );
    }
    Ok(())
}

fn print_weather(feed: &HomeFeed) {
    let summary = &feed.forecast.summary;
    let symbol = feed.units.symbol();
    println!(
        "Now: {:.1}{}  {} [{}]",
        summary.temperature, symbol, summary.description, summary.icon_id
    );
    for day in &feed.forecast.daily {
        println!(
            "  {}  {:>6.1}{}  {}",
            day.date.format("%a %d %b"),
            day.temperature,
            symbol,
            day.description
        );
    }
}

fn print_articles(articles: &[Article]) {
    if articles.is_empty() {
        println!("No news found.");
        return;
    }
    for (i, article) in articles.iter().enumerate() {
        println!("{:>2}. {}", i + 1, article.title);
        let byline: Vec<&str> = [
            article.source_name.as_deref(),
            article.published_at.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect();
        if !byline.is_empty() {
            println!("    {}", byline.join(" · "));
        }
        if !article.description.is_empty() {
            println!("    {}", article.description);
        }
        println!("    {}", article.url);
    }
}
