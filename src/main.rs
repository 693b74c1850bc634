mod ui;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use serde::Serialize;
use std::path::PathBuf;

use dishpoint::config::Config;
use dishpoint::database::{Database, SavedLocation};
use dishpoint::geometry::{normalize_degrees, PointingSolution};
use dishpoint::guidance::azimuth_to_cardinal;
use dishpoint::observer::Observer;
use dishpoint::satellite::{GeoSatellite, SatelliteRegistry};

#[derive(Parser)]
#[command(name = "dishpoint")]
#[command(about = "Aim a satellite dish at a geostationary satellite")]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Azimuth, elevation and LNB skew for one satellite
    Point {
        /// Satellite name or orbital position (e.g. "Hotbird", "19.2E", "30W")
        #[arg(allow_negative_numbers = true)]
        satellite: String,
        #[command(flatten)]
        location: LocationArgs,
        #[arg(long)]
        json: bool,
    },
    /// Registry satellites in view, highest first
    Visible {
        #[command(flatten)]
        location: LocationArgs,
        #[arg(long)]
        region: Option<String>,
        /// Include satellites below the horizon
        #[arg(long)]
        all: bool,
        #[arg(long)]
        json: bool,
    },
    /// List the satellite registry
    Satellites {
        #[arg(long)]
        region: Option<String>,
    },
    /// Manage saved locations
    Location {
        #[command(subcommand)]
        action: LocationAction,
    },
    /// Interactive pointing view
    Track {
        #[command(flatten)]
        location: LocationArgs,
    },
}

#[derive(Subcommand)]
enum LocationAction {
    /// Save (or overwrite) a named location
    Save {
        name: String,
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
    },
    List,
    Remove { name: String },
}

#[derive(Args)]
struct LocationArgs {
    /// Observer latitude in degrees, south negative
    #[arg(long, allow_negative_numbers = true, requires = "lon")]
    lat: Option<f64>,
    /// Observer longitude in degrees, west negative
    #[arg(long, allow_negative_numbers = true, requires = "lat")]
    lon: Option<f64>,
    /// Name of a saved location
    #[arg(long, conflicts_with_all = ["lat", "lon"])]
    location: Option<String>,
}

pub struct AppState {
    pub observer: Observer,
    pub registry: SatelliteRegistry,
    pub rows: Vec<(GeoSatellite, PointingSolution)>,
    pub selected_satellite: usize,
    /// Simulated compass heading, degrees clockwise from North.
    pub heading: f64,
    pub show_below_horizon: bool,
    pub config: Config,
}

impl AppState {
    fn new(observer: Observer, registry: SatelliteRegistry, config: Config) -> Result<Self> {
        let mut state = AppState {
            observer,
            registry,
            rows: Vec::new(),
            selected_satellite: 0,
            heading: 0.0,
            show_below_horizon: config.display.show_below_horizon,
            config,
        };
        state.refresh()?;
        Ok(state)
    }

    fn refresh(&mut self) -> Result<()> {
        self.rows = self
            .registry
            .rank_for(&self.observer.coordinate)?
            .into_iter()
            .filter(|(_, solution)| self.show_below_horizon || solution.is_visible)
            .map(|(satellite, solution)| (satellite.clone(), solution))
            .collect();
        self.selected_satellite = self.selected_satellite.min(self.rows.len().saturating_sub(1));
        Ok(())
    }

    pub fn selected(&self) -> Option<&(GeoSatellite, PointingSolution)> {
        self.rows.get(self.selected_satellite)
    }
}

#[derive(Serialize)]
struct PointReport<'a> {
    observer: &'a Observer,
    satellite: &'a GeoSatellite,
    solution: PointingSolution,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = Config::load_or_default(cli.config.as_deref())?;
    let registry = SatelliteRegistry::builtin().with_custom(config.custom_satellites()?);
    log::debug!("Registry holds {} satellites", registry.len());

    match cli.command {
        Commands::Point {
            satellite,
            location,
            json,
        } => point(&config, &registry, &location, &satellite, json),
        Commands::Visible {
            location,
            region,
            all,
            json,
        } => visible(&config, &registry, &location, region.as_deref(), all, json),
        Commands::Satellites { region } => {
            list_satellites(&registry, region.as_deref());
            Ok(())
        }
        Commands::Location { action } => manage_locations(&config, action),
        Commands::Track { location } => {
            let observer = resolve_observer(&config, &location)?;
            track(observer, registry, config)
        }
    }
}

fn open_database(config: &Config) -> Result<Database> {
    let path = config
        .database_path()
        .context("no data directory available; set [database] path in the config")?;
    Database::open(&path)
}

fn resolve_observer(config: &Config, args: &LocationArgs) -> Result<Observer> {
    if let (Some(lat), Some(lon)) = (args.lat, args.lon) {
        return Ok(Observer::new("Command line".to_string(), lat, lon)?);
    }
    if let Some(name) = &args.location {
        let db = open_database(config)?;
        let saved = db
            .read_by_name(name)?
            .with_context(|| format!("no saved location named '{}'", name))?;
        return saved.to_observer();
    }
    config.observer()
}

fn point(
    config: &Config,
    registry: &SatelliteRegistry,
    location: &LocationArgs,
    query: &str,
    json: bool,
) -> Result<()> {
    let observer = resolve_observer(config, location)?;
    let satellite = registry.resolve(query)?;
    let solution = observer.point_at(satellite.longitude)?;
    log::info!(
        "{} -> {}: az {:.1} el {:.1}",
        observer.name,
        satellite.name,
        solution.azimuth_deg,
        solution.elevation_deg
    );

    if json {
        let report = PointReport {
            observer: &observer,
            satellite: &satellite,
            solution,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "Satellite:  {} ({})",
        satellite.name,
        satellite.orbital_position()
    );
    println!(
        "Observer:   {} ({})",
        observer.name,
        observer.format_position()
    );
    println!(
        "Azimuth:    {:.1}° ({})",
        solution.azimuth_deg,
        azimuth_to_cardinal(solution.azimuth_deg)
    );
    println!("Elevation:  {:.1}°", solution.elevation_deg);
    println!("LNB tilt:   {:+.1}°", solution.lnb_tilt_deg);
    println!("Distance:   {:.0} km", solution.distance_km);
    println!(
        "Visible:    {}",
        if solution.is_visible { "yes" } else { "no, below horizon" }
    );
    println!("Signal:     {}", solution.signal_quality.as_str());
    Ok(())
}

fn visible(
    config: &Config,
    registry: &SatelliteRegistry,
    location: &LocationArgs,
    region: Option<&str>,
    all: bool,
    json: bool,
) -> Result<()> {
    let observer = resolve_observer(config, location)?;
    let ranked: Vec<_> = registry
        .rank_for(&observer.coordinate)?
        .into_iter()
        .filter(|(_, solution)| all || solution.is_visible)
        .filter(|(satellite, _)| region.map_or(true, |r| satellite.region.eq_ignore_ascii_case(r)))
        .collect();

    if json {
        let reports: Vec<_> = ranked
            .iter()
            .map(|(satellite, solution)| PointReport {
                observer: &observer,
                satellite,
                solution: *solution,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    println!(
        "From {} ({}): {} satellites",
        observer.name,
        observer.format_position(),
        ranked.len()
    );
    println!(
        "{:<22} {:>8} {:>7} {:>6} {:>7} {:>9}  {}",
        "Satellite", "Position", "Az", "El", "Skew", "Range", "Signal"
    );
    for (satellite, solution) in &ranked {
        println!(
            "{:<22} {:>8} {:>6.1}° {:>5.1}° {:>+6.1}° {:>6.0} km  {}",
            satellite.name,
            satellite.orbital_position(),
            solution.azimuth_deg,
            solution.elevation_deg,
            solution.lnb_tilt_deg,
            solution.distance_km,
            solution.signal_quality.as_str()
        );
    }
    Ok(())
}

fn list_satellites(registry: &SatelliteRegistry, region: Option<&str>) {
    let satellites: Vec<&GeoSatellite> = match region {
        Some(region) => registry.by_region(region).collect(),
        None => registry.iter().collect(),
    };
    if satellites.is_empty() {
        log::warn!("No satellites match; known regions: {}", registry.regions().join(", "));
    }
    for satellite in satellites {
        println!(
            "{:<22} {:>8}  {}",
            satellite.name,
            satellite.orbital_position(),
            satellite.region
        );
    }
}

fn manage_locations(config: &Config, action: LocationAction) -> Result<()> {
    let db = open_database(config)?;
    match action {
        LocationAction::Save { name, lat, lon } => {
            let id = db.upsert(&SavedLocation::new(name.clone(), lat, lon))?;
            println!("Saved '{}' (id {})", name, id);
        }
        LocationAction::List => {
            let locations = db.read_all()?;
            if locations.is_empty() {
                println!("No saved locations");
            }
            for location in locations {
                let observer = location.to_observer()?;
                println!(
                    "{:<20} {}  saved {}",
                    location.name,
                    observer.format_position(),
                    location.saved_at.format("%Y-%m-%d %H:%M")
                );
            }
        }
        LocationAction::Remove { name } => {
            if db.delete_by_name(&name)? {
                println!("Removed '{}'", name);
            } else {
                anyhow::bail!("no saved location named '{}'", name);
            }
        }
    }
    Ok(())
}

fn track(observer: Observer, registry: SatelliteRegistry, config: Config) -> Result<()> {
    let mut app_state = AppState::new(observer, registry, config)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app_state);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app_state: &mut AppState,
) -> Result<()> {
    loop {
        terminal.draw(|f| {
            ui::draw_ui(f, app_state);
        })?;

        if event::poll(std::time::Duration::from_millis(
            app_state.config.display.refresh_rate,
        ))? {
            if let Event::Key(key) = event::read()? {
                let step = app_state.config.guidance.heading_step;
                let last = app_state.rows.len().saturating_sub(1);
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => {
                        return Ok(());
                    }
                    KeyCode::Up | KeyCode::Char('k') => {
                        app_state.selected_satellite = app_state.selected_satellite.saturating_sub(1);
                    }
                    KeyCode::Down | KeyCode::Char('j') => {
                        if app_state.selected_satellite < last {
                            app_state.selected_satellite += 1;
                        }
                    }
                    KeyCode::Left | KeyCode::Char('h') => {
                        app_state.heading = normalize_degrees(app_state.heading - step);
                    }
                    KeyCode::Right | KeyCode::Char('l') => {
                        app_state.heading = normalize_degrees(app_state.heading + step);
                    }
                    KeyCode::Char('a') => {
                        // snap the simulated compass onto the selected target
                        if let Some(azimuth) = app_state.selected().map(|(_, s)| s.azimuth_deg) {
                            app_state.heading = azimuth;
                        }
                    }
                    KeyCode::Char('b') => {
                        app_state.show_below_horizon = !app_state.show_below_horizon;
                        app_state.refresh()?;
                    }
                    KeyCode::Home => {
                        app_state.selected_satellite = 0;
                    }
                    KeyCode::End => {
                        app_state.selected_satellite = last;
                    }
                    _ => {}
                }
            }
        }
    }
}
