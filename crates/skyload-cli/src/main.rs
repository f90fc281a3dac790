// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

mod server;

use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};
use skyload_core::ai::{AnalysisRequest, LoadAdvisor};
use skyload_core::analysis::{analyze_all_flights, calculate_dashboard_stats, WeightAnalysis};
use skyload_core::cargo::{auto_generate_containers, Container};
use skyload_core::config::Settings;
use skyload_core::export::LoadingPlan;
use skyload_core::flight::{FlightCsvParser, FlightRecord};
use skyload_core::load::summarize_load;
use skyload_core::placement::{PlacementRequest, PlacementResult};
use skyload_core::query::{alerts, FlightQuery, SortDirection, SortField, StatusFilter};
use skyload_core::session::SessionStore;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Settings file [default: platform config directory]
    #[arg(long, env = "SKYLOAD_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Session file holding the loaded flights
    #[arg(long, env = "SKYLOAD_SESSION", global = true)]
    session: Option<PathBuf>,

    /// Anthropic API key; overrides the settings file
    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// Ask the model for placements instead of the grid
    #[arg(long, global = true)]
    ai_placement: bool,

    /// More output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone, Default)]
struct Source {
    /// Read flights from this CSV instead of the saved session
    #[arg(long)]
    csv: Option<PathBuf>,
}

#[derive(Args, Clone, Default)]
struct FlightPick {
    /// Flight number [default: the selected flight]
    #[arg(long)]
    flight: Option<String>,

    /// Flight date, when the number repeats across days
    #[arg(long, requires = "flight")]
    date: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a flight CSV into the session
    Load { file: PathBuf },
    /// List flights with their cargo utilization
    Flights {
        #[command(flatten)]
        source: Source,
        /// Substring of flight number, origin or destination
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, value_enum, default_value_t = Status::All)]
        status: Status,
        /// Earliest flight date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        from: Option<NaiveDate>,
        /// Latest flight date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        to: Option<NaiveDate>,
        /// Aircraft type, repeatable
        #[arg(long = "aircraft")]
        aircraft: Vec<String>,
        /// ORIGIN-DEST route, repeatable
        #[arg(long = "route")]
        routes: Vec<String>,
        #[arg(long, value_enum, default_value_t = Sort::Date)]
        sort: Sort,
        /// Ascending order
        #[arg(long)]
        asc: bool,
        #[arg(long)]
        json: bool,
    },
    /// Fleet-wide totals with route and aircraft breakdowns
    Stats {
        #[command(flatten)]
        source: Source,
        #[arg(long)]
        json: bool,
    },
    /// Overweight and over-volume flights, worst first
    Alerts {
        #[command(flatten)]
        source: Source,
        /// Maximum number of alerts [default: from settings]
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long)]
        json: bool,
    },
    /// Pick the flight used by summary, place and analyze
    Select {
        flight: String,
        #[arg(long)]
        date: Option<String>,
    },
    /// Passenger, baggage and fuel breakdown for a flight
    Summary {
        #[command(flatten)]
        source: Source,
        #[command(flatten)]
        pick: FlightPick,
        /// Cargo weight in kg [default: the flight's gross cargo]
        #[arg(long)]
        cargo: Option<f64>,
        #[arg(long)]
        json: bool,
    },
    /// Place containers into the hold
    Place {
        #[command(flatten)]
        source: Source,
        #[command(flatten)]
        pick: FlightPick,
        /// JSON array of containers [default: generated from the flight's cargo]
        #[arg(long)]
        containers: Option<PathBuf>,
        /// Seed for container generation
        #[arg(long)]
        seed: Option<u64>,
        /// Write a loading plan to this file or directory
        #[arg(long)]
        export: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Model-assisted load analysis, with a static fallback
    Analyze {
        #[command(flatten)]
        source: Source,
        #[command(flatten)]
        pick: FlightPick,
        /// Seed for fallback container weights
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        json: bool,
    },
    /// Run the HTTP API
    Serve {
        /// Address to bind [default: from settings]
        #[arg(long)]
        bind: Option<String>,
    },
    /// Show the effective settings
    Config {
        /// Write the settings file with current values
        #[arg(long)]
        save: bool,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Status {
    All,
    Safe,
    Warning,
    Danger,
}

impl From<Status> for StatusFilter {
    fn from(s: Status) -> Self {
        match s {
            Status::All => StatusFilter::All,
            Status::Safe => StatusFilter::Safe,
            Status::Warning => StatusFilter::Warning,
            Status::Danger => StatusFilter::Danger,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Sort {
    Number,
    Date,
    Weight,
    Volume,
}

impl From<Sort> for SortField {
    fn from(s: Sort) -> Self {
        match s {
            Sort::Number => SortField::FlightNumber,
            Sort::Date => SortField::FlightDate,
            Sort::Weight => SortField::WeightUtilization,
            Sort::Volume => SortField::VolumeUtilization,
        }
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|e| format!("{} ({})", e, s))
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let config = ConfigBuilder::new()
        .add_filter_allow_str("skyload")
        .build();
    if let Err(e) = TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto) {
        eprintln!("Logging unavailable: {}", e);
    }
}

fn settings_path(cli: &Cli) -> PathBuf {
    cli.config.clone().unwrap_or_else(Settings::default_path)
}

fn load_settings(cli: &Cli) -> Settings {
    let mut settings = Settings::load_or_default(&settings_path(cli));
    if let Some(key) = &cli.api_key {
        settings.api_key = Some(key.clone());
    }
    if cli.ai_placement {
        settings.ai_placement_enabled = true;
    }
    settings
}

fn session_store(cli: &Cli) -> SessionStore {
    match &cli.session {
        Some(path) => SessionStore::at(path.clone()),
        None => SessionStore::default(),
    }
}

fn load_flights(source: &Source, store: &SessionStore) -> Result<Vec<FlightRecord>> {
    let flights = match &source.csv {
        Some(path) => FlightCsvParser::parse_file(path)
            .with_context(|| format!("Failed to load {:?}", path))?,
        None => store.load()?.flights,
    };
    if flights.is_empty() {
        bail!("No flights loaded. Run `skyload load <file.csv>` or pass --csv.");
    }
    Ok(flights)
}

fn pick_flight(source: &Source, pick: &FlightPick, store: &SessionStore) -> Result<FlightRecord> {
    let mut session = store.load()?;
    if source.csv.is_some() {
        session.replace_flights(load_flights(source, store)?);
    }
    match &pick.flight {
        Some(number) => Ok(session.find(number, pick.date.as_deref())?.clone()),
        None => session
            .selected_flight()
            .cloned()
            .ok_or_else(|| anyhow!("No flight selected. Pass --flight or run `skyload select`.")),
    }
}

fn read_containers(path: &Path) -> Result<Vec<Container>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    let containers: Vec<Container> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse containers in {:?}", path))?;
    for c in &containers {
        c.validate()?;
    }
    Ok(containers)
}

fn rng_from(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_flight_table(rows: &[&WeightAnalysis]) {
    println!(
        "{:<10} {:<12} {:<9} {:<18} {:>8} {:>8}  {:<7}",
        "FLIGHT", "DATE", "ROUTE", "AIRCRAFT", "WEIGHT%", "VOLUME%", "STATUS"
    );
    for a in rows {
        let marker = if a.aircraft_recognized { "" } else { "*" };
        println!(
            "{:<10} {:<12} {:<9} {:<18} {:>8.1} {:>8.1}  {}/{}",
            a.flight.flight_number,
            a.flight.flight_date,
            a.flight.route_key(),
            format!("{}{}", a.flight.aircraft_type, marker),
            a.cargo_weight_utilization,
            a.cargo_volume_utilization,
            a.weight_status.as_str(),
            a.volume_status.as_str()
        );
    }
    if rows.iter().any(|a| !a.aircraft_recognized) {
        println!("* unknown aircraft type, rated as {}", skyload_core::aircraft::AircraftType::DEFAULT);
    }
}

fn print_placement(result: &PlacementResult) {
    println!(
        "{} — capacity {}kg, balance {}/100, fwd {}kg, aft {}kg",
        result.aircraft_type,
        result.max_capacity,
        result.balance_score,
        result.forward_weight,
        result.aft_weight
    );
    for c in &result.containers {
        let state = if c.placed { "placed" } else { "UNPLACED" };
        println!(
            "  {:<16} {:>8.0}kg  {:<8} {:<8} ({:.2}, {:.2}, {:.2})",
            c.container.id, c.container.weight, c.section, state, c.position.x, c.position.y, c.position.z
        );
    }
    let overflow = result.overflow_summary();
    if overflow.unplaced_count > 0 {
        println!(
            "  {} container(s) left behind: {}kg, {:.1}m³",
            overflow.unplaced_count, overflow.unplaced_weight, overflow.unplaced_volume
        );
    }
    for s in &result.suggestions {
        println!("  - {}", s);
    }
    for w in &result.warnings {
        println!("  ! {}", w);
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let store = session_store(&cli);

    match &cli.command {
        Commands::Load { file } => {
            let flights = FlightCsvParser::parse_file(file)
                .with_context(|| format!("Failed to load {:?}", file))?;
            let analyses = analyze_all_flights(&flights);
            let stats = calculate_dashboard_stats(&analyses);

            let mut session = store.load().unwrap_or_else(|e| {
                log::warn!("Discarding unreadable session — error={:#}", e);
                Default::default()
            });
            session.replace_flights(flights);
            store.save(&session)?;

            println!(
                "Loaded {} flights from {:?} ({} overweight, {} over volume)",
                stats.total_flights, file, stats.overweight_count, stats.over_volume_count
            );
        }
        Commands::Flights {
            source,
            search,
            status,
            from,
            to,
            aircraft,
            routes,
            sort,
            asc,
            json,
        } => {
            let analyses = analyze_all_flights(&load_flights(source, &store)?);
            let query = FlightQuery {
                search: search.clone(),
                status: (*status).into(),
                date_from: *from,
                date_to: *to,
                aircraft_types: aircraft.clone(),
                routes: routes.clone(),
                sort: (*sort).into(),
                direction: if *asc {
                    SortDirection::Asc
                } else {
                    SortDirection::Desc
                },
            };
            let rows = query.apply(&analyses);
            if *json {
                print_json(&rows)?;
            } else {
                print_flight_table(&rows);
                println!("{} of {} flights", rows.len(), analyses.len());
            }
        }
        Commands::Stats { source, json } => {
            let analyses = analyze_all_flights(&load_flights(source, &store)?);
            let stats = calculate_dashboard_stats(&analyses);
            if *json {
                return print_json(&stats);
            }
            println!("Flights:            {}", stats.total_flights);
            println!("Overweight:         {}", stats.overweight_count);
            println!("Over volume:        {}", stats.over_volume_count);
            println!("Avg weight util:    {:.1}%", stats.avg_weight_utilization);
            println!("Avg volume util:    {:.1}%", stats.avg_volume_utilization);
            println!("Cargo revenue:      {:.2}", stats.total_cargo_revenue);
            println!("Fuel cost:          {:.2}", stats.total_fuel_cost);
            println!("\nRoutes:");
            for r in &stats.route_breakdown {
                println!(
                    "  {}-{:<6} {:>4} flights  {:>6.1}%  {} overweight",
                    r.origin, r.destination, r.flight_count, r.avg_weight_utilization, r.overweight_count
                );
            }
            println!("\nAircraft:");
            for a in &stats.aircraft_breakdown {
                println!(
                    "  {:<18} {:>4} flights  {:>6.1}% wt  {:>6.1}% vol  {} overweight",
                    a.aircraft_type,
                    a.flight_count,
                    a.avg_weight_utilization,
                    a.avg_volume_utilization,
                    a.overweight_count
                );
            }
        }
        Commands::Alerts {
            source,
            limit,
            json,
        } => {
            let settings = load_settings(&cli);
            let analyses = analyze_all_flights(&load_flights(source, &store)?);
            let flagged = alerts(&analyses, limit.unwrap_or(settings.alert_limit));
            if *json {
                print_json(&flagged)?;
            } else if flagged.is_empty() {
                println!("No overweight or over-volume flights.");
            } else {
                print_flight_table(&flagged);
            }
        }
        Commands::Select { flight, date } => {
            let mut session = store.load()?;
            let picked = session.select(flight, date.as_deref())?.clone();
            store.save(&session)?;
            println!(
                "Selected {} {} {} ({})",
                picked.flight_number,
                picked.flight_date,
                picked.route_key(),
                picked.aircraft_type
            );
        }
        Commands::Summary {
            source,
            pick,
            cargo,
            json,
        } => {
            let flight = pick_flight(source, pick, &store)?;
            let summary = summarize_load(&flight, cargo.unwrap_or(flight.gross_weight_cargo_kg));
            if *json {
                return print_json(&summary);
            }
            println!("{} {} {}", flight.flight_number, flight.flight_date, flight.route_key());
            println!("  Passengers:        {}kg", summary.passenger_weight);
            println!("  Baggage:           {}kg", summary.baggage_weight);
            println!("  Fuel:              {}kg", summary.fuel_weight);
            println!("  Max payload:       {}kg", summary.max_payload);
            println!("  Room for cargo:    {}kg", summary.available_for_cargo);
            let utilization = match summary.cargo_utilization {
                Some(pct) => format!("{:.1}%", pct),
                None => "no room".to_string(),
            };
            println!(
                "  Cargo:             {}kg ({}){}",
                summary.cargo_weight,
                utilization,
                if summary.is_overweight { " OVERWEIGHT" } else { "" }
            );
            println!("  Fuel cost:         {:.2}", summary.fuel_cost);
            println!("  Cargo revenue:     {:.2}", summary.cargo_revenue);
            println!("  Profit/loss:       {:.2}", summary.profit_loss);
            match summary.break_even_cargo {
                Some(kg) => println!("  Break-even cargo:  {:.0}kg", kg),
                None => println!("  Break-even cargo:  n/a"),
            }
        }
        Commands::Place {
            source,
            pick,
            containers,
            seed,
            export,
            json,
        } => {
            let settings = load_settings(&cli);
            let flight = pick_flight(source, pick, &store)?;
            let containers = match containers {
                Some(path) => read_containers(path)?,
                None => auto_generate_containers(&flight, &mut rng_from(*seed)),
            };

            let advisor = LoadAdvisor::from_settings(&settings);
            let request = PlacementRequest {
                flight_number: flight.flight_number.clone(),
                aircraft_type: flight.aircraft_type.clone(),
                containers,
            };
            let result = advisor.place(&request);

            if *json {
                print_json(&result)?;
            } else {
                print_placement(&result);
            }
            if let Some(target) = export {
                let written = LoadingPlan::new(flight, result).write_to(target)?;
                eprintln!("Loading plan written to {:?}", written);
            }
        }
        Commands::Analyze {
            source,
            pick,
            seed,
            json,
        } => {
            let settings = load_settings(&cli);
            let flight = pick_flight(source, pick, &store)?;
            let advisor = LoadAdvisor::from_settings(&settings);
            let response = advisor.analyze(&AnalysisRequest::from(&flight), &mut rng_from(*seed));

            if *json {
                return print_json(&response);
            }
            let p = &response.placement;
            println!(
                "{} {} — {:.1}% weight, {:.1}% volume, balance {}/100",
                p.flight_number, p.aircraft_type, p.weight_utilization, p.volume_utilization, p.balance_score
            );
            println!("{}", response.analysis);
            for c in &p.containers {
                println!(
                    "  {:<8} {:<20} {:>6.0}kg  {}",
                    c.container.id, c.container.name, c.container.weight, c.section
                );
            }
            for r in response.recommendations.iter().chain(&p.suggestions) {
                println!("  - {}", r);
            }
            for w in &p.warnings {
                println!("  ! {}", w);
            }
            println!(
                "Efficiency: {:.1}% now, {:.1}% achievable (+{:.1})",
                response.efficiency.current, response.efficiency.optimized, response.efficiency.improvement
            );
        }
        Commands::Serve { bind } => {
            let settings = load_settings(&cli);
            let bind_addr = bind.clone().unwrap_or_else(|| settings.bind_addr.clone());
            let state = Arc::new(server::AppState {
                advisor: LoadAdvisor::from_settings(&settings),
            });

            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?;
            println!("Serving on http://{}", bind_addr);
            runtime.block_on(server::serve(state, &bind_addr))?;
        }
        Commands::Config { save } => {
            let path = settings_path(&cli);
            let settings = load_settings(&cli);
            println!("Settings file: {:?}", path);
            println!("Session file:  {:?}", store.path());
            let mut shown = settings.clone();
            if shown.api_key.is_some() {
                shown.api_key = Some("********".to_string());
            }
            print_json(&shown)?;
            if *save {
                // Keys from the environment stay out of the file.
                let mut to_write = settings;
                if cli.api_key.is_some() {
                    to_write.api_key = Settings::load_or_default(&path).api_key;
                }
                to_write.save(&path)?;
                println!("Saved.");
            }
        }
    }

    Ok(())
}
