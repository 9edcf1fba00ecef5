//! TripPlanner - trip planning and price comparison
//!
//! CLI entry point for planning trips, browsing the catalog and comparing
//! provider prices.

use std::fs;

use chrono::{Days, Local, NaiveDate};
use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result, eyre};
use hotelcatalog::{Property, PropertyQuery};
use tracing::{debug, info};

use tripplanner::cli::{Cli, Command, OutputFormat, get_log_path};
use tripplanner::config::Config;
use tripplanner::domain::DEFAULT_CURRENCY;
use tripplanner::{Engine, PlanResult, PriceComparison, Provider, TripRequest, format_money};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Logging isn't initialized yet, so nothing here can be traced
    let log_path = get_log_path();
    if let Some(log_dir) = log_path.parent() {
        fs::create_dir_all(log_dir).context("Failed to create log directory")?;
    }

    // Priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(&log_path).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    let engine = Engine::from_config(&config).context("Failed to initialize engine")?;

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Command::Plan {
            destination,
            days,
            budget,
            interests,
            traveler_type,
            currency,
            vary_hotels,
            seed,
            format,
        } => {
            let mut request = TripRequest::new(destination, days, budget)
                .with_interests(interests)
                .with_vary_hotels(vary_hotels);
            request.traveler_type = traveler_type;
            request.currency = currency;
            request.seed = seed;
            cmd_plan(&engine, &request, format)
        }
        Command::Prices {
            property_id,
            checkin,
            checkout,
            guests,
            format,
        } => cmd_prices(&engine, &property_id, checkin, checkout, guests, format).await,
        Command::Hotels {
            city,
            min_rating,
            max_price,
            amenities,
            page,
            page_size,
            format,
        } => {
            let query = PropertyQuery {
                city,
                min_rating,
                max_price,
                amenities,
                page,
                page_size,
            };
            cmd_hotels(&engine, &query, format)
        }
        Command::Hotel { id, format } => cmd_hotel(&engine, &id, format),
        Command::Destinations { format } => cmd_destinations(&engine, format),
    }
}

fn cmd_plan(engine: &Engine, request: &TripRequest, format: OutputFormat) -> Result<()> {
    debug!(?request, ?format, "cmd_plan: called");
    let plan = engine.plan(request)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&plan)?),
        OutputFormat::Text => print_plan(&request.destination, &plan),
    }
    Ok(())
}

fn print_plan(destination: &str, plan: &PlanResult) {
    let money = |value: f64| format_money(value, &plan.currency);

    println!("{}", format!("Trip to {}", destination.trim()).bold());
    let route: Vec<String> = plan
        .route
        .iter()
        .map(|s| format!("{} ({}n)", s.city, s.nights))
        .collect();
    println!("Route: {}", route.join(" -> "));
    println!("Per-night budget: {}", money(plan.per_night_budget));
    println!();

    for day in &plan.days {
        println!("{}", format!("Day {} - {}", day.day, day.city).cyan().bold());
        match &day.hotel {
            Some(hotel) => println!(
                "  Stay: {} [{}] {} / night, rating {:.1}",
                hotel.name,
                hotel.id,
                money(hotel.price),
                hotel.rating
            ),
            None => println!("  Stay: {}", "none available".yellow()),
        }
        for activity in &day.activities {
            println!("  - {}", activity);
        }
        println!("  Daily spend: {}", money(day.daily_spend_estimate));
        if let Some(notes) = &day.notes {
            println!("  {}", notes.dimmed());
        }
    }

    println!();
    println!("Lodging:     {}", money(plan.totals.lodging));
    println!("Non-lodging: {}", money(plan.totals.non_lodging));
    let total = format!("Total:       {} of {}", money(plan.totals.trip), money(plan.totals.budget));
    if plan.totals.over_budget {
        println!("{} {}", total.red(), "(over budget)".red());
    } else {
        println!("{} ({} left)", total.green(), money(plan.totals.remaining()));
    }

    println!();
    println!("Search links:");
    for (provider, url) in &plan.fallback_links {
        println!("  {}: {}", provider.label(), url);
    }
    println!("Seed: {}", plan.seed);
}

async fn cmd_prices(
    engine: &Engine,
    property_id: &str,
    checkin: Option<NaiveDate>,
    checkout: Option<NaiveDate>,
    guests: Option<u32>,
    format: OutputFormat,
) -> Result<()> {
    debug!(%property_id, ?checkin, ?checkout, ?guests, "cmd_prices: called");
    let checkin = match checkin {
        Some(date) => date,
        None => Local::now()
            .date_naive()
            .checked_add_days(Days::new(7))
            .ok_or_else(|| eyre!("Cannot compute default check-in date"))?,
    };
    let checkout = match checkout {
        Some(date) => date,
        None => checkin
            .checked_add_days(Days::new(1))
            .ok_or_else(|| eyre!("Cannot compute default check-out date"))?,
    };

    let comparison = engine.compare_prices(property_id, checkin, checkout, guests).await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&comparison)?),
        OutputFormat::Text => {
            println!(
                "{}",
                format!("Prices for {} ({} to {})", property_id, checkin, checkout).bold()
            );
            for entry in &comparison {
                print_comparison(entry);
            }
        }
    }
    Ok(())
}

fn print_comparison(entry: &PriceComparison) {
    let label = format!("{:<12}", entry.provider.label());
    match entry.price {
        Some(price) => println!(
            "  {} {}  {}",
            label.bold(),
            format_money(price, DEFAULT_CURRENCY).green(),
            entry.url
        ),
        None => println!("  {} {}  {}", label.bold(), "no live price".yellow(), entry.url),
    }
}

fn cmd_hotels(engine: &Engine, query: &PropertyQuery, format: OutputFormat) -> Result<()> {
    debug!(?query, ?format, "cmd_hotels: called");
    let page = engine.catalog().search(query)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&page)?),
        OutputFormat::Text => {
            if page.items.is_empty() {
                println!("No properties match");
                return Ok(());
            }
            for property in &page.items {
                print_property_line(property);
            }
            println!();
            println!(
                "Page {} of {} ({} matches)",
                page.page,
                page.page_count().max(1),
                page.total
            );
        }
    }
    Ok(())
}

fn print_property_line(property: &Property) {
    println!(
        "{:<20} {:<32} {:<14} {:>10}  {:.1}",
        property.id,
        property.name,
        property.city,
        format_money(property.price, DEFAULT_CURRENCY),
        property.rating
    );
}

fn cmd_hotel(engine: &Engine, id: &str, format: OutputFormat) -> Result<()> {
    debug!(%id, ?format, "cmd_hotel: called");
    let property = engine.catalog().get_property(id)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&property)?),
        OutputFormat::Text => {
            println!("{}", property.name.bold());
            println!("Id:        {}", property.id);
            println!("City:      {}", property.city);
            println!("Price:     {} / night", format_money(property.price, DEFAULT_CURRENCY));
            println!("Rating:    {:.1}", property.rating);
            println!("Source:    {}", property.source);
            if !property.amenities.is_empty() {
                println!("Amenities: {}", property.amenities.join(", "));
            }
            println!();
            println!("Search links:");
            for provider in Provider::ALL {
                let marker = if provider.source() == property.source { " (listed)" } else { "" };
                println!("  {}{}: {}", provider.label(), marker, engine.links().build(provider, &property.name));
            }
        }
    }
    Ok(())
}

fn cmd_destinations(engine: &Engine, format: OutputFormat) -> Result<()> {
    debug!(?format, "cmd_destinations: called");
    let itineraries = &engine.reference().itineraries;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(itineraries)?),
        OutputFormat::Text => {
            for itinerary in itineraries {
                let stops: Vec<&str> = itinerary.stops.iter().map(|s| s.city.as_str()).collect();
                println!("{}", itinerary.destination.bold());
                println!("  {}", stops.join(" -> "));
                if !itinerary.aliases.is_empty() {
                    println!("  {}", format!("aliases: {}", itinerary.aliases.join(", ")).dimmed());
                }
            }
        }
    }
    Ok(())
}
