use std::collections::BTreeSet;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, anyhow};
use chrono::{Datelike, FixedOffset, NaiveDate};
use clap::{Parser, Subcommand};
use colored::Colorize;

use gpu_booking::domain::booking::BookingRequest;
use gpu_booking::domain::engine::BookingEngine;
use gpu_booking::domain::reservation::Reservation;
use gpu_booking::domain::time_range::{TimeRange, parse_timestamp, to_local};
use gpu_booking::domain::utils::id::{ReservationId, ResourceId};
use gpu_booking::error::Error;
use gpu_booking::{logger, open_engine};

#[derive(Parser)]
#[command(name = "gpu_booking")]
#[command(about = "Lab GPU reservation engine")]
#[command(after_help = "Times are local display time, written as 'YYYY-MM-DD HH:MM'.\nEnvironment:\n  RUST_LOG   Log verbosity (default: info)")]
struct Cli {
    /// JSON file overriding the compiled-in configuration.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Reservation table to use instead of the configured one.
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the bookable GPUs.
    Resources,
    /// List the known users.
    Users,
    /// Show all reservations in table order.
    List,
    /// Show all reservations, latest start first.
    Manage,
    /// Show who holds a GPU during a time range.
    Check {
        #[arg(long)]
        resource: String,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
    },
    /// Book a GPU.
    Reserve {
        #[arg(long)]
        user: String,
        #[arg(long)]
        resource: String,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
        #[arg(long, default_value = "")]
        project: String,
        /// Store the booking even if it overlaps existing reservations.
        #[arg(long, default_value_t = false)]
        force: bool,
    },
    /// Cancel reservations.
    Delete {
        /// Reservation ids as shown by `list`, or positions with `--by-position`.
        #[arg(required = true)]
        targets: Vec<String>,
        /// Treat the arguments as 0-based positions in `list` order.
        #[arg(long, default_value_t = false)]
        by_position: bool,
    },
    /// Utilization per GPU class for one day.
    Occupancy {
        /// Day as YYYY-MM-DD; defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Reservation counts per day of a month.
    Calendar {
        /// Month as YYYY-MM; defaults to the current month.
        #[arg(long)]
        month: Option<String>,
    },
    /// Bookings of one day, clipped to that day.
    Timetable {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    logger::init();

    let cli = Cli::parse();
    let engine = open_engine(cli.config.as_deref(), cli.data.as_deref()).context("failed to open the booking engine")?;

    run(&engine, cli.command)
}

fn run(engine: &BookingEngine, command: Command) -> anyhow::Result<ExitCode> {
    let offset = engine.display_offset();

    match command {
        Command::Resources => {
            for resource in engine.resources() {
                println!("{:<14} {}", resource.id.to_string(), resource.class);
            }
        }
        Command::Users => {
            for user in engine.users() {
                println!("{}", user);
            }
        }
        Command::List => print_reservations(&engine.list_reservations()?, offset),
        Command::Manage => print_reservations(&engine.management_listing()?, offset),
        Command::Check { resource, start, end } => {
            let range = TimeRange::new(parse_timestamp(&start, offset)?, parse_timestamp(&end, offset)?)?;
            let conflicts = engine.check_conflicts(&ResourceId::new(resource.as_str()), &range)?;

            if conflicts.is_empty() {
                println!("{}", format!("{} is free.", resource).green());
            } else {
                println!("{}", format!("{} is occupied by:", resource).yellow().bold());
                for conflict in conflicts {
                    println!("  - {}", conflict);
                }
            }
        }
        Command::Reserve { user, resource, start, end, project, force } => {
            let request = BookingRequest { user, resource_id: resource, start: parse_timestamp(&start, offset)?, end: parse_timestamp(&end, offset)?, project };
            let booking = request.validate(engine.clock().now())?;

            match engine.create_reservation(booking.user, booking.resource_id, booking.range, booking.project, force) {
                Ok(confirmation) => {
                    let prefix = if confirmation.forced { "Forced booking confirmed! " } else { "" };
                    println!("{}", format!("{}{} ({})", prefix, confirmation.message, confirmation.reservation.id).green().bold());
                }
                Err(Error::Conflict { conflicts }) => {
                    println!("{}", "Conflict detected! Slot occupied by:".yellow().bold());
                    for conflict in conflicts {
                        println!("  - {}", conflict);
                    }
                    println!("Re-run with --force to book this slot anyway.");
                    return Ok(ExitCode::from(2));
                }
                Err(e) => return Err(e.into()),
            }
        }
        Command::Delete { targets, by_position } => {
            let deleted = if by_position {
                let positions = targets.iter().map(|t| t.parse::<usize>().with_context(|| format!("'{}' is not a position", t))).collect::<anyhow::Result<BTreeSet<_>>>()?;
                engine.delete_by_position(&positions)?
            } else {
                let ids = targets.iter().map(|t| t.parse::<ReservationId>().with_context(|| format!("'{}' is not a reservation id", t))).collect::<anyhow::Result<BTreeSet<_>>>()?;
                engine.delete_reservations(&ids)?
            };
            println!("{}", format!("Deleted {} reservation(s).", deleted).green());
        }
        Command::Occupancy { date } => {
            let date = date.unwrap_or_else(|| engine.today());
            let report = engine.get_occupancy(date)?;

            println!("Occupancy on {}", date);
            for (class, percent) in &report.by_class {
                println!("  {:<10} {:>5.1}%", class.to_string(), percent);
            }
        }
        Command::Calendar { month } => {
            let (year, month) = match month {
                Some(raw) => parse_month(&raw)?,
                None => {
                    let today = engine.today();
                    (today.year(), today.month())
                }
            };

            for day in engine.month_overview(year, month)? {
                let users = day.users.iter().map(|u| u.to_string()).collect::<Vec<_>>().join(", ");
                let line = format!("{} {:?} week {} | {:>2} | {}", day.date, day.weekday, day.week_of_month, day.count, users);
                if day.count > 0 { println!("{}", line.bold()) } else { println!("{}", line) }
            }
        }
        Command::Timetable { date } => {
            let date = date.unwrap_or_else(|| engine.today());
            let entries = engine.day_timetable(date)?;

            if entries.is_empty() {
                println!("No reservations for {}.", date);
            }
            for entry in entries {
                println!("{:<14} {:>5.2}h - {:>5.2}h  {} ({}) {}", entry.resource_id.to_string(), entry.start_hour, entry.end_hour, entry.user, entry.project, entry.id);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn print_reservations(reservations: &[Reservation], offset: FixedOffset) {
    if reservations.is_empty() {
        println!("No reservations in system.");
        return;
    }

    for (position, r) in reservations.iter().enumerate() {
        println!(
            "{:>3} {:>5} {:<24} {:<14} {:<9} {} - {}  {}",
            position,
            r.id.to_string(),
            r.user.to_string(),
            r.resource_id.to_string(),
            r.resource_class.to_string(),
            to_local(r.range.start(), offset).format("%Y-%m-%d %H:%M"),
            to_local(r.range.end(), offset).format("%Y-%m-%d %H:%M"),
            r.project
        );
    }
}

fn parse_month(raw: &str) -> anyhow::Result<(i32, u32)> {
    let (year, month) = raw.split_once('-').ok_or_else(|| anyhow!("month must be written as YYYY-MM, got '{}'", raw))?;
    Ok((year.parse().context("invalid year")?, month.parse().context("invalid month")?))
}
