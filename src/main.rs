use crate::engine::booking::BookingEngine;
use crate::flight::{Direction, FlightEntry};
use crate::seat::Seat;
use crate::time::Time;
use crate::traveller::{Role, Traveller};
use clap::Parser;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::{Context, Editor, Helper, Highlighter, Hinter, Validator};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::Arc;
use tabled::settings::Style;
use tabled::Tabled;

mod airline;
mod engine;
mod flight;
mod seat;
mod time;
mod traveller;

#[derive(Parser)]
struct Args {
    /// Path to the JSON scenario file
    #[arg(short, long, value_name = "FILE", default_value = "data/default.json")]
    scenario: PathBuf,
}

#[derive(Helper, Hinter, Highlighter, Validator)]
pub struct CompleteHelper {
    pub commands: Vec<String>,
}

impl Completer for CompleteHelper {
    type Candidate = Pair;

    fn complete(&self, line: &str, _pos: usize, _ctx: &Context<'_>) -> rustyline::Result<(usize, Vec<Pair>)> {
        let mut candidates = Vec::new();

        for cmd in &self.commands {
            if cmd.starts_with(line) {
                candidates.push(Pair {
                    display: cmd.clone(),
                    replacement: format!("{} ", cmd),
                });
            }
        }

        Ok((0, candidates))
    }
}

#[derive(Tabled)]
struct FlightRow {
    /// Position in the leg's registry list, the index `book` expects.
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "FLIGHT")]
    flight: String,
    #[tabled(rename = "AIRLINE")]
    airline: &'static str,
    #[tabled(rename = "CITY")]
    city: String,
    #[tabled(rename = "PLANE")]
    plane: String,
    #[tabled(rename = "WHEN")]
    when: String,
    #[tabled(rename = "LEG")]
    leg: String,
}

impl FlightRow {
    fn new(index: usize, f: &FlightEntry) -> FlightRow {
        FlightRow {
            index,
            flight: f.flight_code(),
            airline: f.airline.name(),
            city: f.city.to_string(),
            plane: f.plane_code(),
            when: f.when.to_string(),
            leg: f.direction.to_string(),
        }
    }
}

fn paginate(content: String) {
    let mut pager = Command::new("less")
        .arg("-R")
        .stdin(Stdio::piped())
        .spawn()
        // Fallback to 'more' if 'less' isn't available
        .or_else(|_| Command::new("more").stdin(Stdio::piped()).spawn())
        .expect("Failed to spawn pager");

    let mut stdin = pager.stdin.take().expect("Failed to open stdin for pager");

    if let Err(e) = stdin.write_all(content.as_bytes()) {
        // Broken pipe is common if the user quits the pager early
        if e.kind() != std::io::ErrorKind::BrokenPipe {
            eprintln!("Error writing to pager: {}", e);
        }
    }

    // Wait for the user to close the pager before returning to the ">> " prompt
    let _ = pager.wait();
}

fn fail(message: &str) {
    println!("{}", message.red());
}

fn parse_direction(arg: &str) -> Option<Direction> {
    match arg {
        "a" | "arrival" | "arrivals" => Some(Direction::Arrival),
        "d" | "departure" | "departures" => Some(Direction::Departure),
        _ => None,
    }
}

fn list_flights(engine: &BookingEngine, filter: Option<Direction>) {
    // index before sorting, so '#' matches what `book` expects per leg
    let mut flights: Vec<(usize, &FlightEntry)> = match filter {
        Some(direction) => engine.registry.flights(direction).iter().enumerate().collect(),
        None => engine
            .registry
            .arrivals()
            .iter()
            .enumerate()
            .chain(engine.registry.departures().iter().enumerate())
            .collect(),
    };
    flights.sort_by_key(|(_, f)| f.when);

    if flights.is_empty() {
        println!("No matching flights found.");
        return;
    }
    let rows: Vec<FlightRow> = flights
        .iter()
        .map(|(i, f)| FlightRow::new(*i, f))
        .collect();
    let mut table = tabled::Table::new(&rows);
    table.with(Style::rounded());
    table.with(tabled::settings::Alignment::left());
    if rows.len() > 20 {
        paginate(table.to_string());
    } else {
        println!("{}", table);
    }
}

fn add_flight(engine: &mut BookingEngine, parts: &[&str]) {
    let usage = "Usage: add <a|d> <airline_code> <city> <flight_id> <plane_id> <minutes>";
    let (Some(dir), Some(code), Some(city), Some(fid), Some(pid), Some(mins)) = (
        parts.get(1),
        parts.get(2),
        parts.get(3),
        parts.get(4),
        parts.get(5),
        parts.get(6),
    ) else {
        println!("{}", usage);
        return;
    };

    let Some(direction) = parse_direction(dir) else {
        println!("{}", usage);
        return;
    };
    let Ok(airline) = code.parse::<crate::airline::Airline>() else {
        fail("Unknown airline code (use JST, QFA, RXA, VOZ or FRE)");
        return;
    };
    let Ok(flight_id) = fid.parse::<u16>() else {
        fail("Supplied flight id is invalid");
        return;
    };
    if !(flight::MIN_FLIGHT_ID..=flight::MAX_FLIGHT_ID).contains(&flight_id) {
        fail("Supplied flight id is out of range");
        return;
    }
    let Ok(plane_id) = pid.parse::<u8>() else {
        fail("Supplied plane id is invalid");
        return;
    };
    if !(flight::MIN_PLANE_ID..=flight::MAX_PLANE_ID).contains(&plane_id) {
        fail("Supplied plane id is out of range");
        return;
    }
    let Ok(minutes) = mins.parse::<u64>() else {
        fail("Supplied time is invalid");
        return;
    };

    let entry = FlightEntry {
        airline,
        city: Arc::from(*city),
        flight_id,
        plane_id,
        when: Time(minutes),
        direction,
    };
    match engine.register_flight(entry) {
        Ok(flight) => println!(
            "Flight {} on plane {} has been added to the system.",
            flight.flight_code(),
            flight.plane_code()
        ),
        Err(e) => fail(&e.to_string()),
    }
}

fn signup(engine: &mut BookingEngine, parts: &[&str]) {
    let usage = "Usage: signup <name> <age> <mobile> <email> <password> [ff_number]";
    let (Some(name), Some(age), Some(mobile), Some(email), Some(password)) = (
        parts.get(1),
        parts.get(2),
        parts.get(3),
        parts.get(4),
        parts.get(5),
    ) else {
        println!("{}", usage);
        return;
    };

    let Ok(age) = age.parse::<u8>() else {
        fail("Supplied age is invalid");
        return;
    };
    if age > 99 {
        fail("Supplied age is out of range");
        return;
    }
    if mobile.len() != 10 || !mobile.chars().all(|c| c.is_ascii_digit()) {
        fail("Supplied mobile number is invalid");
        return;
    }

    let role = match parts.get(6) {
        Some(number) => match number.parse::<u32>() {
            Ok(number) if (100_000..=999_999).contains(&number) => Role::FrequentFlyer {
                number,
                points: 0,
            },
            _ => {
                fail("Supplied frequent flyer number is invalid");
                return;
            }
        },
        None => Role::Standard,
    };

    let frequent = matches!(role, Role::FrequentFlyer { .. });
    match engine
        .roster
        .sign_up(Traveller::new(name, age, mobile, email, password, role))
    {
        Ok(()) => println!(
            "Congratulations {}. You have registered as a {}.",
            name,
            if frequent { "frequent flyer" } else { "traveller" }
        ),
        Err(e) => fail(&e.to_string()),
    }
}

fn book(engine: &mut BookingEngine, parts: &[&str]) {
    let usage = "Usage: book <a|d> <email> <flight_index> <row:col>";
    let (Some(dir), Some(email), Some(index), Some(seat)) =
        (parts.get(1), parts.get(2), parts.get(3), parts.get(4))
    else {
        println!("{}", usage);
        return;
    };

    let Some(direction) = parse_direction(dir) else {
        println!("{}", usage);
        return;
    };
    let Ok(index) = index.parse::<usize>() else {
        fail("Supplied flight index is invalid");
        return;
    };
    let seat = match seat.parse::<Seat>() {
        Ok(seat) => seat,
        Err(e) => {
            fail(&e);
            return;
        }
    };

    match engine.book(email, direction, index, seat) {
        Ok(seat) => {
            // book() validated the index
            let flight = &engine.registry.flights(direction)[index];
            println!(
                "Booked {} flight {} to {} at {}, seat {}.",
                direction,
                flight.flight_code(),
                flight.city,
                flight.when,
                seat
            );
        }
        Err(e) => fail(&e.to_string()),
    }
}

fn show_occupant(engine: &BookingEngine, parts: &[&str]) {
    let (Some(code), Some(seat)) = (parts.get(1), parts.get(2)) else {
        println!("Usage: seat <flight_code> <row:col>");
        return;
    };
    let seat = match seat.parse::<Seat>() {
        Ok(seat) => seat,
        Err(e) => {
            fail(&e);
            return;
        }
    };
    match engine.occupant(code, seat) {
        Some(traveller) => println!("Seat {} on {} is held by {}.", seat, code, traveller.name),
        None if engine.registry.is_seat_occupied(code, seat) => {
            println!("Seat {} on {} is occupied but unattributed.", seat, code)
        }
        None => println!("Seat {} on {} is free.", seat, code),
    }
}

fn login(engine: &BookingEngine, parts: &[&str]) {
    let (Some(email), Some(password)) = (parts.get(1), parts.get(2)) else {
        println!("Usage: login <email> <password>");
        return;
    };
    if engine.roster.authenticate(email, password) {
        // find() succeeds whenever authenticate() did
        let traveller = engine.roster.find(email).unwrap();
        println!("Welcome back, {}.", traveller.name);
    } else {
        fail("Email or password incorrect");
    }
}

/// At least 8 characters with a digit, a lowercase and an uppercase letter.
fn password_ok(password: &str) -> bool {
    password.len() >= 8
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
}

fn change_password(engine: &mut BookingEngine, parts: &[&str]) {
    let (Some(email), Some(current), Some(new)) = (parts.get(1), parts.get(2), parts.get(3)) else {
        println!("Usage: passwd <email> <current_password> <new_password>");
        return;
    };
    if !engine.roster.authenticate(email, current) {
        fail("Email or password incorrect");
        return;
    }
    if !password_ok(new) {
        fail("Your password must be at least 8 characters long and contain a number, a lowercase letter and an uppercase letter");
        return;
    }
    engine.roster.find_mut(email).unwrap().set_password(new);
    println!("Password updated.");
}

fn show_points(engine: &BookingEngine, parts: &[&str]) {
    let Some(email) = parts.get(1) else {
        println!("Usage: points <email>");
        return;
    };
    let Some(traveller) = engine.roster.find(email) else {
        fail("No traveller with that email");
        return;
    };
    match traveller.points_breakdown() {
        Some((current, arrival, departure)) => {
            println!("Current points: {}", current);
            println!("Arrival leg:    {}", arrival);
            println!("Departure leg:  {}", departure);
        }
        None => fail("That traveller is not in the frequent flyer program"),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    println!(
        "Tower online. Loaded roster from {}",
        args.scenario.display()
    );

    let mut engine = BookingEngine::load_from_file(args.scenario.to_str().unwrap())?;

    let config = rustyline::Config::builder()
        .history_ignore_space(true)
        .completion_type(rustyline::CompletionType::List)
        .build();

    let helper = CompleteHelper {
        commands: vec![
            "ls".to_string(),
            "add".to_string(),
            "delay".to_string(),
            "signup".to_string(),
            "login".to_string(),
            "passwd".to_string(),
            "book".to_string(),
            "seat".to_string(),
            "points".to_string(),
            "help".to_string(),
            "exit".to_string(),
        ],
    };

    let mut rl = Editor::with_config(config)?;
    rl.set_helper(Some(helper));

    loop {
        let readline = rl.readline(">> ");
        match readline {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() { continue; }

                rl.add_history_entry(trimmed)?;

                let parts: Vec<&str> = trimmed.split_whitespace().collect();
                match parts[0] {
                    "ls" => {
                        let filter = parts.get(1).and_then(|s| parse_direction(s));
                        list_flights(&engine, filter);
                    },
                    "add" => add_flight(&mut engine, &parts),
                    "delay" => {
                        if let (Some(code), Some(mins)) = (parts.get(1), parts.get(2)) {
                            let Ok(minutes) = mins.parse::<u64>() else {
                                fail("Supplied delay is invalid");
                                continue;
                            };
                            match engine.delay_flight(code, minutes) {
                                Ok(report) => println!(
                                    "Delayed {} by {} minutes. Propagated to {} flight(s) on the same aircraft.",
                                    report.flight,
                                    report.minutes,
                                    report.propagated.len()
                                ),
                                Err(e) => fail(&e.to_string()),
                            }
                        } else {
                            println!("Usage: delay <flight_code> <minutes>");
                        }
                    },
                    "signup" => signup(&mut engine, &parts),
                    "login" => login(&engine, &parts),
                    "passwd" => change_password(&mut engine, &parts),
                    "book" => book(&mut engine, &parts),
                    "seat" => show_occupant(&engine, &parts),
                    "points" => show_points(&engine, &parts),
                    "help" | "?" => {
                        println!("\nAvailable Commands:");
                        println!("  ls [a|d]                 - List flights, optionally arrivals or departures only");
                        println!("  add <a|d> <args>         - Register a flight (see 'add' for argument order)");
                        println!("  delay <code> <m>         - Delay flight <code> by <m> minutes, cascading to its aircraft");
                        println!("  signup <args>            - Register a traveller (see 'signup' for argument order)");
                        println!("  login <email> <password> - Verify an account's credentials");
                        println!("  passwd <email> <old> <new> - Change an account's password");
                        println!("  book <a|d> <email> <i> <seat> - Book the i-th flight of a leg");
                        println!("  seat <code> <seat>       - Show who holds a seat");
                        println!("  points <email>           - Frequent flyer points breakdown");
                        println!("  help / ?                 - Show this help menu");
                        println!("  exit / quit              - Exit\n");
                    },
                    "exit" | "quit" => break,
                    _ => println!("Unknown command: {}", parts[0]),
                }
            },
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            },
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            },
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }
    Ok(())
}
