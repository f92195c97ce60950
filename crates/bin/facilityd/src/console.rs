//! Line-oriented operator console.
//!
//! One command per line on stdin. Live event-log entries are printed as they
//! are appended; command results and errors are printed inline.

use std::fmt::Write as _;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;

use facility_app::ports::DeviceGateway;
use facility_app::services::facility_service::FacilityService;
use facility_domain::error::FacilityError;
use facility_domain::event::LogEntry;
use facility_domain::mode::{OperatingMode, UnknownModeError};

const DEFAULT_LOG_LINES: usize = 20;

const HELP: &str = "\
commands:
  mode <manual|auto|schedule|energy-saving>
  schedule <HH:MM> <HH:MM>      lights on / off times
  schedule-enable <on|off>
  range <min> <max>             temperature band in °C
  macro <name>
  lights <on|off>
  door <open|close>
  all <on|off>
  probe                         re-check device connectivity
  status                        JSON snapshot of the facility
  log [n]                       last n event-log entries
  help
  quit";

/// A parsed console line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Mode(OperatingMode),
    Schedule { on: String, off: String },
    ScheduleEnable(bool),
    Range { min: f64, max: f64 },
    Macro(String),
    Lights(bool),
    Door(bool),
    All(bool),
    Probe,
    Status,
    Log(usize),
    Help,
    Quit,
}

/// The line could not be understood; nothing was executed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("unknown command {0:?}, type `help` for the list")]
    UnknownCommand(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error(transparent)]
    Mode(#[from] UnknownModeError),
    #[error("{value:?} is not a number")]
    Number { value: String },
}

/// What the driver should do after a command ran.
#[derive(Debug, PartialEq)]
pub enum Reply {
    /// Nothing to print beyond the log entries the command produced.
    Done,
    Text(String),
    Quit,
}

/// Parse one non-empty console line.
///
/// # Errors
///
/// Returns a [`ParseError`] for an unknown command word or malformed
/// arguments.
pub fn parse(line: &str) -> Result<Command, ParseError> {
    let mut words = line.split_whitespace();
    let Some(word) = words.next() else {
        return Err(ParseError::Usage("help"));
    };
    let args: Vec<&str> = words.collect();
    match (word.to_ascii_lowercase().as_str(), args.as_slice()) {
        ("mode", []) => Err(ParseError::Usage(
            "mode <manual|auto|schedule|energy-saving>",
        )),
        ("mode", rest) => Ok(Command::Mode(rest.join(" ").parse()?)),
        ("schedule", [on, off]) => Ok(Command::Schedule {
            on: (*on).to_string(),
            off: (*off).to_string(),
        }),
        ("schedule", _) => Err(ParseError::Usage("schedule <HH:MM> <HH:MM>")),
        ("schedule-enable", [flag]) => switch(flag, "on", "off")
            .map(Command::ScheduleEnable)
            .ok_or(ParseError::Usage("schedule-enable <on|off>")),
        ("schedule-enable", _) => Err(ParseError::Usage("schedule-enable <on|off>")),
        ("range", [min, max]) => Ok(Command::Range {
            min: number(min)?,
            max: number(max)?,
        }),
        ("range", _) => Err(ParseError::Usage("range <min> <max>")),
        ("macro", []) => Err(ParseError::Usage("macro <name>")),
        ("macro", rest) => Ok(Command::Macro(rest.join(" "))),
        ("lights", [flag]) => switch(flag, "on", "off")
            .map(Command::Lights)
            .ok_or(ParseError::Usage("lights <on|off>")),
        ("lights", _) => Err(ParseError::Usage("lights <on|off>")),
        ("door", [flag]) => switch(flag, "open", "close")
            .map(Command::Door)
            .ok_or(ParseError::Usage("door <open|close>")),
        ("door", _) => Err(ParseError::Usage("door <open|close>")),
        ("all", [flag]) => switch(flag, "on", "off")
            .map(Command::All)
            .ok_or(ParseError::Usage("all <on|off>")),
        ("all", _) => Err(ParseError::Usage("all <on|off>")),
        ("probe", []) => Ok(Command::Probe),
        ("status", []) => Ok(Command::Status),
        ("log", []) => Ok(Command::Log(DEFAULT_LOG_LINES)),
        ("log", [n]) => n
            .parse()
            .map(Command::Log)
            .map_err(|_| ParseError::Usage("log [n]")),
        ("help", _) => Ok(Command::Help),
        ("quit" | "exit", []) => Ok(Command::Quit),
        ("probe" | "status" | "quit" | "exit" | "log", _) => {
            Err(ParseError::Usage("probe | status | log [n] | quit"))
        }
        (other, _) => Err(ParseError::UnknownCommand(other.to_string())),
    }
}

fn switch(word: &str, yes: &str, no: &str) -> Option<bool> {
    if word.eq_ignore_ascii_case(yes) {
        Some(true)
    } else if word.eq_ignore_ascii_case(no) {
        Some(false)
    } else {
        None
    }
}

fn number(word: &str) -> Result<f64, ParseError> {
    word.parse().map_err(|_| ParseError::Number {
        value: word.to_string(),
    })
}

/// Run one parsed command against the service.
///
/// # Errors
///
/// Returns the service error; by then any validation failure left the state
/// untouched and any transport failure is already in the event log.
pub async fn execute<G>(
    service: &FacilityService<G>,
    command: Command,
) -> Result<Reply, FacilityError>
where
    G: DeviceGateway + Clone,
{
    match command {
        Command::Mode(mode) => service.set_mode(mode).await?,
        Command::Schedule { on, off } => service.set_schedule(&on, &off)?,
        Command::ScheduleEnable(enabled) => service.set_schedule_enabled(enabled).await?,
        Command::Range { min, max } => service.set_temperature_range(min, max)?,
        Command::Macro(name) => {
            // operators rarely type the capitalised name
            let resolved = service
                .macros()
                .names()
                .find(|known| known.eq_ignore_ascii_case(&name))
                .map_or(name, str::to_string);
            service.apply_macro(&resolved).await?;
        }
        Command::Lights(true) => service.manual_lights_on().await?,
        Command::Lights(false) => service.manual_lights_off().await?,
        Command::Door(true) => service.manual_door_open().await?,
        Command::Door(false) => service.manual_door_close().await?,
        Command::All(true) => service.all_systems_on().await?,
        Command::All(false) => service.all_systems_off().await?,
        Command::Probe => service.probe_devices().await?,
        Command::Status => {
            let snapshot = service.current_state();
            return Ok(Reply::Text(
                serde_json::to_string_pretty(&snapshot).unwrap_or_else(|err| {
                    tracing::error!(error = %err, "snapshot serialisation failed");
                    format!("{snapshot:?}")
                }),
            ));
        }
        Command::Log(limit) => {
            let mut out = String::new();
            for entry in service.recent_events(limit) {
                let _ = writeln!(out, "{entry}");
            }
            return Ok(Reply::Text(out.trim_end().to_string()));
        }
        Command::Help => {
            let macros: Vec<&str> = service.macros().names().collect();
            return Ok(Reply::Text(format!("{HELP}\nmacros: {}", macros.join(", "))));
        }
        Command::Quit => return Ok(Reply::Quit),
    }
    Ok(Reply::Done)
}

/// Read commands from `input` until `quit`, end of input or `stop` flips to
/// `true`.
///
/// `stop` is only observed while waiting for the next line: a command that
/// has started always runs to completion.
///
/// # Errors
///
/// Returns an error only when reading the input fails.
pub async fn run<G, R>(
    service: &FacilityService<G>,
    input: R,
    mut stop: watch::Receiver<bool>,
) -> std::io::Result<()>
where
    G: DeviceGateway + Clone,
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    loop {
        if *stop.borrow_and_update() {
            return Ok(());
        }
        let line = tokio::select! {
            line = lines.next_line() => line?,
            // a dropped sender never stops the console
            Ok(()) = stop.changed() => continue,
        };
        let Some(line) = line else {
            return Ok(());
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let command = match parse(line) {
            Ok(command) => command,
            Err(err) => {
                println!("? {err}");
                continue;
            }
        };
        match execute(service, command).await {
            Ok(Reply::Done) => {}
            Ok(Reply::Text(text)) => println!("{text}"),
            Ok(Reply::Quit) => return Ok(()),
            Err(err) => println!("! {}", error_message(&err)),
        }
    }
}

fn error_message(err: &FacilityError) -> String {
    match err {
        FacilityError::Validation(inner) => format!("invalid: {inner}"),
        FacilityError::Transport(inner) => format!("device error: {inner}"),
        other => other.to_string(),
    }
}

/// Print every new event-log entry on stdout until the log is dropped.
pub fn spawn_printer(rx: broadcast::Receiver<LogEntry>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut stream = BroadcastStream::new(rx);
        while let Some(item) = stream.next().await {
            match item {
                Ok(entry) => println!("{entry}"),
                Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "console fell behind the event log");
                }
            }
        }
    })
}
