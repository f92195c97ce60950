//! # facilityd — facility controller daemon
//!
//! Composition root that wires the adapters together and runs the controller.
//!
//! ## Responsibilities
//! - Parse configuration (CLI argument, env vars, config file)
//! - Initialise tracing
//! - Select the device gateway (serial links or virtual devices)
//! - Construct the shared state, event log and application services
//! - Start the monitors and probe the devices
//! - Drive the operator console on stdin
//! - Stop every monitor on `quit`, end of input or Ctrl-C
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;
mod console;
mod gateway;

use std::path::PathBuf;
use std::sync::Arc;

use facility_adapter_virtual::JitterSensor;
use facility_app::engine::MonitorEngine;
use facility_app::event_log::EventLog;
use facility_app::services::facility_service::FacilityService;
use facility_app::state::SharedState;
use facility_domain::time::now;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::gateway::AnyGateway;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = Config::load(path.as_deref())?;

    let filter = EnvFilter::try_new(&config.logging.filter).unwrap_or_else(|err| {
        eprintln!("invalid log filter {:?}: {err}", config.logging.filter);
        EnvFilter::new("info")
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // State
    let state = SharedState::new(config.facility.initial_state(now())?);
    let log = Arc::new(EventLog::default());

    // Devices
    let gateway = Arc::new(AnyGateway::from_config(&config.gateway));
    tracing::info!(gateway = %gateway.describe(), "device gateway selected");

    // Services
    let service = FacilityService::new(gateway, state, log);
    let printer = console::spawn_printer(service.subscribe());
    service.event_log().info("System initialized");

    // Monitors
    let engine = MonitorEngine::start(
        service.state(),
        service.event_log(),
        service.actuator(),
        JitterSensor::default(),
        &config.monitors.settings(),
    );

    // a failed probe is already in the event log
    let _ = service.probe_devices().await;

    // Ctrl-C stops the console between commands, never during one
    let (stop, stop_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("received shutdown signal");
                let _ = stop.send(true);
            }
            Err(err) => tracing::error!(error = %err, "failed to listen for shutdown signal"),
        }
    });

    println!("facilityd ready, type `help` for commands");
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    if let Err(err) = console::run(&service, stdin, stop_rx).await {
        tracing::error!(error = %err, "console input failed");
    }

    engine.shutdown().await;
    // the printer ends once the last handle on the event log is gone
    drop(service);
    if let Err(err) = printer.await {
        tracing::error!(error = %err, "console printer failed");
    }
    tracing::info!("facilityd stopped");
    // a stdin read interrupted by Ctrl-C would keep the runtime from exiting
    std::process::exit(0)
}
