//! End-to-end smoke tests for the full facilityd stack.
//!
//! Each test wires the real services, the real monitor engine and the virtual
//! device gateway the same way `main` does, with tokio's clock paused.

use std::sync::Arc;
use std::time::Duration;

use facility_adapter_virtual::{JitterSensor, VirtualGateway};
use facility_app::engine::{MonitorEngine, MonitorSettings};
use facility_app::event_log::EventLog;
use facility_app::services::facility_service::FacilityService;
use facility_app::state::SharedState;
use facility_domain::error::FacilityError;
use facility_domain::facility::FacilityState;
use facility_domain::mode::OperatingMode;
use facility_domain::time::now;

fn stack() -> (Arc<VirtualGateway>, FacilityService<Arc<VirtualGateway>>) {
    let gateway = Arc::new(VirtualGateway::default());
    let service = FacilityService::new(
        Arc::clone(&gateway),
        SharedState::new(FacilityState::new(now())),
        Arc::new(EventLog::default()),
    );
    (gateway, service)
}

fn messages(service: &FacilityService<Arc<VirtualGateway>>) -> Vec<String> {
    service
        .recent_events(usize::MAX)
        .into_iter()
        .map(|e| e.message)
        .collect()
}

#[tokio::test]
async fn should_drive_virtual_devices_from_manual_commands() {
    let (gateway, service) = stack();

    service.all_systems_on().await.unwrap();
    assert!(gateway.lighting().all_on());
    assert!(gateway.door().is_energised());

    service.all_systems_off().await.unwrap();
    assert!(!gateway.lighting().all_on());
    assert!(!gateway.door().is_energised());

    assert_eq!(
        messages(&service),
        [
            "Activating all systems...",
            "Lights turned ON",
            "Door opened",
            "Deactivating all systems...",
            "Lights turned OFF",
            "Door closed",
        ]
    );
}

#[tokio::test]
async fn should_keep_logical_state_when_devices_fail() {
    let (gateway, service) = stack();
    gateway.set_failing(true);

    let err = service.manual_lights_on().await.unwrap_err();
    assert!(matches!(err, FacilityError::Transport(_)));
    assert!(service.current_state().lights_on);
    assert!(!gateway.lighting().all_on());
    assert!(
        messages(&service)
            .iter()
            .any(|m| m.starts_with("Error turning on lights"))
    );
}

#[tokio::test]
async fn should_record_probe_result() {
    let (gateway, service) = stack();
    service.probe_devices().await.unwrap();
    assert!(service.current_state().connected);

    gateway.set_failing(true);
    assert!(service.probe_devices().await.is_err());
    assert!(!service.current_state().connected);
}

#[tokio::test]
async fn should_force_band_and_lights_off_in_energy_saving() {
    let (gateway, service) = stack();
    service.manual_lights_on().await.unwrap();

    service.set_mode(OperatingMode::EnergySaving).await.unwrap();

    let snapshot = service.current_state();
    assert!(!snapshot.lights_on);
    assert!(!gateway.lighting().all_on());
    assert!((snapshot.temp_min - 18.0).abs() < f64::EPSILON);
    assert!((snapshot.temp_max - 23.0).abs() < f64::EPSILON);
    assert!(snapshot.auto_regulation);
}

#[tokio::test(start_paused = true)]
async fn should_close_door_left_open_by_operator() {
    let (gateway, service) = stack();
    service.manual_door_open().await.unwrap();

    let settings = MonitorSettings {
        door_timeout: Duration::ZERO,
        ..MonitorSettings::default()
    };
    let engine = MonitorEngine::start(
        service.state(),
        service.event_log(),
        service.actuator(),
        JitterSensor::seeded(7),
        &settings,
    );
    tokio::time::sleep(settings.door.interval + Duration::from_secs(1)).await;
    engine.shutdown().await;

    assert!(!service.current_state().door_open);
    assert!(!gateway.door().is_energised());
    assert!(
        messages(&service).contains(&"Door auto-closed after timeout".to_string())
    );
}

#[tokio::test(start_paused = true)]
async fn should_stream_log_entries_to_subscribers() {
    let (_gateway, service) = stack();
    let mut rx = service.subscribe();

    service.set_schedule("6:30", "22:00").unwrap();

    let entry = rx.recv().await.unwrap();
    assert_eq!(
        entry.message,
        "Schedule updated: Lights ON at 06:30, OFF at 22:00"
    );
}
