//! End-to-end scan flows through the headless front end

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use baseconnect_app::config::{CameraBackend, LookupBackend};
use baseconnect_app::lookup::CatalogEquipmentStore;
use baseconnect_app::Settings;
use baseconnect_camera::test_utils::{FrameStep, ScriptedDecoder, ScriptedProvider};
use baseconnect_core::FacingMode;
use baseconnect_scan::{run_with, HeadlessOptions, RunMode};

const CATALOG: &str = r#"{"epis":[
    {"id":"42","nom":"Casque F1","etat":"Actif","code_barre":"1234567890123"},
    {"id":"7","nom":"Veste textile","etat":"Réformé","code_barre":"EPI-0007"}
]}"#;

fn catalog(dir: &Path) -> CatalogEquipmentStore {
    let path = dir.join("epis.json");
    std::fs::write(&path, CATALOG).unwrap();
    CatalogEquipmentStore::load(&path).unwrap()
}

fn settings() -> Settings {
    let mut settings = Settings::default();
    settings.scanner.poll_interval_ms = 10;
    settings
}

fn once() -> RunMode {
    RunMode::Headless(HeadlessOptions {
        exit_after_result: true,
    })
}

async fn scan(provider: ScriptedProvider, settings: Settings) -> Option<String> {
    let dir = tempfile::tempdir().unwrap();
    let lookup = catalog(dir.path());

    tokio::time::timeout(
        Duration::from_secs(10),
        run_with(settings, provider, Arc::new(ScriptedDecoder), lookup, once()),
    )
    .await
    .expect("scan did not settle in time")
    .expect("scan failed")
}

#[tokio::test]
async fn test_known_code_releases_camera() {
    let provider = ScriptedProvider::new().with_script(
        FacingMode::Environment,
        vec![
            FrameStep::Empty,
            FrameStep::Blank,
            FrameStep::Symbol("1234567890123".into()),
        ],
    );

    let handoff = scan(provider.clone(), settings()).await;

    assert_eq!(handoff, None);
    assert_eq!(provider.acquisitions(), 1);
    assert_eq!(provider.live_streams(), 0);
    assert_eq!(provider.max_live_streams(), 1);
}

#[tokio::test]
async fn test_unknown_code_releases_camera() {
    let provider = ScriptedProvider::new().with_script(
        FacingMode::Environment,
        vec![FrameStep::Symbol("UNKNOWN-CODE".into())],
    );

    scan(provider.clone(), settings()).await;

    assert_eq!(provider.live_streams(), 0);
}

#[tokio::test]
async fn test_permission_denied_never_binds_a_stream() {
    let provider = ScriptedProvider::new();
    provider.fail_next_acquire("NotAllowedError: Permission denied");

    scan(provider.clone(), settings()).await;

    assert_eq!(provider.acquisitions(), 0);
    assert_eq!(provider.max_live_streams(), 0);
}

#[tokio::test]
async fn test_front_camera_from_settings() {
    let provider = ScriptedProvider::new()
        .with_script(FacingMode::User, vec![FrameStep::Symbol("EPI-0007".into())]);
    let mut settings = settings();
    settings.scanner.default_facing = FacingMode::User;

    scan(provider.clone(), settings).await;

    assert_eq!(provider.acquired_facings(), vec![FacingMode::User]);
    assert_eq!(provider.live_streams(), 0);
}

#[tokio::test]
async fn test_frames_backend_requires_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("epis.json"), CATALOG).unwrap();

    let mut settings = settings();
    settings.camera.backend = CameraBackend::Frames;
    settings.lookup.backend = LookupBackend::Catalog;
    settings.lookup.catalog_path = Some(dir.path().join("epis.json"));

    let err = baseconnect_scan::run(settings, once()).await.unwrap_err();
    assert!(err.to_string().contains("frames_dir"));
}

#[tokio::test]
async fn test_rest_backend_requires_url() {
    let mut settings = settings();
    settings.camera.backend = CameraBackend::Frames;
    settings.lookup.base_url = None;

    assert!(baseconnect_scan::run(settings, once()).await.is_err());
}
