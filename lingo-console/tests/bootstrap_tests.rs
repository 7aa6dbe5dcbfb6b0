//! Bootstrap behavior against a recording fake session UI.

use std::sync::Mutex;

use lingo_console::{
    ConsoleConfig, ConsoleError, ROOT_ANCHOR, Result, SessionUi, Surface, ViewNode, bootstrap,
};
use lingo_transport::{ConnectParams, TransportType};

/// Fake UI that records every render call and returns a one-node tree.
#[derive(Default)]
struct RecordingUi {
    calls: Mutex<Vec<(TransportType, ConnectParams)>>,
}

impl RecordingUi {
    fn calls(&self) -> Vec<(TransportType, ConnectParams)> {
        self.calls.lock().unwrap().clone()
    }
}

impl SessionUi for RecordingUi {
    fn render(&self, transport: TransportType, params: &ConnectParams) -> Result<ViewNode> {
        self.calls.lock().unwrap().push((transport, params.clone()));
        Ok(ViewNode::new("fake-console"))
    }
}

/// Fake UI that always refuses to render.
struct FailingUi;

impl SessionUi for FailingUi {
    fn render(&self, _: TransportType, _: &ConnectParams) -> Result<ViewNode> {
        Err(ConsoleError::ui("render exploded"))
    }
}

#[test]
fn test_valid_config_mounts_exactly_one_subtree() {
    let mut surface = Surface::with_root();
    let ui = RecordingUi::default();

    bootstrap(
        &mut surface,
        &ui,
        ConsoleConfig::new("wss://rooms.example/demo", "tok-demo"),
    )
    .unwrap();

    let children = surface.children(ROOT_ANCHOR).unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].name(), "fake-console");
    assert_eq!(ui.calls().len(), 1);
}

#[test]
fn test_missing_anchor_errors_and_attaches_nothing() {
    // A surface without the root anchor: the mount target is missing.
    let mut surface = Surface::new();
    let ui = RecordingUi::default();

    let err = bootstrap(&mut surface, &ui, ConsoleConfig::default()).unwrap_err();

    assert!(matches!(err, ConsoleError::MountTargetMissing(a) if a == ROOT_ANCHOR));
    assert_eq!(surface.mounted_count(), 0);
}

#[test]
fn test_transport_discriminator_is_always_daily() {
    let ui = RecordingUi::default();

    for config in [
        ConsoleConfig::new("wss://rooms.example/a", "tok-a"),
        ConsoleConfig::new("wss://rooms.example/b", ""),
        ConsoleConfig::default(),
    ] {
        let mut surface = Surface::with_root();
        bootstrap(&mut surface, &ui, config).unwrap();
    }

    let calls = ui.calls();
    assert_eq!(calls.len(), 3);
    assert!(calls.iter().all(|(transport, _)| *transport == TransportType::Daily));
}

#[test]
fn test_params_reach_the_ui_verbatim() {
    let mut surface = Surface::with_root();
    let ui = RecordingUi::default();

    // Values chosen to catch any trimming or encoding on the way through.
    let url = "wss://rooms.example/demo?t=a b&x=%20";
    let token = "  tok-with-spaces\t";
    bootstrap(&mut surface, &ui, ConsoleConfig::new(url, token)).unwrap();

    let (_, params) = &ui.calls()[0];
    assert_eq!(params.url, url);
    assert_eq!(params.token, token);
}

#[test]
fn test_rebootstrap_after_teardown() {
    let mut surface = Surface::with_root();
    let ui = RecordingUi::default();
    let config = ConsoleConfig::new("wss://rooms.example/demo", "tok-demo");

    let first = bootstrap(&mut surface, &ui, config.clone()).unwrap();
    surface.unmount(&first).unwrap();
    assert_eq!(surface.mounted_count(), 0);

    let second = bootstrap(&mut surface, &ui, config).unwrap();
    assert_ne!(first, second);
    assert_eq!(surface.children(ROOT_ANCHOR).unwrap().len(), 1);
}

#[test]
fn test_empty_strings_pass_through_without_error() {
    let mut surface = Surface::with_root();
    let ui = RecordingUi::default();

    bootstrap(&mut surface, &ui, ConsoleConfig::new("", "")).unwrap();

    let (_, params) = &ui.calls()[0];
    assert_eq!(params.url, "");
    assert_eq!(params.token, "");
    assert_eq!(surface.children(ROOT_ANCHOR).unwrap().len(), 1);
}

#[test]
fn test_ui_failure_propagates_and_mounts_nothing() {
    let mut surface = Surface::with_root();

    let err = bootstrap(&mut surface, &FailingUi, ConsoleConfig::default()).unwrap_err();

    assert!(matches!(err, ConsoleError::Ui(msg) if msg.contains("render exploded")));
    assert_eq!(surface.mounted_count(), 0);
}
