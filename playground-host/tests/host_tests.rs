use playground_host::{
    new_session_store, ConsoleLog, FileStore, HostConfig, HostError, HostResult, InterviewSession,
    IsolationHost, KeyValueStore, MemoryStore, MemorySurface, PlaylistBook, SessionState, Surface,
};
use playground_sandbox::{
    Catalog, ConsoleLevel, ConsoleMessage, LogKind, SandboxProfile, SourceBundle,
    SynthesizedDocument, Synthesizer,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::time::Duration;

/// Stands in for the isolated realm: each load queues the payloads the shim would
/// post for that document, delivered later with `drain`.
#[derive(Default)]
struct ScriptedSurface {
    outbox: Vec<Value>,
    loads: usize,
}

impl ScriptedSurface {
    fn realm_output(document: &SynthesizedDocument) -> Vec<Value> {
        let html = document.as_str();
        let mut out = Vec::new();
        if html.contains("console.log('hi')") {
            out.push(ConsoleMessage::new(ConsoleLevel::Log, "hi").to_value());
        }
        if html.contains("throw new Error('boom')") {
            // caught by the guard and reported once
            out.push(ConsoleMessage::new(ConsoleLevel::Error, "boom").to_value());
        }
        out
    }

    fn drain(&mut self) -> Vec<Value> {
        std::mem::take(&mut self.outbox)
    }
}

impl Surface for ScriptedSurface {
    fn load(&mut self, document: &SynthesizedDocument, _profile: SandboxProfile) -> HostResult<()> {
        self.loads += 1;
        // The previous realm is gone along with anything it had queued.
        self.outbox = Self::realm_output(document);
        Ok(())
    }
}

struct FailingSurface;

impl Surface for FailingSurface {
    fn load(&mut self, _document: &SynthesizedDocument, _profile: SandboxProfile) -> HostResult<()> {
        Err(HostError::SurfaceLoad("webview closed".to_string()))
    }
}

fn scripted_host() -> IsolationHost<ScriptedSurface> {
    IsolationHost::new(
        ScriptedSurface::default(),
        Synthesizer::default(),
        SandboxProfile::Playground,
        SourceBundle::new("console.log('hi');"),
    )
}

fn deliver_all(host: &mut IsolationHost<ScriptedSurface>) {
    for message in host.surface_mut().drain() {
        host.on_message(&message);
    }
}

fn texts(log: &ConsoleLog) -> Vec<(LogKind, String)> {
    log.entries().iter().map(|e| (e.kind, e.text.clone())).collect()
}

fn manual_config() -> HostConfig {
    HostConfig {
        auto_run: false,
        ..HostConfig::default()
    }
}

// Isolation host
#[test]
fn test_log_then_throw_produces_two_ordered_entries() {
    let mut host = scripted_host();
    host.run(SourceBundle::new("console.log('hi'); throw new Error('boom')"))
        .unwrap();
    deliver_all(&mut host);

    assert_eq!(
        texts(host.log()),
        vec![
            (LogKind::Info, "hi".to_string()),
            (LogKind::Error, "boom".to_string()),
        ]
    );
    let entries = host.log().entries();
    assert!(entries[0].sequence < entries[1].sequence);
}

#[test]
fn test_run_clears_log_before_new_messages() {
    let mut host = scripted_host();
    host.run_current().unwrap();
    deliver_all(&mut host);
    assert_eq!(host.log().len(), 1);

    host.run_current().unwrap();
    assert!(host.log().is_empty());
    host.run_current().unwrap();
    assert!(host.log().is_empty());
}

#[test]
fn test_throwing_component_leaves_host_usable() {
    let mut host = scripted_host();
    host.run(SourceBundle::new("throw new Error('boom')")).unwrap();
    deliver_all(&mut host);
    assert_eq!(host.log().count_of(LogKind::Error), 1);
    assert_eq!(host.log().len(), 1);

    host.run(SourceBundle::new("console.log('hi');")).unwrap();
    deliver_all(&mut host);
    assert_eq!(texts(host.log()), vec![(LogKind::Info, "hi".to_string())]);
    assert_eq!(host.surface().loads, 2);
}

#[test]
fn test_foreign_and_malformed_messages_are_ignored() {
    let mut host = scripted_host();
    host.run_current().unwrap();
    assert!(host.on_message(&json!({ "type": "resize", "height": 320 })).is_none());
    assert!(host.on_message(&json!({ "type": "console", "logType": "log" })).is_none());
    assert!(host.on_message(&json!(null)).is_none());
    assert!(host.on_message(&json!([1, 2, 3])).is_none());
    assert!(host.log().is_empty());

    let entry = host
        .on_message(&json!({ "type": "console", "logType": "warn", "content": "slow" }))
        .unwrap();
    assert_eq!(entry.kind, LogKind::Warning);
    assert_eq!(entry.level, ConsoleLevel::Warn);
}

#[test]
fn test_stale_messages_after_rerun_are_accepted() {
    let mut host = scripted_host();
    host.run_current().unwrap();
    let stale = host.surface_mut().drain();
    host.run(SourceBundle::new("render()")).unwrap();
    for message in &stale {
        host.on_message(message);
    }
    assert_eq!(texts(host.log()), vec![(LogKind::Info, "hi".to_string())]);
}

#[test]
fn test_reset_restores_defaults_and_runs() {
    let mut host = scripted_host();
    host.set_component_source("let edited = true;");
    host.set_style_source("body { color: red }");
    host.run_current().unwrap();
    assert_eq!(host.bundle().component_source, "let edited = true;");

    host.reset().unwrap();
    assert_eq!(host.bundle(), host.defaults());
    assert_eq!(host.generation(), 2);
    deliver_all(&mut host);
    assert_eq!(texts(host.log()), vec![(LogKind::Info, "hi".to_string())]);
}

#[test]
fn test_surface_failure_is_reported() {
    let mut host = IsolationHost::new(
        FailingSurface,
        Synthesizer::default(),
        SandboxProfile::Playground,
        SourceBundle::default(),
    );
    let err = host.run_current().unwrap_err();
    assert!(matches!(err, HostError::SurfaceLoad(_)));
    assert!(host.document().is_some());
}

#[test]
fn test_document_profile_is_passed_to_surface() {
    let mut host = IsolationHost::new(
        MemorySurface::new(),
        Synthesizer::default(),
        SandboxProfile::Interview,
        SourceBundle::default(),
    );
    host.run_current().unwrap();
    assert_eq!(host.surface().current_profile(), Some(SandboxProfile::Interview));
}

// Interview sessions
#[tokio::test(start_paused = true)]
async fn test_session_times_out_after_limit() {
    let catalog = Catalog::builtin().unwrap();
    let challenge = catalog.get("iv-debounce-search").unwrap().clone();
    let limit = challenge.limit_seconds();
    let mut session = InterviewSession::open(challenge, MemorySurface::new(), &manual_config()).unwrap();

    session.start().unwrap();
    tokio::time::sleep(Duration::from_secs(u64::from(limit) + 5)).await;

    let snap = session.clock().snapshot();
    assert_eq!(snap.state, SessionState::TimedOut);
    assert_eq!(snap.remaining_seconds, 0);
    assert!(session.resume().is_err());
}

#[tokio::test(start_paused = true)]
async fn test_pause_resume_preserves_remaining() {
    let catalog = Catalog::builtin().unwrap();
    let challenge = catalog.get("iv-todo-app").unwrap().clone();
    let mut session = InterviewSession::open(challenge, MemorySurface::new(), &manual_config()).unwrap();

    session.start().unwrap();
    tokio::time::sleep(Duration::from_millis(10_500)).await;
    let paused = session.pause().unwrap();
    assert_eq!(paused.remaining_seconds, 20 * 60 - 10);

    tokio::time::sleep(Duration::from_secs(60)).await;
    let resumed = session.resume().unwrap();
    assert_eq!(resumed.remaining_seconds, paused.remaining_seconds);

    tokio::time::sleep(Duration::from_millis(2_500)).await;
    let submitted = session.submit().unwrap();
    assert_eq!(submitted.state, SessionState::Completed);
    assert_eq!(submitted.remaining_seconds, 20 * 60 - 12);
}

#[tokio::test(start_paused = true)]
async fn test_exercise_switch_resets_everything() {
    let catalog = Catalog::builtin().unwrap();
    let first = catalog.get("iv-todo-app").unwrap().clone();
    let second = catalog.get("iv-modal-component").unwrap().clone();
    let mut session = InterviewSession::open(first, MemorySurface::new(), &manual_config()).unwrap();

    session.host_mut().set_component_source("// my unsaved edits");
    session.host_mut().run_current().unwrap();
    session
        .host_mut()
        .on_message(&ConsoleMessage::new(ConsoleLevel::Log, "old").to_value());
    session.reveal_next_hint();
    session.start().unwrap();
    tokio::time::sleep(Duration::from_millis(3_500)).await;

    let snap = session.select_exercise(second.clone()).unwrap();

    assert_eq!(snap.state, SessionState::Ready);
    assert_eq!(snap.remaining_seconds, second.limit_seconds());
    assert_eq!(session.host().bundle(), &second.default_bundle());
    assert!(session.host().log().is_empty());
    assert_eq!(session.visible_hints().len(), 1);
    assert_eq!(session.challenge().id, "iv-modal-component");

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(session.clock().snapshot().remaining_seconds, second.limit_seconds());
}

#[tokio::test(start_paused = true)]
async fn test_switch_to_invalid_exercise_keeps_current_session() {
    let catalog = Catalog::builtin().unwrap();
    let current = catalog.get("iv-todo-app").unwrap().clone();
    let mut broken = catalog.get("iv-modal-component").unwrap().clone();
    broken.time_limit = 0;
    let mut session = InterviewSession::open(current, MemorySurface::new(), &manual_config()).unwrap();
    session.host_mut().set_component_source("// keep me");
    session.start().unwrap();

    let err = session.select_exercise(broken).unwrap_err();
    assert!(matches!(err, HostError::InvalidTimeLimit));
    assert_eq!(session.challenge().id, "iv-todo-app");
    assert_eq!(session.host().bundle().component_source, "// keep me");
    assert!(session.clock().is_ticking());

    tokio::time::sleep(Duration::from_millis(2_500)).await;
    assert_eq!(session.clock().snapshot().remaining_seconds, 20 * 60 - 2);
}

#[test]
fn test_session_start_outside_runtime_is_an_error() {
    let catalog = Catalog::builtin().unwrap();
    let challenge = catalog.get("iv-todo-app").unwrap().clone();
    let mut session = InterviewSession::open(challenge, MemorySurface::new(), &manual_config()).unwrap();

    assert!(matches!(session.start(), Err(HostError::NoRuntime)));
    assert_eq!(session.clock().state(), SessionState::Ready);
    assert!(!session.clock().is_ticking());
}

#[tokio::test]
async fn test_auto_run_loads_starter_code() {
    let catalog = Catalog::builtin().unwrap();
    let challenge = catalog.get("iv-todo-app").unwrap().clone();
    let session =
        InterviewSession::open(challenge.clone(), MemorySurface::new(), &HostConfig::default()).unwrap();
    let surface = session.host().surface();
    assert_eq!(surface.load_count(), 1);
    assert_eq!(surface.current_profile(), Some(SandboxProfile::Interview));
    assert!(surface
        .current()
        .unwrap()
        .as_str()
        .contains(".todo-list"));
}

#[tokio::test]
async fn test_hints_reveal_up_to_last() {
    let catalog = Catalog::builtin().unwrap();
    let challenge = catalog.get("iv-debounce-search").unwrap().clone();
    let total = challenge.hints.len();
    let mut session = InterviewSession::open(challenge, MemorySurface::new(), &manual_config()).unwrap();

    assert_eq!(session.visible_hints().len(), 1);
    for _ in 0..10 {
        session.reveal_next_hint();
    }
    assert_eq!(session.visible_hints().len(), total);
    assert!(!session.has_more_hints());
}

#[tokio::test]
async fn test_session_store_by_tab() {
    let catalog = Catalog::builtin().unwrap();
    let store = new_session_store::<MemorySurface>();
    for (tab, id) in [("tab-1", "iv-todo-app"), ("tab-2", "iv-modal-component")] {
        let challenge = catalog.get(id).unwrap().clone();
        let session = InterviewSession::open(challenge, MemorySurface::new(), &manual_config()).unwrap();
        store.insert(tab.to_string(), session);
    }
    store.get_mut("tab-1").unwrap().start().unwrap();
    assert_eq!(store.get("tab-1").unwrap().clock().state(), SessionState::Running);
    assert_eq!(store.get("tab-2").unwrap().clock().state(), SessionState::Ready);
    store.remove("tab-1");
    assert!(store.get("tab-1").is_none());
}

// Playlists
#[test]
fn test_playlist_book_add_and_remove() {
    let mut book = PlaylistBook::load(MemoryStore::new());
    assert_eq!(book.all().len(), 5);
    assert_eq!(book.active().name, "Coding Mode");

    let added = book
        .add("https://open.spotify.com/playlist/AbCdEfGhIjKlMnOpQrStUv", "   ")
        .unwrap()
        .unwrap();
    assert_eq!(added.name, "Playlist 6");
    assert_eq!(book.active(), &added);

    assert!(book.add("not a playlist", "Nope").unwrap().is_none());
    assert_eq!(book.custom().len(), 1);

    assert!(book.remove(&added.id).unwrap());
    assert_eq!(book.active().name, "Coding Mode");
    assert!(!book.remove("missing").unwrap());

    let store = book.into_store();
    assert_eq!(store.get("widget-custom-playlists").as_deref(), Some("[]"));
}

#[test]
fn test_playlist_names_are_truncated() {
    let mut book = PlaylistBook::load(MemoryStore::new());
    let long = "x".repeat(200);
    let added = book.add("6KTkmUbzqDH9WhwzkxiqbA", &long).unwrap().unwrap();
    assert_eq!(added.name.chars().count(), 80);
}

#[test]
fn test_playlists_persist_in_file_store() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut book = PlaylistBook::load(FileStore::open(dir.path()).unwrap());
        book.add("https://open.spotify.com/embed/playlist/Lofi123", "Lo-fi").unwrap();
    }
    let book = PlaylistBook::load(FileStore::open(dir.path()).unwrap());
    assert_eq!(book.custom().len(), 1);
    assert_eq!(book.custom()[0].id, "Lofi123");
    assert_eq!(book.custom()[0].name, "Lo-fi");
    // active selection is not persisted
    assert_eq!(book.active().name, "Coding Mode");
}

#[test]
fn test_corrupt_playlist_data_is_ignored() {
    let mut store = MemoryStore::new();
    store.set("widget-custom-playlists", "{broken".to_string()).unwrap();
    let book = PlaylistBook::load(store);
    assert!(book.custom().is_empty());
}
