mod webview_surface;

use dashmap::DashMap;
use playground_host::observability::init_tracing;
use playground_host::{
    FileStore, HostConfig, HostError, InterviewSession, IsolationHost, LogEntry, Playlist,
    PlaylistBook, SessionSnapshot,
};
use playground_sandbox::{Catalog, Challenge, SandboxProfile, SourceBundle, Synthesizer};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tauri::{AppHandle, Emitter, Manager, State};
use tokio_stream::wrappers::WatchStream;
use tokio_stream::StreamExt;
use webview_surface::WebviewSurface;

const SESSION_EVENT: &str = "playground://session";

const PLAYGROUND_COMPONENT: &str = r#"function App() {
  const [count, setCount] = React.useState(0);
  console.log('rendered', count);
  return <button onClick={() => setCount(count + 1)}>Clicked {count} times</button>;
}

ReactDOM.createRoot(document.getElementById('app')).render(<App />);
"#;

const PLAYGROUND_STYLE: &str = "button { padding: 8px 16px; font-size: 14px; }\n";

/// A free-form playground or a timed interview, one per open tab.
enum Tab {
    Playground(IsolationHost<WebviewSurface>),
    Interview(InterviewSession<WebviewSurface>),
}

impl Tab {
    fn host(&self) -> &IsolationHost<WebviewSurface> {
        match self {
            Tab::Playground(host) => host,
            Tab::Interview(session) => session.host(),
        }
    }

    fn host_mut(&mut self) -> &mut IsolationHost<WebviewSurface> {
        match self {
            Tab::Playground(host) => host,
            Tab::Interview(session) => session.host_mut(),
        }
    }

    fn interview_mut(&mut self) -> Result<&mut InterviewSession<WebviewSurface>, String> {
        match self {
            Tab::Interview(session) => Ok(session),
            Tab::Playground(_) => Err("tab has no interview session".to_string()),
        }
    }
}

struct AppState {
    config: HostConfig,
    catalog: Catalog,
    tabs: DashMap<String, Tab>,
    playlists: Mutex<PlaylistBook<FileStore>>,
}

type SharedState = Arc<AppState>;

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct HintsView {
    visible: Vec<String>,
    has_more: bool,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistsView {
    playlists: Vec<Playlist>,
    active: Playlist,
}

fn playlists_view(book: &PlaylistBook<FileStore>) -> PlaylistsView {
    PlaylistsView {
        playlists: book.all().into_iter().cloned().collect(),
        active: book.active().clone(),
    }
}

fn unknown_tab(tab_id: &str) -> String {
    HostError::UnknownTab(tab_id.to_string()).to_string()
}

/// Forwards every snapshot of the tab's session clock to the frontend until the clock is dropped.
fn forward_session_events(app: AppHandle, tab_id: String, session: &InterviewSession<WebviewSurface>) {
    let mut stream = WatchStream::new(session.clock().subscribe());
    tokio::spawn(async move {
        while let Some(snapshot) = stream.next().await {
            let _ = app.emit(
                SESSION_EVENT,
                serde_json::json!({ "tabId": tab_id, "session": snapshot }),
            );
        }
    });
}

/// Tauri command: Open a tab. With a challenge id it is an interview session; otherwise a playground.
#[tauri::command]
async fn playground_open(
    challenge_id: Option<String>,
    app: AppHandle,
    state: State<'_, SharedState>,
) -> Result<String, String> {
    let tab_id = uuid::Uuid::new_v4().to_string();
    let surface = WebviewSurface::new(app.clone(), tab_id.clone());
    let tab = match challenge_id {
        Some(id) => {
            let challenge = state.catalog.require(&id).map_err(|e| e.to_string())?.clone();
            let session = InterviewSession::open(challenge, surface, &state.config)
                .map_err(|e| e.to_string())?;
            forward_session_events(app, tab_id.clone(), &session);
            Tab::Interview(session)
        }
        None => {
            let defaults = SourceBundle::new(PLAYGROUND_COMPONENT).with_style(PLAYGROUND_STYLE);
            let mut host = IsolationHost::new(
                surface,
                Synthesizer::new(state.config.assets.clone()),
                SandboxProfile::Playground,
                defaults,
            )
            .with_settle(state.config.run_settle);
            if state.config.auto_run {
                host.run_current().map_err(|e| e.to_string())?;
            }
            Tab::Playground(host)
        }
    };
    tracing::info!(tab = %tab_id, "tab opened");
    state.tabs.insert(tab_id.clone(), tab);
    Ok(tab_id)
}

#[tauri::command]
fn playground_close(tab_id: String, state: State<'_, SharedState>) -> bool {
    let closed = state.tabs.remove(&tab_id).is_some();
    if closed {
        tracing::info!(tab = %tab_id, "tab closed");
    }
    closed
}

/// Tauri command: Run the given bundle in the tab. The previous document is discarded.
#[tauri::command]
fn playground_run(
    tab_id: String,
    bundle: SourceBundle,
    state: State<'_, SharedState>,
) -> Result<u64, String> {
    let mut tab = state.tabs.get_mut(&tab_id).ok_or_else(|| unknown_tab(&tab_id))?;
    let host = tab.host_mut();
    host.run(bundle).map_err(|e| e.to_string())?;
    Ok(host.generation())
}

/// Tauri command: Restore the tab's default code and stylesheet and run them.
#[tauri::command]
fn playground_reset(tab_id: String, state: State<'_, SharedState>) -> Result<SourceBundle, String> {
    let mut tab = state.tabs.get_mut(&tab_id).ok_or_else(|| unknown_tab(&tab_id))?;
    let host = tab.host_mut();
    host.reset().map_err(|e| e.to_string())?;
    Ok(host.bundle().clone())
}

/// Tauri command: Hand a `message` event received from the tab's iframe to its host.
/// Returns the appended log entry, or null when the message was not a console message.
#[tauri::command]
fn playground_relay(
    tab_id: String,
    message: Value,
    state: State<'_, SharedState>,
) -> Result<Option<LogEntry>, String> {
    let mut tab = state.tabs.get_mut(&tab_id).ok_or_else(|| unknown_tab(&tab_id))?;
    Ok(tab.host_mut().on_message(&message).cloned())
}

#[tauri::command]
fn playground_logs(tab_id: String, state: State<'_, SharedState>) -> Result<Vec<LogEntry>, String> {
    let tab = state.tabs.get(&tab_id).ok_or_else(|| unknown_tab(&tab_id))?;
    Ok(tab.host().log().entries().to_vec())
}

/// Tauri command: Switch the interview tab to another challenge. Edits are discarded.
#[tauri::command]
async fn playground_select_exercise(
    tab_id: String,
    challenge_id: String,
    state: State<'_, SharedState>,
) -> Result<SessionSnapshot, String> {
    let challenge = state
        .catalog
        .require(&challenge_id)
        .map_err(|e| e.to_string())?
        .clone();
    let mut tab = state.tabs.get_mut(&tab_id).ok_or_else(|| unknown_tab(&tab_id))?;
    tab.interview_mut()?
        .select_exercise(challenge)
        .map_err(|e| e.to_string())
}

#[tauri::command]
fn playground_reveal_hint(tab_id: String, state: State<'_, SharedState>) -> Result<HintsView, String> {
    let mut tab = state.tabs.get_mut(&tab_id).ok_or_else(|| unknown_tab(&tab_id))?;
    let session = tab.interview_mut()?;
    session.reveal_next_hint();
    Ok(HintsView {
        visible: session.visible_hints().to_vec(),
        has_more: session.has_more_hints(),
    })
}

fn with_session<F>(state: &AppState, tab_id: &str, f: F) -> Result<SessionSnapshot, String>
where
    F: FnOnce(&mut InterviewSession<WebviewSurface>) -> Result<SessionSnapshot, HostError>,
{
    let mut tab = state.tabs.get_mut(tab_id).ok_or_else(|| unknown_tab(tab_id))?;
    f(tab.interview_mut()?).map_err(|e| e.to_string())
}

// Session commands are async so the clock's ticker is spawned on the runtime.

#[tauri::command]
async fn session_start(tab_id: String, state: State<'_, SharedState>) -> Result<SessionSnapshot, String> {
    with_session(&state, &tab_id, |s| s.start())
}

#[tauri::command]
async fn session_pause(tab_id: String, state: State<'_, SharedState>) -> Result<SessionSnapshot, String> {
    with_session(&state, &tab_id, |s| s.pause())
}

#[tauri::command]
async fn session_resume(tab_id: String, state: State<'_, SharedState>) -> Result<SessionSnapshot, String> {
    with_session(&state, &tab_id, |s| s.resume())
}

#[tauri::command]
async fn session_submit(tab_id: String, state: State<'_, SharedState>) -> Result<SessionSnapshot, String> {
    with_session(&state, &tab_id, |s| s.submit())
}

#[tauri::command]
fn catalog_list(state: State<'_, SharedState>) -> Vec<Challenge> {
    state.catalog.iter().cloned().collect()
}

#[tauri::command]
fn catalog_search(query: String, state: State<'_, SharedState>) -> Vec<Challenge> {
    state.catalog.search(&query).into_iter().cloned().collect()
}

fn lock_playlists(state: &AppState) -> std::sync::MutexGuard<'_, PlaylistBook<FileStore>> {
    state
        .playlists
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[tauri::command]
fn playlists_list(state: State<'_, SharedState>) -> PlaylistsView {
    playlists_view(&lock_playlists(&state))
}

/// Tauri command: Add a custom playlist from a link, embed link or bare id.
#[tauri::command]
fn playlists_add(
    input: String,
    name: String,
    state: State<'_, SharedState>,
) -> Result<PlaylistsView, String> {
    let mut book = lock_playlists(&state);
    book.add(&input, &name)
        .map_err(|e| e.to_string())?
        .ok_or_else(|| "Not a playlist link or id".to_string())?;
    Ok(playlists_view(&book))
}

#[tauri::command]
fn playlists_remove(id: String, state: State<'_, SharedState>) -> Result<PlaylistsView, String> {
    let mut book = lock_playlists(&state);
    book.remove(&id).map_err(|e| e.to_string())?;
    Ok(playlists_view(&book))
}

#[tauri::command]
fn playlists_select(id: String, state: State<'_, SharedState>) -> PlaylistsView {
    let mut book = lock_playlists(&state);
    book.select(&id);
    playlists_view(&book)
}

#[tauri::command]
fn get_app_version(app: AppHandle) -> String {
    app.package_info().version.to_string()
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    let config = HostConfig::from_env();
    init_tracing(&config);

    tauri::Builder::default()
        .invoke_handler(tauri::generate_handler![
            get_app_version,
            playground_open,
            playground_close,
            playground_run,
            playground_reset,
            playground_relay,
            playground_logs,
            playground_select_exercise,
            playground_reveal_hint,
            session_start,
            session_pause,
            session_resume,
            session_submit,
            catalog_list,
            catalog_search,
            playlists_list,
            playlists_add,
            playlists_remove,
            playlists_select,
        ])
        .setup(move |app| {
            let catalog = Catalog::builtin()?;
            let store = FileStore::open(&config.data_dir)?;
            tracing::info!(
                challenges = catalog.len(),
                store = %store.path().display(),
                "playground ready"
            );
            app.manage(Arc::new(AppState {
                config,
                catalog,
                tabs: DashMap::new(),
                playlists: Mutex::new(PlaylistBook::load(store)),
            }));
            #[cfg(debug_assertions)]
            {
                if let Some(window) = app.get_webview_window("main") {
                    window.open_devtools();
                }
            }
            Ok(())
        })
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
