//! Single binary web server: dashboard page, static assets, bracket API via REST.
//! Run with: cargo run --bin web
//! Configuration comes from the environment (see `bracket_dashboard::config`).

use actix_files::Files;
use actix_web::{
    get, post, put,
    web::{self, Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use bracket_dashboard::notify::PushListener;
use bracket_dashboard::{
    parse_team_list, spawn_bridge, BackendClient, BridgeHandle, Config, Engine, LocalFileStore,
    RoundOutcome, SnapshotStore, Tournament, TournamentError, TournamentId, WinnerEvent,
    WinnerSink,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use tokio::sync::{broadcast, Mutex};
use uuid::Uuid;

/// A bracket plus the strategy its call site persists with.
enum Session {
    /// Loaded from the backend; every transition is written back to it.
    Synced(Engine<BackendClient, BackendClient>),
    /// Created from this dashboard; the snapshot lives on local disk.
    Local(Engine<LocalFileStore, BackendClient>),
}

impl Session {
    fn tournament(&self) -> &Tournament {
        match self {
            Session::Synced(e) => e.tournament(),
            Session::Local(e) => e.tournament(),
        }
    }

    fn reset(&mut self) {
        match self {
            Session::Synced(e) => e.reset(false),
            Session::Local(e) => e.reset(true),
        }
    }
}

impl WinnerSink for Session {
    async fn declare_winner(&mut self, winner: &str) -> Result<RoundOutcome, TournamentError> {
        match self {
            Session::Synced(e) => e.declare_winner(winner),
            Session::Local(e) => e.declare_winner(winner),
        }
    }
}

/// Per-tournament entry: session, its push subscription, last activity (for auto-cleanup).
struct SessionEntry {
    session: Arc<Mutex<Session>>,
    /// Dropped together with the entry, which unsubscribes.
    _bridge: BridgeHandle,
    last_activity: Instant,
}

struct AppState {
    sessions: RwLock<HashMap<TournamentId, SessionEntry>>,
    /// Serializes loading of sessions that are not in memory yet.
    opening: Mutex<()>,
    hub: broadcast::Sender<WinnerEvent>,
    backend: BackendClient,
    local: LocalFileStore,
}

type SharedState = Data<AppState>;

impl AppState {
    fn touch(&self, id: &str) -> Option<Arc<Mutex<Session>>> {
        let mut g = self.sessions.write().ok()?;
        let entry = g.get_mut(id)?;
        entry.last_activity = Instant::now();
        Some(entry.session.clone())
    }

    /// Track a session and subscribe it to the push hub.
    fn insert(&self, id: TournamentId, session: Session) -> Result<Arc<Mutex<Session>>, HttpResponse> {
        let mut g = match self.sessions.write() {
            Ok(g) => g,
            Err(_) => {
                log::error!("Session table lock poisoned, tournament {} not tracked", id);
                return Err(HttpResponse::InternalServerError().body("lock error"));
            }
        };
        let session = Arc::new(Mutex::new(session));
        let bridge = spawn_bridge(self.hub.subscribe(), session.clone(), None);
        g.insert(
            id,
            SessionEntry {
                session: session.clone(),
                _bridge: bridge,
                last_activity: Instant::now(),
            },
        );
        Ok(session)
    }
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateTournamentBody {
    #[serde(default)]
    game_name: String,
    #[serde(default)]
    teams: Vec<String>,
    /// Comma-separated alternative to `teams`.
    #[serde(default)]
    team_names: Option<String>,
}

#[derive(Serialize)]
struct TournamentResponse<'a> {
    id: &'a str,
    tournament: &'a Tournament,
    #[serde(skip_serializing_if = "Option::is_none")]
    outcome: Option<&'a RoundOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    notice: Option<String>,
}

impl<'a> TournamentResponse<'a> {
    fn new(id: &'a str, tournament: &'a Tournament, outcome: Option<&'a RoundOutcome>) -> Self {
        Self {
            id,
            tournament,
            outcome,
            notice: outcome.and_then(RoundOutcome::notice),
        }
    }
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "bracket-dashboard",
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Find the session in memory, else load it (local file first, then backend).
async fn session_for(state: &AppState, id: &str) -> Result<Arc<Mutex<Session>>, HttpResponse> {
    if let Some(session) = state.touch(id) {
        return Ok(session);
    }
    let _opening = state.opening.lock().await;
    if let Some(session) = state.touch(id) {
        return Ok(session);
    }

    match state.local.load(id).await {
        Ok(Some(snapshot)) => {
            let (engine, _) =
                Engine::with_snapshot(id, state.local.clone(), state.backend.clone(), snapshot);
            return state.insert(id.to_string(), Session::Local(engine));
        }
        Ok(None) => {}
        Err(e) => log::warn!("Could not read local tournament {}: {}", id, e),
    }

    match state.backend.load(id).await {
        Ok(Some(snapshot)) => {
            if snapshot.game_name.is_empty() {
                log::error!("Error: game name is missing in the backend data for {}", id);
            }
            let (engine, _) =
                Engine::with_snapshot(id, state.backend.clone(), state.backend.clone(), snapshot);
            state.insert(id.to_string(), Session::Synced(engine))
        }
        Ok(None) => Err(HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" }))),
        Err(e) => {
            log::error!("Error fetching tournament details for {}: {}", id, e);
            Err(HttpResponse::BadGateway().json(serde_json::json!({ "error": e.to_string() })))
        }
    }
}

/// Create and start a locally persisted tournament from a team list.
#[post("/api/tournaments")]
async fn api_create_tournament(state: SharedState, body: Json<CreateTournamentBody>) -> HttpResponse {
    let body = body.into_inner();
    let mut names = body.teams;
    if let Some(list) = body.team_names.as_deref() {
        names.extend(parse_team_list(list));
    }
    let id = Uuid::new_v4().to_string();
    let mut engine = Engine::new(id.clone(), state.local.clone(), state.backend.clone());
    let outcome = match engine.start(body.game_name.trim(), &names) {
        Ok(outcome) => outcome,
        Err(e) => return HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    };
    let response = HttpResponse::Ok().json(TournamentResponse::new(&id, engine.tournament(), Some(&outcome)));
    match state.insert(id, Session::Local(engine)) {
        Ok(_) => response,
        Err(resp) => resp,
    }
}

/// Get a tournament by id. Touching it refreshes last_activity.
#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: SharedState, path: Path<TournamentPath>) -> HttpResponse {
    let session = match session_for(&state, &path.id).await {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let session = session.lock().await;
    HttpResponse::Ok().json(TournamentResponse::new(&path.id, session.tournament(), None))
}

/// Declare the winner of an open match.
#[put("/api/tournaments/{id}/winner")]
async fn api_declare_winner(
    state: SharedState,
    path: Path<TournamentPath>,
    body: Json<WinnerEvent>,
) -> HttpResponse {
    let session = match session_for(&state, &path.id).await {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let mut session = session.lock().await;
    match session.declare_winner(&body.winner_name).await {
        Ok(outcome) => HttpResponse::Ok().json(TournamentResponse::new(
            &path.id,
            session.tournament(),
            Some(&outcome),
        )),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// Reset to the empty pre-start state. Local tournaments also lose their stored file.
#[post("/api/tournaments/{id}/reset")]
async fn api_reset_tournament(state: SharedState, path: Path<TournamentPath>) -> HttpResponse {
    let session = match session_for(&state, &path.id).await {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let mut session = session.lock().await;
    session.reset();
    HttpResponse::Ok().json(TournamentResponse::new(&path.id, session.tournament(), None))
}

/// Inject a winner event into the push hub, as if it came from the push channel.
#[post("/api/events/winner")]
async fn api_push_winner(state: SharedState, body: Json<WinnerEvent>) -> HttpResponse {
    let delivered = state.hub.send(body.into_inner()).unwrap_or(0);
    HttpResponse::Ok().json(serde_json::json!({ "delivered": delivered }))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env();
    let bind = (config.host.clone(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);
    log::info!(
        "Backend {}, local storage {}",
        config.backend_url,
        config.storage_dir.display()
    );

    let (hub, _) = broadcast::channel(256);
    if let Some(url) = config.push_url.clone() {
        actix_web::rt::spawn(PushListener::new(url, hub.clone()).run());
    } else {
        log::info!("PUSH_URL not set, winners only arrive through the API");
    }

    let state = Data::new(AppState {
        sessions: RwLock::new(HashMap::new()),
        opening: Mutex::new(()),
        hub,
        backend: BackendClient::new(config.backend_url.clone()),
        local: LocalFileStore::new(config.storage_dir.clone()),
    });

    // Background task: every 30 minutes, drop sessions inactive for longer than the timeout
    let state_cleanup = state.clone();
    let inactivity_timeout = config.inactivity_timeout;
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.sessions.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.len();
            g.retain(|_, entry| entry.last_activity.elapsed() < inactivity_timeout);
            let removed = before - g.len();
            if removed > 0 {
                log::info!("Cleaned up {} inactive tournament session(s)", removed);
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .route("/", web::get().to(serve_index_async))
            .service(api_health)
            .service(favicon)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_declare_winner)
            .service(api_reset_tournament)
            .service(api_push_winner)
            .service(Files::new("/static", "static"))
    })
    .bind(bind)?
    .run()
    .await
}

async fn serve_index_async() -> HttpResponse {
    let html = include_str!("../../templates/index.html");
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html)
}
