use std::convert::Infallible;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{Request, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    serve, Form, Json, Router,
};
use minijinja::{path_loader, Environment};
use minijinja_autoreload::AutoReloader;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{error, info, warn};

use crate::completion::{Completion, OpenAiClient};
use crate::config::Config;
use crate::constants;
use crate::persona::Persona;
use crate::session::{ChatMessage, Session, Visibility};

// Shared application state
#[derive(Clone)]
pub struct AppState {
    templates: Arc<AutoReloader>,
    session: Arc<Mutex<Session>>,
    client: Arc<OpenAiClient>,
}

impl AppState {
    pub fn new(config: &Config, persona: Persona) -> Result<Self> {
        let client = OpenAiClient::new(config).context("Failed to build chat completion client")?;
        Ok(Self {
            templates: Arc::new(create_minijinja_env(&config.templates_dir)),
            session: Arc::new(Mutex::new(Session::new(persona))),
            client: Arc::new(client),
        })
    }
}

/// Sidebar fields posted with every form on the page.
#[derive(Debug, Default, Deserialize)]
pub struct SettingsForm {
    persona: Option<String>,
    role_prompt: Option<String>,
    visibility: Option<Visibility>,
}

#[derive(Debug, Deserialize)]
pub struct ChatForm {
    #[serde(default)]
    message: String,
    persona: Option<String>,
    role_prompt: Option<String>,
    visibility: Option<Visibility>,
}

impl ChatForm {
    fn split(self) -> (String, SettingsForm) {
        let settings = SettingsForm {
            persona: self.persona,
            role_prompt: self.role_prompt,
            visibility: self.visibility,
        };
        (self.message, settings)
    }
}

#[derive(Serialize)]
struct PersonaOption {
    name: &'static str,
    selected: bool,
}

fn create_minijinja_env(templates_dir: &Path) -> AutoReloader {
    let templates_dir = templates_dir.to_path_buf();
    AutoReloader::new(move |notifier| {
        let mut env = Environment::new();
        env.set_loader(path_loader(&templates_dir));
        notifier.watch_path(&templates_dir, true);
        Ok(env)
    })
}

fn apply_settings(session: &mut Session, settings: SettingsForm) {
    let mut persona_changed = false;
    if let Some(raw) = settings.persona.as_deref() {
        match raw.parse::<Persona>() {
            Ok(persona) => {
                persona_changed = persona != session.persona();
                session.set_persona(persona);
            }
            Err(e) => warn!("Ignoring persona from form: {}", e),
        }
    }
    // The textarea still holds the previous persona's text when the persona
    // switches in the same post.
    if !persona_changed {
        if let Some(prompt) = settings.role_prompt.as_deref() {
            session.set_role_prompt(prompt);
        }
    }
    if let Some(visibility) = settings.visibility {
        session.set_visibility(visibility);
    }
}

fn render_page(state: &AppState, session: &Session) -> Result<String, minijinja::Error> {
    let personas: Vec<_> = Persona::ALL
        .iter()
        .map(|p| PersonaOption {
            name: p.name(),
            selected: *p == session.persona(),
        })
        .collect();

    let raw_messages = match session.visibility() {
        Visibility::Visible => Some(
            serde_json::to_string_pretty(session.messages()).unwrap_or_else(|e| e.to_string()),
        ),
        Visibility::Hidden => None,
    };

    let env = state.templates.acquire_env()?;
    let tmpl = env.get_template("index.html")?;
    tmpl.render(minijinja::context! {
        title => constants::PAGE_TITLE,
        icon => constants::PAGE_ICON,
        model => state.client.model(),
        personas => personas,
        persona => session.persona().name(),
        role_prompt => session.role_prompt(),
        visible => session.visibility() == Visibility::Visible,
        transcript => session.transcript(),
        raw_messages => raw_messages,
        error => session.last_error(),
    })
}

async fn index_handler(State(state): State<AppState>) -> Response {
    let session = state.session.lock().await;
    match render_page(&state, &session) {
        Ok(page) => Html(page).into_response(),
        Err(e) => {
            error!("Failed to get or render template: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(format!("Internal Server Error: {}", e)),
            )
                .into_response()
        }
    }
}

async fn chat_handler(State(state): State<AppState>, Form(form): Form<ChatForm>) -> Redirect {
    let (message, settings) = form.split();
    let pending = {
        let mut session = state.session.lock().await;
        apply_settings(&mut session, settings);
        session.begin(&message)
    };
    let Some(pending) = pending else {
        return Redirect::to("/");
    };

    // The session stays unlocked while the API call is in flight.
    let outcome = state.client.complete(pending.request()).await;

    let mut session = state.session.lock().await;
    match session.finish(pending, outcome) {
        Ok(_) => info!(messages = session.messages().len(), "Exchange recorded"),
        Err(e) => error!("Chat submission failed: {}", e),
    }
    Redirect::to("/")
}

async fn settings_handler(State(state): State<AppState>, Form(form): Form<SettingsForm>) -> Redirect {
    let mut session = state.session.lock().await;
    apply_settings(&mut session, form);
    Redirect::to("/")
}

async fn reset_handler(State(state): State<AppState>) -> Redirect {
    state.session.lock().await.clear();
    Redirect::to("/")
}

async fn messages_handler(State(state): State<AppState>) -> Json<Vec<ChatMessage>> {
    Json(state.session.lock().await.messages().to_vec())
}

/// Builds the application router over `state`, serving static files from `static_dir`.
pub fn router(state: AppState, static_dir: &Path) -> Router {
    let static_files_service = ServeDir::new(static_dir).not_found_service(tower::service_fn(|_req: Request| async {
        Ok::<_, Infallible>((StatusCode::NOT_FOUND, "Not Found").into_response())
    }));

    Router::new()
        .route("/", get(index_handler))
        .route("/chat", post(chat_handler))
        .route("/settings", post(settings_handler))
        .route("/reset", post(reset_handler))
        .route("/api/messages", get(messages_handler))
        .nest_service("/static", static_files_service)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

pub async fn start_web_server(config: Config, persona: Persona, port: u16) -> Result<()> {
    let state = AppState::new(&config, persona)?;
    let app = router(state, &config.static_dir);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    info!("Web server listening on http://{} (model {})", addr, config.model);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context(format!("Failed to bind to address {}", addr))?;

    serve(listener, app.into_make_service())
        .await
        .context("Web server failed")?;

    Ok(())
}
