//! Note routes: `/` and `/{*name}`.
//!
//! Each handler turns the HTTP request into an [`AccessRequest`], hands it
//! to the document access handler, and renders the [`Outcome`]:
//!
//! - `GET  /{name}[?q=...]`: editor (200), prompt (200), or 302 back to `/{name}`
//! - `POST /{name}`: form with `content`, `action`, `newPassword`; 200 text
//! - anything else: 405

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{header, Method, StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, MethodRouter};
use axum::{Form, Router};

use notekv_core::access::{AccessRequest, Outcome, WriteForm};
use notekv_core::name::NoteName;

use crate::error::AppError;
use crate::routes::views;
use crate::state::AppState;

/// Build the note router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", note_methods())
        .route("/{*name}", note_methods())
}

fn note_methods() -> MethodRouter<Arc<AppState>> {
    get(read_note).post(write_note).fallback(unsupported)
}

// ── Request types ────────────────────────────────────────────────────

/// Decoded `key=value` pairs of a query string or form body, in order.
///
/// Repeated keys are kept rather than rejected; a lookup takes the first.
type Pairs = Vec<(String, String)>;

fn first_value(pairs: &[(String, String)], key: &str) -> Option<String> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.clone())
}

/// Credential of a read. Anything else (like the `t` cache-buster) is
/// ignored.
fn read_credential(pairs: &[(String, String)]) -> Option<String> {
    first_value(pairs, "q")
}

/// Fields of a write form.
fn write_form(pairs: &[(String, String)]) -> WriteForm {
    WriteForm {
        content: first_value(pairs, "content"),
        action: first_value(pairs, "action"),
        new_password: first_value(pairs, "newPassword"),
    }
}

// ── Handlers ─────────────────────────────────────────────────────────

async fn read_note(
    State(state): State<Arc<AppState>>,
    uri: Uri,
    Query(params): Query<Pairs>,
) -> Result<Response, AppError> {
    let name = NoteName::from_path(uri.path(), &state.default_note)?;
    let credential = read_credential(&params);
    let outcome = state
        .access
        .handle(&name, AccessRequest::Read { credential })
        .await?;
    Ok(render(&name, &uri, outcome))
}

async fn write_note(
    State(state): State<Arc<AppState>>,
    uri: Uri,
    Form(params): Form<Pairs>,
) -> Result<Response, AppError> {
    let name = NoteName::from_path(uri.path(), &state.default_note)?;
    let outcome = state
        .access
        .handle(&name, AccessRequest::Write(write_form(&params)))
        .await?;
    Ok(render(&name, &uri, outcome))
}

async fn unsupported(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
) -> Result<Response, AppError> {
    let name = NoteName::from_path(uri.path(), &state.default_note)?;
    let outcome = state
        .access
        .handle(
            &name,
            AccessRequest::Unsupported {
                method: method.to_string(),
            },
        )
        .await?;
    Ok(render(&name, &uri, outcome))
}

// ── Rendering ────────────────────────────────────────────────────────

/// Turn an outcome into a response. Views are always 200; the re-prompt is
/// always a bare 302.
fn render(name: &NoteName, uri: &Uri, outcome: Outcome) -> Response {
    match outcome {
        Outcome::Editor { content, protected } => {
            Html(views::render_editor(name, &content, protected)).into_response()
        }
        Outcome::Prompt => Html(views::render_prompt(name)).into_response(),
        Outcome::Redirect => (
            StatusCode::FOUND,
            [(header::LOCATION, canonical_location(uri))],
        )
            .into_response(),
        Outcome::Saved => (StatusCode::OK, "Saved!").into_response(),
        Outcome::SecretSet => (StatusCode::OK, "Password set!").into_response(),
        Outcome::SecretUpdated => (StatusCode::OK, "Password updated!").into_response(),
        Outcome::SecretCleared => (StatusCode::OK, "Password cleared!").into_response(),
        Outcome::UnknownAction { action } => {
            AppError::BadRequest(format!("unknown action '{action}'")).into_response()
        }
        Outcome::MethodNotAllowed => (
            StatusCode::METHOD_NOT_ALLOWED,
            [(header::ALLOW, "GET, POST")],
            "Method not allowed",
        )
            .into_response(),
    }
}

/// The note URL without its query string.
///
/// A second leading `/` or `\` is percent-encoded so the header can never
/// read as a protocol-relative URL. The encoded form names the same note.
fn canonical_location(uri: &Uri) -> String {
    let path = uri.path();
    match path.as_bytes().get(1) {
        Some(b'/') => format!("/%2F{}", &path[2..]),
        Some(b'\\') => format!("/%5C{}", &path[2..]),
        _ => path.to_owned(),
    }
}
