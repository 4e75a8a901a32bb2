//! The single-page web front end.

use std::future::Future;
use std::net::SocketAddr;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::info;

use crate::query::QueryService;
use crate::{Error, ErrorKind};

pub const PAGE_TITLE: &str = "Q&A Demo";
pub const PAGE_HEADER: &str = "Gemini LLM Application";
pub const SUBMIT_LABEL: &str = "Ask the question";
pub const RESPONSE_HEADING: &str = "The Response is";

/// Build the application router.
pub fn router(service: QueryService) -> Router {
    Router::new()
        .route("/", get(index).post(ask_form))
        .route("/api/ask", post(ask_json))
        .route("/healthz", get(healthz))
        .with_state(service)
}

/// Bind `addr` and serve until `shutdown` resolves.
pub async fn serve<F>(service: QueryService, addr: SocketAddr, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown)
        .await
}

#[derive(Debug, Deserialize)]
struct AskForm {
    #[serde(default)]
    input: String,
}

#[derive(Debug, Deserialize)]
struct AskRequest {
    #[serde(default)]
    prompt: String,
}

#[derive(Debug, Serialize)]
struct AskResponse {
    response: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Serialize)]
struct ErrorDetail {
    kind: ErrorKind,
    message: &'static str,
}

/// Error wrapper that renders as a JSON body with a status per kind.
struct ApiError(Error);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.0.kind();
        let body = ErrorBody {
            error: ErrorDetail {
                kind,
                message: kind.user_message(),
            },
        };
        (status_for(kind), Json(body)).into_response()
    }
}

fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Configuration => StatusCode::INTERNAL_SERVER_ERROR,
        ErrorKind::Transport => StatusCode::BAD_GATEWAY,
        ErrorKind::EmptyResponse => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

async fn index() -> Html<String> {
    Html(render_page("", None))
}

async fn ask_form(
    State(service): State<QueryService>,
    Form(form): Form<AskForm>,
) -> (StatusCode, Html<String>) {
    let outcome = service.submit(form.input.as_str()).await;
    let status = match &outcome {
        Ok(_) => StatusCode::OK,
        Err(e) => status_for(e.kind()),
    };
    (status, Html(render_page(&form.input, Some(&outcome))))
}

async fn ask_json(
    State(service): State<QueryService>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>, ApiError> {
    let response = service.submit(request.prompt).await.map_err(ApiError)?;
    Ok(Json(AskResponse { response }))
}

async fn healthz() -> &'static str {
    "ok"
}

/// Render the page, optionally with the outcome of the last submission.
pub fn render_page(input: &str, outcome: Option<&Result<String, Error>>) -> String {
    let result_section = match outcome {
        None => String::new(),
        Some(Ok(text)) => format!(
            "<section class=\"response\">\n<h2>{RESPONSE_HEADING}</h2>\n<pre>{}</pre>\n</section>\n",
            escape_html(text)
        ),
        Some(Err(e)) => format!(
            "<section class=\"error\" data-kind=\"{}\">\n<p>{}</p>\n</section>\n",
            e.kind().as_str(),
            escape_html(e.kind().user_message())
        ),
    };

    format!(
        "<!DOCTYPE html>
<html lang=\"en\">
<head>
<meta charset=\"utf-8\">
<title>{}</title>
</head>
<body>
<h1>{PAGE_HEADER}</h1>
<form method=\"post\" action=\"/\">
<label for=\"input\">Input: </label>
<input type=\"text\" id=\"input\" name=\"input\" value=\"{}\">
<button type=\"submit\">{SUBMIT_LABEL}</button>
</form>
{result_section}</body>
</html>
",
        escape_html(PAGE_TITLE),
        escape_html(input)
    )
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
