use crate::error::Result;
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
};
use truck_statement::StatementRequest;

/// Body of `GET /`.
pub const USAGE: &str = "Send a POST request with JSON data to generate PDF.";
/// File name offered to the client for the rendered statement.
pub const ATTACHMENT_NAME: &str = "statement.pdf";

/// Usage hint for anything that is not a POST.
///
/// Malformed input never fails a POST, but bodies over `server.max_request_size_mb` are
/// refused with `413 Payload Too Large` before they reach [`generate_statement`].
pub async fn usage() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        USAGE,
    )
}

/// Renders the posted JSON into a statement PDF.
///
/// The body is taken as raw bytes: malformed JSON, a wrong content type or an empty body all
/// fall back to an empty request and still produce a statement.
pub async fn generate_statement(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse> {
    let request = StatementRequest::from_slice(&body);
    log::info!(
        "Statement request: {} bytes, {} trips, {} deductions",
        body.len(),
        request.trips.len(),
        request.deductions.len()
    );

    let builder = state.builder.clone();
    let statement = tokio::task::spawn_blocking(move || builder.generate(&request)).await??;

    log::info!(
        "Statement rendered: {} pages, {} bytes",
        statement.pages,
        statement.bytes.len()
    );

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", ATTACHMENT_NAME),
            ),
        ],
        statement.bytes,
    ))
}
