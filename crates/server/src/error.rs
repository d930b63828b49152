use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("PDF generation failed: {0}")]
    GenerationFailed(#[from] truck_statement::Error),

    #[error("Render task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        log::error!("{}", self);

        let (code, message) = match self {
            Self::GenerationFailed(_) => ("GenerationFailed", self.to_string()),
            Self::TaskFailed(_) => ("InternalError", "An internal error occurred".to_string()),
        };

        let body = Json(json!({
            "error": code,
            "message": message,
        }));

        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn generation_failures_become_json_500() {
        let error = ServiceError::from(truck_statement::Error::new(
            "page too small",
            truck_statement::ErrorKind::PageSizeExceeded,
        ));
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let body: serde_json::Value = serde_json::from_slice(&body).expect("json body");
        assert_eq!(body["error"], "GenerationFailed");
        assert!(body["message"]
            .as_str()
            .is_some_and(|message| message.starts_with("PDF generation failed")));
    }
}
