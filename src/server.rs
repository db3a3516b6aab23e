use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use tracing::{error, info, warn};

use crate::context::AppContext;
use crate::domain::repo::RepoId;
use crate::workflow::report;

pub const WEBHOOK_PATH: &str = "/api/webhook";

pub fn router(ctx: AppContext) -> Router {
    Router::new()
        .route(WEBHOOK_PATH, post(handle_webhook))
        .with_state(ctx)
}

/// Decoded `pull_request` webhook payload; only the fields the pipeline
/// needs. The pull request content itself is never used — the window's
/// changesets are re-derived from the history service.
#[derive(Debug, Deserialize)]
struct PullRequestEvent {
    action: String,
    number: u64,
    repository: Repository,
}

#[derive(Debug, Deserialize)]
struct Repository {
    name: String,
    owner: Owner,
}

#[derive(Debug, Deserialize)]
struct Owner {
    login: String,
}

/// Acknowledges the event before the pipeline finishes. The event source
/// must never redeliver because a downstream summary or mail step failed.
async fn handle_webhook(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    if let Some(secret) = ctx.config.webhook_secret.as_deref() {
        let signature = headers
            .get("x-hub-signature-256")
            .and_then(|value| value.to_str().ok());
        if !signature.is_some_and(|sig| verify_signature(secret, &body, sig)) {
            warn!("rejected webhook delivery with missing or invalid signature");
            return StatusCode::UNAUTHORIZED;
        }
    }

    let event_kind = headers
        .get("x-github-event")
        .and_then(|value| value.to_str().ok());
    if event_kind != Some("pull_request") {
        return StatusCode::NO_CONTENT;
    }

    let event: PullRequestEvent = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(err) => {
            warn!(%err, "undecodable pull_request payload");
            return StatusCode::BAD_REQUEST;
        }
    };

    if event.action != "opened" {
        return StatusCode::NO_CONTENT;
    }

    let repo = RepoId::new(event.repository.owner.login, event.repository.name);
    info!(%repo, number = event.number, "received pull_request opened event");

    tokio::spawn(async move {
        match report::run(&ctx, &repo).await {
            Ok(outcome) => info!(
                %repo,
                matched = outcome.matched_changesets,
                delivery = %outcome.delivery,
                "report pipeline finished"
            ),
            Err(failure) => error!(
                %repo,
                stage = %failure.stage,
                error = %failure.error,
                "report pipeline failed"
            ),
        }
    });

    StatusCode::ACCEPTED
}

/// Constant-time check of the `sha256=<hex>` signature header.
fn verify_signature(secret: &str, body: &[u8], signature: &str) -> bool {
    let Some(hex_digest) = signature.strip_prefix("sha256=") else {
        return false;
    };
    let Ok(expected) = hex::decode(hex_digest) else {
        return false;
    };
    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&expected).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::net::SocketAddr;
    use std::sync::Arc;

    use chrono::TimeZone;
    use chrono::Utc;

    use crate::config::AppConfig;
    use crate::domain::window::TimeWindow;
    use crate::error::AppError;
    use crate::services::generation::MockGenerationService;
    use crate::services::history::MockHistoryService;
    use crate::services::mail::MockMailService;

    fn config(secret: Option<&str>) -> AppConfig {
        let start = Utc.with_ymd_and_hms(2024, 1, 21, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 23, 0, 0, 0).unwrap();
        AppConfig {
            github_token: "token".to_string(),
            window: TimeWindow::new(start, end).unwrap(),
            openai_api_key: "key".to_string(),
            openai_model: "model".to_string(),
            max_completion_tokens: 500,
            smtp_host: "smtp.example.com".to_string(),
            smtp_username: "assistant@example.com".to_string(),
            smtp_password: "secret".to_string(),
            sender: "assistant@example.com".to_string(),
            recipient: "lead@example.com".to_string(),
            subject: "Activity report".to_string(),
            webhook_secret: secret.map(str::to_string),
            bind_addr: "127.0.0.1:0".parse::<SocketAddr>().unwrap(),
        }
    }

    fn context(secret: Option<&str>, history: MockHistoryService) -> AppContext {
        let mut generator = MockGenerationService::new();
        generator
            .expect_complete()
            .returning(|_| Ok("summary".to_string()));
        let mut mailer = MockMailService::new();
        mailer.expect_send().returning(|_| Ok("250 Ok".to_string()));
        AppContext::new(
            config(secret),
            Arc::new(history),
            Arc::new(generator),
            Arc::new(mailer),
        )
    }

    fn opened_event_body() -> Vec<u8> {
        serde_json::json!({
            "action": "opened",
            "number": 42,
            "repository": {"name": "hello-world", "owner": {"login": "octocat"}}
        })
        .to_string()
        .into_bytes()
    }

    fn event_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("x-github-event", "pull_request".parse().unwrap());
        headers
    }

    fn sign(secret: &str, body: &[u8]) -> String {
        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(body);
        format!("sha256={}", hex::encode(mac.finalize().into_bytes()))
    }

    #[test]
    fn signature_round_trip_verifies() {
        let body = b"payload";
        let signature = sign("s3cret", body);
        assert!(verify_signature("s3cret", body, &signature));
        assert!(!verify_signature("other", body, &signature));
        assert!(!verify_signature("s3cret", b"tampered", &signature));
        assert!(!verify_signature("s3cret", body, "sha256=zz"));
        assert!(!verify_signature("s3cret", body, "md5=abc"));
    }

    #[tokio::test]
    async fn opened_event_is_acknowledged_even_when_the_pipeline_fails() {
        let mut history = MockHistoryService::new();
        history.expect_closed_changesets().returning(|_| {
            Err(AppError::RemoteQuery {
                status: Some(500),
                message: "upstream down".to_string(),
            })
        });

        let status = handle_webhook(
            State(context(None, history)),
            event_headers(),
            Bytes::from(opened_event_body()),
        )
        .await;
        assert_eq!(status, StatusCode::ACCEPTED);
    }

    #[tokio::test]
    async fn non_opened_actions_are_ignored() {
        let body = serde_json::json!({
            "action": "closed",
            "number": 42,
            "repository": {"name": "hello-world", "owner": {"login": "octocat"}}
        })
        .to_string();

        let history = MockHistoryService::new();
        let status = handle_webhook(
            State(context(None, history)),
            event_headers(),
            Bytes::from(body),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn other_event_kinds_are_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert("x-github-event", "push".parse().unwrap());

        let history = MockHistoryService::new();
        let status = handle_webhook(
            State(context(None, history)),
            headers,
            Bytes::from(opened_event_body()),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn bad_signature_is_rejected_before_decoding() {
        let body = opened_event_body();
        let mut headers = event_headers();
        headers.insert(
            "x-hub-signature-256",
            sign("wrong-secret", &body).parse().unwrap(),
        );

        let history = MockHistoryService::new();
        let status = handle_webhook(
            State(context(Some("s3cret"), history)),
            headers,
            Bytes::from(body),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn undecodable_payload_is_a_bad_request() {
        let history = MockHistoryService::new();
        let status = handle_webhook(
            State(context(None, history)),
            event_headers(),
            Bytes::from_static(b"not json"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
