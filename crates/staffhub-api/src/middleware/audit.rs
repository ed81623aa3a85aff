//! Audit capture middleware for privileged write routes.
//!
//! Declarative interceptor composition: the layer buffers the request
//! body, runs the inner handler, buffers the response body, restores both,
//! and hands the record to the audit service. The response that was going
//! to be sent is sent unchanged whether or not the audit write succeeds.

use axum::body::{Body, to_bytes};
use axum::extract::{FromRequestParts, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use bytes::Bytes;

use staffhub_entity::audit::model::CreateAuditRecord;

use crate::extractors::AuthUser;
use crate::state::AppState;

/// Records one audit entry per request passing through this layer.
pub async fn capture_audit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let (mut parts, body) = request.into_parts();
    let auth = AuthUser::from_request_parts(&mut parts, &state).await.ok();
    let method = parts.method.clone();
    let path = parts.uri.path().to_string();

    let request_bytes = buffer_body(body).await;
    let request = Request::from_parts(parts, Body::from(request_bytes.clone()));

    let response = next.run(request).await;

    let (response_parts, response_body) = response.into_parts();
    let status_code = response_parts.status.as_u16() as i32;
    let response_bytes = buffer_body(response_body).await;
    let response = Response::from_parts(response_parts, Body::from(response_bytes.clone()));

    if let Some(auth) = auth {
        let cap = state.config.audit.max_body_bytes;
        let record = CreateAuditRecord {
            user_id: auth.user_id,
            action: format!("{method} {path}"),
            status_code,
            ip_address: Some(auth.ip_address.clone()),
            user_agent: auth.user_agent.clone(),
            request_body: capture_json(&request_bytes, cap),
            response_body: capture_json(&response_bytes, cap),
        };
        state.audit_service.record(record);
    }

    response
}

async fn buffer_body(body: Body) -> Bytes {
    to_bytes(body, usize::MAX).await.unwrap_or_default()
}

fn capture_json(bytes: &Bytes, cap: usize) -> Option<serde_json::Value> {
    if bytes.is_empty() || bytes.len() > cap {
        return None;
    }
    serde_json::from_slice(bytes).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_json_respects_cap() {
        let small = Bytes::from_static(br#"{"reason":"manual"}"#);
        assert!(capture_json(&small, 1024).is_some());
        assert!(capture_json(&small, 4).is_none());
        assert!(capture_json(&Bytes::new(), 1024).is_none());
        assert!(capture_json(&Bytes::from_static(b"not json"), 1024).is_none());
    }
}
