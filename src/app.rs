use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::routes::{health::health, index::index, switch::switch_team};
use crate::services::team_switcher::TeamSwitcher;
use crate::settings::Settings;

pub fn build_router(settings: Arc<Settings>, switcher: Arc<TeamSwitcher>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/switch/{mode}", post(switch_team))
        .route("/health", get(health))
        .layer(Extension(settings))
        .layer(Extension(switcher))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::aircall_client::{AircallClient, TeamApi};
    use crate::services::team_switcher::fake::{Reply, ScriptedApi};
    use crate::settings::test_settings;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::Response,
    };
    use base64::{engine::general_purpose::STANDARD, Engine};
    use serde_json::Value;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn router_with(api: Arc<dyn TeamApi>, settings: Settings) -> Router {
        let switcher = Arc::new(TeamSwitcher::new(api, &settings));
        build_router(Arc::new(settings), switcher)
    }

    fn basic(user: &str, pass: &str) -> String {
        format!("Basic {}", STANDARD.encode(format!("{}:{}", user, pass)))
    }

    fn request(method: &str, uri: &str, auth: Option<String>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(auth) = auth {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn body_string(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn body_json(response: Response) -> Value {
        serde_json::from_str(&body_string(response).await).unwrap()
    }

    #[tokio::test]
    async fn test_health_needs_no_auth() {
        let app = router_with(Arc::new(ScriptedApi::new(vec![])), test_settings());

        let response = app.oneshot(request("GET", "/health", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, serde_json::json!({ "ok": true }));
    }

    #[tokio::test]
    async fn test_index_without_credentials_is_challenged() {
        let app = router_with(Arc::new(ScriptedApi::new(vec![])), test_settings());

        let response = app.oneshot(request("GET", "/", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers().get(header::WWW_AUTHENTICATE).unwrap(), "Basic");
    }

    #[tokio::test]
    async fn test_index_with_wrong_password_is_challenged() {
        let app = router_with(Arc::new(ScriptedApi::new(vec![])), test_settings());

        let response = app
            .oneshot(request("GET", "/", Some(basic("admin", "wrong"))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().contains_key(header::WWW_AUTHENTICATE));
    }

    #[tokio::test]
    async fn test_index_with_wrong_username_is_challenged() {
        let app = router_with(Arc::new(ScriptedApi::new(vec![])), test_settings());

        let response = app
            .oneshot(request("GET", "/", Some(basic("mallory", "secret"))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().contains_key(header::WWW_AUTHENTICATE));
    }

    #[tokio::test]
    async fn test_index_with_credentials_shows_ids() {
        let app = router_with(Arc::new(ScriptedApi::new(vec![])), test_settings());

        let response = app
            .oneshot(request("GET", "/", Some(basic("admin", "secret"))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("cs-team"));
        assert!(html.contains("tech-team"));
        assert!(html.contains("nina"));
    }

    #[tokio::test]
    async fn test_switch_requires_auth_before_anything_else() {
        let api = Arc::new(ScriptedApi::new(vec![]));
        let app = router_with(api.clone(), test_settings());

        let response = app
            .oneshot(request("POST", "/switch/kundeservice", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_switch_bogus_mode_is_bad_request_without_calls() {
        let api = Arc::new(ScriptedApi::new(vec![]));
        let app = router_with(api.clone(), test_settings());

        let response = app
            .oneshot(request("POST", "/switch/bogus", Some(basic("admin", "secret"))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["detail"], "Invalid mode");
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_switch_success() {
        let api = Arc::new(ScriptedApi::new(vec![(201, ""), (204, "")]));
        let app = router_with(api.clone(), test_settings());

        let response = app
            .oneshot(request("POST", "/switch/teknisk", Some(basic("admin", "secret"))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "ok": true, "mode": "teknisk" })
        );
        assert_eq!(api.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_switch_upstream_rejection_is_500_with_details() {
        let api = Arc::new(ScriptedApi::new(vec![(500, "aircall down")]));
        let app = router_with(api.clone(), test_settings());

        let response = app
            .oneshot(request("POST", "/switch/kundeservice", Some(basic("admin", "secret"))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await["detail"],
            "Aircall add failed: 500 aircall down"
        );
        assert_eq!(api.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_switch_transport_failure_is_generic_500() {
        let api = Arc::new(ScriptedApi::with_replies(vec![Reply::Unreachable]));
        let app = router_with(api.clone(), test_settings());

        let response = app
            .oneshot(request("POST", "/switch/kundeservice", Some(basic("admin", "secret"))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await["detail"],
            "Unexpected error while contacting Aircall"
        );
        assert_eq!(api.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_switch_against_aircall_mock() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/teams/cs-team/users/nina"))
            .respond_with(ResponseTemplate::new(409))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/teams/tech-team/users/nina"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let mut settings = test_settings();
        settings.aircall_base_url = server.uri();
        let api = Arc::new(AircallClient::new(&settings).unwrap());
        let app = router_with(api, settings);

        let response = app
            .oneshot(request("POST", "/switch/kundeservice", Some(basic("admin", "secret"))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["mode"], "kundeservice");
    }
}
