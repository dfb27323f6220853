use crate::{
    application::app::Application,
    domain::{
        errors::{ActionError, ValidationError},
        models::{
            ActionErrorResponse, ActionGetResponse, ActionKind, ActionPostRequest,
            ActionPostResponse, ActionsJson,
        },
        validation::{parse_memo, parse_mint, parse_transfer, QueryParams},
    },
    infrastructure::shutdown::ShutdownChannel,
    service::actions::{actions_json, describe},
};
use anyhow::Context;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, HeaderMap, HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use tokio::sync::broadcast;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    set_header::SetResponseHeaderLayer,
};

/// Solana Actions protocol version this server implements.
pub const ACTION_VERSION: &str = "2.4";

/// CORS policy applied to every route. Every `OPTIONS` request is answered from it.
#[derive(Clone, Debug)]
pub struct CorsConfig {
    pub allow_origin: String,
    pub allow_methods: Vec<String>,
    pub allow_headers: Vec<String>,
    pub expose_headers: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origin: "*".to_string(),
            allow_methods: vec!["GET".into(), "POST".into(), "OPTIONS".into()],
            allow_headers: vec!["Content-Type".into()],
            expose_headers: vec!["X-Action-Version".into(), "X-Blockchain-Ids".into()],
        }
    }
}

impl CorsConfig {
    pub fn layer(&self) -> anyhow::Result<CorsLayer> {
        let allow_origin = if self.allow_origin == "*" {
            AllowOrigin::any()
        } else {
            AllowOrigin::exact(HeaderValue::from_str(&self.allow_origin)?)
        };
        let methods = self
            .allow_methods
            .iter()
            .map(|m| Method::from_bytes(m.as_bytes()).with_context(|| format!("bad method {m}")))
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(CorsLayer::new()
            .allow_origin(allow_origin)
            .allow_methods(methods)
            .allow_headers(header_names(&self.allow_headers)?)
            .expose_headers(header_names(&self.expose_headers)?))
    }
}

fn header_names(names: &[String]) -> anyhow::Result<Vec<HeaderName>> {
    names
        .iter()
        .map(|n| HeaderName::from_bytes(n.as_bytes()).with_context(|| format!("bad header {n}")))
        .collect()
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub listen_port: u16,
    /// CAIP-2 id of the cluster transactions are built for
    pub blockchain_id: String,
    pub cors: CorsConfig,
}

pub fn router<A>(app: Arc<A>, config: &ServerConfig) -> anyhow::Result<Router>
where
    A: Application + Send + Sync + 'static,
{
    let blockchain_ids = HeaderValue::from_str(&config.blockchain_id)?;

    Ok(Router::new()
        .route("/actions.json", get(get_actions_json))
        .route(
            "/api/actions/:action",
            get(get_action).post(post_action::<A>),
        )
        .with_state(app)
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-action-version"),
            HeaderValue::from_static(ACTION_VERSION),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-blockchain-ids"),
            blockchain_ids,
        ))
        .layer(config.cors.layer()?))
}

pub async fn start_server<A>(
    shutdown: broadcast::Sender<()>,
    app: Arc<A>,
    config: ServerConfig,
) -> anyhow::Result<()>
where
    A: Application + Send + Sync + 'static,
{
    let app = router(app, &config)?;

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.listen_port)).await?;

    tracing::info!("API server started on port {}", config.listen_port);

    axum::serve(listener, app)
        .with_graceful_shutdown(ShutdownChannel::new(shutdown).signal())
        .await?;

    tracing::warn!("API server received shutdown signal");

    Ok(())
}

impl IntoResponse for ActionError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ActionError::Validation(e) => {
                tracing::warn!(field = e.field(), "Rejected request: {}", e);
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            ActionError::UnknownAction(_) => (StatusCode::NOT_FOUND, self.to_string()),
            ActionError::Network(e) => {
                tracing::error!("Solana rpc error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to reach the Solana network".to_string(),
                )
            }
            ActionError::Encoding(e) => {
                tracing::error!("Transaction encoding error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to build transaction".to_string(),
                )
            }
        };
        (status, Json(ActionErrorResponse { message })).into_response()
    }
}

async fn get_actions_json() -> Json<ActionsJson> {
    Json(actions_json())
}

fn parse_action(path: Result<Path<String>, PathRejection>) -> Result<ActionKind, ActionError> {
    let Path(action) =
        path.map_err(|rejection| ValidationError::invalid("action", rejection.body_text()))?;
    action.parse::<ActionKind>()
}

async fn get_action(
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<ActionGetResponse>, ActionError> {
    Ok(Json(describe(parse_action(path)?)))
}

async fn post_action<A>(
    State(app_state): State<Arc<A>>,
    path: Result<Path<String>, PathRejection>,
    query: Result<Query<QueryParams>, QueryRejection>,
    headers: HeaderMap,
    body: Result<Json<ActionPostRequest>, JsonRejection>,
) -> Result<Json<ActionPostResponse>, ActionError>
where
    A: Application + Send + Sync + 'static,
{
    let action = parse_action(path)?;
    let Query(params) =
        query.map_err(|rejection| ValidationError::invalid("query", rejection.body_text()))?;
    let body = match body {
        Ok(Json(body)) => body,
        // a request without a content type carries no body and so no account
        Err(JsonRejection::MissingJsonContentType(_))
            if !headers.contains_key(header::CONTENT_TYPE) =>
        {
            ActionPostRequest::default()
        }
        Err(rejection) => {
            return Err(ValidationError::invalid("body", rejection.body_text()).into());
        }
    };
    let account = body.account.as_deref();

    let response = match action {
        ActionKind::TransferSol => {
            app_state
                .transfer_sol(parse_transfer(&params, account)?)
                .await?
        }
        ActionKind::MintNft => app_state.mint_nft(parse_mint(&params, account)?).await?,
        ActionKind::Memo => app_state.write_memo(parse_memo(&params, account)?).await?,
    };
    tracing::info!("Served {} action: {}", action, response.message);

    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        application::app::App, domain::errors::BcClientError,
        infrastructure::bc_client::MockBcClient,
    };
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use base64::{engine::general_purpose::STANDARD, Engine};
    use serde_json::Value;
    use solana_sdk::{hash::Hash, pubkey::Pubkey, transaction::Transaction};
    use solana_system_interface::instruction::SystemInstruction;
    use tower::ServiceExt;

    const DEVNET: &str = "solana:EtWTRABZaYq6iMfeYKouRu166VU2xqa1";

    fn server_config() -> ServerConfig {
        ServerConfig {
            listen_port: 0,
            blockchain_id: DEVNET.to_string(),
            cors: CorsConfig::default(),
        }
    }

    fn test_router(client: MockBcClient) -> Router {
        router(Arc::new(App::with_client(client)), &server_config()).unwrap()
    }

    fn healthy_client() -> MockBcClient {
        let mut client = MockBcClient::new();
        client
            .expect_get_minimum_balance_for_rent_exemption()
            .returning(|_| Ok(890_880));
        client
            .expect_get_latest_blockhash()
            .returning(|| Ok(Hash::new_unique()));
        client
    }

    fn post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_actions_json() {
        let response = test_router(MockBcClient::new())
            .oneshot(
                Request::builder()
                    .uri("/actions.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["rules"][0]["pathPattern"], "/*");
        assert_eq!(body["rules"][1]["apiPath"], "/api/actions/**");
    }

    #[tokio::test]
    async fn test_get_action_metadata_and_headers() {
        let response = test_router(MockBcClient::new())
            .oneshot(
                Request::builder()
                    .uri("/api/actions/mint_nft")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-action-version"], ACTION_VERSION);
        assert_eq!(response.headers()["x-blockchain-ids"], DEVNET);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
        let body = json_body(response).await;
        assert_eq!(body["title"], "Actions Example - Mint NFT");
        assert_eq!(body["links"]["actions"][0]["parameters"][2]["name"], "uri");
    }

    #[tokio::test]
    async fn test_unknown_action_is_not_found() {
        let response = test_router(MockBcClient::new())
            .oneshot(post(
                "/api/actions/stake",
                &format!(r#"{{"account":"{}"}}"#, Pubkey::new_unique()),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(json_body(response).await["message"].is_string());
    }

    #[tokio::test]
    async fn test_options_returns_cors_headers_regardless_of_body() {
        for (uri, body) in [
            ("/api/actions/transfer-sol", Body::empty()),
            ("/api/actions/mint-nft", Body::from("not json at all")),
            ("/actions.json", Body::empty()),
        ] {
            let response = test_router(MockBcClient::new())
                .oneshot(
                    Request::builder()
                        .method("OPTIONS")
                        .uri(uri)
                        .body(body)
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            let headers = response.headers();
            assert_eq!(headers["access-control-allow-origin"], "*");
            assert_eq!(headers["access-control-allow-methods"], "GET,POST,OPTIONS");
            assert!(headers["access-control-allow-headers"]
                .to_str()
                .unwrap()
                .eq_ignore_ascii_case("Content-Type"));
        }
    }

    #[tokio::test]
    async fn test_transfer_sol_returns_unsigned_transaction() {
        let account = Pubkey::new_unique();
        let response = test_router(healthy_client())
            .oneshot(post(
                "/api/actions/transfer-sol?amount=2",
                &format!(r#"{{"account":"{account}"}}"#),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-action-version"], ACTION_VERSION);
        assert_eq!(response.headers()["x-blockchain-ids"], DEVNET);

        let body = json_body(response).await;
        let bytes = STANDARD
            .decode(body["transaction"].as_str().unwrap())
            .unwrap();
        let transaction: Transaction = bincode::deserialize(&bytes).unwrap();
        assert_eq!(transaction.message.instructions.len(), 1);

        let instruction = &transaction.message.instructions[0];
        let keys = &transaction.message.account_keys;
        assert_eq!(keys[instruction.accounts[0] as usize], account);
        let recipient = keys[instruction.accounts[1] as usize];
        assert_ne!(recipient, account);
        assert_eq!(
            bincode::deserialize::<SystemInstruction>(&instruction.data).unwrap(),
            SystemInstruction::Transfer {
                lamports: 2_000_000_000
            }
        );
        assert_eq!(body["message"], format!("Send 2 SOL to {recipient}"));
    }

    #[tokio::test]
    async fn test_missing_account_is_bad_request() {
        for (uri, body) in [
            ("/api/actions/transfer-sol?amount=2", Body::from("{}")),
            ("/api/actions/mint-nft?name=a&symbol=b&uri=c", Body::from("{}")),
            ("/api/actions/memo?message=gm", Body::from(r#"{"account":""}"#)),
        ] {
            let request = Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(body)
                .unwrap();
            let response = test_router(MockBcClient::new())
                .oneshot(request)
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(response.headers()["x-action-version"], ACTION_VERSION);
            assert_eq!(response.headers()["x-blockchain-ids"], DEVNET);
            let body = json_body(response).await;
            assert!(body["message"].as_str().unwrap().contains("account"));
        }
    }

    #[tokio::test]
    async fn test_missing_body_is_bad_request() {
        let response = test_router(MockBcClient::new())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/actions/transfer-sol?amount=1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(json_body(response).await["message"].is_string());
    }

    #[tokio::test]
    async fn test_malformed_inputs_are_bad_request() {
        let account = Pubkey::new_unique();
        for (uri, body) in [
            (
                "/api/actions/transfer-sol?amount=abc".to_string(),
                format!(r#"{{"account":"{account}"}}"#),
            ),
            (
                "/api/actions/transfer-sol?amount=1".to_string(),
                r#"{"account":"not-base58!"}"#.to_string(),
            ),
            (
                "/api/actions/transfer-sol?amount=1".to_string(),
                "{not json".to_string(),
            ),
            (
                "/api/actions/mint-nft?name=a&symbol=b".to_string(),
                format!(r#"{{"account":"{account}"}}"#),
            ),
        ] {
            let response = test_router(MockBcClient::new())
                .oneshot(post(&uri, &body))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri} {body}");
            assert!(json_body(response).await["message"].is_string());
        }
    }

    #[tokio::test]
    async fn test_rpc_failure_is_internal_error_without_details() {
        let mut client = MockBcClient::new();
        client
            .expect_get_minimum_balance_for_rent_exemption()
            .returning(|_| {
                Err(BcClientError::FailedToGetRentExemption(
                    "secret upstream detail".to_string(),
                ))
            });
        let response = test_router(client)
            .oneshot(post(
                "/api/actions/transfer-sol?amount=1",
                &format!(r#"{{"account":"{}"}}"#, Pubkey::new_unique()),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        let message = body["message"].as_str().unwrap();
        assert!(!message.contains("secret upstream detail"));
    }

    #[tokio::test]
    async fn test_mint_nft_returns_six_instructions() {
        let response = test_router(healthy_client())
            .oneshot(post(
                "/api/actions/mint-nft?name=Sticky&symbol=STK&uri=https%3A%2F%2Fexample.com%2Fs.json",
                &format!(r#"{{"account":"{}"}}"#, Pubkey::new_unique()),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["message"], "Mint NFT Sticky");
        let bytes = STANDARD
            .decode(body["transaction"].as_str().unwrap())
            .unwrap();
        let transaction: Transaction = bincode::deserialize(&bytes).unwrap();
        assert_eq!(transaction.message.instructions.len(), 6);
    }

    #[tokio::test]
    async fn test_encoding_failure_is_internal_error_without_details() {
        let response = ActionError::Encoding("secret".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert!(body["message"].is_string());
        assert!(!body.to_string().contains("secret"));
    }

    #[tokio::test]
    async fn test_undecodable_action_is_json_bad_request() {
        for method in ["GET", "POST"] {
            let request = Request::builder()
                .method(method)
                .uri("/api/actions/%FF")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{}"))
                .unwrap();
            let response = test_router(MockBcClient::new())
                .oneshot(request)
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{method}");
            let body = json_body(response).await;
            assert!(body["message"].as_str().unwrap().contains("action"));
        }
    }

    #[tokio::test]
    async fn test_non_json_content_type_names_the_body() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/actions/transfer-sol?amount=1")
            .header(header::CONTENT_TYPE, "text/plain")
            .body(Body::from(format!(
                r#"{{"account":"{}"}}"#,
                Pubkey::new_unique()
            )))
            .unwrap();
        let response = test_router(MockBcClient::new())
            .oneshot(request)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let message = json_body(response).await["message"]
            .as_str()
            .unwrap()
            .to_string();
        assert!(message.contains("body"));
        assert!(message.contains("Content-Type"));
        assert!(!message.contains("Missing required field"));
    }

    #[test]
    fn test_invalid_cors_config_is_rejected() {
        let cors = CorsConfig {
            allow_methods: vec!["NOT A METHOD".to_string()],
            ..CorsConfig::default()
        };
        assert!(cors.layer().is_err());
    }
}
