//! Stripe Checkout gateway.
//!
//! Talks to the Stripe REST API over HTTPS. Sessions are created with a
//! single line item priced from the request's snapshot, and correlation
//! metadata is attached so the session can be matched back to a listing
//! and guest when it is retrieved.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use parkline_types::{
    Amount, CheckoutSession, ListingId, PaymentStatus, SessionId, SessionMetadata, SpotId, UserId,
    SPACES_PER_BOOKING,
};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::GatewayConfig;
use crate::error::{PayError, PayResult};
use crate::retry::RetryPolicy;
use crate::traits::PaymentGateway;
use crate::types::CheckoutRequest;

const META_LISTING_ID: &str = "listing_id";
const META_USER_ID: &str = "user_id";
const META_SPOT_ID: &str = "spot_id";
const META_PRICE_SNAPSHOT: &str = "price_snapshot";

/// Checkout session as returned by `GET/POST /v1/checkout/sessions`.
#[derive(Debug, Deserialize)]
struct StripeSession {
    id: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    status: Option<String>,
    payment_status: String,
    #[serde(default)]
    amount_total: Option<Amount>,
    #[serde(default)]
    metadata: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetail {
    #[serde(default)]
    message: Option<String>,
}

/// Payment gateway backed by Stripe Checkout.
#[derive(Clone)]
pub struct StripeGateway {
    /// HTTP client
    client: Client,
    /// API base URL without trailing slash
    api_base: String,
    /// Secret API key
    secret_key: String,
    /// Retry policy for session retrieval
    retry: RetryPolicy,
}

impl StripeGateway {
    /// Create a Stripe gateway from configuration.
    pub fn new(config: &GatewayConfig) -> PayResult<Self> {
        config.validate()?;
        let secret_key = config
            .secret_key
            .clone()
            .ok_or_else(|| PayError::config("stripe provider requires a secret key"))?;

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PayError::config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            secret_key,
            retry: RetryPolicy::from_config(&config.retry),
        })
    }

    /// Form fields for `POST /v1/checkout/sessions`.
    fn checkout_form(request: &CheckoutRequest) -> Vec<(String, String)> {
        let mut form = vec![
            ("mode".to_string(), "payment".to_string()),
            ("success_url".to_string(), request.success_url.clone()),
            ("cancel_url".to_string(), request.cancel_url.clone()),
            (
                "line_items[0][price_data][currency]".to_string(),
                request.currency.to_ascii_lowercase(),
            ),
            (
                "line_items[0][price_data][unit_amount]".to_string(),
                request.unit_amount.to_string(),
            ),
            (
                "line_items[0][price_data][product_data][name]".to_string(),
                request.product_name.clone(),
            ),
            (
                "line_items[0][quantity]".to_string(),
                SPACES_PER_BOOKING.to_string(),
            ),
            (
                format!("metadata[{}]", META_LISTING_ID),
                request.listing_id.to_string(),
            ),
            (
                format!("metadata[{}]", META_USER_ID),
                request.user_id.to_string(),
            ),
            (
                format!("metadata[{}]", META_SPOT_ID),
                request.spot_id.to_string(),
            ),
            (
                format!("metadata[{}]", META_PRICE_SNAPSHOT),
                request.unit_amount.to_string(),
            ),
            (
                "client_reference_id".to_string(),
                request.user_id.to_string(),
            ),
        ];

        if let Some(description) = &request.description {
            form.push((
                "line_items[0][price_data][product_data][description]".to_string(),
                description.clone(),
            ));
        }

        form
    }

    /// Translate a Stripe session into the marketplace view.
    fn parse_session(raw: StripeSession) -> PayResult<CheckoutSession> {
        let meta = |key: &str| {
            raw.metadata
                .get(key)
                .cloned()
                .ok_or_else(|| {
                    PayError::invalid_response(format!(
                        "session {} is missing metadata '{}'",
                        raw.id, key
                    ))
                })
        };

        let price_snapshot: Amount = meta(META_PRICE_SNAPSHOT)?.parse().map_err(|_| {
            PayError::invalid_response(format!("session {} has a malformed price snapshot", raw.id))
        })?;

        let metadata = SessionMetadata::new(
            ListingId::new(meta(META_LISTING_ID)?),
            UserId::new(meta(META_USER_ID)?),
            SpotId::new(meta(META_SPOT_ID)?),
            price_snapshot,
        );

        let payment_status = match (raw.status.as_deref(), raw.payment_status.as_str()) {
            (Some("expired"), _) => PaymentStatus::Expired,
            (_, "paid") | (_, "no_payment_required") => PaymentStatus::Paid,
            _ => PaymentStatus::Unpaid,
        };

        Ok(CheckoutSession {
            id: SessionId::new(raw.id),
            redirect_url: raw.url.unwrap_or_default(),
            metadata,
            payment_status,
            amount_total: raw.amount_total,
        })
    }

    async fn error_from_response(response: reqwest::Response) -> PayError {
        let status = response.status().as_u16();
        let header = |name: &str| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(|v| v.trim().to_ascii_lowercase())
        };
        let should_retry = header("stripe-should-retry").and_then(|v| v.parse::<bool>().ok());
        let retry_after = header("retry-after")
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs);

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<StripeErrorBody>(&body)
            .ok()
            .and_then(|b| b.error.message)
            .unwrap_or(body);
        PayError::from_response(status, message, should_retry, retry_after)
    }

    /// Stripe object ids are `[A-Za-z0-9_]+`.
    fn is_session_id(id: &str) -> bool {
        !id.is_empty() && id.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
    }

    async fn fetch_session(&self, session_id: &SessionId) -> PayResult<Option<CheckoutSession>> {
        if !Self::is_session_id(session_id.as_str()) {
            debug!(session_id = %session_id, "Rejecting malformed session id");
            return Ok(None);
        }

        let url = format!("{}/v1/checkout/sessions/{}", self.api_base, session_id);
        debug!(session_id = %session_id, "Retrieving checkout session");

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.secret_key)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let raw: StripeSession = response.json().await?;
        Self::parse_session(raw).map(Some)
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_session(&self, request: &CheckoutRequest) -> PayResult<CheckoutSession> {
        let url = format!("{}/v1/checkout/sessions", self.api_base);

        // Not retried: a lost response would leave an orphan session behind
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.secret_key)
            .form(&Self::checkout_form(request))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let raw: StripeSession = response.json().await?;
        let session = Self::parse_session(raw)?;

        info!(
            session_id = %session.id,
            listing_id = %request.listing_id,
            amount = request.unit_amount,
            "Stripe checkout session created"
        );
        Ok(session)
    }

    async fn retrieve_session(&self, session_id: &SessionId) -> PayResult<Option<CheckoutSession>> {
        self.retry.execute(|| self.fetch_session(session_id)).await
    }

    fn provider_name(&self) -> &'static str {
        "stripe"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CheckoutRequest {
        CheckoutRequest {
            listing_id: ListingId::new("lst_abc"),
            user_id: UserId::new("guest_1"),
            spot_id: SpotId::new("spot_7"),
            unit_amount: 1250,
            currency: "USD".to_string(),
            product_name: "Parking: Lot B".to_string(),
            description: Some("Home opener".to_string()),
            success_url: "https://app.example/success?session_id={CHECKOUT_SESSION_ID}"
                .to_string(),
            cancel_url: "https://app.example/cancel".to_string(),
        }
    }

    fn form_value<'a>(form: &'a [(String, String)], key: &str) -> Option<&'a str> {
        form.iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn raw_session(status: Option<&str>, payment_status: &str) -> StripeSession {
        let json = serde_json::json!({
            "id": "cs_test_a1",
            "url": "https://checkout.stripe.com/c/pay/cs_test_a1",
            "status": status,
            "payment_status": payment_status,
            "amount_total": 1250,
            "metadata": {
                "listing_id": "lst_abc",
                "user_id": "guest_1",
                "spot_id": "spot_7",
                "price_snapshot": "1250"
            }
        });
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_checkout_form_fields() {
        let form = StripeGateway::checkout_form(&request());

        assert_eq!(form_value(&form, "mode"), Some("payment"));
        assert_eq!(
            form_value(&form, "line_items[0][price_data][currency]"),
            Some("usd")
        );
        assert_eq!(
            form_value(&form, "line_items[0][price_data][unit_amount]"),
            Some("1250")
        );
        assert_eq!(form_value(&form, "line_items[0][quantity]"), Some("1"));
        assert_eq!(form_value(&form, "metadata[listing_id]"), Some("lst_abc"));
        assert_eq!(form_value(&form, "metadata[price_snapshot]"), Some("1250"));
        assert!(form_value(&form, "success_url")
            .unwrap()
            .contains("{CHECKOUT_SESSION_ID}"));
        assert_eq!(
            form_value(&form, "line_items[0][price_data][product_data][description]"),
            Some("Home opener")
        );
    }

    #[test]
    fn test_parse_paid_session() {
        let session = StripeGateway::parse_session(raw_session(Some("complete"), "paid")).unwrap();

        assert_eq!(session.id, SessionId::new("cs_test_a1"));
        assert_eq!(session.payment_status, PaymentStatus::Paid);
        assert_eq!(session.metadata.user_id, UserId::new("guest_1"));
        assert_eq!(session.metadata.price_snapshot, 1250);
        assert_eq!(session.amount_total, Some(1250));
    }

    #[test]
    fn test_parse_status_mapping() {
        let open = StripeGateway::parse_session(raw_session(Some("open"), "unpaid")).unwrap();
        assert_eq!(open.payment_status, PaymentStatus::Unpaid);

        let expired =
            StripeGateway::parse_session(raw_session(Some("expired"), "unpaid")).unwrap();
        assert_eq!(expired.payment_status, PaymentStatus::Expired);

        let free =
            StripeGateway::parse_session(raw_session(Some("complete"), "no_payment_required"))
                .unwrap();
        assert!(free.is_paid());
    }

    #[test]
    fn test_parse_missing_metadata() {
        let mut raw = raw_session(None, "paid");
        raw.metadata.remove("user_id");
        let err = StripeGateway::parse_session(raw).unwrap_err();
        assert!(matches!(err, PayError::InvalidResponse(_)));
    }

    #[test]
    fn test_new_requires_key() {
        assert!(StripeGateway::new(&GatewayConfig::default()).is_err());
        let gateway = StripeGateway::new(
            &GatewayConfig::stripe("sk_test_123").with_api_base("http://localhost:12111/"),
        )
        .unwrap();
        assert_eq!(gateway.api_base, "http://localhost:12111");
        assert_eq!(gateway.provider_name(), "stripe");
    }

    mod http {
        use super::*;
        use crate::config::RetryConfig;
        use wiremock::matchers::{body_string_contains, header, method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        const SESSION_PATH: &str = "/v1/checkout/sessions/cs_test_a1";

        fn gateway(server: &MockServer) -> StripeGateway {
            let config = GatewayConfig::stripe("sk_test_123")
                .with_api_base(server.uri())
                .with_retry(RetryConfig {
                    max_attempts: 3,
                    base_delay: Duration::from_millis(1),
                    max_delay: Duration::from_millis(5),
                });
            StripeGateway::new(&config).unwrap()
        }

        fn session_body(payment_status: &str) -> serde_json::Value {
            serde_json::json!({
                "id": "cs_test_a1",
                "url": "https://checkout.stripe.com/c/pay/cs_test_a1",
                "status": "complete",
                "payment_status": payment_status,
                "amount_total": 1250,
                "metadata": {
                    "listing_id": "lst_abc",
                    "user_id": "guest_1",
                    "spot_id": "spot_7",
                    "price_snapshot": "1250"
                }
            })
        }

        fn stripe_error(message: &str) -> serde_json::Value {
            serde_json::json!({ "error": { "type": "invalid_request_error", "message": message } })
        }

        async fn request_count(server: &MockServer) -> usize {
            server.received_requests().await.unwrap_or_default().len()
        }

        #[tokio::test]
        async fn test_retrieve_unknown_session_is_none() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path(SESSION_PATH))
                .respond_with(
                    ResponseTemplate::new(404).set_body_json(stripe_error("No such checkout.session")),
                )
                .mount(&server)
                .await;

            let found = gateway(&server)
                .retrieve_session(&SessionId::new("cs_test_a1"))
                .await
                .unwrap();

            assert!(found.is_none());
            assert_eq!(request_count(&server).await, 1);
        }

        #[tokio::test]
        async fn test_retrieve_retries_through_outage() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path(SESSION_PATH))
                .respond_with(ResponseTemplate::new(503))
                .up_to_n_times(2)
                .mount(&server)
                .await;
            Mock::given(method("GET"))
                .and(path(SESSION_PATH))
                .and(header("authorization", "Bearer sk_test_123"))
                .respond_with(ResponseTemplate::new(200).set_body_json(session_body("paid")))
                .mount(&server)
                .await;

            let session = gateway(&server)
                .retrieve_session(&SessionId::new("cs_test_a1"))
                .await
                .unwrap()
                .unwrap();

            assert!(session.is_paid());
            assert_eq!(session.metadata.price_snapshot, 1250);
            assert_eq!(request_count(&server).await, 3);
        }

        #[tokio::test]
        async fn test_retrieve_waits_out_rate_limit() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path(SESSION_PATH))
                .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
                .up_to_n_times(1)
                .mount(&server)
                .await;
            Mock::given(method("GET"))
                .and(path(SESSION_PATH))
                .respond_with(ResponseTemplate::new(200).set_body_json(session_body("unpaid")))
                .mount(&server)
                .await;

            let session = gateway(&server)
                .retrieve_session(&SessionId::new("cs_test_a1"))
                .await
                .unwrap()
                .unwrap();

            assert_eq!(session.payment_status, PaymentStatus::Unpaid);
            assert_eq!(request_count(&server).await, 2);
        }

        #[tokio::test]
        async fn test_retrieve_rejected_key_is_not_retried() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path(SESSION_PATH))
                .respond_with(
                    ResponseTemplate::new(401)
                        .set_body_json(stripe_error("Invalid API Key provided: sk_test_***123")),
                )
                .mount(&server)
                .await;

            let err = gateway(&server)
                .retrieve_session(&SessionId::new("cs_test_a1"))
                .await
                .unwrap_err();

            match err {
                PayError::Api { status, message } => {
                    assert_eq!(status, 401);
                    assert!(message.starts_with("Invalid API Key provided"));
                }
                other => panic!("expected Api error, got {:?}", other),
            }
            assert_eq!(request_count(&server).await, 1);
        }

        #[tokio::test]
        async fn test_retrieve_honours_should_retry_false() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path(SESSION_PATH))
                .respond_with(
                    ResponseTemplate::new(409)
                        .insert_header("Stripe-Should-Retry", "false")
                        .set_body_json(stripe_error(
                            "Keys for idempotent requests can only be used with the same parameters",
                        )),
                )
                .mount(&server)
                .await;

            let err = gateway(&server)
                .retrieve_session(&SessionId::new("cs_test_a1"))
                .await
                .unwrap_err();

            assert!(matches!(err, PayError::Api { status: 409, .. }));
            assert_eq!(request_count(&server).await, 1);
        }

        #[tokio::test]
        async fn test_retrieve_malformed_id_makes_no_request() {
            let server = MockServer::start().await;
            let gateway = gateway(&server);

            for id in ["../../v1/customers", "cs_1/expire", "cs 1", ""] {
                let found = gateway.retrieve_session(&SessionId::new(id)).await.unwrap();
                assert!(found.is_none(), "id {:?} should not resolve", id);
            }
            assert_eq!(request_count(&server).await, 0);
        }

        #[tokio::test]
        async fn test_create_session_posts_form() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/v1/checkout/sessions"))
                .and(header("authorization", "Bearer sk_test_123"))
                .and(body_string_contains("metadata%5Blisting_id%5D=lst_abc"))
                .and(body_string_contains("metadata%5Bprice_snapshot%5D=1250"))
                .respond_with(ResponseTemplate::new(200).set_body_json(session_body("unpaid")))
                .expect(1)
                .mount(&server)
                .await;

            let session = gateway(&server).create_session(&request()).await.unwrap();

            assert_eq!(session.id, SessionId::new("cs_test_a1"));
            assert_eq!(
                session.redirect_url,
                "https://checkout.stripe.com/c/pay/cs_test_a1"
            );
            assert_eq!(session.metadata.listing_id, ListingId::new("lst_abc"));
        }

        #[tokio::test]
        async fn test_create_session_failure_is_not_retried() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/v1/checkout/sessions"))
                .respond_with(ResponseTemplate::new(500).set_body_json(stripe_error("internal")))
                .mount(&server)
                .await;

            let err = gateway(&server).create_session(&request()).await.unwrap_err();

            assert!(matches!(err, PayError::Unavailable { status: 500, .. }));
            assert_eq!(request_count(&server).await, 1);
        }
    }
}
