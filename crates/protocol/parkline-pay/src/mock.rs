//! Mock payment gateway for testing and local development.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use parkline_types::{CheckoutSession, PaymentStatus, SessionId};
use rand::RngCore;
use tracing::debug;

use crate::error::{PayError, PayResult};
use crate::traits::PaymentGateway;
use crate::types::CheckoutRequest;

/// Default base URL for mock checkout pages.
pub const MOCK_CHECKOUT_BASE: &str = "https://checkout.mock.parkline.local/pay";

/// Mock payment gateway.
///
/// Keeps sessions in memory, optionally mirrored to a JSON file so that
/// separate CLI invocations see the same sessions. Tests drive payment
/// outcomes with [`mark_paid`](Self::mark_paid) and [`expire`](Self::expire).
pub struct MockGateway {
    /// Sessions by id
    sessions: RwLock<HashMap<SessionId, CheckoutSession>>,
    /// Number of sessions created
    created: AtomicU64,
    /// Number of retrieve calls served
    retrievals: AtomicU64,
    /// Number of upcoming retrieve calls that fail with a network error
    failing_retrievals: AtomicU32,
    /// Whether new sessions start out paid
    auto_pay: bool,
    /// Base URL for redirect links
    checkout_base_url: String,
    /// JSON file mirroring `sessions`
    state_path: Option<PathBuf>,
}

impl MockGateway {
    /// Create a new in-memory mock gateway.
    pub fn new() -> Self {
        MockGatewayBuilder::new().build()
    }

    /// Create a builder.
    pub fn builder() -> MockGatewayBuilder {
        MockGatewayBuilder::new()
    }

    /// Open a mock gateway mirrored to `path`, loading any saved sessions.
    pub fn open(path: impl AsRef<Path>) -> PayResult<Self> {
        let path = path.as_ref().to_path_buf();
        let sessions: HashMap<SessionId, CheckoutSession> = load_sessions(&path)?
            .into_iter()
            .map(|session| (session.id.clone(), session))
            .collect();

        debug!(path = %path.display(), sessions = sessions.len(), "Opened mock gateway state");

        let mut gateway = MockGatewayBuilder::new().build();
        gateway.created = AtomicU64::new(sessions.len() as u64);
        gateway.sessions = RwLock::new(sessions);
        gateway.state_path = Some(path);
        Ok(gateway)
    }

    /// Record `changed` and write it through to the state file.
    ///
    /// The file is re-read first and its sessions replace the in-memory
    /// copies, so sessions other processes wrote since this gateway opened
    /// survive; only `changed` is applied on top. The new contents are
    /// written to a per-process temporary file and renamed into place.
    /// Writers are not locked against each other: a write that lands
    /// between another process's re-read and rename is still lost.
    fn store(
        &self,
        sessions: &mut HashMap<SessionId, CheckoutSession>,
        changed: CheckoutSession,
    ) -> PayResult<()> {
        let Some(path) = &self.state_path else {
            sessions.insert(changed.id.clone(), changed);
            return Ok(());
        };

        for saved in load_sessions(path)? {
            sessions.insert(saved.id.clone(), saved);
        }
        sessions.insert(changed.id.clone(), changed);

        let mut all: Vec<&CheckoutSession> = sessions.values().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        let bytes = serde_json::to_vec_pretty(&all)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let staging = staging_path(path);
        std::fs::write(&staging, bytes)?;
        std::fs::rename(&staging, path)?;
        Ok(())
    }

    fn update_status(&self, session_id: &SessionId, status: PaymentStatus) -> PayResult<()> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| PayError::internal("mock session lock poisoned"))?;

        if let Some(path) = &self.state_path {
            for saved in load_sessions(path)? {
                sessions.insert(saved.id.clone(), saved);
            }
        }

        let mut session = sessions
            .get(session_id)
            .cloned()
            .ok_or_else(|| PayError::session_not_found(session_id.as_str()))?;
        session.payment_status = status;

        self.store(&mut sessions, session)
    }

    /// Simulate the guest completing payment.
    pub fn mark_paid(&self, session_id: &SessionId) -> PayResult<()> {
        self.update_status(session_id, PaymentStatus::Paid)
    }

    /// Simulate the session expiring at the provider.
    pub fn expire(&self, session_id: &SessionId) -> PayResult<()> {
        self.update_status(session_id, PaymentStatus::Expired)
    }

    /// Insert or replace a session as-is.
    pub fn insert_session(&self, session: CheckoutSession) -> PayResult<()> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| PayError::internal("mock session lock poisoned"))?;
        self.store(&mut sessions, session)
    }

    /// Look up a session without counting it as a retrieval.
    pub fn session(&self, session_id: &SessionId) -> Option<CheckoutSession> {
        self.sessions
            .read()
            .ok()
            .and_then(|sessions| sessions.get(session_id).cloned())
    }

    /// Make the next `count` retrieve calls fail with a network error.
    pub fn fail_next_retrievals(&self, count: u32) {
        self.failing_retrievals.store(count, Ordering::SeqCst);
    }

    /// Number of sessions created through this gateway.
    pub fn session_count(&self) -> u64 {
        self.created.load(Ordering::SeqCst)
    }

    /// Number of retrieve calls served.
    pub fn retrieval_count(&self) -> u64 {
        self.retrievals.load(Ordering::SeqCst)
    }

    fn next_session_id() -> SessionId {
        let mut bytes = [0u8; 12];
        rand::thread_rng().fill_bytes(&mut bytes);
        let suffix: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
        SessionId::new(format!("cs_mock_{}", suffix))
    }
}

/// Sessions saved at `path`; empty if the file does not exist yet.
fn load_sessions(path: &Path) -> PayResult<Vec<CheckoutSession>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let bytes = std::fs::read(path)?;
    if bytes.is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_slice(&bytes)?)
}

fn staging_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "mock-sessions.json".to_string());
    path.with_file_name(format!(".{}.{}.tmp", name, std::process::id()))
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn create_session(&self, request: &CheckoutRequest) -> PayResult<CheckoutSession> {
        let id = Self::next_session_id();
        let status = if self.auto_pay {
            PaymentStatus::Paid
        } else {
            PaymentStatus::Unpaid
        };
        let session = CheckoutSession::new(
            id.clone(),
            format!("{}/{}", self.checkout_base_url, id),
            request.metadata(),
            status,
        );

        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| PayError::internal("mock session lock poisoned"))?;
        self.store(&mut sessions, session.clone())?;
        self.created.fetch_add(1, Ordering::SeqCst);

        Ok(session)
    }

    async fn retrieve_session(&self, session_id: &SessionId) -> PayResult<Option<CheckoutSession>> {
        self.retrievals.fetch_add(1, Ordering::SeqCst);

        let should_fail = self
            .failing_retrievals
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if should_fail {
            return Err(PayError::network("simulated provider outage"));
        }

        let sessions = self
            .sessions
            .read()
            .map_err(|_| PayError::internal("mock session lock poisoned"))?;
        Ok(sessions.get(session_id).cloned())
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// Builder for [`MockGateway`].
#[derive(Debug, Clone)]
pub struct MockGatewayBuilder {
    auto_pay: bool,
    checkout_base_url: String,
}

impl MockGatewayBuilder {
    /// Create a builder with defaults (sessions start unpaid).
    pub fn new() -> Self {
        Self {
            auto_pay: false,
            checkout_base_url: MOCK_CHECKOUT_BASE.to_string(),
        }
    }

    /// Make new sessions start out paid.
    pub fn auto_pay(mut self, auto_pay: bool) -> Self {
        self.auto_pay = auto_pay;
        self
    }

    /// Set the base URL for redirect links.
    pub fn checkout_base_url(mut self, url: impl Into<String>) -> Self {
        self.checkout_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Build the gateway.
    pub fn build(self) -> MockGateway {
        MockGateway {
            sessions: RwLock::new(HashMap::new()),
            created: AtomicU64::new(0),
            retrievals: AtomicU64::new(0),
            failing_retrievals: AtomicU32::new(0),
            auto_pay: self.auto_pay,
            checkout_base_url: self.checkout_base_url,
            state_path: None,
        }
    }
}

impl Default for MockGatewayBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parkline_types::{ListingId, SpotId, UserId};
    use tempfile::TempDir;

    fn request() -> CheckoutRequest {
        CheckoutRequest {
            listing_id: ListingId::new("lst_1"),
            user_id: UserId::new("guest_1"),
            spot_id: SpotId::new("spot_1"),
            unit_amount: 1800,
            currency: "usd".to_string(),
            product_name: "Parking".to_string(),
            description: None,
            success_url: "https://app.example/success?session_id={CHECKOUT_SESSION_ID}"
                .to_string(),
            cancel_url: "https://app.example/cancel".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_retrieve() {
        let gateway = MockGateway::new();
        let session = gateway.create_session(&request()).await.unwrap();

        assert!(session.id.as_str().starts_with("cs_mock_"));
        assert!(session.redirect_url.ends_with(session.id.as_str()));
        assert_eq!(session.payment_status, PaymentStatus::Unpaid);
        assert_eq!(session.metadata.price_snapshot, 1800);
        assert_eq!(gateway.session_count(), 1);

        let fetched = gateway.retrieve_session(&session.id).await.unwrap();
        assert_eq!(fetched, Some(session));
        assert_eq!(gateway.retrieval_count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_session() {
        let gateway = MockGateway::new();
        let fetched = gateway
            .retrieve_session(&SessionId::new("cs_nope"))
            .await
            .unwrap();
        assert!(fetched.is_none());
        assert!(gateway.mark_paid(&SessionId::new("cs_nope")).is_err());
    }

    #[tokio::test]
    async fn test_mark_paid_and_expire() {
        let gateway = MockGateway::new();
        let session = gateway.create_session(&request()).await.unwrap();

        gateway.mark_paid(&session.id).unwrap();
        assert!(gateway.session(&session.id).unwrap().is_paid());

        gateway.expire(&session.id).unwrap();
        assert_eq!(
            gateway.session(&session.id).unwrap().payment_status,
            PaymentStatus::Expired
        );
    }

    #[tokio::test]
    async fn test_auto_pay() {
        let gateway = MockGateway::builder().auto_pay(true).build();
        let session = gateway.create_session(&request()).await.unwrap();
        assert!(session.is_paid());
    }

    #[tokio::test]
    async fn test_simulated_outage() {
        let gateway = MockGateway::new();
        let session = gateway.create_session(&request()).await.unwrap();
        gateway.fail_next_retrievals(1);

        let err = gateway.retrieve_session(&session.id).await.unwrap_err();
        assert!(err.is_retryable());
        assert!(gateway.retrieve_session(&session.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_state_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("mock-sessions.json");

        let session_id = {
            let gateway = MockGateway::open(&path).unwrap();
            let session = gateway.create_session(&request()).await.unwrap();
            gateway.mark_paid(&session.id).unwrap();
            session.id
        };

        let reopened = MockGateway::open(&path).unwrap();
        let session = reopened.retrieve_session(&session_id).await.unwrap().unwrap();
        assert!(session.is_paid());
        assert_eq!(reopened.session_count(), 1);
    }

    #[tokio::test]
    async fn test_gateways_sharing_a_file_keep_each_others_sessions() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("mock-sessions.json");

        let first = MockGateway::open(&path).unwrap();
        let second = MockGateway::open(&path).unwrap();

        let a = first.create_session(&request()).await.unwrap();
        let b = second.create_session(&request()).await.unwrap();
        second.mark_paid(&a.id).unwrap();

        // A later write from the first gateway must not undo the payment
        let c = first.create_session(&request()).await.unwrap();

        let reopened = MockGateway::open(&path).unwrap();
        assert_eq!(reopened.session_count(), 3);
        assert!(reopened.session(&a.id).unwrap().is_paid());
        assert!(reopened.session(&b.id).is_some());
        assert!(reopened.session(&c.id).is_some());

        let leftovers: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
