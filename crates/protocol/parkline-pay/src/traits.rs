//! Payment gateway trait definition.

use async_trait::async_trait;
use parkline_types::{CheckoutSession, SessionId};

use crate::error::PayResult;
use crate::types::CheckoutRequest;

/// Abstraction over an externally hosted checkout provider.
///
/// Implementations carry no business rules: they open sessions and report
/// what the provider says about them.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Open a checkout session for one space.
    ///
    /// The returned session carries the request's metadata and a redirect
    /// URL for the guest.
    async fn create_session(&self, request: &CheckoutRequest) -> PayResult<CheckoutSession>;

    /// Fetch a session by id.
    ///
    /// Returns `None` if the provider does not know the session.
    async fn retrieve_session(&self, session_id: &SessionId) -> PayResult<Option<CheckoutSession>>;

    /// Short provider name for logs.
    fn provider_name(&self) -> &'static str;
}
