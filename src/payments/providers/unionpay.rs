//! UnionPay adapter
//!
//! Launching the payment control is fire-and-forget; the result only comes
//! back through the return URL, under host `uppayresult` (or `paydemo` in the
//! vendor's sandbox).

use std::sync::Arc;
use tracing::info;
use url::Url;

use crate::error::{GatewayError, PayError};
use crate::payments::mapping::map_unionpay_code;
use crate::payments::providers::Submission;
use crate::payments::traits::UnionPayGateway;
use crate::payments::types::{PayStatus, Provider, RawPayload, UnionPayOrder};

const HOST_PAY_RESULT: &str = "uppayresult";
const HOST_SANDBOX_RESULT: &str = "paydemo";

pub struct UnionPayAdapter {
    gateway: Arc<dyn UnionPayGateway>,
}

impl UnionPayAdapter {
    pub fn new(gateway: Arc<dyn UnionPayGateway>) -> Self {
        Self { gateway }
    }

    pub async fn submit(&self, order: &UnionPayOrder) -> Result<Submission, GatewayError> {
        info!(
            "starting UnionPay control, mode {}, return scheme '{}'",
            order.mode.as_str(),
            order.return_scheme
        );

        self.gateway.start_pay(order).await?;
        Ok(Submission::Pending)
    }

    /// Continue a payment from an inbound UnionPay return URL.
    pub async fn continue_from_url(&self, url: &Url) -> Result<(PayStatus, RawPayload), PayError> {
        let host = url.host_str().unwrap_or_default();
        if host != HOST_PAY_RESULT && host != HOST_SANDBOX_RESULT {
            return Err(PayError::UnroutableHost {
                provider: Provider::UnionPay,
                host: host.to_string(),
            });
        }

        let (code, payload) = self.gateway.parse_payment_result(url).await?;
        Ok((map_unionpay_code(&code), payload))
    }
}
