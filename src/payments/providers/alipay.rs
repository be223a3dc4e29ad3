//! Alipay adapter
//!
//! Alipay reports results on two paths: a direct completion when the payment
//! finishes in-app, and a return URL when the flow switched to the Alipay
//! client. The return URL carries the result under host `safepay` for the
//! native-client flow and `platformapi` for the web/H5 auth flow.

use std::sync::Arc;
use tracing::{info, warn};
use url::Url;

use crate::error::{GatewayError, PayError};
use crate::payments::mapping::{alipay_result_status, map_alipay_result_status};
use crate::payments::providers::Submission;
use crate::payments::traits::AlipayGateway;
use crate::payments::types::{AlipayOrder, PayStatus, Provider, RawPayload};

const HOST_CLIENT_PAY: &str = "safepay";
const HOST_WEB_AUTH: &str = "platformapi";

pub struct AlipayAdapter {
    gateway: Arc<dyn AlipayGateway>,
}

impl AlipayAdapter {
    pub fn new(gateway: Arc<dyn AlipayGateway>) -> Self {
        Self { gateway }
    }

    pub async fn submit(&self, order: &AlipayOrder) -> Result<Submission, GatewayError> {
        info!(
            "submitting Alipay order, return scheme '{}'",
            order.return_scheme
        );

        match self.gateway.submit_order(order).await? {
            Some(payload) => Ok(Submission::Resolved {
                status: normalize(&payload),
                payload,
            }),
            None => Ok(Submission::Pending),
        }
    }

    /// Continue a payment from an inbound Alipay return URL.
    pub async fn continue_from_url(&self, url: &Url) -> Result<(PayStatus, RawPayload), PayError> {
        let host = url.host_str().unwrap_or_default();
        let payload = match host {
            HOST_CLIENT_PAY => self.gateway.parse_client_result(url).await?,
            HOST_WEB_AUTH => self.gateway.parse_web_auth_result(url).await?,
            other => {
                return Err(PayError::UnroutableHost {
                    provider: Provider::AliPay,
                    host: other.to_string(),
                })
            }
        };

        Ok((normalize(&payload), payload))
    }
}

fn normalize(payload: &RawPayload) -> PayStatus {
    match alipay_result_status(payload) {
        Some(status) => map_alipay_result_status(status),
        None => {
            warn!("Alipay payload without resultStatus, treating as failure");
            PayStatus::Failure
        }
    }
}
