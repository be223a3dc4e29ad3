//! WeChat Pay adapter
//!
//! Submission only yields a hand-off acknowledgment; the true payment result
//! arrives later through the SDK's URL handler. An attempt therefore stays
//! pending on a successful hand-off and resolves when the response surfaces
//! via [`extract_from_url`].
//!
//! [`extract_from_url`]: WechatAdapter::extract_from_url

use std::sync::Arc;
use tracing::info;
use url::Url;

use crate::error::{GatewayError, PayError};
use crate::payments::mapping::map_wechat_err_code;
use crate::payments::providers::Submission;
use crate::payments::traits::WechatGateway;
use crate::payments::types::{PayStatus, RawPayload, WechatOrder};

pub struct WechatAdapter {
    gateway: Arc<dyn WechatGateway>,
}

impl WechatAdapter {
    pub fn new(gateway: Arc<dyn WechatGateway>) -> Self {
        Self { gateway }
    }

    pub async fn submit(&self, order: &WechatOrder) -> Result<Submission, GatewayError> {
        info!(
            "handing pay request to WeChat, prepay id '{}'",
            order.prepay_id
        );

        if self.gateway.send_pay_request(order).await? {
            // Hand-off acknowledged. Not a payment result.
            Ok(Submission::Pending)
        } else {
            Ok(Submission::Resolved {
                status: PayStatus::Failure,
                payload: RawPayload::new(),
            })
        }
    }

    /// Let the SDK process an inbound WeChat URL; maps the payment response
    /// if the URL carried one.
    pub async fn extract_from_url(
        &self,
        url: &Url,
    ) -> Result<Option<(PayStatus, RawPayload)>, PayError> {
        let Some(response) = self.gateway.extract_pay_response(url).await? else {
            return Ok(None);
        };

        let status = map_wechat_err_code(response.err_code);
        Ok(Some((status, response.to_raw())))
    }
}
