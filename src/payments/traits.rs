//! Vendor SDK gateway trait definitions
//!
//! Each provider's native SDK is an opaque asynchronous service behind one of
//! these traits. The host application supplies implementations backed by the
//! real SDK bindings; tests supply mocks. The dispatcher only ever talks to
//! these traits.

use async_trait::async_trait;
use url::Url;

use crate::error::GatewayError;
use crate::payments::types::{
    AlipayOrder, RawPayload, UnionPayOrder, WechatOrder, WechatPayResponse,
};

/// Gateway to the Alipay SDK.
#[async_trait]
pub trait AlipayGateway: Send + Sync {
    /// Submit a signed order string.
    ///
    /// Returns `Some(payload)` when the SDK completes the payment in-app and
    /// reports the result directly. Returns `None` when the flow switched to
    /// the Alipay app; the result will arrive later through the return URL.
    async fn submit_order(&self, order: &AlipayOrder) -> Result<Option<RawPayload>, GatewayError>;

    /// Ask the SDK to parse a native-client payment result out of a return
    /// URL (host `safepay`).
    async fn parse_client_result(&self, url: &Url) -> Result<RawPayload, GatewayError>;

    /// Ask the SDK to parse a web/H5 auth result out of a return URL
    /// (host `platformapi`).
    async fn parse_web_auth_result(&self, url: &Url) -> Result<RawPayload, GatewayError>;
}

/// Gateway to the WeChat SDK.
#[async_trait]
pub trait WechatGateway: Send + Sync {
    /// Hand a pay request to the WeChat app.
    ///
    /// The returned flag only acknowledges the hand-off. The true payment
    /// result arrives later through [`extract_pay_response`].
    ///
    /// [`extract_pay_response`]: WechatGateway::extract_pay_response
    async fn send_pay_request(&self, order: &WechatOrder) -> Result<bool, GatewayError>;

    /// Let the SDK process an inbound URL. Returns the payment response if
    /// the URL carried one, `None` for any other WeChat traffic.
    async fn extract_pay_response(
        &self,
        url: &Url,
    ) -> Result<Option<WechatPayResponse>, GatewayError>;
}

/// Gateway to the UnionPay SDK.
#[async_trait]
pub trait UnionPayGateway: Send + Sync {
    /// Launch the payment control for a signed order. Fire-and-forget; the
    /// result arrives only through the return URL.
    async fn start_pay(&self, order: &UnionPayOrder) -> Result<(), GatewayError>;

    /// Ask the SDK to parse `(code, data)` out of a payment-result URL.
    async fn parse_payment_result(
        &self,
        url: &Url,
    ) -> Result<(String, RawPayload), GatewayError>;
}
