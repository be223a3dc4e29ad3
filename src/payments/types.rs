//! Payment order and outcome types
//!
//! Common types shared by the dispatcher and the provider adapters.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// The three payment providers this crate dispatches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provider {
    AliPay,
    WxPay,
    UnionPay,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Provider::AliPay => "AliPay",
            Provider::WxPay => "WxPay",
            Provider::UnionPay => "UnionPay",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "alipay" => Ok(Provider::AliPay),
            "wxpay" | "wechat" | "wechatpay" => Ok(Provider::WxPay),
            "unionpay" => Ok(Provider::UnionPay),
            other => Err(format!("unknown payment provider: {}", other)),
        }
    }
}

/// Correlation id returned from `pay_order`, resolving exactly one callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttemptId(Uuid);

impl AttemptId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for AttemptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Signed Alipay order, submitted as-is to the Alipay SDK.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlipayOrder {
    /// Signed, encrypted order string obtained from the merchant backend
    pub order_string: String,
    /// URL scheme the Alipay app uses to return to the host app
    pub return_scheme: String,
}

/// WeChat Pay order fields, one-to-one with the SDK's pay request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WechatOrder {
    /// App id registered with the WeChat open platform
    pub open_id: String,
    /// Merchant id assigned by the payment platform
    pub partner_id: String,
    /// Prepay order id obtained from the merchant backend
    pub prepay_id: String,
    /// Random string, replay protection
    pub nonce_str: String,
    /// Unix timestamp, replay protection
    pub timestamp: u32,
    /// Extension data, fixed by the platform documentation
    pub package: String,
    /// Merchant signature over the above fields
    pub sign: String,
}

/// UnionPay environment selector. The SDK expects "00" or "01" on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnionPayMode {
    Production,
    Test,
}

impl UnionPayMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnionPayMode::Production => "00",
            UnionPayMode::Test => "01",
        }
    }
}

/// Signed UnionPay order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnionPayOrder {
    /// Signed, encrypted transaction number obtained from the merchant backend
    pub order_string: String,
    /// URL scheme the UnionPay app uses to return to the host app
    pub return_scheme: String,
    pub mode: UnionPayMode,
    /// Opaque handle to the host UI surface the payment control attaches to
    pub presentation_context: String,
}

/// A payment order tagged with its provider. Dispatch is a `match` on this
/// union, so an order can never reach the wrong adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "provider")]
pub enum PayOrder {
    AliPay(AlipayOrder),
    WxPay(WechatOrder),
    UnionPay(UnionPayOrder),
}

impl PayOrder {
    pub fn provider(&self) -> Provider {
        match self {
            PayOrder::AliPay(_) => Provider::AliPay,
            PayOrder::WxPay(_) => Provider::WxPay,
            PayOrder::UnionPay(_) => Provider::UnionPay,
        }
    }
}

/// Normalized tri-state payment result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PayStatus {
    Success,
    Cancel,
    Failure,
}

/// The normalized result of one payment attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub provider: Provider,
    pub status: PayStatus,
}

impl Outcome {
    pub fn new(provider: Provider, status: PayStatus) -> Self {
        Self { provider, status }
    }

    pub fn is_success(&self) -> bool {
        self.status == PayStatus::Success
    }
}

/// Provider-native result payload, passed through to the callback unmodified.
pub type RawPayload = serde_json::Map<String, serde_json::Value>;

/// Callback invoked once with the normalized outcome of a payment attempt.
///
/// Invoked from whichever task delivered the provider's result; callers must
/// not assume a particular thread.
pub type PayCallback = Box<dyn FnOnce(bool, Outcome, Option<RawPayload>) + Send + 'static>;

/// Payment response the WeChat SDK hands back through its URL handler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WechatPayResponse {
    pub err_code: i32,
    #[serde(default)]
    pub err_str: Option<String>,
    #[serde(default)]
    pub return_key: Option<String>,
}

impl WechatPayResponse {
    /// Raw key/value view of the response, delivered to the callback.
    pub fn to_raw(&self) -> RawPayload {
        let mut raw = RawPayload::new();
        raw.insert("errCode".to_string(), self.err_code.into());
        if let Some(err_str) = &self.err_str {
            raw.insert("errStr".to_string(), err_str.clone().into());
        }
        if let Some(return_key) = &self.return_key {
            raw.insert("returnKey".to_string(), return_key.clone().into());
        }
        raw
    }
}
