//! UniPay
//!
//! Unification layer over three third-party mobile payment providers: a
//! QR/app wallet (Alipay), a messaging-app wallet (WeChat Pay) and a
//! bank-union network (UnionPay). The host application starts a payment with
//! one call and receives one normalized callback describing success,
//! cancellation or failure, regardless of which asynchronous completion
//! mechanism the provider uses underneath (direct completion handler,
//! SDK-level response object, or URL-scheme redirect back into the app).
//!
//! The vendor SDKs themselves stay outside this crate, injected as gateway
//! traits. Wire the host's URL-open lifecycle hook to
//! [`PayDispatcher::handle_open_url`] and everything else follows.

pub mod config;
pub mod error;
pub mod payments;

pub use config::{Config, SchemeRegistry, UrlTypeDecl};
pub use error::{GatewayError, PayError, PayResult};
pub use payments::dispatcher::PayDispatcher;
pub use payments::traits::{AlipayGateway, UnionPayGateway, WechatGateway};
pub use payments::types::{
    AlipayOrder, AttemptId, Outcome, PayOrder, PayStatus, Provider, RawPayload, UnionPayMode,
    UnionPayOrder, WechatOrder, WechatPayResponse,
};
