//! Provider adapters
//!
//! One adapter per provider, translating between the unified order/outcome
//! model and that provider's native gateway calls.

pub mod alipay;
pub mod unionpay;
pub mod wechat;

pub use alipay::AlipayAdapter;
pub use unionpay::UnionPayAdapter;
pub use wechat::WechatAdapter;

use crate::payments::types::{PayStatus, RawPayload};

/// What became of a submission call.
#[derive(Debug)]
pub enum Submission {
    /// The gateway reported a final result directly.
    Resolved {
        status: PayStatus,
        payload: RawPayload,
    },
    /// The flow switched to the provider app; the result arrives later
    /// through the return URL.
    Pending,
}
