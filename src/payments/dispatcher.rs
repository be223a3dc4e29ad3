//! Unified payment dispatch
//!
//! [`PayDispatcher`] is the single entry point for starting a payment and for
//! feeding inbound return-URLs back into the provider adapters. Every attempt
//! gets a correlation id and its own callback; results that come back over a
//! provider channel with no correlation id on the wire resolve the oldest
//! pending attempt for that provider.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use tracing::{error, info, warn};
use url::Url;

use crate::config::{Config, SchemeRegistry};
use crate::error::{PayError, PayResult};
use crate::payments::providers::{AlipayAdapter, Submission, UnionPayAdapter, WechatAdapter};
use crate::payments::traits::{AlipayGateway, UnionPayGateway, WechatGateway};
use crate::payments::types::{
    AttemptId, Outcome, PayCallback, PayOrder, PayStatus, Provider, RawPayload,
};

/// Unified dispatcher over the three provider adapters.
///
/// Cheap to clone; hand one clone to the payment initiation site and another
/// to the host's URL-open lifecycle hook.
#[derive(Clone)]
pub struct PayDispatcher {
    inner: Arc<DispatcherInner>,
}

struct DispatcherInner {
    registry: SchemeRegistry,
    alipay: AlipayAdapter,
    wechat: WechatAdapter,
    unionpay: UnionPayAdapter,
    pending: Mutex<PendingAttempts>,
}

impl PayDispatcher {
    /// Build a dispatcher from the host's declared URL types and the three
    /// injected vendor gateways. The scheme registry is built once here and
    /// is read-only afterwards.
    pub fn new(
        config: Config,
        alipay: Arc<dyn AlipayGateway>,
        wechat: Arc<dyn WechatGateway>,
        unionpay: Arc<dyn UnionPayGateway>,
    ) -> PayResult<Self> {
        config
            .validate()
            .map_err(|e| PayError::config(e.to_string()))?;

        let registry = SchemeRegistry::from_declared(&config.url_types);
        if registry.is_empty() {
            warn!("no payment URL schemes registered; inbound results cannot be routed");
        }

        Ok(Self {
            inner: Arc::new(DispatcherInner {
                registry,
                alipay: AlipayAdapter::new(alipay),
                wechat: WechatAdapter::new(wechat),
                unionpay: UnionPayAdapter::new(unionpay),
                pending: Mutex::new(PendingAttempts::new()),
            }),
        })
    }

    pub fn registry(&self) -> &SchemeRegistry {
        &self.inner.registry
    }

    /// Attempts submitted but not yet resolved.
    pub fn pending_attempts(&self) -> usize {
        self.lock_pending().len()
    }

    /// Start a payment attempt.
    ///
    /// Registers `callback` under a fresh [`AttemptId`] and submits the order
    /// to the matching adapter on a spawned task, making exactly one gateway
    /// call. Returns immediately; the normalized result reaches `callback`
    /// later, from an unspecified task. Requires a Tokio runtime context.
    ///
    /// Orders whose return scheme is not registered for their provider are
    /// rejected up front with [`PayError::SchemeNotRegistered`] and nothing
    /// is submitted.
    pub fn pay_order<F>(&self, order: PayOrder, callback: F) -> PayResult<AttemptId>
    where
        F: FnOnce(bool, Outcome, Option<RawPayload>) + Send + 'static,
    {
        let provider = order.provider();
        match &order {
            PayOrder::AliPay(o) => self.check_return_scheme(provider, &o.return_scheme)?,
            PayOrder::UnionPay(o) => self.check_return_scheme(provider, &o.return_scheme)?,
            // WeChat round-trips through its own app id, not a declared scheme
            PayOrder::WxPay(_) => {}
        }

        let attempt = self.lock_pending().register(provider, Box::new(callback));
        info!("attempt {} submitting to {}", attempt, provider);

        let dispatcher = self.clone();
        tokio::spawn(async move {
            dispatcher.submit(attempt, order).await;
        });

        Ok(attempt)
    }

    /// Route an inbound URL the OS delivered to the host application.
    ///
    /// Must be called for every URL from the host's URL-open lifecycle hook.
    /// Returns the provider that handled the URL, or an explicit error for
    /// unroutable input.
    pub async fn handle_open_url(&self, url: &Url) -> PayResult<Provider> {
        let scheme = url.scheme();
        let provider =
            self.inner
                .registry
                .provider_for(scheme)
                .ok_or_else(|| PayError::UnknownScheme {
                    scheme: scheme.to_string(),
                })?;

        match provider {
            Provider::AliPay => {
                let (status, payload) = self.inner.alipay.continue_from_url(url).await?;
                self.resolve_oldest(provider, status, Some(payload))?;
            }
            Provider::WxPay => {
                if let Some((status, payload)) = self.inner.wechat.extract_from_url(url).await? {
                    self.resolve_oldest(provider, status, Some(payload))?;
                }
            }
            Provider::UnionPay => {
                let (status, payload) = self.inner.unionpay.continue_from_url(url).await?;
                self.resolve_oldest(provider, status, Some(payload))?;
            }
        }

        Ok(provider)
    }

    async fn submit(&self, attempt: AttemptId, order: PayOrder) {
        let provider = order.provider();
        let submission = match &order {
            PayOrder::AliPay(o) => self.inner.alipay.submit(o).await,
            PayOrder::WxPay(o) => self.inner.wechat.submit(o).await,
            PayOrder::UnionPay(o) => self.inner.unionpay.submit(o).await,
        };

        match submission {
            // Result arrives later through handle_open_url.
            Ok(Submission::Pending) => {}
            Ok(Submission::Resolved { status, payload }) => {
                self.resolve_by_id(attempt, provider, status, Some(payload));
            }
            Err(e) => {
                error!("attempt {} submission failed: {}", attempt, e);
                self.resolve_by_id(attempt, provider, PayStatus::Failure, None);
            }
        }
    }

    fn check_return_scheme(&self, provider: Provider, scheme: &str) -> PayResult<()> {
        if self.inner.registry.provider_for(scheme) == Some(provider) {
            Ok(())
        } else {
            Err(PayError::SchemeNotRegistered {
                provider,
                scheme: scheme.to_string(),
            })
        }
    }

    /// Resolve a specific attempt, for results correlated by the submission
    /// call itself.
    fn resolve_by_id(
        &self,
        attempt: AttemptId,
        provider: Provider,
        status: PayStatus,
        payload: Option<RawPayload>,
    ) {
        match self.lock_pending().take_by_id(attempt, provider) {
            Some(callback) => deliver(attempt, provider, status, payload, callback),
            None => warn!("attempt {} was already resolved, dropping result", attempt),
        }
    }

    /// Resolve the oldest pending attempt for a provider, for results that
    /// carry no correlation id on the wire.
    fn resolve_oldest(
        &self,
        provider: Provider,
        status: PayStatus,
        payload: Option<RawPayload>,
    ) -> PayResult<()> {
        match self.lock_pending().take_oldest(provider) {
            Some((attempt, callback)) => {
                deliver(attempt, provider, status, payload, callback);
                Ok(())
            }
            None => {
                warn!("{} result arrived with no attempt pending", provider);
                Err(PayError::NoPendingAttempt { provider })
            }
        }
    }

    fn lock_pending(&self) -> std::sync::MutexGuard<'_, PendingAttempts> {
        self.inner.pending.lock().expect("pending attempts lock poisoned")
    }
}

/// Invoked outside the pending-attempts lock.
fn deliver(
    attempt: AttemptId,
    provider: Provider,
    status: PayStatus,
    payload: Option<RawPayload>,
    callback: PayCallback,
) {
    let outcome = Outcome::new(provider, status);
    info!("attempt {} resolved: {} {:?}", attempt, provider, status);
    callback(outcome.is_success(), outcome, payload);
}

/// In-flight attempts: callback per id, plus per-provider FIFO order so that
/// uncorrelated provider results resolve oldest-first. Entries leave the map
/// the moment they resolve; a callback can never fire twice.
struct PendingAttempts {
    callbacks: HashMap<AttemptId, PayCallback>,
    order: HashMap<Provider, VecDeque<AttemptId>>,
}

impl PendingAttempts {
    fn new() -> Self {
        Self {
            callbacks: HashMap::new(),
            order: HashMap::new(),
        }
    }

    fn len(&self) -> usize {
        self.callbacks.len()
    }

    fn register(&mut self, provider: Provider, callback: PayCallback) -> AttemptId {
        let attempt = AttemptId::new();
        self.callbacks.insert(attempt, callback);
        self.order.entry(provider).or_default().push_back(attempt);
        attempt
    }

    fn take_by_id(&mut self, attempt: AttemptId, provider: Provider) -> Option<PayCallback> {
        let callback = self.callbacks.remove(&attempt)?;
        if let Some(queue) = self.order.get_mut(&provider) {
            queue.retain(|id| *id != attempt);
        }
        Some(callback)
    }

    fn take_oldest(&mut self, provider: Provider) -> Option<(AttemptId, PayCallback)> {
        let queue = self.order.get_mut(&provider)?;
        let attempt = queue.pop_front()?;
        let callback = self
            .callbacks
            .remove(&attempt)
            .expect("pending queue out of sync with callback map");
        Some((attempt, callback))
    }
}
