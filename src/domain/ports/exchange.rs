use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::domain::errors::SurfaceResult;
use crate::domain::models::{Exchange, ExchangeMatcher};

/// An armed watch. Resolves with the first matching exchange completed after
/// arming, or never resolves; callers apply their own ceiling.
pub type ExchangeWatch = BoxFuture<'static, Exchange>;

/// Port trait for observing backend exchanges made by the page
#[async_trait]
pub trait ExchangeWatcher: Send + Sync {
    /// Start watching. Exchanges completed before this call returns are not
    /// considered.
    async fn arm(&self, matcher: &ExchangeMatcher) -> SurfaceResult<ExchangeWatch>;
}
