use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::time::sleep;
use tracing::{debug, trace};

use super::client::WebDriverClient;
use crate::domain::errors::{SurfaceError, SurfaceResult};
use crate::domain::models::{Exchange, ExchangeMatcher};
use crate::domain::ports::{ExchangeWatch, ExchangeWatcher};

/// Raises the resource timing buffer and snapshots its length and the clock
const ARM_SCRIPT: &str = "performance.setResourceTimingBufferSize(100000); \
     return { count: performance.getEntriesByType('resource').length, \
     now: performance.now() };";

/// Resource entries recorded after index `arguments[0]`
const PROBE_SCRIPT: &str = "return performance.getEntriesByType('resource')\
     .slice(arguments[0])\
     .map(function (e) { return { name: e.name, startTime: e.startTime, \
     status: typeof e.responseStatus === 'number' ? e.responseStatus : null }; });";

#[derive(Debug, Deserialize)]
struct ArmSnapshot {
    count: u64,
    now: f64,
}

#[derive(Debug, Deserialize)]
struct ResourceEntry {
    name: String,
    #[serde(rename = "startTime", default)]
    start_time: f64,
    status: Option<u16>,
}

impl ResourceEntry {
    /// Whether the request was issued after the watch was armed
    fn started_after(&self, armed_at: f64) -> bool {
        self.start_time >= armed_at
    }
}

impl From<ResourceEntry> for Exchange {
    fn from(entry: ResourceEntry) -> Self {
        Self {
            url: entry.name,
            // 0 means the browser withheld the status (cross-origin).
            status: entry.status.filter(|status| *status != 0),
        }
    }
}

/// Observes backend exchanges through the page's Resource Timing buffer
///
/// Entries are appended when a response completes, so a request already in
/// flight at arm time can show up after the snapshot. Only entries whose
/// `startTime` is not earlier than the arm timestamp are considered.
pub struct ResourceTimingWatcher {
    client: Arc<WebDriverClient>,
    probe_interval: Duration,
}

impl ResourceTimingWatcher {
    pub const fn new(client: Arc<WebDriverClient>, probe_interval: Duration) -> Self {
        Self {
            client,
            probe_interval,
        }
    }
}

#[async_trait]
impl ExchangeWatcher for ResourceTimingWatcher {
    async fn arm(&self, matcher: &ExchangeMatcher) -> SurfaceResult<ExchangeWatch> {
        let baseline = self.client.execute(ARM_SCRIPT, Vec::new()).await?;
        let snapshot: ArmSnapshot = serde_json::from_value(baseline.clone()).map_err(|_| {
            SurfaceError::Protocol(format!("resource timing snapshot was {baseline}"))
        })?;
        let mut seen = snapshot.count;
        let armed_at = snapshot.now;

        let client = Arc::clone(&self.client);
        let matcher = matcher.clone();
        let interval = self.probe_interval;

        Ok(Box::pin(async move {
            loop {
                sleep(interval).await;

                let entries = match client.execute(PROBE_SCRIPT, vec![json!(seen)]).await {
                    Ok(Value::Array(entries)) => entries,
                    Ok(other) => {
                        debug!(value = %other, "unexpected resource probe result");
                        continue;
                    }
                    Err(err) => {
                        debug!(error = %err, "resource probe failed");
                        continue;
                    }
                };

                seen += entries.len() as u64;
                for entry in entries {
                    let Ok(entry) = serde_json::from_value::<ResourceEntry>(entry) else {
                        continue;
                    };
                    if !entry.started_after(armed_at) {
                        trace!(url = %entry.name, "resource started before arming");
                        continue;
                    }
                    let exchange = Exchange::from(entry);
                    trace!(url = %exchange.url, status = ?exchange.status, "resource entry");
                    if matcher.matches(&exchange) {
                        return exchange;
                    }
                }
            }
        }))
    }
}
