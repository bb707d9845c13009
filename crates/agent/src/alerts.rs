//! Price alerts
//!
//! Users register standing watches ("tell me when wheat crosses ₹2500");
//! a background task scans them against the latest market prices on an
//! interval. Triggered notices land in a per-user feed. The feed entry is a
//! `Mutex<Vec<_>>` per user so the scan's writes and a request handler's
//! reads of the same list never race.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use dashmap::DashMap;
use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::watch;

use krishi_agent_core::PriceAlert;
use krishi_agent_market::MarketService;

/// A fired alert, ready to show to the user
#[derive(Debug, Clone, Serialize)]
pub struct AlertNotice {
    pub commodity: String,
    pub message: String,
    pub price_per_quintal: f64,
    pub observed_on: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Alert registrations and triggered-notice feeds, per user
#[derive(Default)]
pub struct AlertCenter {
    registrations: DashMap<String, Vec<PriceAlert>>,
    feeds: DashMap<String, Arc<Mutex<Vec<AlertNotice>>>>,
}

impl AlertCenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new standing alert for a user
    pub fn register(&self, user_id: &str, alert: PriceAlert) {
        self.registrations
            .entry(user_id.to_string())
            .or_default()
            .push(alert);
    }

    /// A user's registered alerts
    pub fn alerts_for(&self, user_id: &str) -> Vec<PriceAlert> {
        self.registrations
            .get(user_id)
            .map(|a| a.clone())
            .unwrap_or_default()
    }

    /// A user's triggered notices, newest first
    pub fn notices_for(&self, user_id: &str) -> Vec<AlertNotice> {
        let Some(feed) = self.feeds.get(user_id) else {
            return Vec::new();
        };
        let mut notices = feed.lock().clone();
        notices.reverse();
        notices
    }

    fn feed(&self, user_id: &str) -> Arc<Mutex<Vec<AlertNotice>>> {
        self.feeds
            .entry(user_id.to_string())
            .or_default()
            .clone()
    }

    /// One scan pass: evaluate every registered alert against the latest
    /// market price. Upstream failures skip the alert until the next pass.
    pub async fn scan(&self, market: &MarketService) {
        // snapshot so the dataset calls run without holding map guards
        let snapshot: Vec<(String, Vec<PriceAlert>)> = self
            .registrations
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();

        let mut triggered = 0usize;
        for (user_id, alerts) in snapshot {
            for alert in alerts {
                let latest = market
                    .latest_price(&alert.commodity, alert.state.as_deref())
                    .await;
                let Some((price, observed_on)) = latest else {
                    continue;
                };
                if !alert.is_triggered(price) {
                    continue;
                }

                let direction_word = match alert.direction {
                    krishi_agent_core::AlertDirection::Above => "reached",
                    krishi_agent_core::AlertDirection::Below => "dropped to",
                };
                let notice = AlertNotice {
                    commodity: alert.commodity.clone(),
                    message: format!(
                        "{} has {} ₹{:.0}/quintal (your target: ₹{:.0}).",
                        alert.commodity, direction_word, price, alert.target_price_per_quintal
                    ),
                    price_per_quintal: price,
                    observed_on,
                    created_at: Utc::now(),
                };
                self.feed(&user_id).lock().push(notice);
                triggered += 1;
            }
        }

        tracing::info!(triggered, "Alert scan finished");
    }

    /// Spawn the periodic scan task. Returns a shutdown sender; send `true`
    /// to stop the task.
    pub fn start_scan_task(
        self: &Arc<Self>,
        market: Arc<MarketService>,
        interval_secs: u64,
    ) -> watch::Sender<bool> {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let center = Arc::clone(self);

        tokio::spawn(async move {
            let mut ticker =
                tokio::time::interval(std::time::Duration::from_secs(interval_secs.max(1)));
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            // the first tick fires immediately; skip it so startup stays quiet
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        center.scan(&market).await;
                    }
                    _ = shutdown_rx.changed() => {
                        if *shutdown_rx.borrow() {
                            tracing::info!("Alert scan task shutting down");
                            break;
                        }
                    }
                }
            }
        });

        shutdown_tx
    }
}
