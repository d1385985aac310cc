// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Notification Router: maps `(event kind × priority)` to a notifier set
//! and fans each event out, independent per notifier, with back-pressure
//! handling for the bounded queues.

use crate::registry::CapabilityRegistry;
use fleet_core::{Event, EventKind, Priority};
use fleet_storage::EventLog;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Capacity of the `info`/`warning`/`action` queues. `urgent` is unbounded
/// per the concurrency model: an urgent event must never be silently
/// dropped by a full queue.
const BOUNDED_CAPACITY: usize = 64;

enum Sender {
    Bounded(mpsc::Sender<Event>, Arc<AtomicU64>),
    Unbounded(mpsc::UnboundedSender<Event>),
}

/// Handle used by producers (Session Manager, Lifecycle Manager) to publish
/// an already-persisted event for fan-out. Cloning is cheap; every clone
/// shares the same background drain tasks.
#[derive(Clone)]
pub struct NotifyRouter {
    senders: Arc<HashMap<Priority, Sender>>,
    events: Arc<Mutex<EventLog>>,
    now: Arc<dyn Fn() -> chrono::DateTime<chrono::Utc> + Send + Sync>,
}

fn priority_key(priority: Priority) -> &'static str {
    match priority {
        Priority::Info => "info",
        Priority::Warning => "warning",
        Priority::Action => "action",
        Priority::Urgent => "urgent",
    }
}

impl NotifyRouter {
    /// Build the router from `registry`'s registered notifiers and the
    /// project's `priority -> notifier names` routing table, and spawn one
    /// drain task per priority. `now` supplies timestamps for the router's
    /// own `notifier.dropped` events.
    pub fn start(
        registry: &CapabilityRegistry,
        routing: &HashMap<String, Vec<String>>,
        events: Arc<Mutex<EventLog>>,
        now: impl Fn() -> chrono::DateTime<chrono::Utc> + Send + Sync + 'static,
    ) -> Self {
        let mut senders = HashMap::new();
        for priority in [Priority::Info, Priority::Warning, Priority::Action, Priority::Urgent] {
            let names = routing.get(priority_key(priority)).cloned().unwrap_or_default();
            let notifiers: Vec<_> = names.iter().filter_map(|n| registry.notifier(n)).collect();
            if notifiers.len() != names.len() {
                tracing::warn!(priority = priority_key(priority), "some configured notifiers are not registered");
            }

            if priority == Priority::Urgent {
                let (tx, rx) = mpsc::unbounded_channel();
                tokio::spawn(drain_unbounded(rx, notifiers));
                senders.insert(priority, Sender::Unbounded(tx));
            } else {
                let (tx, rx) = mpsc::channel(BOUNDED_CAPACITY);
                let dropped = Arc::new(AtomicU64::new(0));
                tokio::spawn(drain_bounded(rx, notifiers));
                senders.insert(priority, Sender::Bounded(tx, dropped));
            }
        }
        Self {
            senders: Arc::new(senders),
            events,
            now: Arc::new(now),
        }
    }

    /// Enqueue `event` for fan-out. Never blocks: a full bounded queue
    /// drops the event and logs an operator-visible `notifier.dropped`
    /// event instead of applying back-pressure to the caller.
    pub fn publish(&self, event: Event) {
        let priority = event.priority;
        match self.senders.get(&priority) {
            Some(Sender::Unbounded(tx)) => {
                let _ = tx.send(event);
            }
            Some(Sender::Bounded(tx, dropped)) => {
                if let Err(mpsc::error::TrySendError::Full(_)) = tx.try_send(event) {
                    let total = dropped.fetch_add(1, Ordering::Relaxed) + 1;
                    tracing::warn!(?priority, total_dropped = total, "notify queue full, dropping event");
                    self.record_drop(priority, total);
                }
            }
            None => {}
        }
    }

    fn record_drop(&self, priority: Priority, total_dropped: u64) {
        let event = Event {
            id: 0,
            kind: EventKind::NotifierDropped {
                priority,
                dropped: total_dropped,
            },
            priority: Priority::Warning,
            session_id: None,
            project_id: None,
            timestamp: (self.now)(),
            message: format!("notify queue for {} is full, dropped {total_dropped} event(s) so far", priority_key(priority)),
            data: Default::default(),
        };
        let mut log = self.events.lock();
        if let Err(e) = log.append(event) {
            tracing::error!(error = %e, "failed to append notifier.dropped event");
        }
    }
}

async fn drain_bounded(mut rx: mpsc::Receiver<Event>, notifiers: Vec<Arc<dyn fleet_adapters::NotifyAdapter>>) {
    while let Some(event) = rx.recv().await {
        fan_out(&event, &notifiers).await;
    }
}

async fn drain_unbounded(
    mut rx: mpsc::UnboundedReceiver<Event>,
    notifiers: Vec<Arc<dyn fleet_adapters::NotifyAdapter>>,
) {
    while let Some(event) = rx.recv().await {
        fan_out(&event, &notifiers).await;
    }
}

/// Fan out one event to every notifier in its priority's set. Each
/// notifier's failure is logged and never blocks or fails the others.
async fn fan_out(event: &Event, notifiers: &[Arc<dyn fleet_adapters::NotifyAdapter>]) {
    let title = event.kind_name();
    let results = futures::future::join_all(notifiers.iter().map(|notifier| {
        let notifier = Arc::clone(notifier);
        let message = event.message.clone();
        async move { notifier.notify(title, &message).await }
    }))
    .await;
    for result in results {
        if let Err(e) = result {
            tracing::warn!(error = %e, "notifier failed to deliver event");
        }
    }
}

#[cfg(test)]
#[path = "notify_router_tests.rs"]
mod tests;
