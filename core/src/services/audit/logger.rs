use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::domain::entities::{AuditEvent, RequestAudit, ResponseAudit};
use crate::domain::keys::KeySpace;
use crate::repositories::KeyValueStore;

use super::sink::AuditSink;

/// Delivery counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuditStats {
    /// Events accepted by the sink
    pub delivered: u64,
    /// Events written to the fallback key
    pub fallback_writes: u64,
    /// Events neither delivered nor written to the fallback key
    pub lost: u64,
}

#[derive(Default)]
struct Counters {
    delivered: AtomicU64,
    fallback_writes: AtomicU64,
    lost: AtomicU64,
}

struct Fallback {
    store: Arc<dyn KeyValueStore>,
    keys: KeySpace,
    counters: Arc<Counters>,
}

impl Fallback {
    async fn write(&self, event: &AuditEvent) {
        let key = event.fallback_key(&self.keys);
        let fields = event.fallback_fields();
        let pairs: Vec<(&str, &str)> = fields.iter().map(|(f, v)| (*f, v.as_str())).collect();

        match self.store.hash_set(&key, &pairs).await {
            Ok(()) => {
                self.counters.fallback_writes.fetch_add(1, Ordering::Relaxed);
                tracing::info!(key = %key, entity = event.entity(), event = "audit_fallback_written", "Audit event kept locally");
            }
            Err(e) => {
                self.counters.lost.fetch_add(1, Ordering::Relaxed);
                tracing::error!(
                    key = %key,
                    entity = event.entity(),
                    error = %e,
                    event = "audit_event_lost",
                    "Audit event could not be delivered nor kept locally"
                );
            }
        }
    }
}

/// Handle used by the request path to submit audit events
#[derive(Clone)]
pub struct AuditLogger {
    sender: mpsc::Sender<AuditEvent>,
    fallback: Arc<Fallback>,
    counters: Arc<Counters>,
}

impl AuditLogger {
    /// Start the background worker and return the submitting handle with it
    ///
    /// Must be called inside a Tokio runtime.
    pub fn spawn(
        sink: Arc<dyn AuditSink>,
        store: Arc<dyn KeyValueStore>,
        keys: KeySpace,
        capacity: usize,
    ) -> (AuditLogger, AuditWorker) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let counters = Arc::new(Counters::default());
        let fallback = Arc::new(Fallback {
            store,
            keys,
            counters: counters.clone(),
        });

        let handle = tokio::spawn(run_worker(
            receiver,
            shutdown_rx,
            sink,
            fallback.clone(),
            counters.clone(),
        ));

        let logger = AuditLogger {
            sender,
            fallback,
            counters,
        };
        let worker = AuditWorker {
            shutdown: Some(shutdown_tx),
            handle,
        };
        (logger, worker)
    }

    pub async fn log_request(&self, audit: RequestAudit) {
        self.submit(AuditEvent::RequestSent(audit)).await;
    }

    pub async fn log_response(&self, audit: ResponseAudit) {
        self.submit(AuditEvent::ResponseRecorded(audit)).await;
    }

    /// Queue an event; a full or closed queue writes the fallback key directly
    pub async fn submit(&self, event: AuditEvent) {
        match self.sender.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                tracing::warn!(entity = event.entity(), event = "audit_queue_full", "Audit queue full");
                self.fallback.write(&event).await;
            }
            Err(TrySendError::Closed(event)) => {
                tracing::warn!(entity = event.entity(), event = "audit_queue_closed", "Audit worker stopped");
                self.fallback.write(&event).await;
            }
        }
    }

    pub fn stats(&self) -> AuditStats {
        AuditStats {
            delivered: self.counters.delivered.load(Ordering::Relaxed),
            fallback_writes: self.counters.fallback_writes.load(Ordering::Relaxed),
            lost: self.counters.lost.load(Ordering::Relaxed),
        }
    }
}

/// Owner of the background worker task
///
/// Dropping it without calling [`AuditWorker::shutdown`] also stops the
/// worker after it drains the queue.
pub struct AuditWorker {
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl AuditWorker {
    /// Close the queue and wait until every queued event is handled
    pub async fn shutdown(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Err(e) = (&mut self.handle).await {
            tracing::error!(error = %e, "Audit worker terminated abnormally");
        }
    }
}

async fn run_worker(
    mut receiver: mpsc::Receiver<AuditEvent>,
    mut shutdown: oneshot::Receiver<()>,
    sink: Arc<dyn AuditSink>,
    fallback: Arc<Fallback>,
    counters: Arc<Counters>,
) {
    loop {
        tokio::select! {
            next = receiver.recv() => match next {
                Some(event) => process(&event, sink.as_ref(), &fallback, &counters).await,
                None => return,
            },
            _ = &mut shutdown => break,
        }
    }

    receiver.close();
    let mut drained = 0usize;
    while let Some(event) = receiver.recv().await {
        process(&event, sink.as_ref(), &fallback, &counters).await;
        drained += 1;
    }
    tracing::info!(drained = drained, event = "audit_worker_stopped", "Audit worker drained and stopped");
}

async fn process(event: &AuditEvent, sink: &dyn AuditSink, fallback: &Fallback, counters: &Counters) {
    match sink.deliver(event).await {
        Ok(()) => {
            counters.delivered.fetch_add(1, Ordering::Relaxed);
        }
        Err(e) => {
            tracing::warn!(
                entity = event.entity(),
                tenant = event.tenant(),
                billing_sequence = event.billing_sequence(),
                error = %e,
                event = "audit_delivery_failed",
                "Audit delivery failed, keeping event locally"
            );
            fallback.write(event).await;
        }
    }
}
