//! Debounced autosave.
//!
//! The editor sends a draft on every change. A draft is written only after the
//! document has been quiet for the configured delay; a newer draft for the
//! same document replaces the pending one and restarts the wait.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::Mutex;
use tracing::{debug, error};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::ResumePatch;
use crate::resumes::repository;

#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    pub resume_id: Uuid,
    pub user_id: Uuid,
    pub patch: ResumePatch,
}

/// Destination of debounced drafts.
#[async_trait]
pub trait DraftSink: Send + Sync {
    async fn flush(&self, draft: Draft) -> Result<(), AppError>;
}

pub struct PgDraftSink {
    pool: PgPool,
}

impl PgDraftSink {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DraftSink for PgDraftSink {
    async fn flush(&self, draft: Draft) -> Result<(), AppError> {
        repository::apply_patch(&self.pool, draft.resume_id, draft.user_id, draft.patch).await?;
        Ok(())
    }
}

struct Pending {
    ticket: u64,
    draft: Draft,
}

struct Inner {
    delay: Duration,
    sink: Arc<dyn DraftSink>,
    pending: Mutex<HashMap<Uuid, Pending>>,
    /// Held for the duration of a flush, one per document.
    gates: Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
    next_ticket: AtomicU64,
}

impl Inner {
    async fn gate(&self, resume_id: Uuid) -> Arc<Mutex<()>> {
        Arc::clone(self.gates.lock().await.entry(resume_id).or_default())
    }

    /// Removes the pending draft only if it is still the one `ticket` was issued for.
    async fn take_if_current(&self, resume_id: Uuid, ticket: u64) -> Option<Pending> {
        let mut pending = self.pending.lock().await;
        match pending.get(&resume_id) {
            Some(p) if p.ticket == ticket => pending.remove(&resume_id),
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct AutosaveScheduler {
    inner: Arc<Inner>,
}

impl AutosaveScheduler {
    pub fn new(delay: Duration, sink: Arc<dyn DraftSink>) -> Self {
        Self {
            inner: Arc::new(Inner {
                delay,
                sink,
                pending: Mutex::new(HashMap::new()),
                gates: Mutex::new(HashMap::new()),
                next_ticket: AtomicU64::new(0),
            }),
        }
    }

    /// Queues a draft, superseding any draft still waiting for the same document.
    pub async fn schedule(&self, draft: Draft) {
        let ticket = self.inner.next_ticket.fetch_add(1, Ordering::Relaxed);
        let resume_id = draft.resume_id;
        self.inner
            .pending
            .lock()
            .await
            .insert(resume_id, Pending { ticket, draft });

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            tokio::time::sleep(inner.delay).await;

            let gate = inner.gate(resume_id).await;
            let _flushing = gate.lock().await;

            if let Some(due) = inner.take_if_current(resume_id, ticket).await {
                match inner.sink.flush(due.draft).await {
                    Ok(()) => debug!("Autosaved resume {resume_id}"),
                    Err(e) => error!("Autosave of resume {resume_id} failed: {e}"),
                }
            }

            // the map and this task are the only holders: nobody else is waiting
            let mut gates = inner.gates.lock().await;
            if gates
                .get(&resume_id)
                .is_some_and(|g| Arc::ptr_eq(g, &gate) && Arc::strong_count(&gate) == 2)
            {
                gates.remove(&resume_id);
            }
        });
    }

    /// Drops the pending draft for a document and waits out a flush that has
    /// already started, so a write issued afterwards lands last.
    /// Returns whether a draft was still waiting.
    pub async fn cancel(&self, resume_id: Uuid) -> bool {
        let dropped = self.inner.pending.lock().await.remove(&resume_id).is_some();
        let gate = self.inner.gates.lock().await.remove(&resume_id);
        if let Some(gate) = gate {
            drop(gate.lock().await);
        }
        dropped
    }

    #[cfg(test)]
    pub async fn pending_count(&self) -> usize {
        self.inner.pending.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingSink {
        flushed: Mutex<Vec<Draft>>,
        fail: bool,
    }

    #[async_trait]
    impl DraftSink for RecordingSink {
        async fn flush(&self, draft: Draft) -> Result<(), AppError> {
            self.flushed.lock().await.push(draft);
            if self.fail {
                return Err(AppError::NotFound("gone".into()));
            }
            Ok(())
        }
    }

    /// Takes a while to write, like a slow database round trip.
    #[derive(Default)]
    struct SlowSink {
        written: Mutex<Vec<Draft>>,
    }

    #[async_trait]
    impl DraftSink for SlowSink {
        async fn flush(&self, draft: Draft) -> Result<(), AppError> {
            tokio::time::sleep(Duration::from_millis(500)).await;
            self.written.lock().await.push(draft);
            Ok(())
        }
    }

    fn draft(resume_id: Uuid, title: &str) -> Draft {
        Draft {
            resume_id,
            user_id: Uuid::nil(),
            patch: ResumePatch {
                title: Some(title.to_string()),
                ..Default::default()
            },
        }
    }

    fn scheduler(sink: &Arc<RecordingSink>) -> AutosaveScheduler {
        AutosaveScheduler::new(Duration::from_millis(2000), sink.clone())
    }

    async fn advance(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_draft_written_only_after_quiet_period() {
        let sink = Arc::new(RecordingSink::default());
        let autosave = scheduler(&sink);
        let id = Uuid::new_v4();

        autosave.schedule(draft(id, "v1")).await;
        advance(1999).await;
        assert!(sink.flushed.lock().await.is_empty());

        advance(2).await;
        let flushed = sink.flushed.lock().await;
        assert_eq!(flushed.len(), 1);
        assert_eq!(flushed[0].patch.title.as_deref(), Some("v1"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_drafts_coalesce_into_latest() {
        let sink = Arc::new(RecordingSink::default());
        let autosave = scheduler(&sink);
        let id = Uuid::new_v4();

        autosave.schedule(draft(id, "v1")).await;
        advance(1000).await;
        autosave.schedule(draft(id, "v2")).await;
        advance(1000).await;
        autosave.schedule(draft(id, "v3")).await;

        advance(1500).await;
        assert!(sink.flushed.lock().await.is_empty());

        advance(1000).await;
        let flushed = sink.flushed.lock().await;
        assert_eq!(flushed.len(), 1);
        assert_eq!(flushed[0].patch.title.as_deref(), Some("v3"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_documents_are_debounced_independently() {
        let sink = Arc::new(RecordingSink::default());
        let autosave = scheduler(&sink);

        autosave.schedule(draft(Uuid::new_v4(), "a")).await;
        autosave.schedule(draft(Uuid::new_v4(), "b")).await;
        assert_eq!(autosave.pending_count().await, 2);

        advance(2500).await;
        assert_eq!(sink.flushed.lock().await.len(), 2);
        assert_eq!(autosave.pending_count().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_discards_pending_draft() {
        let sink = Arc::new(RecordingSink::default());
        let autosave = scheduler(&sink);
        let id = Uuid::new_v4();

        autosave.schedule(draft(id, "v1")).await;
        assert!(autosave.cancel(id).await);
        assert!(!autosave.cancel(id).await);

        advance(3000).await;
        assert!(sink.flushed.lock().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_flush_is_not_retried() {
        let sink = Arc::new(RecordingSink {
            fail: true,
            ..Default::default()
        });
        let autosave = scheduler(&sink);

        autosave.schedule(draft(Uuid::new_v4(), "v1")).await;
        advance(10_000).await;
        assert_eq!(sink.flushed.lock().await.len(), 1);
        assert_eq!(autosave.pending_count().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_waits_for_flush_in_progress() {
        let sink = Arc::new(SlowSink::default());
        let autosave = AutosaveScheduler::new(Duration::from_millis(2000), sink.clone());
        let id = Uuid::new_v4();

        autosave.schedule(draft(id, "v1")).await;
        advance(2001).await;
        assert!(sink.written.lock().await.is_empty());

        let started = tokio::time::Instant::now();
        assert!(!autosave.cancel(id).await);
        assert!(started.elapsed() >= Duration::from_millis(499));
        assert_eq!(sink.written.lock().await.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gate_released_after_flush() {
        let sink = Arc::new(RecordingSink::default());
        let autosave = scheduler(&sink);
        let id = Uuid::new_v4();

        autosave.schedule(draft(id, "v1")).await;
        advance(2500).await;
        assert!(autosave.inner.gates.lock().await.is_empty());
    }
}
