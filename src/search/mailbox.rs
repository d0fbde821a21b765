//! Bounded job queue feeding the search worker

use parking_lot::Mutex;
use std::collections::VecDeque;
use tokio::sync::Notify;

/// Outcome from enqueueing a job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PushOutcome {
    /// Job was enqueued without replacement
    Enqueued,
    /// Queue was full; the oldest queued job was dropped
    ReplacedOldest,
}

/// The queue no longer accepts jobs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MailboxClosed;

struct MailboxState<T> {
    queue: VecDeque<T>,
    closed: bool,
}

/// Drop-oldest bounded queue.
///
/// Pushing never blocks, so callers on a UI thread are never stalled by a busy
/// worker. Receivers drain queued items after close, then get `None`.
pub(crate) struct Mailbox<T> {
    capacity: usize,
    state: Mutex<MailboxState<T>>,
    notify_recv: Notify,
}

impl<T> Mailbox<T> {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            state: Mutex::new(MailboxState {
                queue: VecDeque::with_capacity(capacity),
                closed: false,
            }),
            notify_recv: Notify::new(),
        }
    }

    pub fn push(&self, item: T) -> Result<PushOutcome, MailboxClosed> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(MailboxClosed);
        }
        let outcome = if state.queue.len() >= self.capacity {
            let _ = state.queue.pop_front();
            PushOutcome::ReplacedOldest
        } else {
            PushOutcome::Enqueued
        };
        state.queue.push_back(item);
        drop(state);
        self.notify_recv.notify_one();
        Ok(outcome)
    }

    /// Receive one item. Returns `None` once closed and drained.
    pub async fn recv(&self) -> Option<T> {
        loop {
            let notified = self.notify_recv.notified();
            {
                let mut state = self.state.lock();
                if let Some(item) = state.queue.pop_front() {
                    return Some(item);
                }
                if state.closed {
                    return None;
                }
            }
            notified.await;
        }
    }

    pub fn close(&self) {
        self.state.lock().closed = true;
        self.notify_recv.notify_waiters();
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    pub fn len(&self) -> usize {
        self.state.lock().queue.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
