//! Shared crawl frontier
//!
//! The frontier owns two pieces of state behind a single lock:
//! - a bounded FIFO of pages waiting for a spider
//! - the claimed set, keyed by canonical URL, holding every page a spider has
//!   taken (and, once finished, its crawled form)
//!
//! Producers never wait for space: `enqueue` on a full queue drops the page.
//! Consumers park on a `Notify` until work arrives or the crawl is cancelled.

use crate::model::Page;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

/// Queue and claimed set, always mutated together
#[derive(Debug, Default)]
struct State {
    queue: VecDeque<Page>,
    claimed: HashMap<String, Page>,
}

/// Bounded work queue plus at-most-once claim index
#[derive(Debug)]
pub struct Frontier {
    state: Mutex<State>,
    available: Notify,
    capacity: usize,
}

impl Frontier {
    /// Creates an empty frontier whose queue holds at most `capacity` pages
    pub fn new(capacity: usize) -> Self {
        Self {
            state: Mutex::new(State {
                queue: VecDeque::with_capacity(capacity.min(1024)),
                claimed: HashMap::new(),
            }),
            available: Notify::new(),
            capacity,
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // A panic while holding the lock cannot leave the queue or the
        // claimed set half-updated, so a poisoned guard is still usable.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Offers a page to the queue without blocking
    ///
    /// Returns `false` when the queue is at capacity; the page is dropped and
    /// never retried. Pages whose URL was already claimed are still accepted
    /// here and discarded later by `claim`.
    pub fn enqueue(&self, page: Page) -> bool {
        {
            let mut state = self.lock();
            if state.queue.len() >= self.capacity {
                return false;
            }
            state.queue.push_back(page);
        }
        self.available.notify_one();
        true
    }

    /// Waits for the next unclaimed page
    ///
    /// Dequeued pages whose URL is already in the claimed set are discarded and
    /// the loop continues. The membership check and the insert happen under the
    /// same lock as the dequeue, so each URL is returned at most once across
    /// all callers.
    ///
    /// Returns `None` once `token` is cancelled.
    pub async fn claim(&self, token: &CancellationToken) -> Option<Page> {
        loop {
            // Register interest before inspecting the queue so a concurrent
            // enqueue between the check and the await is not missed.
            let notified = self.available.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if token.is_cancelled() {
                return None;
            }

            if let Some((page, more)) = self.try_claim() {
                if more {
                    // Hand the wake-up on to another idle spider
                    self.available.notify_one();
                }
                return Some(page);
            }

            tokio::select! {
                _ = token.cancelled() => return None,
                _ = &mut notified => {}
            }
        }
    }

    /// Pops pages until one with an unclaimed URL is found
    fn try_claim(&self) -> Option<(Page, bool)> {
        let mut state = self.lock();
        while let Some(page) = state.queue.pop_front() {
            if state.claimed.contains_key(&page.url) {
                tracing::trace!("Discarding already claimed {}", page.url);
                continue;
            }
            state.claimed.insert(page.url.clone(), page.clone());
            let more = !state.queue.is_empty();
            return Some((page, more));
        }
        None
    }

    /// Records the final form of a claimed page
    ///
    /// Pages that were never claimed are ignored.
    pub fn complete(&self, page: Page) {
        let mut state = self.lock();
        if let Some(entry) = state.claimed.get_mut(&page.url) {
            *entry = page;
        }
    }

    /// Copies the claimed set, keyed by URL
    pub fn snapshot(&self) -> HashMap<String, Page> {
        self.lock().claimed.clone()
    }

    /// Number of pages currently waiting in the queue
    pub fn len(&self) -> usize {
        self.lock().queue.len()
    }

    /// Returns true if no page is waiting
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fixed queue capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of URLs claimed so far
    pub fn claimed_count(&self) -> usize {
        self.lock().claimed.len()
    }
}
