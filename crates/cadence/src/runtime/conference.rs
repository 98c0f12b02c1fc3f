// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! In-process conference.
//!
//! Every participant (module or feedback component) holds a
//! [`ConferenceEndpoint`] with its own bounded inbox. Publishing stamps the
//! sent time, then delivers a copy with the received time to every other
//! member. A full inbox drops its oldest container to make room, so a member
//! that never reads keeps only the most recent traffic. Nothing leaves the
//! process.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crossbeam::channel::{self, Receiver, Sender, TrySendError};
use parking_lot::Mutex;

use crate::data::{Container, TimeStamp};

/// Containers an inbox holds before the oldest is dropped.
pub const DEFAULT_INBOX_CAPACITY: usize = 1024;

struct Member {
    id: u64,
    inbox: Sender<Container>,
    /// Publisher side handle used to evict the oldest entry.
    backlog: Receiver<Container>,
    dropped: u64,
}

impl Member {
    /// Returns `false` once the member's endpoint is gone.
    fn deliver(&mut self, mut container: Container, cid: u32) -> bool {
        loop {
            match self.inbox.try_send(container) {
                Ok(()) => return true,
                Err(TrySendError::Disconnected(_)) => return false,
                Err(TrySendError::Full(back)) => {
                    container = back;
                    if self.backlog.try_recv().is_ok() {
                        self.dropped += 1;
                        if self.dropped == 1 || self.dropped % 1000 == 0 {
                            log::warn!(
                                "[Conference::publish] cid={} member={} inbox full, {} dropped",
                                cid,
                                self.id,
                                self.dropped
                            );
                        }
                    }
                }
            }
        }
    }
}

struct ConferenceInner {
    cid: u32,
    capacity: usize,
    members: Mutex<Vec<Member>>,
    next_member: AtomicU64,
    published: AtomicU64,
    dropped: AtomicU64,
}

/// Broadcast bus shared by the participants of one conference id.
#[derive(Clone)]
pub struct Conference {
    inner: Arc<ConferenceInner>,
}

impl Conference {
    pub fn new(cid: u32) -> Self {
        Self::with_inbox_capacity(cid, DEFAULT_INBOX_CAPACITY)
    }

    /// Conference whose member inboxes hold at most `capacity` containers
    /// (at least one).
    pub fn with_inbox_capacity(cid: u32, capacity: usize) -> Self {
        Self {
            inner: Arc::new(ConferenceInner {
                cid,
                capacity: capacity.max(1),
                members: Mutex::new(Vec::new()),
                next_member: AtomicU64::new(1),
                published: AtomicU64::new(0),
                dropped: AtomicU64::new(0),
            }),
        }
    }

    pub fn cid(&self) -> u32 {
        self.inner.cid
    }

    pub fn join(&self) -> ConferenceEndpoint {
        let id = self.inner.next_member.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = channel::bounded(self.inner.capacity);
        self.inner.members.lock().push(Member {
            id,
            inbox: tx,
            backlog: rx.clone(),
            dropped: 0,
        });
        log::debug!("[Conference::join] cid={} member={}", self.inner.cid, id);
        ConferenceEndpoint {
            id,
            conference: self.clone(),
            inbox: rx,
        }
    }

    pub fn member_count(&self) -> usize {
        self.inner.members.lock().len()
    }

    /// Containers published since creation.
    pub fn published(&self) -> u64 {
        self.inner.published.load(Ordering::Relaxed)
    }

    /// Containers evicted from full inboxes since creation.
    pub fn dropped(&self) -> u64 {
        self.inner.dropped.load(Ordering::Relaxed)
    }

    pub fn inbox_capacity(&self) -> usize {
        self.inner.capacity
    }

    fn publish_from(&self, sender: u64, container: Container) {
        let now = TimeStamp::now();
        let container = container.with_sent_time_stamp(now);
        let mut members = self.inner.members.lock();
        for member in members.iter_mut().filter(|m| m.id != sender) {
            let before = member.dropped;
            // A disconnected inbox means the member is leaving.
            let _ = member.deliver(
                container.clone().with_received_time_stamp(now),
                self.inner.cid,
            );
            self.inner
                .dropped
                .fetch_add(member.dropped - before, Ordering::Relaxed);
        }
        self.inner.published.fetch_add(1, Ordering::Relaxed);
    }

    fn leave(&self, id: u64) {
        self.inner.members.lock().retain(|m| m.id != id);
        log::debug!("[Conference::leave] cid={} member={}", self.inner.cid, id);
    }
}

impl std::fmt::Debug for Conference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Conference")
            .field("cid", &self.inner.cid)
            .field("members", &self.member_count())
            .finish()
    }
}

/// One participant's handle on a [`Conference`]. Leaves on drop.
pub struct ConferenceEndpoint {
    id: u64,
    conference: Conference,
    inbox: Receiver<Container>,
}

impl ConferenceEndpoint {
    /// Deliver `container` to every other member.
    pub fn send(&self, container: Container) {
        self.conference.publish_from(self.id, container);
    }

    /// Everything received since the last call, oldest first.
    pub fn receive(&self) -> Vec<Container> {
        self.inbox.try_iter().collect()
    }

    pub fn pending(&self) -> usize {
        self.inbox.len()
    }

    pub fn cid(&self) -> u32 {
        self.conference.cid()
    }
}

impl Drop for ConferenceEndpoint {
    fn drop(&mut self) {
        self.conference.leave(self.id);
    }
}
