//! Sequencing for asynchronous image decodes.
//!
//! Each assigned source gets a monotonically increasing ticket; only the
//! newest ticket's completion is acted upon, the rest are stale.

/// Identifies one submitted decode
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadTicket(u64);

impl LoadTicket {
    pub fn id(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct LoadSequence {
    latest: u64,
    settled: bool,
}

impl LoadSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new decode, superseding any still pending.
    pub fn begin(&mut self) -> LoadTicket {
        self.latest += 1;
        self.settled = false;
        LoadTicket(self.latest)
    }

    /// True while `ticket` is the newest decode and has not completed yet
    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.0 == self.latest && !self.settled
    }

    /// Accept a completion (load or error). Returns false for stale or repeated ones.
    pub fn complete(&mut self, ticket: LoadTicket) -> bool {
        if !self.is_current(ticket) {
            log::debug!(
                "Discarding stale image completion #{} (latest #{})",
                ticket.0,
                self.latest
            );
            return false;
        }
        self.settled = true;
        true
    }
}
