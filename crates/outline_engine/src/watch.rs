use std::time::{Duration, Instant};

use outline_logging::{outline_debug, outline_trace, set_scan_epoch};

use crate::{MutationKind, MutationRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchSettings {
    /// Silence required after the last mutation before a re-scan runs.
    pub quiet_period: Duration,
}

impl Default for WatchSettings {
    fn default() -> Self {
        Self {
            quiet_period: Duration::from_millis(1000),
        }
    }
}

/// Trailing-edge debounce with at most one pending deadline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Debouncer {
    quiet_period: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            deadline: None,
        }
    }

    /// Cancels any pending deadline and starts a fresh quiet period at `now`.
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.quiet_period);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Fires (and clears) the deadline once `now` reaches it.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Turns batched mutation notifications into debounced re-scan requests.
#[derive(Debug, Clone)]
pub struct ChangeWatcher {
    debouncer: Debouncer,
    observing: bool,
    scans: u64,
}

impl ChangeWatcher {
    pub fn new(settings: WatchSettings) -> Self {
        Self {
            debouncer: Debouncer::new(settings.quiet_period),
            observing: false,
            scans: 0,
        }
    }

    pub fn observe(&mut self) {
        self.observing = true;
    }

    /// Stops observing and drops any pending re-scan.
    pub fn disconnect(&mut self) {
        self.observing = false;
        self.debouncer.cancel();
    }

    pub fn is_observing(&self) -> bool {
        self.observing
    }

    pub fn pending_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    pub fn scans(&self) -> u64 {
        self.scans
    }

    /// Schedules a re-scan if the batch holds any child-list change.
    /// Returns whether the debounce timer was (re)started.
    pub fn on_mutations<N>(&mut self, batch: &[MutationRecord<N>], now: Instant) -> bool {
        if !self.observing {
            return false;
        }
        let structural = batch
            .iter()
            .any(|record| record.kind == MutationKind::ChildList);
        if structural {
            self.debouncer.schedule(now);
            outline_trace!("Re-scan scheduled after {} mutation records", batch.len());
        }
        structural
    }

    /// Returns true when a debounced re-scan is due at `now`.
    pub fn poll(&mut self, now: Instant) -> bool {
        self.observing && self.debouncer.poll(now)
    }

    /// Records a completed scan and publishes the new epoch to the logger.
    pub fn record_scan(&mut self) -> u64 {
        self.scans += 1;
        set_scan_epoch(self.scans);
        outline_debug!("Scan epoch {}", self.scans);
        self.scans
    }
}
