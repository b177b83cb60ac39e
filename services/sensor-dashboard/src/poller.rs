//! Polling controller: refreshes readings on a timer and on demand

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::source::ReadingSource;
use crate::state::StateHandle;

const COMMAND_BUFFER: usize = 16;

/// Requests sent to a running poller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollCommand {
    RefreshNow,
    SetInterval(Duration),
}

/// Result of asking for a manual refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Queued,
    /// A fetch is already in flight; the request was dropped
    Busy,
}

/// The polling loop. Owns the timer, the only writer of the shared state.
pub struct Poller {
    source: Arc<dyn ReadingSource>,
    state: StateHandle,
    commands: mpsc::Receiver<PollCommand>,
    interval: Duration,
    cancel: CancellationToken,
}

/// Cloneable control surface for a [`Poller`]
#[derive(Debug, Clone)]
pub struct PollerHandle {
    commands: mpsc::Sender<PollCommand>,
    state: StateHandle,
    cancel: CancellationToken,
}

impl std::fmt::Debug for Poller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Poller")
            .field("source", &self.source)
            .field("interval", &self.interval)
            .finish()
    }
}

impl Poller {
    pub fn new(
        source: Arc<dyn ReadingSource>,
        state: StateHandle,
        interval: Duration,
        cancel: CancellationToken,
    ) -> crate::Result<(Self, PollerHandle)> {
        if interval.is_zero() {
            return Err(crate::DashboardError::InvalidInterval(0));
        }

        let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
        let handle = PollerHandle {
            commands: tx,
            state: Arc::clone(&state),
            cancel: cancel.clone(),
        };
        let poller = Self {
            source,
            state,
            commands: rx,
            interval,
            cancel,
        };
        Ok((poller, handle))
    }

    /// Run the loop on its own task
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Fetch once and fold the result into the shared state.
    ///
    /// Returns true if the displayed readings changed.
    pub async fn refresh(&self) -> bool {
        self.state.write().await.begin_fetch();

        let result = self.source.fetch().await;
        let now_ms = current_epoch_ms();

        let mut state = self.state.write().await;
        match result {
            Ok(readings) => {
                let count = readings.len();
                let changed = state.apply_success(readings, now_ms);
                tracing::debug!("Fetched {} readings (changed={})", count, changed);
                changed
            }
            Err(e) => {
                tracing::warn!("Error loading sensor data: {}", e);
                state.apply_failure();
                false
            }
        }
    }

    /// Fetch immediately, then every `interval` until cancelled or every
    /// handle has been dropped.
    pub async fn run(mut self) {
        tracing::info!(
            "Polling {:?} every {} ms",
            self.source,
            self.interval.as_millis()
        );

        let mut ticker = schedule(self.interval);
        self.refresh().await;

        loop {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    tracing::debug!("Polling loop cancelled");
                    break;
                }
                command = self.commands.recv() => match command {
                    Some(PollCommand::RefreshNow) => {
                        tracing::debug!("Manual refresh requested");
                        self.refresh().await;
                    }
                    Some(PollCommand::SetInterval(interval)) if interval == self.interval => {
                        tracing::debug!(
                            "Polling interval already {} ms, schedule unchanged",
                            interval.as_millis()
                        );
                    }
                    Some(PollCommand::SetInterval(interval)) => {
                        tracing::info!(
                            "Polling interval changed from {} ms to {} ms",
                            self.interval.as_millis(),
                            interval.as_millis()
                        );
                        self.interval = interval;
                        self.state
                            .write()
                            .await
                            .set_interval(interval.as_millis() as u64);
                        ticker = schedule(interval);
                        self.refresh().await;
                    }
                    None => {
                        tracing::debug!("All poller handles dropped, stopping");
                        break;
                    }
                },
                _ = ticker.tick() => {
                    self.refresh().await;
                }
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn try_next_command(&mut self) -> Option<PollCommand> {
        self.commands.try_recv().ok()
    }
}

impl PollerHandle {
    pub fn state(&self) -> &StateHandle {
        &self.state
    }

    /// Ask for a fetch outside the schedule
    pub async fn refresh_now(&self) -> crate::Result<RefreshOutcome> {
        if self.state.read().await.is_loading {
            return Ok(RefreshOutcome::Busy);
        }
        self.send(PollCommand::RefreshNow).await?;
        Ok(RefreshOutcome::Queued)
    }

    /// Cancel the pending timer and restart the schedule with a new period.
    ///
    /// Asking for the period already in use leaves the schedule alone.
    pub async fn set_interval(&self, interval: Duration) -> crate::Result<()> {
        if interval.is_zero() {
            return Err(crate::DashboardError::InvalidInterval(0));
        }
        self.send(PollCommand::SetInterval(interval)).await
    }

    /// Stop the poller. No further fetches are scheduled.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled() || self.commands.is_closed()
    }

    async fn send(&self, command: PollCommand) -> crate::Result<()> {
        if self.cancel.is_cancelled() {
            return Err(crate::DashboardError::ControllerStopped);
        }
        self.commands
            .send(command)
            .await
            .map_err(|_| crate::DashboardError::ControllerStopped)
    }
}

fn schedule(period: Duration) -> Interval {
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker
}

pub(crate) fn current_epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
