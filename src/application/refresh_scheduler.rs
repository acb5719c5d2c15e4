// RefreshScheduler - Runs the fetch cycle on every wall-clock minute
use crate::application::reveal_scheduler::lock;
use crate::application::wind_service::WindService;
use chrono::{DateTime, Timelike, Utc};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

const MINUTE_MS: u64 = 60_000;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleState {
    Idle,
    Fetching,
    Scheduled,
    Detached,
}

/// Time left until the next minute boundary; a full minute when exactly on one.
pub fn delay_until_next_minute(now: DateTime<Utc>) -> Duration {
    // Leap-second nanos can exceed one second
    let millis = (now.nanosecond() / 1_000_000).min(999) as u64;
    let elapsed = now.second() as u64 * 1_000 + millis;
    Duration::from_millis(MINUTE_MS - elapsed)
}

pub struct RefreshScheduler {
    service: Arc<WindService>,
    clock: Arc<dyn Clock>,
    state: Arc<Mutex<ScheduleState>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl RefreshScheduler {
    pub fn new(service: Arc<WindService>, clock: Arc<dyn Clock>) -> Self {
        Self {
            service,
            clock,
            state: Arc::new(Mutex::new(ScheduleState::Idle)),
            task: Mutex::new(None),
        }
    }

    pub fn state(&self) -> ScheduleState {
        *lock(&self.state)
    }

    /// Run one cycle now, then one at every following minute boundary.
    ///
    /// Only an idle scheduler can be attached.
    pub fn attach(&self) -> bool {
        {
            let mut state = lock(&self.state);
            if *state != ScheduleState::Idle {
                tracing::warn!("Refresh scheduler attach ignored in state {:?}", *state);
                return false;
            }
            *state = ScheduleState::Fetching;
        }

        let service = self.service.clone();
        let clock = self.clock.clone();
        let state = self.state.clone();
        let handle = tokio::spawn(async move {
            loop {
                set_state(&state, ScheduleState::Fetching);
                let outcome = service.run_cycle(clock.now()).await;
                tracing::debug!("Fetch cycle finished: {:?}", outcome);

                // Recomputed every time so a slow fetch does not shift the schedule
                let delay = delay_until_next_minute(clock.now());
                set_state(&state, ScheduleState::Scheduled);
                tracing::debug!("Next refresh in {} ms", delay.as_millis());
                tokio::time::sleep(delay).await;
            }
        });
        *lock(&self.task) = Some(handle);
        tracing::info!("Refresh scheduler attached");
        true
    }

    /// Stop refreshing and abandon any reveal in flight. Terminal.
    pub fn detach(&self) {
        *lock(&self.state) = ScheduleState::Detached;
        if let Some(task) = lock(&self.task).take() {
            task.abort();
        }
        self.service.reveal_scheduler().cancel();
        tracing::info!("Refresh scheduler detached");
    }
}

fn set_state(state: &Mutex<ScheduleState>, next: ScheduleState) {
    let mut current = lock(state);
    if *current != ScheduleState::Detached {
        *current = next;
    }
}
