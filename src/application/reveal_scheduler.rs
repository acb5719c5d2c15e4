// RevealScheduler - Commits a new window into the displayed one slot by slot
use crate::application::renderer::{FrameContext, NoDataReason, RenderFrame, Renderer};
use crate::domain::window::Window;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;

pub const DEFAULT_STEP_DELAY: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, PartialEq)]
pub struct RevealState {
    /// What the renderer currently shows.
    pub displayed: Window,
    /// Latest fully computed window.
    pub target: Window,
    /// Number of slots of `target` committed so far.
    pub cursor: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealOutcome {
    Completed,
    /// A newer target arrived or the scheduler was cancelled.
    Superseded,
}

#[derive(Debug, Default)]
struct Inner {
    state: Option<RevealState>,
    closed: bool,
}

/// Sole owner of the displayed window.
///
/// Every reveal loop carries the generation it was started with and checks it
/// under the state lock before each commit, so a loop that has been
/// superseded stops without touching `displayed` again.
pub struct RevealScheduler {
    renderer: Arc<dyn Renderer>,
    step_delay: Duration,
    generation: AtomicU64,
    inner: Mutex<Inner>,
    task: Mutex<Option<JoinHandle<RevealOutcome>>>,
}

impl RevealScheduler {
    pub fn new(renderer: Arc<dyn Renderer>, step_delay: Duration) -> Self {
        Self {
            renderer,
            step_delay,
            generation: AtomicU64::new(0),
            inner: Mutex::new(Inner::default()),
            task: Mutex::new(None),
        }
    }

    /// Start revealing `target` in the background, abandoning any reveal in flight.
    pub fn handle(self: &Arc<Self>, target: Window, context: FrameContext) -> u64 {
        let generation = self.supersede();
        let this = Arc::clone(self);
        let handle = tokio::spawn(async move { this.reveal(generation, target, context).await });
        *lock(&self.task) = Some(handle);
        generation
    }

    /// Invalidate every reveal loop started so far and return the new generation.
    pub fn supersede(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Run one reveal sequence: newest slot first, one commit per step.
    pub async fn reveal(
        &self,
        generation: u64,
        target: Window,
        context: FrameContext,
    ) -> RevealOutcome {
        let len = target.len();

        let baseline = {
            let mut inner = lock(&self.inner);
            if !self.is_current(&inner, generation) {
                return RevealOutcome::Superseded;
            }
            match inner.state.as_mut().filter(|s| s.displayed.len() == len) {
                Some(state) => {
                    state.target = target.clone();
                    state.cursor = 0;
                    false
                }
                None => {
                    let zeroed = Window::zeroed(len);
                    inner.state = Some(RevealState {
                        displayed: zeroed.clone(),
                        target: target.clone(),
                        cursor: 0,
                    });
                    // Empty commit so the renderer can lay out before values animate in
                    self.renderer.render(RenderFrame::new(zeroed, context.clone()));
                    true
                }
            }
        };
        if baseline {
            tracing::debug!("Reveal generation {} emitted baseline of {} slots", generation, len);
            tokio::time::sleep(self.step_delay).await;
        }

        for step in 0..len {
            {
                let mut inner = lock(&self.inner);
                if !self.is_current(&inner, generation) {
                    tracing::debug!("Reveal generation {} superseded at step {}", generation, step);
                    return RevealOutcome::Superseded;
                }
                let Some(state) = inner.state.as_mut() else {
                    return RevealOutcome::Superseded;
                };

                let index = len - 1 - step;
                if let Some(slot) = target.get(index) {
                    state.displayed.set(index, *slot);
                }
                state.cursor = step + 1;
                self.renderer
                    .render(RenderFrame::new(state.displayed.clone(), context.clone()));
            }

            if step + 1 < len {
                tokio::time::sleep(self.step_delay).await;
            }
        }

        if let Some(state) = lock(&self.inner).state.as_ref() {
            tracing::debug!(
                "Reveal generation {} committed {} of {} slots",
                generation,
                state.cursor,
                state.target.len()
            );
        }
        RevealOutcome::Completed
    }

    /// Forward a no-data signal unless cancelled. With `abandon`, any reveal in
    /// flight is superseded first so it cannot paint over the signal.
    pub fn no_data(&self, reason: NoDataReason, abandon: bool) -> bool {
        let inner = lock(&self.inner);
        if inner.closed {
            tracing::debug!("No-data signal {:?} dropped after cancel", reason);
            return false;
        }
        if abandon {
            self.supersede();
        }
        self.renderer.no_data(reason);
        true
    }

    /// Stop for good: no snapshot is emitted once this returns.
    pub fn cancel(&self) {
        {
            let mut inner = lock(&self.inner);
            inner.closed = true;
            inner.state = None;
            self.supersede();
        }
        if let Some(task) = lock(&self.task).take() {
            task.abort();
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> Option<RevealState> {
        lock(&self.inner).state.clone()
    }

    #[cfg(test)]
    pub fn displayed(&self) -> Option<Window> {
        lock(&self.inner).state.as_ref().map(|s| s.displayed.clone())
    }

    fn is_current(&self, inner: &Inner, generation: u64) -> bool {
        !inner.closed && self.generation.load(Ordering::SeqCst) == generation
    }
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
