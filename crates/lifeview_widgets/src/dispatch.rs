//! Click debounce and callback dispatch
//!
//! A honoured click never runs its handler on the caller's stack. In
//! [`DispatchMode::Spawned`] the handler goes to the tokio blocking pool and
//! runs concurrently with the main loop; in [`DispatchMode::Queued`] it waits
//! in a queue the main loop drains once per tick with [`ClickDispatcher::run_pending`].
//!
//! Debounce is independent of the mode: the widget's suppression flag is
//! cleared before dispatch and restored by a timer task after the interval.

use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use serde::Deserialize;
use tokio::runtime::Handle;

use crate::error::{Result, WidgetError};
use crate::widget::{WidgetBase, WidgetId};

/// Click callback. The return value reports whether the click was acted on.
pub type ClickHandler = Arc<dyn Fn(&ClickEvent) -> bool + Send + Sync>;

/// Wrap a closure as a [`ClickHandler`]
pub fn on_click<F>(f: F) -> ClickHandler
where
    F: Fn(&ClickEvent) -> bool + Send + Sync + 'static,
{
    Arc::new(f)
}

/// What a click handler is told
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClickEvent {
    pub widget: WidgetId,
    pub x: i32,
    pub y: i32,
}

/// How honoured clicks reach their handlers
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchMode {
    /// Fire-and-forget on the blocking pool
    #[default]
    Spawned,
    /// Deferred until the next `run_pending`
    Queued,
}

struct PendingClick {
    handler: ClickHandler,
    event: ClickEvent,
}

/// Debounces clicks and hands them to their handlers
#[derive(Clone)]
pub struct ClickDispatcher {
    mode: DispatchMode,
    runtime: Handle,
    queue: Arc<Mutex<VecDeque<PendingClick>>>,
}

impl fmt::Debug for ClickDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClickDispatcher")
            .field("mode", &self.mode)
            .field("pending", &self.pending())
            .finish()
    }
}

impl ClickDispatcher {
    pub fn new(mode: DispatchMode, runtime: Handle) -> Self {
        Self {
            mode,
            runtime,
            queue: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// Dispatcher bound to the runtime of the calling context
    pub fn current(mode: DispatchMode) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|e| WidgetError::NoRuntime(e.to_string()))?;
        Ok(Self::new(mode, runtime))
    }

    pub fn mode(&self) -> DispatchMode {
        self.mode
    }

    /// Debounce and dispatch a click on `base`
    ///
    /// Returns false when the widget has no handler or is disabled, hidden or
    /// still suppressed by an earlier click.
    pub fn click(&self, base: &WidgetBase, x: i32, y: i32) -> bool {
        let Some(handler) = base.on_click() else {
            return false;
        };
        if !base.accepts_click() {
            tracing::trace!("click on {} ignored", base.id());
            return false;
        }

        if base.debounce() > Duration::ZERO {
            let flag = Arc::clone(base.suppression_flag());
            flag.store(false, Ordering::SeqCst);
            self.schedule_restore(flag, base.debounce());
        }

        let event = ClickEvent {
            widget: base.id(),
            x,
            y,
        };
        self.dispatch(Arc::clone(handler), event);
        true
    }

    fn schedule_restore(&self, flag: Arc<AtomicBool>, after: Duration) {
        self.runtime.spawn(async move {
            tokio::time::sleep(after).await;
            flag.store(true, Ordering::SeqCst);
        });
    }

    fn dispatch(&self, handler: ClickHandler, event: ClickEvent) {
        match self.mode {
            DispatchMode::Spawned => {
                tracing::debug!("dispatching click on {} to blocking pool", event.widget);
                self.runtime.spawn_blocking(move || {
                    let handled = handler(&event);
                    tracing::trace!("click handler for {} returned {}", event.widget, handled);
                });
            }
            DispatchMode::Queued => {
                tracing::debug!("queueing click on {}", event.widget);
                self.lock_queue()
                    .push_back(PendingClick { handler, event });
            }
        }
    }

    /// Run every queued handler. Returns how many ran.
    ///
    /// Handlers run outside the queue lock, so they may click again.
    pub fn run_pending(&self) -> usize {
        let pending: Vec<PendingClick> = self.lock_queue().drain(..).collect();
        let count = pending.len();
        for click in pending {
            let handled = (click.handler)(&click.event);
            tracing::trace!("click handler for {} returned {}", click.event.widget, handled);
        }
        count
    }

    /// Number of queued handlers
    pub fn pending(&self) -> usize {
        self.lock_queue().len()
    }

    fn lock_queue(&self) -> std::sync::MutexGuard<'_, VecDeque<PendingClick>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
