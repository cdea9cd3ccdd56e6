//! Lip-sync timer.
//!
//! While speech plays, a task cycles random mouth shapes on a fixed
//! interval. The timer is owned by a guard: stopping or dropping the guard
//! aborts the task and closes the mouth, so a timer can never outlive the
//! speaking state.

use crate::surface::AvatarSurface;
use neron_shared::{Viseme, LIP_SYNC_CYCLE};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::trace;

pub struct LipSync {
    surface: Arc<dyn AvatarSurface>,
    handle: Option<JoinHandle<()>>,
}

impl LipSync {
    /// Start cycling mouth shapes every `interval`.
    pub fn start(surface: Arc<dyn AvatarSurface>, interval: Duration, seed: u64) -> Self {
        let task_surface = Arc::clone(&surface);
        let handle = tokio::spawn(async move {
            let mut rng = StdRng::seed_from_u64(seed);
            // First frame holds the closed mouth
            let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let viseme = *LIP_SYNC_CYCLE.choose(&mut rng).unwrap_or(&Viseme::Closed);
                task_surface.set_mouth(&viseme.shape());
            }
        });
        trace!(?interval, "lip sync started");

        Self {
            surface,
            handle: Some(handle),
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop the timer and reset the mouth to closed.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            self.surface.set_mouth(&Viseme::Closed.shape());
            trace!("lip sync stopped");
        }
    }
}

impl Drop for LipSync {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{RecordingSurface, SurfaceEvent};

    #[tokio::test(start_paused = true)]
    async fn test_cycles_then_closes() {
        let surface = Arc::new(RecordingSurface::new());
        let lip = LipSync::start(surface.clone(), Duration::from_millis(100), 1);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(surface.events().is_empty());

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(lip.is_running());
        lip.stop();

        let events = surface.events();
        // ticks at 100, 200, 300, 400 plus the closing reset
        assert_eq!(events.len(), 5);
        assert_eq!(events.last(), Some(&SurfaceEvent::Mouth(Viseme::Closed)));

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(surface.events().len(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_tears_down() {
        let surface = Arc::new(RecordingSurface::new());
        {
            let _lip = LipSync::start(surface.clone(), Duration::from_millis(100), 2);
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        let count = surface.events().len();
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(surface.events().len(), count);
        assert_eq!(surface.events().last(), Some(&SurfaceEvent::Mouth(Viseme::Closed)));
    }
}
