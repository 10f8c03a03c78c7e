//! Timer-driven playback on the tokio runtime.
//!
//! [`AutoPlayer`] wraps a [`Playback`] behind a mutex and owns every timer
//! task that touches it: element reveal autoplay, slide autoplay and the
//! transition unmount timer. Each timer carries the generation it was started
//! with and re-checks it under the lock before touching the cursor, so a
//! callback can never fire after it was cancelled, even if the abort races
//! the wakeup.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::playback::{Playback, Step};
use crate::{DeckError, DeckResult};

/// Reveal autoplay interval presets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RevealInterval {
    /// One reveal per second.
    OneSecond,
    /// One reveal every two seconds.
    #[default]
    TwoSeconds,
    /// One reveal every three seconds.
    ThreeSeconds,
    /// One reveal every five seconds.
    FiveSeconds,
}

impl RevealInterval {
    /// All presets, shortest first.
    pub const ALL: [Self; 4] = [
        Self::OneSecond,
        Self::TwoSeconds,
        Self::ThreeSeconds,
        Self::FiveSeconds,
    ];

    /// Interval as a duration.
    #[must_use]
    pub fn as_duration(self) -> Duration {
        Duration::from_secs(match self {
            Self::OneSecond => 1,
            Self::TwoSeconds => 2,
            Self::ThreeSeconds => 3,
            Self::FiveSeconds => 5,
        })
    }
}

/// Playback timer configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackConfig {
    /// Reveal autoplay interval.
    pub reveal_interval: RevealInterval,
    /// Slide autoplay interval.
    #[serde(with = "secs")]
    pub slide_interval: Duration,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            reveal_interval: RevealInterval::default(),
            slide_interval: Duration::from_secs(5),
        }
    }
}

mod secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}

#[derive(Default)]
struct Timer {
    generation: u64,
    task: Option<JoinHandle<()>>,
}

impl Timer {
    fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Invalidate the current generation and abort the task.
    fn cancel(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

struct Shared {
    playback: Playback,
    reveal: Timer,
    slides: Timer,
    unmount: Timer,
}

type SharedState = Arc<Mutex<Shared>>;

fn lock(shared: &SharedState) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Playback driven by tokio timers.
///
/// Dropping the player aborts every timer.
pub struct AutoPlayer {
    shared: SharedState,
    runtime: Handle,
    config: PlaybackConfig,
}

impl AutoPlayer {
    /// Wrap a playback state machine.
    ///
    /// # Errors
    ///
    /// Returns [`DeckError::NoRuntime`] when called outside a tokio runtime.
    pub fn new(playback: Playback, config: PlaybackConfig) -> DeckResult<Self> {
        let runtime = Handle::try_current().map_err(|e| DeckError::NoRuntime(e.to_string()))?;
        Ok(Self {
            shared: Arc::new(Mutex::new(Shared {
                playback,
                reveal: Timer::default(),
                slides: Timer::default(),
                unmount: Timer::default(),
            })),
            runtime,
            config,
        })
    }

    /// Timer configuration.
    #[must_use]
    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    /// Read the playback state.
    pub fn with_playback<R>(&self, read: impl FnOnce(&Playback) -> R) -> R {
        read(&lock(&self.shared).playback)
    }

    /// Manual advance. A slide change cancels reveal autoplay.
    pub fn advance(&self) -> Step {
        self.navigate(Playback::advance)
    }

    /// Manual retreat. A slide change cancels reveal autoplay.
    pub fn retreat(&self) -> Step {
        self.navigate(Playback::retreat)
    }

    /// Jump to the next slide.
    pub fn next_slide(&self) -> Step {
        self.navigate(Playback::next_slide)
    }

    /// Jump to the previous slide.
    pub fn previous_slide(&self) -> Step {
        self.navigate(Playback::previous_slide)
    }

    /// Jump to a slide by index.
    pub fn go_to_slide(&self, index: usize) -> Option<Step> {
        let step = self.navigate(|p| p.go_to_slide(index).unwrap_or(Step::End));
        matches!(step, Step::SlideChanged { .. }).then_some(step)
    }

    fn navigate(&self, op: impl FnOnce(&mut Playback) -> Step) -> Step {
        let mut state = lock(&self.shared);
        let step = op(&mut state.playback);
        if matches!(step, Step::SlideChanged { .. }) {
            on_slide_changed(&self.shared, &self.runtime, &mut state);
        }
        step
    }

    /// Start reveal autoplay. Returns `false` if it was already running or
    /// there is nothing left to reveal.
    pub fn start_reveal(&self, interval: RevealInterval) -> bool {
        let mut state = lock(&self.shared);
        if state.reveal.is_running() || state.playback.reveal_complete() {
            return false;
        }
        state.reveal.cancel();
        let generation = state.reveal.generation;
        let shared = Arc::clone(&self.shared);
        let period = interval.as_duration();
        state.reveal.task = Some(self.runtime.spawn(async move {
            loop {
                tokio::time::sleep(period).await;
                let mut state = lock(&shared);
                if state.reveal.generation != generation {
                    return;
                }
                state.playback.reveal_next();
                if state.playback.reveal_complete() {
                    tracing::debug!("Reveal autoplay finished");
                    state.reveal.task = None;
                    return;
                }
            }
        }));
        tracing::debug!(interval_secs = period.as_secs(), "Reveal autoplay started");
        true
    }

    /// Stop reveal autoplay.
    pub fn stop_reveal(&self) {
        lock(&self.shared).reveal.cancel();
    }

    /// Toggle reveal autoplay with the configured interval. Returns whether
    /// it is now running.
    pub fn toggle_reveal(&self) -> bool {
        if self.is_revealing() {
            self.stop_reveal();
            false
        } else {
            self.start_reveal(self.config.reveal_interval)
        }
    }

    /// Whether reveal autoplay is running.
    #[must_use]
    pub fn is_revealing(&self) -> bool {
        lock(&self.shared).reveal.is_running()
    }

    /// Start slide autoplay. Returns `false` if it was already running or
    /// the cursor is on the last slide.
    pub fn start_slides(&self, interval: Duration) -> bool {
        let mut state = lock(&self.shared);
        if state.slides.is_running() || state.playback.is_last_slide() {
            return false;
        }
        state.slides.cancel();
        let generation = state.slides.generation;
        let shared = Arc::clone(&self.shared);
        let runtime = self.runtime.clone();
        state.slides.task = Some(self.runtime.spawn(async move {
            loop {
                tokio::time::sleep(interval).await;
                let mut state = lock(&shared);
                if state.slides.generation != generation {
                    return;
                }
                if let Step::SlideChanged { .. } = state.playback.next_slide() {
                    on_slide_changed(&shared, &runtime, &mut state);
                }
                if state.playback.is_last_slide() {
                    tracing::debug!("Slide autoplay reached the last slide");
                    state.slides.task = None;
                    return;
                }
            }
        }));
        tracing::debug!(interval_ms = interval.as_millis(), "Slide autoplay started");
        true
    }

    /// Stop slide autoplay.
    pub fn stop_slides(&self) {
        lock(&self.shared).slides.cancel();
    }

    /// Toggle slide autoplay with the configured interval. Returns whether
    /// it is now running.
    pub fn toggle_slides(&self) -> bool {
        if self.is_playing_slides() {
            self.stop_slides();
            false
        } else {
            self.start_slides(self.config.slide_interval)
        }
    }

    /// Whether slide autoplay is running.
    #[must_use]
    pub fn is_playing_slides(&self) -> bool {
        lock(&self.shared).slides.is_running()
    }

    /// Cancel every timer. No timer callback runs afterwards.
    pub fn shutdown(&self) {
        let mut state = lock(&self.shared);
        state.reveal.cancel();
        state.slides.cancel();
        state.unmount.cancel();
    }
}

impl Drop for AutoPlayer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Cancel reveal autoplay and schedule the outgoing slide's unmount.
fn on_slide_changed(shared: &SharedState, runtime: &Handle, state: &mut Shared) {
    state.reveal.cancel();
    state.unmount.cancel();
    let Some(active) = state.playback.transition() else {
        return;
    };
    let delay = Duration::try_from_secs_f32(active.transition.duration).unwrap_or_default();
    let generation = state.unmount.generation;
    let shared = Arc::clone(shared);
    state.unmount.task = Some(runtime.spawn(async move {
        tokio::time::sleep(delay).await;
        let mut state = lock(&shared);
        if state.unmount.generation == generation {
            state.playback.finish_transition();
            state.unmount.task = None;
        }
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let secs: Vec<u64> = RevealInterval::ALL
            .iter()
            .map(|i| i.as_duration().as_secs())
            .collect();
        assert_eq!(secs, vec![1, 2, 3, 5]);
    }

    #[test]
    fn test_requires_runtime() {
        let playback = Playback::new(crate::presentation::Presentation::default());
        assert!(matches!(
            AutoPlayer::new(playback, PlaybackConfig::default()),
            Err(DeckError::NoRuntime(_))
        ));
    }

    #[test]
    fn test_config_json() {
        let config: PlaybackConfig =
            serde_json::from_str(r#"{"revealInterval": "three-seconds", "slideInterval": 2.5}"#)
                .expect("parse");
        assert_eq!(config.reveal_interval, RevealInterval::ThreeSeconds);
        assert_eq!(config.slide_interval, Duration::from_millis(2500));
    }
}
