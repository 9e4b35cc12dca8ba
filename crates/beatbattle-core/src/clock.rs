//! Music clock abstraction.
//!
//! The engine never owns a real audio clock; it samples one through
//! [`MusicClock`] once per tick. [`ManualClock`] is a settable implementation
//! for hosts that keep time themselves and for tests.

/// Trait for sampling the music clock.
pub trait MusicClock {
    /// Whether playback is running.
    fn is_playing(&self) -> bool;

    /// Current judgement time in seconds.
    ///
    /// Monotonically non-decreasing while playing; meaningless while stopped.
    fn judgement_time(&self) -> f64;
}

/// Clock whose time is set explicitly by the host
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    time: f64,
    playing: bool,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clock positioned at `time`, already playing
    pub fn playing_at(time: f64) -> Self {
        Self {
            time,
            playing: true,
        }
    }

    pub fn play(&mut self) {
        self.playing = true;
    }

    pub fn stop(&mut self) {
        self.playing = false;
    }

    pub fn set_time(&mut self, time: f64) {
        self.time = time;
    }

    pub fn advance_by(&mut self, seconds: f64) {
        self.time += seconds;
    }
}

impl MusicClock for ManualClock {
    fn is_playing(&self) -> bool {
        self.playing
    }

    fn judgement_time(&self) -> f64 {
        self.time
    }
}

impl<C: MusicClock + ?Sized> MusicClock for &C {
    fn is_playing(&self) -> bool {
        (**self).is_playing()
    }

    fn judgement_time(&self) -> f64 {
        (**self).judgement_time()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock() {
        let mut clock = ManualClock::new();
        assert!(!clock.is_playing());
        assert_eq!(clock.judgement_time(), 0.0);

        clock.play();
        clock.set_time(1.5);
        clock.advance_by(0.25);
        assert!(clock.is_playing());
        assert_eq!(clock.judgement_time(), 1.75);

        clock.stop();
        assert!(!clock.is_playing());
    }

    #[test]
    fn test_playing_at() {
        let clock = ManualClock::playing_at(-2.0);
        assert!(clock.is_playing());
        assert_eq!(clock.judgement_time(), -2.0);
    }
}
