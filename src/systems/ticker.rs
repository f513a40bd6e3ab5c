/// Whether the ticker is advancing animation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Playback {
    Playing,
    Stopped,
}

/// Frame clock for shader animation.
///
/// The event loop polls `tick()` every frame; play/stop gates whether time
/// advances, so stopping freezes every animated material in place.
pub struct Ticker {
    state: Playback,
    time: f32,
    step: f32,
}

/// Time advance per frame.
pub const DEFAULT_STEP: f32 = 0.05;

impl Ticker {
    pub fn new(step: f32) -> Self {
        Self {
            state: Playback::Playing,
            time: 0.0,
            step,
        }
    }

    pub fn state(&self) -> Playback {
        self.state
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn play(&mut self) {
        self.state = Playback::Playing;
    }

    pub fn stop(&mut self) {
        self.state = Playback::Stopped;
    }

    pub fn toggle(&mut self) {
        match self.state {
            Playback::Playing => self.stop(),
            Playback::Stopped => self.play(),
        }
    }

    /// Advance one frame. Returns the new time while playing, `None` while
    /// stopped (time stays frozen until `play()` is called again).
    pub fn tick(&mut self) -> Option<f32> {
        match self.state {
            Playback::Playing => {
                self.time += self.step;
                Some(self.time)
            }
            Playback::Stopped => None,
        }
    }
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new(DEFAULT_STEP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_playing_at_time_zero() {
        let ticker = Ticker::default();
        assert_eq!(ticker.state(), Playback::Playing);
        assert_eq!(ticker.time(), 0.0);
    }

    #[test]
    fn ticks_advance_by_the_step() {
        let mut ticker = Ticker::new(0.05);
        assert_eq!(ticker.tick(), Some(0.05));
        assert_eq!(ticker.tick(), Some(0.1));
    }

    #[test]
    fn stopping_freezes_time() {
        let mut ticker = Ticker::new(0.05);
        ticker.tick();
        ticker.stop();
        assert_eq!(ticker.tick(), None);
        assert_eq!(ticker.time(), 0.05);

        ticker.play();
        assert_eq!(ticker.tick(), Some(0.1));
    }

    #[test]
    fn toggle_round_trips() {
        let mut ticker = Ticker::default();
        ticker.toggle();
        assert_eq!(ticker.state(), Playback::Stopped);
        ticker.toggle();
        assert_eq!(ticker.state(), Playback::Playing);
    }
}
