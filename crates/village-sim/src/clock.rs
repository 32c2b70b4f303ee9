/// Real-time pacing for the fixed-step simulation.
///
/// The clock converts elapsed wall time into a number of whole steps to run,
/// carrying the fractional remainder. Speed scales time, it never changes the
/// step size, so a run is bit-identical at any speed. Speed 0 pauses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clock {
    pub speed: f32,
    base_ms_per_tick: f32,
    accumulator: f32,
    running: bool,
}

impl Clock {
    pub fn new(tick_seconds: f32) -> Self {
        Self {
            speed: 1.0,
            base_ms_per_tick: tick_seconds * 1000.0,
            accumulator: 0.0,
            running: false,
        }
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.accumulator = 0.0;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed.max(0.0);
    }

    /// Feed elapsed wall time; returns how many steps to run now.
    pub fn advance(&mut self, elapsed_ms: f32) -> u32 {
        if !self.running || self.speed <= 0.0 || self.base_ms_per_tick <= 0.0 {
            return 0;
        }
        self.accumulator += elapsed_ms * self.speed;
        let ticks = (self.accumulator / self.base_ms_per_tick) as u32;
        self.accumulator -= ticks as f32 * self.base_ms_per_tick;
        ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stopped_clock_yields_no_ticks() {
        let mut clock = Clock::new(0.1);
        assert_eq!(clock.advance(1000.0), 0);
    }

    #[test]
    fn accumulates_fractional_ticks() {
        let mut clock = Clock::new(0.1);
        clock.start();
        assert_eq!(clock.advance(250.0), 2);
        assert_eq!(clock.advance(50.0), 1);
        assert_eq!(clock.advance(0.0), 0);
    }

    #[test]
    fn speed_scales_elapsed_time() {
        let mut clock = Clock::new(0.1);
        clock.start();
        clock.set_speed(4.0);
        assert_eq!(clock.advance(100.0), 4);

        clock.set_speed(0.0);
        assert_eq!(clock.advance(1000.0), 0);
    }

    #[test]
    fn stop_drops_the_remainder() {
        let mut clock = Clock::new(0.1);
        clock.start();
        assert_eq!(clock.advance(150.0), 1);
        clock.stop();
        clock.start();
        assert_eq!(clock.advance(50.0), 0);
    }
}
