//! Frame timing

use std::time::{Duration, Instant};

/// Frame timer driving behaviors and FPS reporting
///
/// `update` is called once per frame by the run loop; behaviors consume the
/// total elapsed time rather than per-frame deltas so animation stays
/// phase-correct regardless of frame rate.
pub struct Timer {
    started: Instant,
    last_frame: Instant,
    delta_time: f32,
    frame_count: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a new timer starting now
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            started: now,
            last_frame: now,
            delta_time: 0.0,
            frame_count: 0,
        }
    }

    /// Advance the timer by one frame
    pub fn update(&mut self) {
        let now = Instant::now();
        self.delta_time = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.frame_count += 1;
    }

    /// Time since the previous frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Wall-clock time since the timer was created
    pub fn elapsed(&self) -> Duration {
        self.last_frame.duration_since(self.started)
    }

    /// Total elapsed time in seconds
    pub fn total_time(&self) -> f32 {
        self.elapsed().as_secs_f32()
    }

    /// Number of completed frames
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Average frames per second since creation
    pub fn average_fps(&self) -> f32 {
        let total = self.total_time();
        if total > 0.0 {
            self.frame_count as f32 / total
        } else {
            0.0
        }
    }

    /// Instantaneous frames per second from the last frame time
    pub fn current_fps(&self) -> f32 {
        if self.delta_time > 0.0 {
            1.0 / self.delta_time
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_timer_has_no_frames() {
        let timer = Timer::new();
        assert_eq!(timer.frame_count(), 0);
        assert_eq!(timer.delta_time(), 0.0);
        assert_eq!(timer.average_fps(), 0.0);
    }

    #[test]
    fn update_advances_frame_count_and_elapsed() {
        let mut timer = Timer::new();
        std::thread::sleep(Duration::from_millis(2));
        timer.update();
        timer.update();
        assert_eq!(timer.frame_count(), 2);
        assert!(timer.elapsed() >= Duration::from_millis(2));
        assert!(timer.total_time() > 0.0);
    }
}
