use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds since the clock was created.
    pub elapsed: f32,
    /// Seconds since the previous tick, clamped.
    pub dt: f32,
    pub frame_index: u64,
}

/// Produces [`FrameTime`] snapshots for the redraw loop.
///
/// Delta time is clamped so a stall (window drag, debugger) does not show up
/// as one huge step.
#[derive(Debug, Clone)]
pub struct FrameClock {
    start: Instant,
    last: Instant,
    frame_index: u64,
    dt_max: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last: now,
            frame_index: 0,
            dt_max: Duration::from_millis(250),
        }
    }

    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let dt = now.saturating_duration_since(self.last).min(self.dt_max);
        self.last = now;

        let ft = FrameTime {
            elapsed: now.saturating_duration_since(self.start).as_secs_f32(),
            dt: dt.as_secs_f32(),
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Averages frame rate over windows of at least one second.
#[derive(Debug, Default, Clone)]
pub struct FpsCounter {
    frames: u32,
    accumulated: f32,
}

impl FpsCounter {
    pub const WINDOW_SECS: f32 = 1.0;

    /// Feed one frame's delta. Returns the average FPS when a window closes.
    pub fn record(&mut self, dt: f32) -> Option<f32> {
        self.frames += 1;
        self.accumulated += dt;
        if self.accumulated < Self::WINDOW_SECS {
            return None;
        }
        let fps = self.frames as f32 / self.accumulated;
        self.frames = 0;
        self.accumulated = 0.0;
        Some(fps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_counts_frames_and_clamps_dt() {
        let mut clock = FrameClock::new();
        let a = clock.tick();
        let b = clock.tick();
        assert_eq!(a.frame_index, 0);
        assert_eq!(b.frame_index, 1);
        assert!(b.dt <= 0.25);
        assert!(b.elapsed >= a.elapsed);
    }

    #[test]
    fn fps_reported_once_per_window() {
        let mut fps = FpsCounter::default();
        for _ in 0..59 {
            assert_eq!(fps.record(1.0 / 60.0), None);
        }
        let reported = fps.record(1.0 / 60.0 + 1e-4).expect("window closed");
        assert!((reported - 60.0).abs() < 0.5);
        assert_eq!(fps.record(0.1), None);
    }
}
