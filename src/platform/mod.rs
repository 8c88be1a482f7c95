//! Platform abstraction layer
//!
//! Frame timing shared by the browser loop and the native headless loop:
//! delta sanitizing, fixed-step accumulation and an FPS counter.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

/// Negative or non-finite deltas become zero
#[inline]
pub fn sanitize_dt(dt: f32) -> f32 {
    if dt.is_finite() && dt > 0.0 { dt } else { 0.0 }
}

/// Turns host timestamps (ms) into clamped frame deltas (s)
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_time: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delta since the previous call; the very first frame gets one sim step
    pub fn delta(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_time {
            Some(last) => ((now_ms - last) / 1000.0) as f32,
            None => SIM_DT,
        };
        self.last_time = Some(now_ms);
        sanitize_dt(dt).min(MAX_FRAME_DT)
    }

    /// Forget the previous timestamp (after the tab was hidden, etc.)
    pub fn reset(&mut self) {
        self.last_time = None;
    }
}

/// Fixed timestep accumulator
#[derive(Debug, Clone, Default)]
pub struct FixedStep {
    accumulator: f32,
}

impl FixedStep {
    /// Add a frame delta and return how many `SIM_DT` steps to run
    pub fn advance(&mut self, dt: f32) -> u32 {
        self.accumulator += sanitize_dt(dt).min(MAX_FRAME_DT);

        let mut steps = 0;
        while self.accumulator >= SIM_DT && steps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            steps += 1;
        }
        // Drop whatever the substep cap could not consume
        if steps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        steps
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

/// Rolling frames-per-second estimate over the last 60 frames
#[derive(Debug, Clone)]
pub struct FpsCounter {
    frame_times: [f64; 60],
    frame_index: usize,
    fps: u32,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self {
            frame_times: [0.0; 60],
            frame_index: 0,
            fps: 0,
        }
    }
}

impl FpsCounter {
    /// Record a frame timestamp (ms) and return the current estimate
    pub fn record(&mut self, time: f64) -> u32 {
        self.frame_times[self.frame_index] = time;
        self.frame_index = (self.frame_index + 1) % self.frame_times.len();

        // Oldest sample is the one we will overwrite next
        let oldest_time = self.frame_times[self.frame_index];
        if oldest_time > 0.0 {
            let elapsed = time - oldest_time;
            if elapsed > 0.0 {
                let intervals = (self.frame_times.len() - 1) as f64;
                self.fps = (intervals * 1000.0 / elapsed).round() as u32;
            }
        }
        self.fps
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_dt() {
        assert_eq!(sanitize_dt(0.016), 0.016);
        assert_eq!(sanitize_dt(-0.5), 0.0);
        assert_eq!(sanitize_dt(f32::NAN), 0.0);
        assert_eq!(sanitize_dt(f32::INFINITY), 0.0);
    }

    #[test]
    fn test_frame_clock_clamps() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.delta(1000.0), SIM_DT);
        assert!((clock.delta(1016.0) - 0.016).abs() < 1e-6);
        // Huge gap (tab in background)
        assert_eq!(clock.delta(60_000.0), MAX_FRAME_DT);
        // Clock going backwards
        assert_eq!(clock.delta(59_000.0), 0.0);
    }

    #[test]
    fn test_fixed_step_counts() {
        let mut step = FixedStep::default();
        assert_eq!(step.advance(SIM_DT * 0.5), 0);
        assert_eq!(step.advance(SIM_DT * 0.6), 1);
        assert_eq!(step.advance(1.0), MAX_SUBSTEPS);
        assert!(step.advance(0.0) <= 1);
    }

    #[test]
    fn test_fps_counter() {
        let mut fps = FpsCounter::default();
        let mut t = 1.0;
        for _ in 0..120 {
            t += 1000.0 / 60.0;
            fps.record(t);
        }
        assert_eq!(fps.fps(), 60);
    }
}
