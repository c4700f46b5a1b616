use std::time::{Duration, Instant};

/// The smoothing factor for the FPS calculation.
const SMOOTHING: f32 = 0.95;

/// Length of the window over which frames are counted.
const WINDOW: Duration = Duration::from_secs(1);

/// A simple frame per second (FPS) counter.
///
/// Keeps an exponentially smoothed rate, and additionally counts the frames seen in
/// each one second window.
///
/// # Examples
///
/// ```
/// use cvgl_io::fps_counter::FpsCounter;
///
/// let mut fps_counter = FpsCounter::new();
///
/// for _ in 0..100 {
///     if let Some(frames) = fps_counter.update() {
///         println!("{frames} frames in the last second");
///     }
/// }
///
/// assert_eq!(fps_counter.frame_count(), 100);
/// ```
pub struct FpsCounter {
    last_time: Instant,
    window_start: Instant,
    window_frames: u32,
    frame_count: u64,
    fps: f32,
}

impl FpsCounter {
    /// Creates a new `FpsCounter`.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            last_time: now,
            window_start: now,
            window_frames: 0,
            frame_count: 0,
            fps: 0.0,
        }
    }

    /// Returns the current smoothed FPS.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Returns the number of frames since creation.
    #[inline]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Records a frame.
    ///
    /// Returns the number of frames of the window when a one second window closes.
    pub fn update(&mut self) -> Option<u32> {
        self.update_at(Instant::now())
    }

    fn update_at(&mut self, now: Instant) -> Option<u32> {
        self.frame_count += 1;
        self.window_frames += 1;

        let duration = now.duration_since(self.last_time);
        if !duration.is_zero() {
            let instant_fps = 1.0 / duration.as_secs_f32();
            self.fps = if self.fps == 0.0 {
                instant_fps
            } else {
                self.fps * SMOOTHING + instant_fps * (1.0 - SMOOTHING)
            };
        }
        self.last_time = now;

        if now.duration_since(self.window_start) < WINDOW {
            return None;
        }

        let frames = self.window_frames;
        self.window_frames = 0;
        self.window_start = now;
        Some(frames)
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}
