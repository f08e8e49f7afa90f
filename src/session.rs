//! The simulation session owns the grid. Playback ticks and capture are both methods on it, so
//! only one of them can be advancing the grid at any time.

use crate::capture::{self, CaptureError, CaptureRequest, FrameEncoder};
use crate::color::{colorize_into, PixelBuffer};
use crate::grid::{Grid, GridError};
use crate::params::{SharedParams, SimParams};
use crate::seed::seed_grid;
use crate::stepper::advance_frame;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Playback {
    Running,
    Paused,
    /// A capture owns the grid.
    Suspended,
}

/// Puts playback into `Suspended` and restores the previous state on drop.
struct PlaybackPause<'a> {
    slot: &'a mut Playback,
    prior: Playback,
}

impl<'a> PlaybackPause<'a> {
    fn new(slot: &'a mut Playback) -> Self {
        let prior = *slot;
        *slot = Playback::Suspended;
        Self { slot, prior }
    }
}

impl Drop for PlaybackPause<'_> {
    fn drop(&mut self) {
        *self.slot = self.prior;
    }
}

pub struct Session {
    grid: Option<Grid>,
    params: SharedParams,
    seed: String,
    playback: Playback,
    pixels: PixelBuffer,
    frames: u64,
}

impl Session {
    /// A session without a grid. Call [`Session::set_resolution`] before ticking or capturing.
    pub fn new(params: SimParams, seed: impl Into<String>) -> Self {
        Self {
            grid: None,
            params: SharedParams::new(params),
            seed: seed.into(),
            playback: Playback::Running,
            pixels: PixelBuffer::new(0),
            frames: 0,
        }
    }

    pub fn with_grid(
        n: usize,
        params: SimParams,
        seed: impl Into<String>,
    ) -> Result<Self, GridError> {
        let mut s = Self::new(params, seed);
        s.set_resolution(n)?;
        Ok(s)
    }

    /// Reallocate at `n`×`n` and reseed with the current token.
    pub fn set_resolution(&mut self, n: usize) -> Result<(), GridError> {
        let grid = Grid::new(n)?;
        log::debug!("resolution -> {n}x{n}");
        self.grid = Some(grid);
        let seed = std::mem::take(&mut self.seed);
        self.reseed(seed);
        Ok(())
    }

    /// Replace the field with the pattern for `seed`. No-op on the field (but remembers the
    /// token) when no grid has been allocated yet.
    pub fn reseed(&mut self, seed: impl Into<String>) {
        self.seed = seed.into();
        self.frames = 0;
        if let Some(grid) = self.grid.as_mut() {
            log::debug!("reseed {:?} at {}x{}", self.seed, grid.side(), grid.side());
            seed_grid(grid, &self.seed);
            colorize_into(grid, &mut self.pixels);
        }
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    pub fn grid(&self) -> Option<&Grid> {
        self.grid.as_ref()
    }

    pub fn resolution(&self) -> Option<usize> {
        self.grid.as_ref().map(Grid::side)
    }

    /// Frames advanced since the last reseed.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Handle onto the live parameters. Changes made through any clone are picked up by the
    /// next update iteration, including in the middle of a frame or a capture.
    pub fn params_handle(&self) -> SharedParams {
        self.params.clone()
    }

    pub fn params(&self) -> SimParams {
        self.params.get()
    }

    pub fn set_params(&self, params: SimParams) {
        self.params.set(params);
    }

    pub fn set_du(&self, du: f32) {
        self.params.update(|p| p.du = du);
    }

    pub fn set_dv(&self, dv: f32) {
        self.params.update(|p| p.dv = dv);
    }

    pub fn set_feed(&self, feed: f32) {
        self.params.update(|p| p.feed = feed);
    }

    pub fn set_kill(&self, kill: f32) {
        self.params.update(|p| p.kill = kill);
    }

    pub fn set_dt(&self, dt: f32) {
        self.params.update(|p| p.dt = dt);
    }

    pub fn set_steps_per_frame(&self, steps: usize) {
        self.params.update(|p| p.steps_per_frame = steps.max(1));
    }

    pub fn playback(&self) -> Playback {
        self.playback
    }

    pub fn play(&mut self) {
        if self.playback != Playback::Suspended {
            self.playback = Playback::Running;
        }
    }

    pub fn pause(&mut self) {
        if self.playback != Playback::Suspended {
            self.playback = Playback::Paused;
        }
    }

    pub fn toggle_playback(&mut self) {
        match self.playback {
            Playback::Running => self.playback = Playback::Paused,
            Playback::Paused => self.playback = Playback::Running,
            Playback::Suspended => {}
        }
    }

    /// One playback tick: advance a frame if running, then refresh the pixel buffer.
    /// Returns whether the grid moved.
    pub fn tick(&mut self) -> bool {
        if self.playback != Playback::Running {
            return false;
        }
        let Some(grid) = self.grid.as_mut() else {
            return false;
        };
        advance_frame(grid, &self.params);
        colorize_into(grid, &mut self.pixels);
        self.frames += 1;
        true
    }

    /// Latest rendered frame, N×N RGBA. Empty until a grid exists.
    pub fn pixels(&self) -> &PixelBuffer {
        &self.pixels
    }

    /// Record and encode a capture from the current state. Playback is suspended for the
    /// duration and put back the way it was whether or not the capture succeeds.
    pub fn capture<E: FrameEncoder + ?Sized>(
        &mut self,
        req: &CaptureRequest,
        encoder: &mut E,
    ) -> Result<Vec<u8>, CaptureError> {
        let grid = self.grid.as_mut().ok_or(CaptureError::NotInitialized)?;
        let _pause = PlaybackPause::new(&mut self.playback);

        let start_frames = self.frames;
        let result = capture::capture(grid, &self.params, req, encoder);
        if let Ok(plan) = capture::CapturePlan::new(req, grid.side()) {
            self.frames = start_frames + plan.frames as u64;
        }
        colorize_into(grid, &mut self.pixels);
        result
    }
}
