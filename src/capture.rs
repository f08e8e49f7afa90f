//! Offline capture: drive the stepper for a fixed number of frames and hand the resulting
//! pixel buffers to a frame encoder.

use crate::color::{colorize_into, resample_nearest, PixelBuffer};
use crate::grid::Grid;
use crate::params::ParamSource;
use crate::stepper::advance_frame;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("no frames to encode")]
    NoFrames,
    #[error("image encoder failed: {0}")]
    Image(#[from] image::ImageError),
    #[error("frame {index} has {got} bytes, expected {expected}")]
    BadFrame {
        index: usize,
        got: usize,
        expected: usize,
    },
    #[error("{0}")]
    Other(String),
}

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("simulation has no grid yet; seed it before capturing")]
    NotInitialized,
    #[error("invalid capture request: {0}")]
    InvalidRequest(&'static str),
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CaptureRequest {
    pub seconds: f32,
    pub fps: f32,
    pub scale: f32,
}

impl Default for CaptureRequest {
    fn default() -> Self {
        Self {
            seconds: 4.0,
            fps: 20.0,
            scale: 2.0,
        }
    }
}

/// Derived shape of a capture session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CapturePlan {
    pub frames: usize,
    pub side: usize,
    pub delay_ms: u32,
}

impl CapturePlan {
    pub fn new(req: &CaptureRequest, grid_side: usize) -> Result<Self, CaptureError> {
        let CaptureRequest {
            seconds,
            fps,
            scale,
        } = *req;
        if !seconds.is_finite() || seconds <= 0.0 {
            return Err(CaptureError::InvalidRequest("seconds must be positive"));
        }
        if !fps.is_finite() || fps <= 0.0 {
            return Err(CaptureError::InvalidRequest("fps must be positive"));
        }
        if !scale.is_finite() || scale <= 0.0 {
            return Err(CaptureError::InvalidRequest("scale must be positive"));
        }

        let frames = ((seconds as f64 * fps as f64).round() as usize).max(1);
        let side = ((grid_side as f64 * scale as f64).round() as usize).max(1);
        let delay_ms = ((1000.0 / fps as f64).round() as u32).max(10);
        Ok(Self {
            frames,
            side,
            delay_ms,
        })
    }
}

/// Ordered frames plus the constant delay between them.
#[derive(Clone, Debug)]
pub struct CapturedSequence {
    pub frames: Vec<PixelBuffer>,
    pub delay_ms: u32,
}

impl CapturedSequence {
    pub fn side(&self) -> usize {
        self.frames.first().map(PixelBuffer::side).unwrap_or(0)
    }
}

/// Turns a captured sequence into one binary blob (an animated image file, usually).
pub trait FrameEncoder {
    fn encode(&mut self, seq: &CapturedSequence) -> Result<Vec<u8>, EncodeError>;
}

impl<F> FrameEncoder for F
where
    F: FnMut(&CapturedSequence) -> Result<Vec<u8>, EncodeError>,
{
    fn encode(&mut self, seq: &CapturedSequence) -> Result<Vec<u8>, EncodeError> {
        self(seq)
    }
}

/// Step and render `plan.frames` frames. Frame i (1-based) reflects i bursts of
/// steps-per-frame updates past the grid state at entry.
pub fn record(grid: &mut Grid, params: &impl ParamSource, plan: &CapturePlan) -> CapturedSequence {
    let mut native = PixelBuffer::new(grid.side());
    let mut frames = Vec::with_capacity(plan.frames);
    for _ in 0..plan.frames {
        advance_frame(grid, params);
        colorize_into(grid, &mut native);
        frames.push(resample_nearest(&native, plan.side));
    }
    CapturedSequence {
        frames,
        delay_ms: plan.delay_ms,
    }
}

/// Full capture: plan, record, encode.
pub fn capture<E: FrameEncoder + ?Sized>(
    grid: &mut Grid,
    params: &impl ParamSource,
    req: &CaptureRequest,
    encoder: &mut E,
) -> Result<Vec<u8>, CaptureError> {
    let plan = CapturePlan::new(req, grid.side())?;
    log::info!(
        "capture: {} frames at {}x{} ({} ms/frame)",
        plan.frames,
        plan.side,
        plan.side,
        plan.delay_ms
    );
    let seq = record(grid, params, &plan);
    let blob = encoder.encode(&seq).map_err(|e| {
        log::warn!("capture encoder failed: {e}");
        e
    })?;
    log::info!("capture: encoded {} bytes", blob.len());
    Ok(blob)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{SharedParams, SimParams};
    use crate::seed::seed_grid;
    use crate::stepper::step;

    fn req(seconds: f32, fps: f32, scale: f32) -> CaptureRequest {
        CaptureRequest {
            seconds,
            fps,
            scale,
        }
    }

    #[test]
    fn plan_two_seconds_at_ten_fps() {
        let p = CapturePlan::new(&req(2.0, 10.0, 1.0), 64).unwrap();
        assert_eq!(
            p,
            CapturePlan {
                frames: 20,
                side: 64,
                delay_ms: 100
            }
        );
    }

    #[test]
    fn plan_one_second_at_three_fps() {
        let p = CapturePlan::new(&req(1.0, 3.0, 1.0), 64).unwrap();
        assert_eq!(p.frames, 3);
        assert_eq!(p.delay_ms, 333);
    }

    #[test]
    fn plan_floors_and_minimums() {
        let p = CapturePlan::new(&req(0.01, 1.0, 0.001), 64).unwrap();
        assert_eq!(p.frames, 1);
        assert_eq!(p.side, 1);
        let fast = CapturePlan::new(&req(1.0, 500.0, 1.5), 64).unwrap();
        assert_eq!(fast.delay_ms, 10);
        assert_eq!(fast.side, 96);
    }

    #[test]
    fn plan_rejects_nonsense() {
        assert!(matches!(
            CapturePlan::new(&req(1.0, 0.0, 1.0), 8),
            Err(CaptureError::InvalidRequest(_))
        ));
        assert!(matches!(
            CapturePlan::new(&req(f32::NAN, 10.0, 1.0), 8),
            Err(CaptureError::InvalidRequest(_))
        ));
        assert!(matches!(
            CapturePlan::new(&req(1.0, 10.0, -2.0), 8),
            Err(CaptureError::InvalidRequest(_))
        ));
    }

    #[test]
    fn records_expected_frame_count_and_size() {
        let mut g = Grid::new(64).unwrap();
        seed_grid(&mut g, "rdx");
        let plan = CapturePlan::new(&req(2.0, 10.0, 1.0), 64).unwrap();
        let seq = record(&mut g, &SimParams::default(), &plan);
        assert_eq!(seq.frames.len(), 20);
        assert_eq!(seq.delay_ms, 100);
        assert!(seq.frames.iter().all(|f| f.side() == 64));
    }

    #[test]
    fn frame_i_matches_i_bursts() {
        let params = SimParams {
            steps_per_frame: 3,
            ..SimParams::default()
        };
        let mut captured = Grid::new(16).unwrap();
        seed_grid(&mut captured, "order");
        let mut reference = captured.clone();

        let plan = CapturePlan::new(&req(0.4, 10.0, 1.0), 16).unwrap();
        let seq = record(&mut captured, &params, &plan);
        assert_eq!(seq.frames.len(), 4);

        for (i, frame) in seq.frames.iter().enumerate() {
            for _ in 0..params.steps_per_frame {
                step(&mut reference, &params);
            }
            assert_eq!(frame, &crate::color::colorize(&reference), "frame {i}");
        }
        assert_eq!(captured.u(), reference.u());
    }

    #[test]
    fn encoder_errors_surface() {
        let mut g = Grid::new(8).unwrap();
        let mut failing =
            |_: &CapturedSequence| -> Result<Vec<u8>, EncodeError> { Err(EncodeError::NoFrames) };
        let err = capture(&mut g, &SimParams::default(), &req(1.0, 2.0, 1.0), &mut failing)
            .unwrap_err();
        assert!(matches!(err, CaptureError::Encode(EncodeError::NoFrames)));
    }

    #[test]
    fn capture_follows_shared_params() {
        let mut g = Grid::new(8).unwrap();
        seed_grid(&mut g, "shared");
        let mut reference = g.clone();
        let shared = SharedParams::new(SimParams {
            steps_per_frame: 1,
            ..SimParams::default()
        });
        let handle = shared.clone();
        let mut enc = |seq: &CapturedSequence| -> Result<Vec<u8>, EncodeError> {
            Ok(vec![seq.frames.len() as u8])
        };
        handle.update(|p| p.steps_per_frame = 2);
        let blob = capture(&mut g, &shared, &req(1.0, 5.0, 1.0), &mut enc).unwrap();
        assert_eq!(blob, vec![5]);

        let p = handle.get();
        for _ in 0..10 {
            step(&mut reference, &p);
        }
        assert_eq!(g.u(), reference.u());
    }
}
