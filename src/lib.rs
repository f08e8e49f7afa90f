//! Gray–Scott reaction–diffusion on a periodic grid, with frame capture.

pub mod capture;
pub mod color;
pub mod config;
pub mod encode;
pub mod grid;
pub mod params;
pub mod rng;
pub mod seed;
pub mod session;
pub mod stepper;

pub use capture::{
    CaptureError, CapturePlan, CaptureRequest, CapturedSequence, EncodeError, FrameEncoder,
};
pub use color::{colorize, resample_nearest, PixelBuffer};
pub use encode::GifFrameEncoder;
pub use grid::{Grid, GridError};
pub use params::{ParamSource, SharedParams, SimParams, PRESETS};
pub use session::{Playback, Session};
