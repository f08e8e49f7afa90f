use crate::capture::{CapturedSequence, EncodeError, FrameEncoder};
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, RgbaImage};

/// Animated GIF, looping forever, written into memory.
#[derive(Clone, Copy, Debug)]
pub struct GifFrameEncoder {
    /// 1 (best quality, slowest) ..= 30.
    pub speed: i32,
}

impl Default for GifFrameEncoder {
    fn default() -> Self {
        Self { speed: 10 }
    }
}

impl FrameEncoder for GifFrameEncoder {
    fn encode(&mut self, seq: &CapturedSequence) -> Result<Vec<u8>, EncodeError> {
        if seq.frames.is_empty() {
            return Err(EncodeError::NoFrames);
        }
        let side = seq.side();
        let expected = side * side * 4;
        let delay = Delay::from_numer_denom_ms(seq.delay_ms, 1);

        let mut blob = Vec::new();
        {
            let mut encoder = GifEncoder::new_with_speed(&mut blob, self.speed.clamp(1, 30));
            encoder.set_repeat(Repeat::Infinite)?;

            for (index, px) in seq.frames.iter().enumerate() {
                let got = px.as_bytes().len();
                let img = RgbaImage::from_raw(side as u32, side as u32, px.as_bytes().to_vec())
                    .filter(|_| px.side() == side)
                    .ok_or(EncodeError::BadFrame {
                        index,
                        got,
                        expected,
                    })?;
                encoder.encode_frame(Frame::from_parts(img, 0, 0, delay))?;
            }
        }
        Ok(blob)
    }
}
