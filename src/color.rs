use crate::grid::Grid;

/// Square RGBA image, row-major, top-left origin.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    side: usize,
    data: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(side: usize) -> Self {
        Self {
            side,
            data: vec![0; side * side * 4],
        }
    }

    pub fn side(&self) -> usize {
        self.side
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let i = (y * self.side + x) * 4;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }
}

#[inline]
fn channel(x: f32) -> u8 {
    (255.0 * x).clamp(0.0, 255.0).round() as u8
}

/// red = V, green = U, blue = 1 - U. Clamping happens here and nowhere upstream.
#[inline]
pub fn cell_rgba(u: f32, v: f32) -> [u8; 4] {
    [channel(v), channel(u), channel(1.0 - u), 255]
}

pub fn colorize(grid: &Grid) -> PixelBuffer {
    let mut out = PixelBuffer::new(grid.side());
    colorize_into(grid, &mut out);
    out
}

/// Same as [`colorize`] but reuses `out`'s allocation.
pub fn colorize_into(grid: &Grid, out: &mut PixelBuffer) {
    let n = grid.side();
    out.side = n;
    out.data.resize(n * n * 4, 0);
    for (px, (&u, &v)) in out
        .data
        .chunks_exact_mut(4)
        .zip(grid.u().iter().zip(grid.v()))
    {
        px.copy_from_slice(&cell_rgba(u, v));
    }
}

/// Nearest-neighbor resample to `side`×`side`, sampling source pixel centers.
pub fn resample_nearest(src: &PixelBuffer, side: usize) -> PixelBuffer {
    if side == src.side {
        return src.clone();
    }
    let n = src.side;
    let map: Vec<usize> = (0..side)
        .map(|d| (((d as f64 + 0.5) * n as f64 / side as f64) as usize).min(n - 1))
        .collect();

    let mut out = PixelBuffer::new(side);
    for (dy, &sy) in map.iter().enumerate() {
        for (dx, &sx) in map.iter().enumerate() {
            let s = (sy * n + sx) * 4;
            let d = (dy * side + dx) * 4;
            out.data[d..d + 4].copy_from_slice(&src.data[s..s + 4]);
        }
    }
    out
}
