use crate::grid::Grid;
use crate::rng::SeedRng;
use rand::{distributions::Alphanumeric, Rng};

const BLOBS: usize = 4;
const SPECKLE_FRACTION: f64 = 0.02;

pub fn blob_radius(n: usize) -> isize {
    (n as f64 * 0.03).floor() as isize + 5
}

/// Reset `grid` to the reproducible starting pattern for `seed`.
pub fn seed_grid(grid: &mut Grid, seed: &str) {
    let mut rng = SeedRng::from_seed(seed);
    let n = grid.side();
    grid.fill(1.0, 0.0);

    // Circular blobs of partially consumed U.
    let r = blob_radius(n);
    for _ in 0..BLOBS {
        let cx = (rng.next_f64() * n as f64).floor() as isize;
        let cy = (rng.next_f64() * n as f64).floor() as isize;

        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy > r * r {
                    continue;
                }
                let i = grid.wrap(cx + dx, cy + dy);
                grid.u[i] = (0.50 + 0.1 * rng.next_f64()) as f32;
                grid.v[i] = (0.25 + 0.1 * rng.next_f64()) as f32;
            }
        }
    }

    // Single-cell speckles to break symmetry.
    let cells = n * n;
    let speckles = (cells as f64 * SPECKLE_FRACTION).floor() as usize;
    for _ in 0..speckles {
        let i = rng.below(cells);
        grid.u[i] = 0.5;
        grid.v[i] = 0.25;
    }
}

/// Short random token for interactive reseeds.
pub fn fresh_token<R: Rng>(rng: &mut R) -> String {
    rng.sample_iter(&Alphanumeric)
        .take(8)
        .map(|b| (b as char).to_ascii_lowercase())
        .collect()
}
