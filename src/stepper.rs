use crate::grid::Grid;
use crate::params::{ParamSource, SimParams};

/// One explicit-Euler Gray–Scott update over the whole grid.
///
/// Every cell is computed from the pre-update state in `u`/`v`; results land in the scratch
/// buffers and are copied back once the sweep is done.
pub fn step(grid: &mut Grid, params: &SimParams) {
    let SimParams {
        du,
        dv,
        feed,
        kill,
        dt,
        ..
    } = *params;
    let n = grid.side();

    for y in 0..n {
        for x in 0..n {
            let i = grid.idx(x, y);
            let u = grid.u[i];
            let v = grid.v[i];

            let xc = x as isize;
            let yc = y as isize;
            let i_l = grid.wrap(xc - 1, yc);
            let i_r = grid.wrap(xc + 1, yc);
            let i_u = grid.wrap(xc, yc - 1);
            let i_d = grid.wrap(xc, yc + 1);

            let lap_u = grid.u[i_l] + grid.u[i_r] + grid.u[i_u] + grid.u[i_d] - 4.0 * u;
            let lap_v = grid.v[i_l] + grid.v[i_r] + grid.v[i_u] + grid.v[i_d] - 4.0 * v;

            let uvv = u * v * v;
            let du_dt = du * lap_u - uvv + feed * (1.0 - u);
            let dv_dt = dv * lap_v + uvv - (feed + kill) * v;

            grid.u_next[i] = u + du_dt * dt;
            grid.v_next[i] = v + dv_dt * dt;
        }
    }

    grid.u.copy_from_slice(&grid.u_next);
    grid.v.copy_from_slice(&grid.v_next);
}

/// Advance one frame: `steps_per_frame` updates, taken from the source at the start of the
/// burst. The remaining parameters are re-read before every update.
pub fn advance_frame(grid: &mut Grid, source: &impl ParamSource) {
    let steps = source.current().steps_per_frame;
    for _ in 0..steps {
        let params = source.current();
        step(grid, &params);
    }
}
