use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("grid side must be at least 1")]
    EmptyGrid,
}

/// Square periodic grid holding the U and V concentrations.
///
/// `u`/`v` are the current state. `u_next`/`v_next` are scratch space for the stepper and
/// carry no meaning between steps.
#[derive(Clone, Debug)]
pub struct Grid {
    n: usize,
    pub(crate) u: Vec<f32>,
    pub(crate) v: Vec<f32>,
    pub(crate) u_next: Vec<f32>,
    pub(crate) v_next: Vec<f32>,
}

impl Grid {
    /// A resting grid: U = 1, V = 0 everywhere.
    pub fn new(n: usize) -> Result<Self, GridError> {
        if n == 0 {
            return Err(GridError::EmptyGrid);
        }
        let cells = n * n;
        Ok(Self {
            n,
            u: vec![1.0; cells],
            v: vec![0.0; cells],
            u_next: vec![1.0; cells],
            v_next: vec![0.0; cells],
        })
    }

    pub fn side(&self) -> usize {
        self.n
    }

    pub fn len(&self) -> usize {
        self.n * self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn u(&self) -> &[f32] {
        &self.u
    }

    pub fn v(&self) -> &[f32] {
        &self.v
    }

    pub fn u_mut(&mut self) -> &mut [f32] {
        &mut self.u
    }

    pub fn v_mut(&mut self) -> &mut [f32] {
        &mut self.v
    }

    pub fn fill(&mut self, u: f32, v: f32) {
        self.u.fill(u);
        self.v.fill(v);
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.n + x
    }

    /// Index of (x, y) after toroidal wrap. -1 maps to n - 1.
    #[inline]
    pub fn wrap(&self, x: isize, y: isize) -> usize {
        let n = self.n as isize;
        let xx = x.rem_euclid(n) as usize;
        let yy = y.rem_euclid(n) as usize;
        self.idx(xx, yy)
    }

    pub fn set(&mut self, x: isize, y: isize, u: f32, v: f32) {
        let i = self.wrap(x, y);
        self.u[i] = u;
        self.v[i] = v;
    }

    pub fn sum_u(&self) -> f64 {
        self.u.iter().map(|&x| x as f64).sum()
    }
}
