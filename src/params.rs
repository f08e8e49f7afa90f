use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimParams {
    pub du: f32,
    pub dv: f32,
    pub feed: f32,
    pub kill: f32,
    pub dt: f32,
    pub steps_per_frame: usize,
}

impl Default for SimParams {
    fn default() -> Self {
        PRESETS[1].params
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Preset {
    pub name: &'static str,
    pub params: SimParams,
}

const fn regime(feed: f32, kill: f32, steps_per_frame: usize) -> SimParams {
    SimParams {
        du: 0.16,
        dv: 0.08,
        feed,
        kill,
        dt: 1.0,
        steps_per_frame,
    }
}

// Commonly used Gray–Scott regimes (qualitative names).
pub const PRESETS: &[Preset] = &[
    Preset {
        name: "Mitosis",
        params: regime(0.0220, 0.0510, 10),
    },
    Preset {
        name: "Worms",
        params: regime(0.0290, 0.0570, 8),
    },
    Preset {
        name: "Solitons",
        params: regime(0.0350, 0.0595, 10),
    },
    Preset {
        name: "Spots",
        params: regime(0.0270, 0.0545, 10),
    },
    Preset {
        name: "Stripes",
        params: regime(0.0220, 0.0510, 12),
    },
    Preset {
        name: "Coral",
        params: regime(0.0545, 0.0620, 10),
    },
];

pub fn preset_index(name: &str) -> Option<usize> {
    PRESETS
        .iter()
        .position(|p| p.name.eq_ignore_ascii_case(name))
}

/// Where the stepper gets its parameters from. Read once per update iteration.
pub trait ParamSource {
    fn current(&self) -> SimParams;
}

/// A plain value is a frozen snapshot.
impl ParamSource for SimParams {
    fn current(&self) -> SimParams {
        *self
    }
}

/// Shared, mutable parameter holder. Clones observe the same values, so a control
/// surface holding one can change parameters between any two update iterations.
#[derive(Clone, Debug, Default)]
pub struct SharedParams(Rc<Cell<SimParams>>);

impl SharedParams {
    pub fn new(params: SimParams) -> Self {
        Self(Rc::new(Cell::new(params)))
    }

    pub fn get(&self) -> SimParams {
        self.0.get()
    }

    pub fn set(&self, params: SimParams) {
        self.0.set(params);
    }

    pub fn update(&self, f: impl FnOnce(&mut SimParams)) {
        let mut p = self.0.get();
        f(&mut p);
        self.0.set(p);
    }
}

impl ParamSource for SharedParams {
    fn current(&self) -> SimParams {
        self.get()
    }
}
