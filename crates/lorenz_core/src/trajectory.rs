use crate::lorenz::DIM;
use serde::{Deserialize, Serialize};

pub type State = [f64; DIM];

/// Axis-aligned bounds of a trajectory, per component.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: State,
    pub max: State,
}

/// Sampled solution: one state per requested time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    times: Vec<f64>,
    states: Vec<State>,
}

impl Trajectory {
    pub(crate) fn new(times: Vec<f64>, states: Vec<State>) -> Self {
        debug_assert_eq!(times.len(), states.len());
        Self { times, states }
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn first(&self) -> Option<&State> {
        self.states.first()
    }

    pub fn last(&self) -> Option<&State> {
        self.states.last()
    }

    /// One component across all samples: 0 = x, 1 = y, 2 = z.
    pub fn component(&self, axis: usize) -> Vec<f64> {
        self.states.iter().map(|s| s[axis]).collect()
    }

    pub fn xs(&self) -> Vec<f64> {
        self.component(0)
    }

    pub fn ys(&self) -> Vec<f64> {
        self.component(1)
    }

    pub fn zs(&self) -> Vec<f64> {
        self.component(2)
    }

    /// Flattened row-major `[x0, y0, z0, x1, ...]` copy of the states.
    pub fn flat_states(&self) -> Vec<f64> {
        self.states.iter().flatten().copied().collect()
    }

    pub fn bounds(&self) -> Option<Bounds> {
        let first = *self.states.first()?;
        let mut bounds = Bounds {
            min: first,
            max: first,
        };
        for state in &self.states[1..] {
            for i in 0..DIM {
                bounds.min[i] = bounds.min[i].min(state[i]);
                bounds.max[i] = bounds.max[i].max(state[i]);
            }
        }
        Some(bounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Trajectory {
        Trajectory::new(
            vec![0.0, 1.0, 2.0],
            vec![[1.0, 2.0, 3.0], [-1.0, 5.0, 0.0], [4.0, -2.0, 1.0]],
        )
    }

    #[test]
    fn columns_follow_sample_order() {
        let t = sample();
        assert_eq!(t.xs(), vec![1.0, -1.0, 4.0]);
        assert_eq!(t.ys(), vec![2.0, 5.0, -2.0]);
        assert_eq!(t.zs(), vec![3.0, 0.0, 1.0]);
        assert_eq!(t.flat_states().len(), 9);
    }

    #[test]
    fn bounds_cover_every_sample() {
        let b = sample().bounds().expect("non-empty");
        assert_eq!(b.min, [-1.0, -2.0, 0.0]);
        assert_eq!(b.max, [4.0, 5.0, 3.0]);
    }

    #[test]
    fn empty_trajectory_has_no_bounds() {
        assert!(Trajectory::new(Vec::new(), Vec::new()).bounds().is_none());
    }
}
