use num_traits::{Num, NumAssign};
use std::fmt::Debug;
use std::ops::Neg;

/// A trait for types that can be used as scalars in the vector field and the steppers.
/// Polynomial arithmetic is all the Lorenz field needs, so `Float` is not required;
/// Runge-Kutta coefficients enter through `From<f64>`.
pub trait Scalar: Num + NumAssign + Neg<Output = Self> + Copy + Debug + From<f64> + 'static {}

impl<T> Scalar for T where T: Num + NumAssign + Neg<Output = T> + Copy + Debug + From<f64> + 'static
{}

/// Represents a continuous-time dynamical system.
pub trait DynamicalSystem<T: Scalar> {
    /// Returns the dimension of the state space.
    fn dimension(&self) -> usize;

    /// Evaluates the vector field.
    /// t: current time
    /// x: current state
    /// out: buffer to write dx/dt into
    fn apply(&self, t: T, x: &[T], out: &mut [T]);
}

/// A trait for solvers that can step a system forward.
pub trait Steppable<T: Scalar> {
    /// Performs one step of size dt.
    /// t: current time (updated after step)
    /// state: current state (updated after step)
    /// dt: step size
    fn step(&mut self, system: &impl DynamicalSystem<T>, t: &mut T, state: &mut [T], dt: T);
}
