pub mod autodiff;
pub mod config;
pub mod equilibrium;
pub mod error;
pub mod grid;
pub mod lorenz;
pub mod solve;
pub mod solvers;
pub mod trajectory;
/// The `lorenz_core` crate holds the mathematical side of the Lorenz attractor explorer.
/// It has no I/O; front-ends call [`solve::solve_lorenz`] on every parameter change.
///
/// Key components:
/// - **Traits**: `Scalar` (numeric type abstraction), `DynamicalSystem` (ODEs), `Steppable` (Solvers).
/// - **Lorenz**: the shared field definition, generic over `f64` and `Dual`.
/// - **Solvers**: RK4 and Tsit5, the latter with embedded error control and dense output.
/// - **Solve**: fixed-grid and adaptive trajectory pipelines driven by `SimulationConfig`.
/// - **Equilibrium**: fixed points, Jacobians via dual numbers, eigenvalue stability.
pub mod traits;

pub use config::{AdaptiveSettings, IntegratorKind, SimulationConfig};
pub use error::{LorenzError, Result};
pub use grid::TimeGrid;
pub use lorenz::{lorenz_field, LorenzParams, LorenzSystem};
pub use solve::solve_lorenz;
pub use trajectory::{Bounds, State, Trajectory};
