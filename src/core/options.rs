//! Solver configuration.
//!
//! [`SolverOptions`] carries the numeric tolerance and the iteration cap of an
//! [`EnclosingBallSolver`](crate::core::algorithms::enclosing_ball::EnclosingBallSolver).
//! Use [`SolverOptions::default`] or the generated [`SolverOptionsBuilder`]:
//!
//! ```rust
//! use miniball::core::options::SolverOptionsBuilder;
//!
//! let options = SolverOptionsBuilder::default()
//!     .epsilon(1e-12)
//!     .max_iterations(500_usize)
//!     .build()
//!     .unwrap();
//! assert_eq!(options.iteration_cap(10, 3), 500);
//! ```

#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

/// Default relative tolerance for "near zero" tests.
pub const DEFAULT_EPSILON: f64 = 1e-14;

/// Multiplier applied to `max(n, d + 1)` to derive the default iteration cap.
pub const DEFAULT_ITERATION_FACTOR: usize = 10;

/// Numeric tolerance and termination settings for one solve.
#[derive(Builder, Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct SolverOptions {
    /// Relative tolerance. Distances are compared against `epsilon * radius`,
    /// affine coefficients against `epsilon` directly.
    #[builder(default = "DEFAULT_EPSILON")]
    pub epsilon: f64,
    /// Explicit cap on measure steps; `None` derives it from the input size.
    #[builder(setter(into, strip_option), default)]
    #[serde(default)]
    pub max_iterations: Option<usize>,
}

impl SolverOptionsBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(epsilon) = self.epsilon
            && (!epsilon.is_finite() || epsilon < 0.0)
        {
            return Err(format!(
                "epsilon must be finite and non-negative, got {epsilon}"
            ));
        }
        if let Some(Some(0)) = self.max_iterations {
            return Err("max_iterations must be positive".to_string());
        }
        Ok(())
    }
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            max_iterations: None,
        }
    }
}

impl SolverOptions {
    /// Number of measure steps a solve over `size` points in `dimension`
    /// dimensions may take before giving up.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use miniball::core::options::SolverOptions;
    ///
    /// assert_eq!(SolverOptions::default().iteration_cap(100, 3), 1000);
    /// assert_eq!(SolverOptions::default().iteration_cap(1, 3), 40);
    /// ```
    #[must_use]
    pub fn iteration_cap(&self, size: usize, dimension: usize) -> usize {
        self.max_iterations
            .unwrap_or_else(|| DEFAULT_ITERATION_FACTOR * size.max(dimension + 1))
    }
}
