//! Per-axis interpolants.

use contracts::{
    AttitudeSeries, Axis, ContractError, InterpolationMethod, ResampleConfig, TimeDomain,
};

use crate::angles::{unwrap_degrees, wrap_degrees};
use crate::spline::{CubicSpline, LinearSegments, NearestNode};

#[derive(Debug, Clone, PartialEq)]
enum Kernel {
    Cubic(CubicSpline),
    Linear(LinearSegments),
    Nearest(NearestNode),
}

/// Immutable interpolant for one axis
///
/// Only defined on [`Interpolant::domain`]; evaluating outside it is a caller
/// bug and the result is meaningless.
#[derive(Debug, Clone, PartialEq)]
pub struct Interpolant {
    method: InterpolationMethod,
    domain: TimeDomain,
    kernel: Kernel,
    wrap_output: bool,
}

impl Interpolant {
    /// Fit an interpolant through `(nodes[i], values[i])`
    ///
    /// # Errors
    /// - `InsufficientData` if there are fewer nodes than the method needs
    /// - `NonMonotonicTime` if nodes are not finite and strictly increasing
    pub fn fit(
        method: InterpolationMethod,
        nodes: &[f64],
        values: &[f64],
    ) -> Result<Self, ContractError> {
        if nodes.len() != values.len() {
            return Err(ContractError::Other(format!(
                "interpolant needs one value per node ({} nodes, {} values)",
                nodes.len(),
                values.len()
            )));
        }
        if nodes.len() < method.min_samples() {
            return Err(ContractError::insufficient_data(method, nodes.len()));
        }
        check_strictly_increasing(nodes)?;

        let kernel = match method {
            InterpolationMethod::Cubic => Kernel::Cubic(CubicSpline::fit(nodes, values)),
            InterpolationMethod::Linear => Kernel::Linear(LinearSegments::fit(nodes, values)),
            InterpolationMethod::Nearest => Kernel::Nearest(NearestNode::fit(nodes, values)),
        };

        Ok(Self {
            method,
            domain: TimeDomain::new(nodes[0], nodes[nodes.len() - 1]),
            kernel,
            wrap_output: false,
        })
    }

    /// Fit through unwrapped angles; results are wrapped back into (-180, 180]
    pub fn fit_angular(
        method: InterpolationMethod,
        nodes: &[f64],
        values: &[f64],
    ) -> Result<Self, ContractError> {
        let unwrapped = unwrap_degrees(values);
        let mut interpolant = Self::fit(method, nodes, &unwrapped)?;
        interpolant.wrap_output = true;
        Ok(interpolant)
    }

    pub fn evaluate(&self, t: f64) -> f64 {
        let v = match &self.kernel {
            Kernel::Cubic(k) => k.evaluate(t),
            Kernel::Linear(k) => k.evaluate(t),
            Kernel::Nearest(k) => k.evaluate(t),
        };
        if self.wrap_output {
            wrap_degrees(v)
        } else {
            v
        }
    }

    pub fn domain(&self) -> TimeDomain {
        self.domain
    }

    pub fn method(&self) -> InterpolationMethod {
        self.method
    }
}

fn check_strictly_increasing(nodes: &[f64]) -> Result<(), ContractError> {
    if !nodes[0].is_finite() {
        return Err(ContractError::NonMonotonicTime {
            index: 0,
            previous: f64::NEG_INFINITY,
            current: nodes[0],
        });
    }
    for (i, w) in nodes.windows(2).enumerate() {
        if w[1] <= w[0] || !w[1].is_finite() {
            return Err(ContractError::NonMonotonicTime {
                index: i + 1,
                previous: w[0],
                current: w[1],
            });
        }
    }
    Ok(())
}

/// Roll, pitch and yaw interpolants sharing one node set
#[derive(Debug, Clone, PartialEq)]
pub struct AttitudeInterpolants {
    roll: Interpolant,
    pitch: Interpolant,
    yaw: Interpolant,
}

impl AttitudeInterpolants {
    /// Build all three axes from an attitude series
    ///
    /// # Errors
    /// `InsufficientData` is checked before `NonMonotonicTime`; nothing is
    /// built if either fails.
    pub fn build(
        attitude: &AttitudeSeries,
        config: &ResampleConfig,
    ) -> Result<Self, ContractError> {
        let method = config.method;
        if attitude.len() < method.min_samples() {
            return Err(ContractError::insufficient_data(method, attitude.len()));
        }
        attitude.validate_monotonic()?;

        let nodes = attitude.timestamps();
        let fit_axis = |axis: Axis| {
            let values = attitude.axis_values(axis);
            if config.unwrap_angles {
                Interpolant::fit_angular(method, &nodes, &values)
            } else {
                Interpolant::fit(method, &nodes, &values)
            }
        };

        Ok(Self {
            roll: fit_axis(Axis::Roll)?,
            pitch: fit_axis(Axis::Pitch)?,
            yaw: fit_axis(Axis::Yaw)?,
        })
    }

    pub fn axis(&self, axis: Axis) -> &Interpolant {
        match axis {
            Axis::Roll => &self.roll,
            Axis::Pitch => &self.pitch,
            Axis::Yaw => &self.yaw,
        }
    }

    /// Shared valid domain
    pub fn domain(&self) -> TimeDomain {
        self.roll.domain()
    }

    pub fn method(&self) -> InterpolationMethod {
        self.roll.method()
    }

    /// `[roll, pitch, yaw]` at `t`
    pub fn evaluate(&self, t: f64) -> [f64; 3] {
        [
            self.roll.evaluate(t),
            self.pitch.evaluate(t),
            self.yaw.evaluate(t),
        ]
    }
}
