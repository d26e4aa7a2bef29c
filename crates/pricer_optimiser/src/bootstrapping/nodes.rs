//! Calibration node layout.
//!
//! The solver works on one flat parameter vector. [`CalibrationNodeSet`]
//! fixes how that vector is cut into curves: curves in the order they were
//! declared, nodes within a curve in increasing time. Every consumer of the
//! vector (residuals, Jacobian columns, node sensitivities) goes through
//! this one layout.

use super::error::BootstrapError;
use nalgebra::DVector;
use pricer_core::market_data::curves::{
    CurveEnum, CurveInterpolation, CurveProvider, CurveSet, InterpolatedCurve, YieldCurve,
};
use pricer_core::market_data::MarketDataError;
use pricer_core::sensitivities::CurveSensitivity;

/// Nodes of one solved curve.
#[derive(Debug, Clone)]
pub struct CurveNodes {
    name: String,
    template: InterpolatedCurve,
}

impl CurveNodes {
    /// Curve name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Node times in increasing order.
    #[inline]
    pub fn times(&self) -> &[f64] {
        self.template.times()
    }

    /// Interpolation between nodes.
    #[inline]
    pub fn interpolation(&self) -> CurveInterpolation {
        self.template.method()
    }

    /// Number of nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.times().len()
    }

    /// Always false; a curve has at least two nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.times().is_empty()
    }

    fn build(&self, rates: &[f64]) -> Result<CurveEnum, BootstrapError> {
        Ok(CurveEnum::Interpolated(self.template.with_rates(rates)?))
    }
}

/// Ordered set of curves being solved, with their node times.
///
/// # Examples
///
/// ```
/// use pricer_core::market_data::curves::CurveInterpolation;
/// use pricer_optimiser::bootstrapping::CalibrationNodeSet;
///
/// let nodes = CalibrationNodeSet::new()
///     .with_curve("USD-OIS", vec![1.0, 2.0, 5.0], CurveInterpolation::Linear)
///     .unwrap()
///     .with_curve("USD-LIBOR-3M", vec![1.0, 5.0], CurveInterpolation::Linear)
///     .unwrap();
///
/// assert_eq!(nodes.total_nodes(), 5);
/// assert_eq!(nodes.offset("USD-LIBOR-3M"), Some(3));
/// assert_eq!(nodes.curve_names().collect::<Vec<_>>(), vec!["USD-OIS", "USD-LIBOR-3M"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CalibrationNodeSet {
    curves: Vec<CurveNodes>,
}

impl CalibrationNodeSet {
    /// Create an empty node set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a curve after those already declared.
    ///
    /// Extrapolation is flat beyond the first and last node.
    ///
    /// # Errors
    ///
    /// * `DuplicateCurve` - `name` already declared
    /// * `InvalidNodes` - Too few nodes for the interpolation, negative or
    ///   unsorted times
    pub fn with_curve(
        mut self,
        name: impl Into<String>,
        times: Vec<f64>,
        interpolation: CurveInterpolation,
    ) -> Result<Self, BootstrapError> {
        let name = name.into();
        if self.position(&name).is_some() {
            return Err(BootstrapError::duplicate_curve(name));
        }
        let zeros = vec![0.0; times.len()];
        let template = InterpolatedCurve::new(&times, &zeros, interpolation, true)
            .map_err(|e| BootstrapError::invalid_nodes(name.clone(), e.to_string()))?;
        self.curves.push(CurveNodes { name, template });
        Ok(self)
    }

    /// Declared curves in order.
    #[inline]
    pub fn curves(&self) -> &[CurveNodes] {
        &self.curves
    }

    /// Curve names in declared order.
    pub fn curve_names(&self) -> impl Iterator<Item = &str> {
        self.curves.iter().map(CurveNodes::name)
    }

    /// Whether `name` is one of the solved curves.
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Length of the parameter vector.
    pub fn total_nodes(&self) -> usize {
        self.curves.iter().map(CurveNodes::len).sum()
    }

    /// Number of curves.
    #[inline]
    pub fn len(&self) -> usize {
        self.curves.len()
    }

    /// Whether no curve has been declared.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    /// Index of the first node of `name` in the parameter vector.
    pub fn offset(&self, name: &str) -> Option<usize> {
        let index = self.position(name)?;
        Some(self.curves[..index].iter().map(CurveNodes::len).sum())
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.curves.iter().position(|c| c.name == name)
    }

    /// Curves with their node values taken from `parameters`.
    ///
    /// # Errors
    ///
    /// `MarketData(ParameterCount)` if `parameters` does not hold
    /// [`total_nodes`](Self::total_nodes) entries.
    pub fn build_curves(&self, parameters: &[f64]) -> Result<CurveSet, BootstrapError> {
        let expected = self.total_nodes();
        if parameters.len() != expected {
            return Err(MarketDataError::ParameterCount {
                expected,
                got: parameters.len(),
            }
            .into());
        }
        let mut curves = CurveSet::new();
        let mut offset = 0;
        for nodes in &self.curves {
            let end = offset + nodes.len();
            curves.insert(nodes.name.clone(), nodes.build(&parameters[offset..end])?);
            offset = end;
        }
        Ok(curves)
    }

    /// Node values of the solved curves found in `curves`, in layout order.
    ///
    /// # Errors
    ///
    /// `MarketData` if a declared curve is missing from `curves`.
    pub fn parameters(&self, curves: &dyn CurveProvider) -> Result<DVector<f64>, BootstrapError> {
        let mut values = Vec::with_capacity(self.total_nodes());
        for nodes in &self.curves {
            values.extend(curves.curve(&nodes.name)?.parameters());
        }
        Ok(DVector::from_vec(values))
    }

    /// Push continuous sensitivities onto the node vector.
    ///
    /// Every `(t, amount)` on a solved curve contributes
    /// `amount * dr(t)/dr_j` to node `j` of that curve. Curves outside the
    /// node set are skipped; nodes nothing refers to stay exactly zero.
    ///
    /// # Errors
    ///
    /// * `MarketData` - A solved curve missing from `curves`, or a
    ///   sensitivity time it cannot interpolate
    /// * `InvalidNodes` - The curve in `curves` has a different node count
    pub fn project(
        &self,
        sensitivity: &CurveSensitivity,
        curves: &dyn CurveProvider,
    ) -> Result<DVector<f64>, BootstrapError> {
        let mut projected = DVector::zeros(self.total_nodes());
        let mut offset = 0;
        for nodes in &self.curves {
            if let Some(points) = sensitivity.get(&nodes.name) {
                let curve = curves.curve(&nodes.name)?;
                if curve.parameter_count() != nodes.len() {
                    return Err(BootstrapError::invalid_nodes(
                        nodes.name.clone(),
                        format!(
                            "curve has {} parameters, layout expects {}",
                            curve.parameter_count(),
                            nodes.len()
                        ),
                    ));
                }
                for &(t, amount) in points {
                    for (j, w) in curve.zero_rate_sensitivities(t)?.into_iter().enumerate() {
                        projected[offset + j] += amount * w;
                    }
                }
            }
            offset += nodes.len();
        }
        Ok(projected)
    }
}
