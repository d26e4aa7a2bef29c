//! Point sensitivities to continuously compounded zero rates.

use super::error::SensitivityError;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

/// Tolerances used when merging nearby sensitivity times.
///
/// Two consecutive times `t_prev < t` fall in the same group when
/// `t - t_prev < max(relative * |t|, absolute)`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CleanTolerance {
    /// Tolerance proportional to the time.
    pub relative: f64,
    /// Absolute tolerance in years.
    pub absolute: f64,
}

impl Default for CleanTolerance {
    fn default() -> Self {
        Self {
            relative: 1e-10,
            absolute: 1e-14,
        }
    }
}

impl CleanTolerance {
    fn validate(&self) -> Result<(), SensitivityError> {
        let valid = |v: f64| v.is_finite() && v >= 0.0;
        if valid(self.relative) && valid(self.absolute) {
            Ok(())
        } else {
            Err(SensitivityError::InvalidTolerance {
                relative: self.relative,
                absolute: self.absolute,
            })
        }
    }
}

/// Sensitivities of a value to the zero rates of named curves.
///
/// Each curve maps to a list of `(time, amount)` pairs where `amount` is
/// `dV/dr(time)`. Lists are kept in ascending `(time, amount)` order so
/// two containers holding the same entries compare equal regardless of
/// how they were assembled. Values are immutable; every operation returns
/// a new container.
///
/// # Example
///
/// ```
/// use pricer_core::sensitivities::CurveSensitivity;
///
/// let a = CurveSensitivity::from_curve("USD-OIS", vec![(1.0, -0.95)]);
/// let b = CurveSensitivity::from_curve("USD-OIS", vec![(1.0, 0.05), (2.0, -1.8)]);
///
/// let sum = a.plus(&b);
/// assert_eq!(sum.get("USD-OIS").unwrap().len(), 3);
///
/// let clean = sum.cleaned_default();
/// assert_eq!(clean.get("USD-OIS").unwrap(), &[(1.0, -0.95 + 0.05), (2.0, -1.8)]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CurveSensitivity {
    sensitivities: BTreeMap<String, Vec<(f64, f64)>>,
}

fn sort_points(points: &mut [(f64, f64)]) {
    points.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.total_cmp(&b.1)));
}

impl CurveSensitivity {
    /// Empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Container holding a single curve's list.
    pub fn from_curve(name: impl Into<String>, points: Vec<(f64, f64)>) -> Self {
        Self::new().plus_curve(name, points)
    }

    /// Union of the curve maps; lists of a shared curve are concatenated.
    pub fn plus(&self, other: &CurveSensitivity) -> Self {
        let mut sensitivities = self.sensitivities.clone();
        for (name, points) in &other.sensitivities {
            let entry = sensitivities.entry(name.clone()).or_default();
            entry.extend_from_slice(points);
            sort_points(entry);
        }
        Self { sensitivities }
    }

    /// Add a list of points for one curve.
    pub fn plus_curve(&self, name: impl Into<String>, mut points: Vec<(f64, f64)>) -> Self {
        let mut sensitivities = self.sensitivities.clone();
        let entry = sensitivities.entry(name.into()).or_default();
        entry.append(&mut points);
        sort_points(entry);
        Self { sensitivities }
    }

    /// Every amount scaled by `factor`; times are unchanged.
    pub fn multiplied_by(&self, factor: f64) -> Self {
        let sensitivities = self
            .sensitivities
            .iter()
            .map(|(name, points)| {
                let mut scaled: Vec<(f64, f64)> =
                    points.iter().map(|&(t, s)| (t, s * factor)).collect();
                sort_points(&mut scaled);
                (name.clone(), scaled)
            })
            .collect();
        Self { sensitivities }
    }

    /// Merge entries with nearby times.
    ///
    /// Within each curve the list is walked in time order and an entry
    /// joins the current group when its distance to the previous entry is
    /// below `max(relative * |t|, absolute)`. A group keeps the time of its
    /// first entry and the sum of the amounts. Groups summing to zero are
    /// kept. Cleaning a cleaned container is a no-op.
    ///
    /// # Errors
    ///
    /// `InvalidTolerance` when either tolerance is negative or not finite.
    pub fn cleaned(&self, relative: f64, absolute: f64) -> Result<Self, SensitivityError> {
        self.cleaned_with(CleanTolerance { relative, absolute })
    }

    /// [`cleaned`](Self::cleaned) with a [`CleanTolerance`].
    pub fn cleaned_with(&self, tolerance: CleanTolerance) -> Result<Self, SensitivityError> {
        tolerance.validate()?;
        let sensitivities = self
            .sensitivities
            .iter()
            .map(|(name, points)| (name.clone(), clean_points(points, tolerance)))
            .collect();
        Ok(Self { sensitivities })
    }

    /// [`cleaned`](Self::cleaned) with the default tolerances.
    pub fn cleaned_default(&self) -> Self {
        let tolerance = CleanTolerance::default();
        let sensitivities = self
            .sensitivities
            .iter()
            .map(|(name, points)| (name.clone(), clean_points(points, tolerance)))
            .collect();
        Self { sensitivities }
    }

    /// Sum of amounts per curve.
    pub fn total_by_curve(&self) -> BTreeMap<String, f64> {
        self.sensitivities
            .iter()
            .map(|(name, points)| (name.clone(), points.iter().map(|(_, s)| s).sum()))
            .collect()
    }

    /// Sum of all amounts across curves.
    pub fn total(&self) -> f64 {
        self.sensitivities
            .values()
            .flat_map(|points| points.iter().map(|(_, s)| s))
            .sum()
    }

    /// Approximate equality.
    ///
    /// True only when both containers hold the same curve names with lists
    /// of equal length, and every time and amount agrees within `tolerance`.
    /// Callers wanting insensitivity to splitting should clean both sides
    /// first.
    pub fn compare(&self, other: &CurveSensitivity, tolerance: f64) -> bool {
        if self.sensitivities.len() != other.sensitivities.len() {
            return false;
        }
        self.sensitivities.iter().all(|(name, points)| {
            other.sensitivities.get(name).is_some_and(|theirs| {
                points.len() == theirs.len()
                    && points.iter().zip(theirs).all(|(a, b)| {
                        (a.0 - b.0).abs() <= tolerance && (a.1 - b.1).abs() <= tolerance
                    })
            })
        })
    }

    /// Points for a curve.
    pub fn get(&self, name: &str) -> Option<&[(f64, f64)]> {
        self.sensitivities.get(name).map(Vec::as_slice)
    }

    /// Curve names in sorted order.
    pub fn curve_names(&self) -> impl Iterator<Item = &str> {
        self.sensitivities.keys().map(String::as_str)
    }

    /// `(curve name, points)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[(f64, f64)])> {
        self.sensitivities
            .iter()
            .map(|(name, points)| (name.as_str(), points.as_slice()))
    }

    /// Number of curves.
    pub fn len(&self) -> usize {
        self.sensitivities.len()
    }

    /// True if no curve is present.
    pub fn is_empty(&self) -> bool {
        self.sensitivities.is_empty()
    }
}

fn clean_points(points: &[(f64, f64)], tolerance: CleanTolerance) -> Vec<(f64, f64)> {
    let mut cleaned: Vec<(f64, f64)> = Vec::with_capacity(points.len());
    let mut previous: Option<f64> = None;
    for &(t, s) in points {
        let merge = previous
            .is_some_and(|p| t - p < (tolerance.relative * t.abs()).max(tolerance.absolute));
        match cleaned.last_mut() {
            Some(last) if merge => last.1 += s,
            _ => cleaned.push((t, s)),
        }
        previous = Some(t);
    }
    cleaned
}

impl Eq for CurveSensitivity {}

impl Hash for CurveSensitivity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for (name, points) in &self.sensitivities {
            name.hash(state);
            points.len().hash(state);
            for (t, s) in points {
                // -0.0 + 0.0 == 0.0 keeps Hash consistent with PartialEq.
                (t + 0.0).to_bits().hash(state);
                (s + 0.0).to_bits().hash(state);
            }
        }
    }
}

impl FromIterator<(String, Vec<(f64, f64)>)> for CurveSensitivity {
    fn from_iter<I: IntoIterator<Item = (String, Vec<(f64, f64)>)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |acc, (name, points)| acc.plus_curve(name, points))
    }
}
