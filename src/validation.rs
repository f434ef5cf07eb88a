//! Ring Validation - Rule/Policy Separation
//!
//! Rules produce structured violations.
//! The export pipeline refuses any ring with an Error-severity violation.

use serde::{Deserialize, Serialize};

use crate::geometry::Ring;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ViolationSeverity {
    Error,
    Warning,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RingViolation {
    pub rule: String,
    pub severity: ViolationSeverity,
    pub message: String,
    pub vertex_index: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub violations: Vec<RingViolation>,
}

impl ValidationResult {
    pub fn has_errors(&self) -> bool {
        self.violations.iter().any(|v| v.severity == ViolationSeverity::Error)
    }

    /// `rule: message` pairs joined for error reporting
    pub fn summary(&self) -> String {
        self.violations
            .iter()
            .map(|v| format!("{}: {}", v.rule, v.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Validation rule trait - produces violations
pub trait RingRule {
    fn name(&self) -> &'static str;
    fn check(&self, ring: &Ring) -> Vec<RingViolation>;
}

// --- Concrete Rules ---

/// At least three distinct vertices once any closing duplicate is dropped
pub struct MinVertexCount;

impl RingRule for MinVertexCount {
    fn name(&self) -> &'static str { "min_vertex_count" }

    fn check(&self, ring: &Ring) -> Vec<RingViolation> {
        let found = ring.open_vertices().len();
        if found < 3 {
            vec![RingViolation {
                rule: self.name().to_string(),
                severity: ViolationSeverity::Error,
                message: format!("polygon needs at least 3 vertices, found {}", found),
                vertex_index: None,
            }]
        } else {
            vec![]
        }
    }
}

pub struct FiniteCoordinates;

impl RingRule for FiniteCoordinates {
    fn name(&self) -> &'static str { "finite_coordinates" }

    fn check(&self, ring: &Ring) -> Vec<RingViolation> {
        ring.vertices()
            .iter()
            .enumerate()
            .filter(|(_, v)| !v.lat.is_finite() || !v.lng.is_finite())
            .map(|(i, _)| RingViolation {
                rule: self.name().to_string(),
                severity: ViolationSeverity::Error,
                message: "coordinate is NaN or infinite".to_string(),
                vertex_index: Some(i),
            })
            .collect()
    }
}

/// Latitude strictly inside (-90, 90), longitude inside [-180, 180].
/// The poles are the Mercator singularity.
pub struct CoordinateRange;

impl RingRule for CoordinateRange {
    fn name(&self) -> &'static str { "coordinate_range" }

    fn check(&self, ring: &Ring) -> Vec<RingViolation> {
        let mut violations = vec![];
        for (i, v) in ring.vertices().iter().enumerate() {
            if v.lat.is_finite() && v.lat.abs() >= 90.0 {
                violations.push(RingViolation {
                    rule: self.name().to_string(),
                    severity: ViolationSeverity::Error,
                    message: format!("latitude {} is outside (-90, 90)", v.lat),
                    vertex_index: Some(i),
                });
            }
            if v.lng.is_finite() && v.lng.abs() > 180.0 {
                violations.push(RingViolation {
                    rule: self.name().to_string(),
                    severity: ViolationSeverity::Warning,
                    message: format!("longitude {} is outside [-180, 180]", v.lng),
                    vertex_index: Some(i),
                });
            }
        }
        violations
    }
}

/// Validator orchestrates rules
pub struct Validator {
    rules: Vec<Box<dyn RingRule>>,
}

impl Validator {
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(MinVertexCount),
                Box::new(FiniteCoordinates),
                Box::new(CoordinateRange),
            ],
        }
    }

    pub fn validate(&self, ring: &Ring) -> ValidationResult {
        let violations: Vec<_> = self
            .rules
            .iter()
            .flat_map(|rule| rule.check(ring))
            .collect();
        let valid = !violations.iter().any(|v| v.severity == ViolationSeverity::Error);
        ValidationResult { valid, violations }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}
