//! Result protocol shared by every layout, and the aggregator.

use serde::Serialize;
use strawframe_materials::{CrossSection, MaterialId};
use strawframe_math::Bounds3;
use thiserror::Error;

use crate::element::{ConstructionElement, ElementId};

/// A diagnosed problem, identified by a stable message key and carrying the
/// parameters a front end needs to phrase it.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "key", rename_all = "snake_case")]
pub enum Issue {
    /// A post's cross-section is not stocked by its material.
    #[error(
        "post cross-section {width}x{thickness} is not available for {material} (available: {})",
        list_cross_sections(.available)
    )]
    PostCrossSectionMismatch {
        /// Post material.
        material: MaterialId,
        /// Post width along the wall.
        width: f64,
        /// Post thickness across the wall.
        thickness: f64,
        /// Cross-sections the material offers.
        available: Vec<CrossSection>,
    },

    /// The wall cannot hold two posts side by side.
    #[error("wall not wide enough for double posts: needs {required} mm, has {available} mm")]
    DoublePostWallTooThin {
        /// Twice the post thickness.
        required: f64,
        /// Wall depth.
        available: f64,
    },

    /// The wall is deeper than a bale, even allowing for tolerance.
    #[error("wall too thick for a single strawbale of {material}: {thickness} mm exceeds {max} mm")]
    WallTooThickForBale {
        /// Bale material.
        material: MaterialId,
        /// Wall depth.
        thickness: f64,
        /// Bale width plus tolerance.
        max: f64,
    },

    /// The wall is shallower than a bale, even allowing for tolerance.
    #[error("wall too thin for a single strawbale of {material}: {thickness} mm is below {min} mm")]
    WallTooThinForBale {
        /// Bale material.
        material: MaterialId,
        /// Wall depth.
        thickness: f64,
        /// Bale width minus tolerance.
        min: f64,
    },
}

fn list_cross_sections(sections: &[CrossSection]) -> String {
    sections
        .iter()
        .map(CrossSection::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl Issue {
    /// Stable message key, for translation lookups.
    pub fn key(&self) -> &'static str {
        match self {
            Issue::PostCrossSectionMismatch { .. } => "post_cross_section_mismatch",
            Issue::DoublePostWallTooThin { .. } => "double_post_wall_too_thin",
            Issue::WallTooThickForBale { .. } => "wall_too_thick_for_bale",
            Issue::WallTooThinForBale { .. } => "wall_too_thin_for_bale",
        }
    }
}

/// A warning or error raised about specific elements.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    /// What went wrong.
    pub issue: Issue,
    /// Elements the diagnostic was raised about (never empty).
    pub element_ids: Vec<ElementId>,
    /// Merged bounds of those elements.
    pub bounds: Bounds3,
    /// Consumers may collapse diagnostics sharing a key into one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_key: Option<String>,
}

impl Diagnostic {
    /// Create a diagnostic about `elements`.
    pub fn new(issue: Issue, elements: &[&ConstructionElement]) -> Self {
        debug_assert!(!elements.is_empty(), "diagnostic must reference an element");
        let bounds = elements
            .iter()
            .fold(Bounds3::empty(), |acc, e| acc.union(e.bounds()));
        Self {
            issue,
            element_ids: elements.iter().map(|e| e.id().clone()).collect(),
            bounds,
            group_key: None,
        }
    }

    /// Set the deduplication key.
    pub fn with_group_key(mut self, key: impl Into<String>) -> Self {
        self.group_key = Some(key.into());
        self
    }

    /// Human-readable message.
    pub fn message(&self) -> String {
        self.issue.to_string()
    }
}

/// One value of a layout's output sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ConstructionResult {
    /// A physical part.
    Element(ConstructionElement),
    /// Feasible but suboptimal geometry.
    Warning(Diagnostic),
    /// Geometry that cannot be realized with the given configuration.
    Error(Diagnostic),
}

impl ConstructionResult {
    /// The element, if this is one.
    pub fn as_element(&self) -> Option<&ConstructionElement> {
        match self {
            ConstructionResult::Element(e) => Some(e),
            _ => None,
        }
    }

    /// True for `Warning` and `Error`.
    pub fn is_diagnostic(&self) -> bool {
        !matches!(self, ConstructionResult::Element(_))
    }
}

/// A fully drained result sequence, partitioned by variant.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregatedResults {
    /// Emitted elements, in emission order.
    pub elements: Vec<ConstructionElement>,
    /// Warnings, in emission order.
    pub warnings: Vec<Diagnostic>,
    /// Errors, in emission order.
    pub errors: Vec<Diagnostic>,
}

impl AggregatedResults {
    /// Create empty buckets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sort one result into its bucket.
    pub fn push(&mut self, result: ConstructionResult) {
        match result {
            ConstructionResult::Element(e) => self.elements.push(e),
            ConstructionResult::Warning(d) => self.warnings.push(d),
            ConstructionResult::Error(d) => self.errors.push(d),
        }
    }

    /// True if any error was collected.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// True if nothing at all was collected.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty() && self.warnings.is_empty() && self.errors.is_empty()
    }

    /// Merged bounds of all elements.
    pub fn bounds(&self) -> Bounds3 {
        self.elements
            .iter()
            .fold(Bounds3::empty(), |acc, e| acc.union(e.bounds()))
    }
}

impl Extend<ConstructionResult> for AggregatedResults {
    fn extend<I: IntoIterator<Item = ConstructionResult>>(&mut self, iter: I) {
        for result in iter {
            self.push(result);
        }
    }
}

impl FromIterator<ConstructionResult> for AggregatedResults {
    fn from_iter<I: IntoIterator<Item = ConstructionResult>>(iter: I) -> Self {
        let mut results = Self::new();
        results.extend(iter);
        results
    }
}

/// Drain a result sequence into element, warning and error buckets,
/// preserving emission order within each bucket.
pub fn aggregate_results(
    results: impl IntoIterator<Item = ConstructionResult>,
) -> AggregatedResults {
    results.into_iter().collect()
}
