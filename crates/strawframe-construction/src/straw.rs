//! Straw bale layout.
//!
//! A wall whose depth matches the bale width is tiled with bales course by
//! course, bottom to top. Each course is cut along the wall into tiles no
//! longer than a bale. The remainder above the last full course becomes a
//! course of bales trimmed at the top, a course of flakes, or a stuffed
//! strip, depending on how tall it is.
//!
//! Tiles are produced lazily, so a consumer can stop early and render what
//! it has so far.

use std::iter::FusedIterator;

use strawframe_materials::{MaterialId, StrawbaleMaterial};
use strawframe_math::{Tolerance, Transform, Vec3};

use crate::area::WallConstructionArea;
use crate::config::ConstructionContext;
use crate::element::{ConstructionElement, IdSequence, PartInfo, PartKind, Tag};
use crate::error::{ConstructionError, Result};
use crate::results::{ConstructionResult, Diagnostic, Issue};

/// Size class of a straw tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaleKind {
    /// Height and length within tolerance of a bale.
    Full,
    /// A bale cut shorter, or trimmed at the top by less than the cutoff limit.
    Partial,
    /// Too small for a bale, thick enough for flakes.
    Flakes,
    /// Loose straw.
    Stuffed,
}

impl BaleKind {
    /// Classify a tile by its length along the wall and its height.
    pub fn classify(length: f64, height: f64, bale: &StrawbaleMaterial) -> Self {
        let full_height = (height - bale.bale_height).abs() <= bale.tolerance;
        let full_length = length >= bale.bale_min_length - bale.tolerance
            && length <= bale.bale_max_length + bale.tolerance;

        if full_height && full_length {
            BaleKind::Full
        } else if length > bale.bale_min_length / 2.0
            && (full_height || bale.bale_height - height < bale.top_cutoff_limit)
        {
            BaleKind::Partial
        } else if length.min(height) > bale.flake_size {
            BaleKind::Flakes
        } else {
            BaleKind::Stuffed
        }
    }

    /// Tag describing this class.
    pub fn tag(&self) -> Tag {
        match self {
            BaleKind::Full => Tag::FullBale,
            BaleKind::Partial => Tag::PartialBale,
            BaleKind::Flakes => Tag::StrawFlakes,
            BaleKind::Stuffed => Tag::StrawStuffed,
        }
    }

    /// Parts-list kind for this class.
    pub fn part_kind(&self) -> PartKind {
        match self {
            BaleKind::Full => PartKind::FullBale,
            BaleKind::Partial => PartKind::PartialBale,
            BaleKind::Flakes => PartKind::StrawFlakes,
            BaleKind::Stuffed => PartKind::StuffedStraw,
        }
    }
}

/// How a course is cut along the wall.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum CourseFill {
    /// Tiles of at most one bale length.
    Bales,
    /// Flake tiles one bale height long.
    Flakes,
    /// A single strip across the whole wall.
    Stuffed,
}

/// One horizontal band of the tiling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Course {
    pub(crate) z: f64,
    pub(crate) height: f64,
    pub(crate) fill: CourseFill,
}

impl Course {
    fn step(&self, bale: &StrawbaleMaterial) -> Option<f64> {
        match self.fill {
            CourseFill::Bales => Some(bale.bale_max_length),
            CourseFill::Flakes => Some(bale.bale_height),
            CourseFill::Stuffed => None,
        }
    }
}

/// Split a wall of `height` into courses, bottom to top.
pub(crate) fn plan_courses(height: f64, bale: &StrawbaleMaterial) -> Vec<Course> {
    let eps = Tolerance::DEFAULT.linear;
    if height <= eps {
        return Vec::new();
    }

    // Standing bales: one course the height of the wall.
    if (height - bale.bale_height).abs() <= bale.tolerance {
        return vec![Course {
            z: 0.0,
            height,
            fill: CourseFill::Bales,
        }];
    }

    let full = ((height + eps) / bale.bale_height).floor() as usize;
    let mut courses: Vec<Course> = (0..full)
        .map(|i| Course {
            z: i as f64 * bale.bale_height,
            height: bale.bale_height,
            fill: CourseFill::Bales,
        })
        .collect();

    let top = full as f64 * bale.bale_height;
    let remainder = height - top;
    if remainder > eps {
        let fill = if bale.bale_height - remainder < bale.top_cutoff_limit {
            CourseFill::Bales
        } else if remainder > bale.flake_size {
            CourseFill::Flakes
        } else {
            CourseFill::Stuffed
        };
        courses.push(Course {
            z: top,
            height: remainder,
            fill,
        });
    } else if let Some(last) = courses.last_mut() {
        // Close the rounding gap so the courses end exactly at the top.
        last.height = height - last.z;
    }
    courses
}

/// Lazy straw layout over one wall area.
#[derive(Debug, Clone)]
pub struct StrawLayout {
    state: LayoutState,
}

#[derive(Debug, Clone)]
enum LayoutState {
    /// The wall depth does not fit a bale; a placeholder and a diagnostic.
    Rejected(std::vec::IntoIter<ConstructionResult>),
    Tiling(TileCursor),
}

impl StrawLayout {
    fn new(area: &WallConstructionArea, material: MaterialId, bale: StrawbaleMaterial) -> Self {
        let depth = area.depth();
        let max = bale.bale_width + bale.tolerance;
        let min = bale.bale_width - bale.tolerance;
        let mut ids = IdSequence::new("strawbale");

        let state = if depth > max {
            tracing::debug!(depth, max, material = %material, "wall too thick for strawbale");
            let placeholder = placeholder(&mut ids, area, &material);
            let issue = Issue::WallTooThickForBale {
                material,
                thickness: depth,
                max,
            };
            let error = Diagnostic::new(issue, &[&placeholder]);
            LayoutState::Rejected(
                vec![
                    ConstructionResult::Element(placeholder),
                    ConstructionResult::Error(error),
                ]
                .into_iter(),
            )
        } else if depth < min {
            tracing::debug!(depth, min, material = %material, "wall too thin for strawbale");
            let placeholder = placeholder(&mut ids, area, &material);
            let issue = Issue::WallTooThinForBale {
                material,
                thickness: depth,
                min,
            };
            let warning = Diagnostic::new(issue, &[&placeholder]);
            LayoutState::Rejected(
                vec![
                    ConstructionResult::Element(placeholder),
                    ConstructionResult::Warning(warning),
                ]
                .into_iter(),
            )
        } else {
            let courses = plan_courses(area.height(), &bale);
            tracing::debug!(
                courses = courses.len(),
                width = area.width(),
                height = area.height(),
                "tiling strawbale wall"
            );
            LayoutState::Tiling(TileCursor {
                placement: area.placement(),
                width: area.width(),
                depth,
                material,
                bale,
                courses,
                course: 0,
                x: 0.0,
                ids,
            })
        };
        Self { state }
    }

    /// True if the wall depth did not fit a bale.
    pub fn is_rejected(&self) -> bool {
        matches!(self.state, LayoutState::Rejected(_))
    }
}

impl Iterator for StrawLayout {
    type Item = ConstructionResult;

    fn next(&mut self) -> Option<ConstructionResult> {
        match &mut self.state {
            LayoutState::Rejected(results) => results.next(),
            LayoutState::Tiling(cursor) => cursor.next_tile().map(ConstructionResult::Element),
        }
    }
}

impl FusedIterator for StrawLayout {}

fn placeholder(
    ids: &mut IdSequence,
    area: &WallConstructionArea,
    material: &MaterialId,
) -> ConstructionElement {
    ConstructionElement::cuboid(
        ids.next_id(),
        material.clone(),
        Vec3::zeros(),
        area.size,
        area.placement(),
    )
    .with_tags([Tag::Strawbale, Tag::Placeholder])
}

/// Position within the course plan.
#[derive(Debug, Clone)]
struct TileCursor {
    placement: Transform,
    width: f64,
    depth: f64,
    material: MaterialId,
    bale: StrawbaleMaterial,
    courses: Vec<Course>,
    course: usize,
    x: f64,
    ids: IdSequence,
}

impl TileCursor {
    fn next_tile(&mut self) -> Option<ConstructionElement> {
        let eps = Tolerance::DEFAULT.linear;
        loop {
            let course = *self.courses.get(self.course)?;
            let remaining = self.width - self.x;
            if remaining <= eps {
                self.course += 1;
                self.x = 0.0;
                continue;
            }

            // The last tile takes whatever is left, so rounding never leaves a sliver.
            let length = match course.step(&self.bale) {
                Some(step) if remaining - step > eps => step,
                _ => remaining,
            };
            let tile = self.tile(self.x, course, length);
            self.x += length;
            return Some(tile);
        }
    }

    fn tile(&mut self, x: f64, course: Course, length: f64) -> ConstructionElement {
        let kind = BaleKind::classify(length, course.height, &self.bale);
        let size = Vec3::new(length, self.depth, course.height);
        ConstructionElement::cuboid(
            self.ids.next_id(),
            self.material.clone(),
            Vec3::new(x, 0.0, course.z),
            size,
            self.placement.clone(),
        )
        .with_tags([Tag::Strawbale, kind.tag()])
        .with_part(PartInfo::new(kind.part_kind(), size))
    }
}

/// Lay out straw bales for `area`.
///
/// `material` defaults to the context's configured straw material. A missing
/// material, a material that is not a strawbale, or a strawbale record with
/// unusable dimensions is a configuration error.
pub fn construct_straw(
    area: &WallConstructionArea,
    material: Option<&MaterialId>,
    ctx: &ConstructionContext<'_>,
) -> Result<StrawLayout> {
    let id = material.unwrap_or(&ctx.settings.default_straw_material);
    let record = ctx
        .materials
        .resolve(id)
        .ok_or_else(|| ConstructionError::MaterialNotFound(id.clone()))?;
    let bale = record
        .as_strawbale()
        .ok_or_else(|| ConstructionError::WrongMaterialType {
            id: id.clone(),
            expected: "strawbale",
            found: record.type_name(),
        })?;
    record.validate()?;
    Ok(StrawLayout::new(area, id.clone(), bale.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConstructionSettings;
    use crate::results::aggregate_results;
    use approx::assert_abs_diff_eq;
    use strawframe_materials::{Material, MaterialCatalog, MaterialKind, DEFAULT_POST_TIMBER};
    use strawframe_math::Point3;

    fn bale() -> StrawbaleMaterial {
        StrawbaleMaterial {
            bale_min_length: 800.0,
            bale_max_length: 900.0,
            bale_height: 500.0,
            bale_width: 360.0,
            tolerance: 10.0,
            top_cutoff_limit: 50.0,
            flake_size: 70.0,
        }
    }

    fn catalog() -> MaterialCatalog {
        let mut catalog = MaterialCatalog::builtin();
        catalog.insert(Material::new("straw", "Straw", MaterialKind::Strawbale(bale())));
        catalog
    }

    fn area(width: f64, depth: f64, height: f64) -> WallConstructionArea {
        WallConstructionArea::new(Point3::origin(), Vec3::new(width, depth, height))
    }

    fn layout(area: &WallConstructionArea) -> Vec<ConstructionElement> {
        let catalog = catalog();
        let settings = ConstructionSettings::default();
        let ctx = ConstructionContext::new(&catalog, &settings);
        let layout = construct_straw(area, Some(&"straw".into()), &ctx).unwrap();
        aggregate_results(layout).elements
    }

    fn kinds(elements: &[ConstructionElement]) -> Vec<Tag> {
        elements
            .iter()
            .map(|e| *e.tags().iter().find(|t| **t != Tag::Strawbale).unwrap())
            .collect()
    }

    #[test]
    fn test_classification_thresholds() {
        let b = bale();
        assert_eq!(BaleKind::classify(900.0, 500.0, &b), BaleKind::Full);
        assert_eq!(BaleKind::classify(790.0, 510.0, &b), BaleKind::Full);
        assert_eq!(BaleKind::classify(401.0, 500.0, &b), BaleKind::Partial);
        // half the minimum length is not enough for a partial bale
        assert_eq!(BaleKind::classify(400.0, 500.0, &b), BaleKind::Flakes);
        // trimmed by 49 at the top is still a bale, by 50 it is not
        assert_eq!(BaleKind::classify(900.0, 451.0, &b), BaleKind::Partial);
        assert_eq!(BaleKind::classify(900.0, 450.0, &b), BaleKind::Flakes);
        assert_eq!(BaleKind::classify(900.0, 71.0, &b), BaleKind::Flakes);
        assert_eq!(BaleKind::classify(900.0, 70.0, &b), BaleKind::Stuffed);
        assert_eq!(BaleKind::classify(70.0, 500.0, &b), BaleKind::Stuffed);
    }

    #[test]
    fn test_plan_exact_courses() {
        let courses = plan_courses(1500.0, &bale());
        assert_eq!(courses.len(), 3);
        for course in &courses {
            assert_eq!(course.fill, CourseFill::Bales);
            assert_eq!(course.height, 500.0);
        }
        assert_eq!(courses[2].z, 1000.0);
    }

    #[test]
    fn test_plan_folds_near_full_remainder_into_bales() {
        // remainder 460: trimmed by 40 < 50
        let courses = plan_courses(1460.0, &bale());
        assert_eq!(courses.len(), 3);
        assert_eq!(courses[2].fill, CourseFill::Bales);
        assert_abs_diff_eq!(courses[2].height, 460.0);
    }

    #[test]
    fn test_plan_remainder_at_cutoff_becomes_flakes() {
        // remainder 450: trimmed by exactly 50, not < 50
        let courses = plan_courses(1450.0, &bale());
        assert_eq!(courses[2].fill, CourseFill::Flakes);
    }

    #[test]
    fn test_plan_thin_remainder_is_stuffed() {
        let courses = plan_courses(1070.0, &bale());
        assert_eq!(courses.len(), 3);
        assert_eq!(courses[2].fill, CourseFill::Stuffed);
        assert_abs_diff_eq!(courses[2].height, 70.0, epsilon = 1e-9);

        let courses = plan_courses(1071.0, &bale());
        assert_eq!(courses[2].fill, CourseFill::Flakes);
    }

    #[test]
    fn test_plan_standing_course() {
        let courses = plan_courses(505.0, &bale());
        assert_eq!(
            courses,
            vec![Course {
                z: 0.0,
                height: 505.0,
                fill: CourseFill::Bales
            }]
        );
    }

    #[test]
    fn test_vertical_mode_single_course() {
        let elements = layout(&area(2000.0, 360.0, 500.0));
        assert_eq!(elements.len(), 3);
        let lengths: Vec<f64> = elements.iter().map(|e| e.bounds().size().x).collect();
        assert_eq!(lengths, vec![900.0, 900.0, 200.0]);
        assert_eq!(kinds(&elements), vec![Tag::FullBale, Tag::FullBale, Tag::StrawFlakes]);
    }

    #[test]
    fn test_horizontal_mode_grid() {
        let elements = layout(&area(1800.0, 360.0, 1000.0));
        assert_eq!(elements.len(), 4);
        assert!(elements.iter().all(|e| e.has_tag(Tag::FullBale)));
        assert_eq!(elements[2].bounds().min.z, 500.0);
        assert_eq!(elements[2].bounds().min.x, 0.0);
    }

    #[test]
    fn test_flake_course_uses_bale_height_step() {
        // remainder 300 > flake size, not within cutoff
        let elements = layout(&area(1200.0, 360.0, 800.0));
        let top: Vec<_> = elements
            .iter()
            .filter(|e| e.bounds().min.z == 500.0)
            .collect();
        let lengths: Vec<f64> = top.iter().map(|e| e.bounds().size().x).collect();
        assert_eq!(lengths, vec![500.0, 500.0, 200.0]);
        assert!(top.iter().all(|e| e.has_tag(Tag::StrawFlakes)));
    }

    #[test]
    fn test_stuffed_strip_spans_course() {
        let elements = layout(&area(2500.0, 360.0, 550.0));
        let strip = elements.last().unwrap();
        assert!(strip.has_tag(Tag::StrawStuffed));
        assert_abs_diff_eq!(strip.bounds().size().x, 2500.0);
        assert_abs_diff_eq!(strip.bounds().size().z, 50.0, epsilon = 1e-9);
    }

    #[test]
    fn test_tiles_cover_area_without_overlap() {
        let wall = area(3170.0, 355.0, 2270.0);
        let elements = layout(&wall);
        let volume: f64 = elements.iter().map(|e| e.bounds().volume()).sum();
        assert_abs_diff_eq!(volume, wall.bounds().volume(), epsilon = 1e-3);
        for (i, a) in elements.iter().enumerate() {
            for b in &elements[i + 1..] {
                assert!(!a.bounds().overlaps_interior(b.bounds(), 1e-6));
            }
        }
        let bounds = elements
            .iter()
            .fold(strawframe_math::Bounds3::empty(), |acc, e| acc.union(e.bounds()));
        assert!(bounds.approx_eq(&wall.bounds(), 1e-6));
    }

    #[test]
    fn test_thickness_branches() {
        let catalog = catalog();
        let settings = ConstructionSettings::default();
        let ctx = ConstructionContext::new(&catalog, &settings);
        let straw = MaterialId::new("straw");

        let nominal = area(900.0, 360.0, 500.0);
        let ok = aggregate_results(construct_straw(&nominal, Some(&straw), &ctx).unwrap());
        assert!(ok.warnings.is_empty() && ok.errors.is_empty());

        let thick_wall = area(900.0, 371.0, 500.0);
        let thick = construct_straw(&thick_wall, Some(&straw), &ctx).unwrap();
        assert!(thick.is_rejected());
        let thick = aggregate_results(thick);
        assert_eq!(thick.elements.len(), 1);
        assert_eq!(thick.errors.len(), 1);
        assert!(thick.warnings.is_empty());
        let placeholder = &thick.elements[0];
        assert!(placeholder.has_tag(Tag::Placeholder));
        assert!(placeholder.has_tag(Tag::Strawbale));
        assert!(placeholder.bounds().approx_eq(&thick_wall.bounds(), 1e-9));
        assert_eq!(thick.errors[0].issue.key(), "wall_too_thick_for_bale");
        assert_eq!(thick.errors[0].element_ids, [placeholder.id().clone()]);

        let thin_wall = area(900.0, 349.0, 500.0);
        let thin = aggregate_results(construct_straw(&thin_wall, Some(&straw), &ctx).unwrap());
        assert_eq!(thin.elements.len(), 1);
        assert_eq!(thin.warnings.len(), 1);
        assert!(thin.errors.is_empty());
        let placeholder = thin.elements[0].bounds();
        assert!(placeholder.approx_eq(&thin_wall.bounds(), 1e-9));
        assert_eq!(thin.warnings[0].issue.key(), "wall_too_thin_for_bale");
    }

    #[test]
    fn test_default_material_from_settings() {
        let catalog = catalog();
        let settings = ConstructionSettings::default();
        let ctx = ConstructionContext::new(&catalog, &settings);
        let layout = construct_straw(&area(900.0, 360.0, 500.0), None, &ctx).unwrap();
        let elements = aggregate_results(layout).elements;
        assert_eq!(elements[0].material().as_str(), "strawbale");
    }

    #[test]
    fn test_material_errors_are_fatal() {
        let catalog = catalog();
        let settings = ConstructionSettings::default();
        let ctx = ConstructionContext::new(&catalog, &settings);
        let wall = area(900.0, 360.0, 500.0);

        let missing = construct_straw(&wall, Some(&"nope".into()), &ctx).unwrap_err();
        assert!(matches!(missing, ConstructionError::MaterialNotFound(_)));

        let wrong = construct_straw(&wall, Some(&DEFAULT_POST_TIMBER.into()), &ctx).unwrap_err();
        assert!(matches!(
            wrong,
            ConstructionError::WrongMaterialType { found: "dimensional", .. }
        ));
    }

    #[test]
    fn test_partial_consumption_is_prefix() {
        let catalog = catalog();
        let settings = ConstructionSettings::default();
        let ctx = ConstructionContext::new(&catalog, &settings);
        let wall = area(3000.0, 360.0, 2000.0);
        let all: Vec<_> = construct_straw(&wall, None, &ctx).unwrap().collect();
        let first: Vec<_> = construct_straw(&wall, None, &ctx).unwrap().take(3).collect();
        assert_eq!(first, all[..3]);
    }
}
