//! Post layout.
//!
//! Fills a wall cross-section with one full-depth post, or with two posts
//! flush against the wall faces and infill between them. Post dimensions are
//! checked against the cross-sections a dimensional material is stocked in.

use strawframe_materials::{MaterialId, MaterialLookup};
use strawframe_math::Vec3;

use crate::area::WallConstructionArea;
use crate::config::{DoublePostConfig, FullPostConfig, PostConfig};
use crate::element::{ConstructionElement, IdSequence, PartInfo, PartKind, Tag};
use crate::results::{ConstructionResult, Diagnostic, Issue};

/// Lay out posts for `area`.
///
/// Posts are emitted first, followed by any warnings about them. A double
/// post that does not fit yields a placeholder element and an error, and
/// nothing else.
pub fn construct_post(
    area: &WallConstructionArea,
    config: &PostConfig,
    materials: &dyn MaterialLookup,
) -> impl Iterator<Item = ConstructionResult> {
    let mut ids = IdSequence::new("post");
    let results = match config {
        PostConfig::Full(full) => full_post(area, full, materials, &mut ids),
        PostConfig::Double(double) => double_post(area, double, materials, &mut ids),
    };
    results.into_iter()
}

fn full_post(
    area: &WallConstructionArea,
    config: &FullPostConfig,
    materials: &dyn MaterialLookup,
    ids: &mut IdSequence,
) -> Vec<ConstructionResult> {
    let size = Vec3::new(config.width, area.depth(), area.height());
    let post = post_element(ids, area, &config.material, Vec3::zeros(), size);
    let warning =
        check_cross_section(materials, &config.material, config.width, area.depth(), &[&post]);

    let mut results = vec![ConstructionResult::Element(post)];
    results.extend(warning);
    results
}

fn double_post(
    area: &WallConstructionArea,
    config: &DoublePostConfig,
    materials: &dyn MaterialLookup,
    ids: &mut IdSequence,
) -> Vec<ConstructionResult> {
    let depth = area.depth();
    let required = 2.0 * config.thickness;

    if depth < required {
        tracing::debug!(depth, required, "wall too thin for double posts");
        let placeholder = ConstructionElement::cuboid(
            ids.next_id(),
            config.material.clone(),
            Vec3::zeros(),
            area.size,
            area.placement(),
        )
        .with_tags([Tag::Post, Tag::Placeholder]);
        let error = Diagnostic::new(
            Issue::DoublePostWallTooThin {
                required,
                available: depth,
            },
            &[&placeholder],
        );
        return vec![
            ConstructionResult::Element(placeholder),
            ConstructionResult::Error(error),
        ];
    }

    let size = Vec3::new(config.width, config.thickness, area.height());
    let first = post_element(ids, area, &config.material, Vec3::zeros(), size);
    let second = post_element(
        ids,
        area,
        &config.material,
        Vec3::new(0.0, depth - config.thickness, 0.0),
        size,
    );
    let warning = check_cross_section(
        materials,
        &config.material,
        config.width,
        config.thickness,
        &[&first, &second],
    );

    let mut results = vec![
        ConstructionResult::Element(first),
        ConstructionResult::Element(second),
    ];

    // Posts meeting exactly in the middle need no infill.
    if depth > required {
        let infill_size = Vec3::new(config.width, depth - required, area.height());
        let infill = ConstructionElement::cuboid(
            ids.next_id(),
            config.infill_material.clone(),
            Vec3::new(0.0, config.thickness, 0.0),
            infill_size,
            area.placement(),
        )
        .with_tags([Tag::Infill])
        .with_part(PartInfo::new(PartKind::Infill, infill_size));
        results.push(ConstructionResult::Element(infill));
    }

    results.extend(warning);
    results
}

fn post_element(
    ids: &mut IdSequence,
    area: &WallConstructionArea,
    material: &MaterialId,
    offset: Vec3,
    size: Vec3,
) -> ConstructionElement {
    ConstructionElement::cuboid(ids.next_id(), material.clone(), offset, size, area.placement())
        .with_tags([Tag::Post])
        .with_part(PartInfo::new(PartKind::Post, size))
}

/// Warn when `(width, thickness)` is not a stocked cross-section of a
/// dimensional material. Other material types are not checked.
fn check_cross_section(
    materials: &dyn MaterialLookup,
    material_id: &MaterialId,
    width: f64,
    thickness: f64,
    posts: &[&ConstructionElement],
) -> Option<ConstructionResult> {
    let Some(dimensional) = materials
        .resolve(material_id)
        .and_then(|m| m.as_dimensional())
    else {
        tracing::debug!(
            material = %material_id,
            "post material not dimensional, skipping cross-section check"
        );
        return None;
    };

    if dimensional.has_cross_section(width, thickness) {
        return None;
    }

    let issue = Issue::PostCrossSectionMismatch {
        material: material_id.clone(),
        width,
        thickness,
        available: dimensional.cross_sections.clone(),
    };
    Some(ConstructionResult::Warning(
        Diagnostic::new(issue, posts).with_group_key(format!("post-cross-section:{material_id}")),
    ))
}
