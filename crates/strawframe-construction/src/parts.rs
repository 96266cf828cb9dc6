//! Parts list: counts of identical parts across emitted elements.

use serde::Serialize;
use std::collections::BTreeMap;
use strawframe_materials::MaterialId;
use strawframe_math::Vec3;

use crate::element::{ConstructionElement, PartKind};

/// Sizes are grouped at 0.1 mm resolution.
const SIZE_RESOLUTION: f64 = 10.0;

/// One line of the parts list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartEntry {
    /// Material of the parts.
    pub material: MaterialId,
    /// Kind of part.
    pub kind: PartKind,
    /// Nominal size, rounded to the grouping resolution.
    pub size: Vec3,
    /// Number of identical parts.
    pub count: usize,
    /// Combined volume in cubic metres.
    pub volume_m3: f64,
}

/// Identical parts grouped by material, kind and size.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PartsList {
    /// Entries ordered by material, kind, then size.
    pub entries: Vec<PartEntry>,
}

impl PartsList {
    /// Group every element that carries part metadata.
    pub fn from_elements<'a>(elements: impl IntoIterator<Item = &'a ConstructionElement>) -> Self {
        let mut groups: BTreeMap<(MaterialId, PartKind, [i64; 3]), usize> = BTreeMap::new();
        for element in elements {
            let Some(part) = element.part() else {
                continue;
            };
            let key = [part.size.x, part.size.y, part.size.z]
                .map(|v| (v * SIZE_RESOLUTION).round() as i64);
            *groups
                .entry((element.material().clone(), part.kind, key))
                .or_default() += 1;
        }

        let entries = groups
            .into_iter()
            .map(|((material, kind, key), count)| {
                let [x, y, z] = key.map(|v| v as f64 / SIZE_RESOLUTION);
                PartEntry {
                    material,
                    kind,
                    size: Vec3::new(x, y, z),
                    count,
                    volume_m3: x * y * z * 1e-9 * count as f64,
                }
            })
            .collect();
        Self { entries }
    }

    /// Total number of parts.
    pub fn total_count(&self) -> usize {
        self.entries.iter().map(|e| e.count).sum()
    }
}
