//! Conversion from the types in [`super::schema`] to those used by the geometry passes.

use alloc::string::String;
use alloc::vec::Vec;

use arcstr::ArcStr;
use arrayvec::ArrayVec;

use super::DescriptionError;
use super::schema::{
    BoxSer, CenteringSer, HierarchySer, PatchV1Ser, QuantityKindSer, QuantityV1Ser,
};
use crate::hierarchy::{Centering, Hierarchy, Patch, Quantity};
use crate::math::{FreeCoordinate, FreePoint, GridSizeCoord, IndexBox, NotNan};
use crate::yee::YeeQuantity;

/// A quantity to be added to every patch.
struct QuantityTemplate<const D: usize> {
    name: ArcStr,
    quantity: Quantity<D>,
    ghost_width: GridSizeCoord,
}

pub(super) fn build<const D: usize>(
    description: &HierarchySer,
) -> Result<Hierarchy<D>, DescriptionError> {
    let HierarchySer::HierarchyV1 {
        domain,
        refinement_ratio,
        cell_width,
        ghost_width,
        quantities,
        levels,
    } = description;

    let domain = index_box::<D>(domain, "domain")?;
    let cell_width = cell_width_array::<D>(cell_width.as_deref())?;
    let quantities = quantities
        .iter()
        .map(|q| quantity_template::<D>(q, *ghost_width))
        .collect::<Result<Vec<_>, _>>()?;

    let mut hierarchy = Hierarchy::new(domain, *refinement_ratio)?;
    let mut level_cell_width = cell_width;
    for (level_index, patch_descriptions) in levels.iter().enumerate() {
        let patches = patch_descriptions
            .iter()
            .enumerate()
            .map(|(patch_index, patch)| {
                build_patch(patch, level_index, patch_index, level_cell_width, &quantities)
            })
            .collect::<Result<Vec<_>, _>>()?;
        hierarchy.add_level(level_index, patches)?;
        level_cell_width = level_cell_width.map(|w| w / FreeCoordinate::from(*refinement_ratio));
    }

    log::debug!(
        "built {D}-dimensional hierarchy: {levels} levels, {quantities} quantities per patch",
        levels = levels.len(),
        quantities = quantities.len(),
    );
    Ok(hierarchy)
}

fn build_patch<const D: usize>(
    description: &PatchV1Ser,
    level_index: usize,
    patch_index: usize,
    cell_width: [FreeCoordinate; D],
    quantities: &[QuantityTemplate<D>],
) -> Result<Patch<D>, DescriptionError> {
    let name: String = match &description.name {
        Some(name) => name.clone(),
        None => format!("{level_index}#{patch_index}"),
    };
    let interior = index_box::<D>(&description.bounds, &format!("patch {name:?}"))?;

    let origin: FreePoint<D> = interior
        .lower()
        .into_iter()
        .zip(cell_width)
        .map(|(lower, width)| NotNan::new(FreeCoordinate::from(lower) * width).ok())
        .collect::<Option<ArrayVec<_, D>>>()
        .and_then(|origin| origin.into_inner().ok())
        .ok_or_else(|| DescriptionError::InvalidOrigin(name.clone()))?;

    let mut patch = Patch::new(name, origin, interior);
    for template in quantities {
        patch.add_quantity(template.name.clone(), template.quantity, template.ghost_width)?;
    }
    Ok(patch)
}

fn quantity_template<const D: usize>(
    description: &QuantityV1Ser,
    default_ghost_width: GridSizeCoord,
) -> Result<QuantityTemplate<D>, DescriptionError> {
    let QuantityV1Ser {
        name,
        kind,
        centering,
        yee,
        ghost_width,
    } = description;

    let quantity = match (kind, centering, yee) {
        (QuantityKindSer::Particle, _, _) => Quantity::Particle,
        (QuantityKindSer::Field, Some(_), Some(_)) => {
            return Err(DescriptionError::AmbiguousCentering(name.clone()));
        }
        (QuantityKindSer::Field, None, None) => {
            return Err(DescriptionError::MissingCentering(name.clone()));
        }
        (QuantityKindSer::Field, Some(centering), None) => Quantity::Field {
            centering: exact_length::<_, D>(centering, &format!("centering of {name:?}"))?.map(
                |c| match c {
                    CenteringSer::Primal => Centering::Primal,
                    CenteringSer::Dual => Centering::Dual,
                },
            ),
        },
        (QuantityKindSer::Field, None, Some(yee)) => yee
            .parse::<YeeQuantity>()
            .map_err(|source| DescriptionError::UnknownYeeQuantity {
                quantity: name.clone(),
                component: yee.clone(),
                source,
            })?
            .quantity::<D>(),
    };

    Ok(QuantityTemplate {
        name: ArcStr::from(name.as_str()),
        quantity,
        ghost_width: ghost_width.unwrap_or(default_ghost_width),
    })
}

fn index_box<const D: usize>(
    description: &BoxSer,
    what: &str,
) -> Result<IndexBox<D>, DescriptionError> {
    let lower = exact_length::<_, D>(&description.lower, &format!("lower bound of {what}"))?;
    let upper = exact_length::<_, D>(&description.upper, &format!("upper bound of {what}"))?;
    IndexBox::checked_from_lower_upper(lower, upper).map_err(|source| DescriptionError::BadBox {
        what: String::from(what),
        source,
    })
}

fn cell_width_array<const D: usize>(
    description: Option<&[FreeCoordinate]>,
) -> Result<[FreeCoordinate; D], DescriptionError> {
    let Some(widths) = description else {
        return Ok([1.0; D]);
    };
    let widths = exact_length::<_, D>(widths, "cell_width")?;
    if let Some(&bad) = widths.iter().find(|w| !(w.is_finite() && **w > 0.0)) {
        return Err(DescriptionError::InvalidCellWidth(bad));
    }
    Ok(widths)
}

fn exact_length<T: Copy, const D: usize>(
    components: &[T],
    what: &str,
) -> Result<[T; D], DescriptionError> {
    <[T; D]>::try_from(components).map_err(|_| DescriptionError::DimensionMismatch {
        what: String::from(what),
        expected: D,
        found: components.len(),
    })
}
