//! Construction of the periodic index tables
use super::{DomainBox, PeriodicDirections};
use crate::{
    reference_cell::ReferenceCellType,
    search::EntitySearch,
    traits::{Entity, Geometry, GridView, IndexSet, Intersection},
    types::{float_eq, scalar, GridError, GridResult},
};
use itertools::izip;
use log::debug;
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};

/// The periodic neighbour of one facet of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeriodicNeighbor {
    /// The facet is an interior facet or lies on a boundary that is not periodic
    NonPeriodic,
    /// The facet is identified with a facet of the cell on the opposite side of the domain
    Periodic {
        /// The type of the opposite cell
        outside_type: ReferenceCellType,
        /// The raw index of the opposite cell
        outside_index: usize,
        /// The local index of the matching facet in the opposite cell
        index_in_outside: usize,
    },
}

// Tables of a single codimension
#[derive(Debug, Default)]
struct CodimTables {
    codim: usize,
    entity_count: usize,
    type_counts: HashMap<ReferenceCellType, usize>,
    new_indices: HashMap<ReferenceCellType, Vec<usize>>,
    entities_to_skip: HashMap<ReferenceCellType, HashSet<usize>>,
    intersection_maps: HashMap<(ReferenceCellType, usize), Vec<PeriodicNeighbor>>,
}

impl CodimTables {
    fn new(codim: usize) -> Self {
        Self {
            codim,
            ..Default::default()
        }
    }

    fn set_new_index(
        &mut self,
        entity_type: ReferenceCellType,
        raw_index: usize,
        new_index: usize,
    ) -> GridResult<()> {
        let slot = self
            .new_indices
            .get_mut(&entity_type)
            .and_then(|n| n.get_mut(raw_index))
            .ok_or_else(|| {
                GridError::InvalidState(format!(
                    "Raw index {raw_index} of {entity_type:?} is out of range"
                ))
            })?;
        *slot = new_index;
        Ok(())
    }
}

/// Index tables of a periodic view
///
/// For every entity type of the wrapped grid, `new_indices` maps the raw index of each entity to
/// its index in the periodic view. Entities that are periodic images of each other share an index.
/// Cells keep their raw indices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PeriodicTables {
    entity_counts: Vec<usize>,
    type_counts: HashMap<ReferenceCellType, usize>,
    new_indices: HashMap<ReferenceCellType, Vec<usize>>,
    entities_to_skip: HashMap<ReferenceCellType, HashSet<usize>>,
    intersection_maps: HashMap<(ReferenceCellType, usize), Vec<PeriodicNeighbor>>,
}

impl PeriodicTables {
    /// Build the tables of every codimension of a grid
    pub(crate) fn build<G: GridView + Sync>(
        grid: &G,
        directions: &PeriodicDirections,
        domain: &DomainBox<G::T>,
    ) -> GridResult<Self> {
        let codim_tables = (0..=grid.dim())
            .into_par_iter()
            .map(|codim| {
                if codim == 0 {
                    build_cell_tables(grid, directions, domain)
                } else {
                    build_sub_entity_tables(grid, codim, directions, domain)
                }
            })
            .collect::<GridResult<Vec<_>>>()?;

        let mut tables = Self {
            entity_counts: vec![0; grid.dim() + 1],
            ..Default::default()
        };
        for t in codim_tables {
            tables.entity_counts[t.codim] = t.entity_count;
            tables.type_counts.extend(t.type_counts);
            tables.new_indices.extend(t.new_indices);
            tables.entities_to_skip.extend(t.entities_to_skip);
            tables.intersection_maps.extend(t.intersection_maps);
        }
        Ok(tables)
    }

    /// Number of entities of a codimension after periodic identification
    pub fn entity_count(&self, codim: usize) -> usize {
        self.entity_counts.get(codim).copied().unwrap_or(0)
    }

    /// Number of entities of a type after periodic identification
    pub fn type_count(&self, entity_type: ReferenceCellType) -> usize {
        self.type_counts.get(&entity_type).copied().unwrap_or(0)
    }

    /// The periodic index of an entity of a codimension greater than 0
    pub fn new_index(&self, entity_type: ReferenceCellType, raw_index: usize) -> Option<usize> {
        self.new_indices.get(&entity_type)?.get(raw_index).copied()
    }

    /// Is the entity a periodic duplicate of an entity on the lower boundary?
    pub fn is_skipped(&self, entity_type: ReferenceCellType, raw_index: usize) -> bool {
        self.entities_to_skip
            .get(&entity_type)
            .is_some_and(|s| s.contains(&raw_index))
    }

    /// The periodic neighbours of the facets of a cell
    ///
    /// Returns `None` for cells that have no boundary facets.
    pub fn neighbors(
        &self,
        cell_type: ReferenceCellType,
        cell_index: usize,
    ) -> Option<&[PeriodicNeighbor]> {
        self.intersection_maps
            .get(&(cell_type, cell_index))
            .map(|n| n.as_slice())
    }
}

/// Find the boundary facet of a cell whose center differs from a point in exactly one coordinate
pub(crate) fn find_matching_face<'a, G: GridView>(
    grid: &'a G,
    cell: &G::Entity<'a>,
    center: &[G::T],
) -> Option<usize> {
    grid.intersection_iter(cell)
        .filter(|i| i.boundary())
        .find(|i| {
            let other = i.geometry().center();
            izip!(&other, center)
                .filter(|(a, b)| !float_eq(**a, **b))
                .count()
                == 1
        })
        .map(|i| i.index_in_inside())
}

fn build_cell_tables<G: GridView>(
    grid: &G,
    directions: &PeriodicDirections,
    domain: &DomainBox<G::T>,
) -> GridResult<CodimTables> {
    let mut tables = CodimTables::new(0);
    for t in grid.types(0) {
        tables.type_counts.insert(*t, grid.size_of_type(*t));
    }
    tables.entity_count = grid.size(0);

    let index_set = grid.index_set();
    let nudge = scalar::<G::T, _>(0.01)?;
    let mut pending = vec![];
    let mut points = vec![];
    for cell in grid.entity_iter(0) {
        if !cell.has_boundary_intersections() {
            continue;
        }
        let cell_center = cell.geometry().center();
        let key = (cell.entity_type(), index_set.index(&cell));
        tables.intersection_maps.insert(
            key,
            vec![PeriodicNeighbor::NonPeriodic; cell.sub_entity_count(1)],
        );
        for intersection in grid.intersection_iter(&cell) {
            if !intersection.boundary() {
                continue;
            }
            let center = intersection.geometry().center();
            let mut point = center.clone();
            let mut bounds = 0;
            // Move the point slightly into the cell on the other side so that point location
            // does not land on a cell that only touches the boundary
            for axis in directions.axes() {
                let (ll, ur) = (domain.lower_left()[axis], domain.upper_right()[axis]);
                if float_eq(center[axis], ll) {
                    point[axis] = ur - nudge * (cell_center[axis] - ll);
                    bounds += 1;
                } else if float_eq(center[axis], ur) {
                    point[axis] = ll + nudge * (ur - cell_center[axis]);
                    bounds += 1;
                }
            }
            match bounds {
                0 => {}
                1 => {
                    pending.push((key, intersection.index_in_inside(), center));
                    points.push(point);
                }
                _ => {
                    return Err(GridError::InvalidState(format!(
                        "Intersection {} of cell {} lies on {bounds} periodic boundaries",
                        intersection.index_in_inside(),
                        key.1
                    )));
                }
            }
        }
    }

    let search = EntitySearch::new(grid, 0);
    for ((key, index_in_inside, center), found) in izip!(pending, search.search(&points)) {
        let outside = found.ok_or_else(|| {
            GridError::InvalidState(format!(
                "Could not find periodic neighbor cell of intersection {index_in_inside} of cell {}",
                key.1
            ))
        })?;
        let index_in_outside = find_matching_face(grid, &outside, &center).ok_or_else(|| {
            GridError::InvalidState(format!(
                "Could not find outside intersection of intersection {index_in_inside} of cell {}",
                key.1
            ))
        })?;
        if let Some(slot) = tables
            .intersection_maps
            .get_mut(&key)
            .and_then(|n| n.get_mut(index_in_inside))
        {
            *slot = PeriodicNeighbor::Periodic {
                outside_type: outside.entity_type(),
                outside_index: index_set.index(&outside),
                index_in_outside,
            };
        }
    }
    debug!(
        "Codimension 0: {} cells have periodic neighbors",
        tables
            .intersection_maps
            .values()
            .filter(|n| n.iter().any(|i| *i != PeriodicNeighbor::NonPeriodic))
            .count()
    );
    Ok(tables)
}

fn build_sub_entity_tables<G: GridView>(
    grid: &G,
    codim: usize,
    directions: &PeriodicDirections,
    domain: &DomainBox<G::T>,
) -> GridResult<CodimTables> {
    let mut tables = CodimTables::new(codim);
    for t in grid.types(codim) {
        tables.new_indices.insert(*t, vec![0; grid.size_of_type(*t)]);
        tables.type_counts.insert(*t, 0);
    }

    let index_set = grid.index_set();
    let mut visited = HashSet::new();
    let mut pending = vec![];
    let mut points = vec![];
    for cell in grid.entity_iter(0) {
        for i in 0..cell.sub_entity_count(codim) {
            let entity = cell.sub_entity(codim, i);
            let entity_type = entity.entity_type();
            let raw_index = index_set.sub_index(&cell, i, codim);
            if !visited.insert((entity_type, raw_index)) {
                continue;
            }
            let mut point = entity.geometry().center();
            let mut upper_bounds = 0;
            for axis in directions.axes() {
                if float_eq(point[axis], domain.upper_right()[axis]) {
                    point[axis] = domain.lower_left()[axis];
                    upper_bounds += 1;
                }
            }
            if upper_bounds == 0 {
                let count = tables.type_counts.entry(entity_type).or_insert(0);
                let new_index = *count;
                *count += 1;
                tables.set_new_index(entity_type, raw_index, new_index)?;
            } else {
                tables
                    .entities_to_skip
                    .entry(entity_type)
                    .or_default()
                    .insert(raw_index);
                pending.push((entity_type, raw_index));
                points.push(point);
            }
        }
    }
    tables.entity_count = tables.type_counts.values().sum();

    let search = EntitySearch::new(grid, codim);
    for ((entity_type, raw_index), point, found) in izip!(pending, &points, search.search(&points))
    {
        let found = found.ok_or_else(|| {
            GridError::InvalidState(format!(
                "Could not find periodic neighbor entity of codimension {codim} at {point:?}"
            ))
        })?;
        let found_type = found.entity_type();
        let found_index = index_set.index(&found);
        let new_index = tables
            .new_indices
            .get(&found_type)
            .and_then(|n| n.get(found_index))
            .copied()
            .ok_or_else(|| {
                GridError::InvalidState(format!(
                    "Raw index {found_index} of {found_type:?} is out of range"
                ))
            })?;
        tables.set_new_index(entity_type, raw_index, new_index)?;
    }
    debug!(
        "Codimension {codim}: {} entities identified to {}",
        visited.len(),
        tables.entity_count
    );
    Ok(tables)
}
