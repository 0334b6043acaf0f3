//! Grid builder

use super::SingleTypeGrid;
use crate::{
    reference_cell::{self, ReferenceCellType},
    traits::Builder,
    types::{GridError, GridResult, RealScalar},
};
use log::warn;
use std::collections::{HashMap, HashSet};

/// Grid builder for a single type grid
#[derive(Debug)]
pub struct SingleTypeGridBuilder<T: RealScalar> {
    gdim: usize,
    cell_type: ReferenceCellType,
    points_per_cell: usize,
    points: Vec<T>,
    cells: Vec<usize>,
    point_indices_to_ids: Vec<usize>,
    point_ids_to_indices: HashMap<usize, usize>,
    cell_indices_to_ids: Vec<usize>,
    cell_ids_to_indices: HashMap<usize, usize>,
}

impl<T: RealScalar> SingleTypeGridBuilder<T> {
    /// Create a new grid builder
    pub fn new(gdim: usize, cell_type: ReferenceCellType) -> Self {
        Self::new_with_capacity(gdim, 0, 0, cell_type)
    }

    /// Create a new grid builder with capacity for a given number of points and cells
    pub fn new_with_capacity(
        gdim: usize,
        npoints: usize,
        ncells: usize,
        cell_type: ReferenceCellType,
    ) -> Self {
        if cell_type == ReferenceCellType::Point {
            warn!("Grids of {cell_type:?} cells have no intersections");
        }
        let points_per_cell = reference_cell::entity_counts(cell_type)[0];
        Self {
            gdim,
            cell_type,
            points_per_cell,
            points: Vec::with_capacity(npoints * gdim),
            cells: Vec::with_capacity(ncells * points_per_cell),
            point_indices_to_ids: Vec::with_capacity(npoints),
            point_ids_to_indices: HashMap::new(),
            cell_indices_to_ids: Vec::with_capacity(ncells),
            cell_ids_to_indices: HashMap::new(),
        }
    }
}

impl<T: RealScalar> Builder for SingleTypeGridBuilder<T> {
    type Grid = SingleTypeGrid<T>;
    type T = T;
    type CellData<'a> = &'a [usize];

    fn add_point(&mut self, id: usize, data: &[T]) -> GridResult<()> {
        if data.len() != self.gdim {
            return Err(GridError::InvalidConfiguration(format!(
                "Point has {} coordinates, expected {}",
                data.len(),
                self.gdim
            )));
        }
        if self.point_ids_to_indices.contains_key(&id) {
            return Err(GridError::InvalidConfiguration(format!(
                "Cannot add point with duplicate id {id}"
            )));
        }
        self.point_ids_to_indices
            .insert(id, self.point_indices_to_ids.len());
        self.point_indices_to_ids.push(id);
        self.points.extend_from_slice(data);
        Ok(())
    }

    fn add_cell(&mut self, id: usize, cell_data: &[usize]) -> GridResult<()> {
        if self.cell_ids_to_indices.contains_key(&id) {
            return Err(GridError::InvalidConfiguration(format!(
                "Cannot add cell with duplicate id {id}"
            )));
        }
        if cell_data.len() != self.points_per_cell {
            return Err(GridError::InvalidConfiguration(format!(
                "Cell has {} points, a {:?} has {}",
                cell_data.len(),
                self.cell_type,
                self.points_per_cell
            )));
        }
        let indices = cell_data
            .iter()
            .map(|p| {
                self.point_ids_to_indices.get(p).copied().ok_or_else(|| {
                    GridError::InvalidConfiguration(format!("Unknown point id {p}"))
                })
            })
            .collect::<GridResult<Vec<_>>>()?;
        self.cell_ids_to_indices
            .insert(id, self.cell_indices_to_ids.len());
        self.cell_indices_to_ids.push(id);
        self.cells.extend(indices);
        Ok(())
    }

    fn point_count(&self) -> usize {
        self.point_indices_to_ids.len()
    }

    fn cell_count(&self) -> usize {
        self.cell_indices_to_ids.len()
    }

    fn create_grid(&self) -> GridResult<SingleTypeGrid<T>> {
        // Points that are vertices of a cell, sorted by id so that the numbering is reproducible
        let mut vertex_ids = self
            .cells
            .iter()
            .map(|i| self.point_indices_to_ids[*i])
            .collect::<HashSet<_>>()
            .into_iter()
            .collect::<Vec<_>>();
        vertex_ids.sort();

        if vertex_ids.len() < self.point_count() {
            warn!(
                "{} points are not vertices of any cell and are dropped",
                self.point_count() - vertex_ids.len()
            );
        }

        let vertex_ids_to_pos = vertex_ids
            .iter()
            .enumerate()
            .map(|(i, id)| (*id, i))
            .collect::<HashMap<_, _>>();

        let mut points = Vec::with_capacity(vertex_ids.len() * self.gdim);
        for id in &vertex_ids {
            let i = self.point_ids_to_indices[id];
            points.extend_from_slice(&self.points[i * self.gdim..(i + 1) * self.gdim]);
        }
        let cells = self
            .cells
            .iter()
            .map(|i| vertex_ids_to_pos[&self.point_indices_to_ids[*i]])
            .collect::<Vec<_>>();

        SingleTypeGrid::new(
            self.gdim,
            points,
            &cells,
            self.cell_type,
            Some(vertex_ids),
            Some(self.cell_indices_to_ids.clone()),
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::traits::{Entity, GridView};

    #[test]
    fn test_duplicate_point_id() {
        let mut b = SingleTypeGridBuilder::<f64>::new(3, ReferenceCellType::Triangle);

        b.add_point(2, &[0.0, 0.0, 0.0]).unwrap();
        b.add_point(0, &[1.0, 0.0, 0.0]).unwrap();
        b.add_point(1, &[0.0, 1.0, 0.0]).unwrap();
        assert!(b.add_point(2, &[1.0, 1.0, 0.0]).is_err());
    }

    #[test]
    fn test_duplicate_cell_id() {
        let mut b = SingleTypeGridBuilder::<f64>::new(3, ReferenceCellType::Triangle);

        b.add_point(0, &[0.0, 0.0, 0.0]).unwrap();
        b.add_point(1, &[1.0, 0.0, 0.0]).unwrap();
        b.add_point(2, &[0.0, 1.0, 0.0]).unwrap();
        b.add_point(3, &[1.0, 1.0, 0.0]).unwrap();

        b.add_cell(0, &[0, 1, 2]).unwrap();
        assert!(b.add_cell(0, &[1, 2, 3]).is_err());
    }

    #[test]
    fn test_wrong_point_dimension() {
        let mut b = SingleTypeGridBuilder::<f64>::new(3, ReferenceCellType::Triangle);
        assert!(b.add_point(0, &[0.0, 0.0]).is_err());
    }

    #[test]
    fn test_unknown_point() {
        let mut b = SingleTypeGridBuilder::<f64>::new(2, ReferenceCellType::Triangle);
        b.add_point(0, &[0.0, 0.0]).unwrap();
        b.add_point(1, &[1.0, 0.0]).unwrap();
        assert!(b.add_cell(0, &[0, 1, 7]).is_err());
        assert_eq!(b.cell_count(), 0);
    }

    #[test]
    fn test_non_contiguous_ids() {
        let mut b = SingleTypeGridBuilder::<f64>::new(3, ReferenceCellType::Triangle);

        b.add_point(0, &[0.0, 0.0, 0.0]).unwrap();
        b.add_point(1, &[1.0, 0.0, 0.0]).unwrap();
        b.add_point(2, &[0.0, 1.0, 0.0]).unwrap();
        b.add_point(4, &[1.0, 1.0, 0.0]).unwrap();
        b.add_point(9, &[5.0, 5.0, 0.0]).unwrap();

        b.add_cell(0, &[0, 1, 2]).unwrap();
        b.add_cell(2, &[1, 2, 4]).unwrap();

        let g = b.create_grid().unwrap();
        assert_eq!(g.size(2), 4);
        assert_eq!(g.size(0), 2);
        let cell = g.entity_from_id(2, 2).unwrap();
        assert_eq!(cell.id(), Some(2));
        let vertex = g.entity_from_id(0, 4).unwrap();
        assert_eq!(g.point(vertex.local_index()), &[1.0, 1.0, 0.0]);
        assert!(g.entity_from_id(0, 9).is_none());
    }
}
