//! Topology for grids where entities of each tdim are the same type

use crate::{
    reference_cell::{self, ReferenceCellType},
    types::{GridError, GridResult},
};
use itertools::izip;
use std::collections::HashMap;

/// Topology of a grid with a single cell type
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SingleTypeTopology {
    dim: usize,
    pub(crate) ids: Vec<Option<Vec<usize>>>,
    entity_types: Vec<ReferenceCellType>,
    entity_counts: Vec<usize>,
    /// `downward_connectivity[d0][d1][i]` are the sub-entities of dimension d1 of the entity i
    /// of dimension d0, in reference order
    pub(crate) downward_connectivity: Vec<Vec<Vec<Vec<usize>>>>,
    /// `upward_connectivity[d0][d1 - d0 - 1][i]` are the entities of dimension d1 that contain
    /// the entity i of dimension d0
    pub(crate) upward_connectivity: Vec<Vec<Vec<Vec<usize>>>>,
    /// `entity_cells[d][i]` is a cell containing the entity i of dimension d and the local
    /// index of the entity in that cell
    pub(crate) entity_cells: Vec<Vec<(usize, usize)>>,
}

impl SingleTypeTopology {
    /// Create a topology
    ///
    /// The vertices of the cells must be numbered consecutively from 0.
    pub fn new(
        cells: &[usize],
        cell_type: ReferenceCellType,
        vertex_ids: Option<Vec<usize>>,
        cell_ids: Option<Vec<usize>>,
    ) -> GridResult<Self> {
        let size = reference_cell::entity_counts(cell_type)[0];
        if cells.is_empty() || cells.len() % size != 0 {
            return Err(GridError::InvalidConfiguration(format!(
                "{} vertex indices do not describe a list of cells of type {cell_type:?}",
                cells.len()
            )));
        }
        let ncells = cells.len() / size;
        let dim = reference_cell::dim(cell_type);
        let ref_conn = reference_cell::connectivity(cell_type);
        let etypes = reference_cell::entity_types(cell_type);

        let entity_types = etypes
            .iter()
            .take(dim + 1)
            .map(|t| t[0])
            .collect::<Vec<_>>();

        let nvertices = cells.iter().max().map_or(0, |m| m + 1);

        // entity_maps[d] maps the sorted vertices of an entity of dimension d to its index
        let mut entity_maps = vec![HashMap::<Vec<usize>, usize>::new(); dim + 1];
        let mut downward_connectivity = (0..dim + 1)
            .map(|d| vec![vec![]; d + 1])
            .collect::<Vec<Vec<Vec<Vec<usize>>>>>();
        let mut entity_cells = vec![vec![]; dim + 1];
        entity_cells[0] = vec![(0, 0); nvertices];
        let mut seen_vertex = vec![false; nvertices];

        for cell_index in 0..ncells {
            let cell = &cells[cell_index * size..(cell_index + 1) * size];
            // cell_entities[d] are the indices of the sub-entities of dimension d of this cell
            let mut cell_entities = vec![cell.to_vec()];
            for (v_local, v) in cell.iter().enumerate() {
                if !seen_vertex[*v] {
                    seen_vertex[*v] = true;
                    entity_cells[0][*v] = (cell_index, v_local);
                }
            }
            for d in 1..dim + 1 {
                let mut entities_d = Vec::with_capacity(ref_conn[d].len());
                for (local_index, rc) in ref_conn[d].iter().enumerate() {
                    let vertices = rc[0].iter().map(|v| cell[*v]).collect::<Vec<_>>();
                    let mut key = vertices.clone();
                    key.sort();
                    let next = entity_maps[d].len();
                    let index = *entity_maps[d].entry(key).or_insert(next);
                    if index == next {
                        // New entity: its sub-entities are read off this cell
                        let mut down = vec![vertices];
                        for sd in 1..d {
                            down.push(rc[sd].iter().map(|l| cell_entities[sd][*l]).collect());
                        }
                        down.push(vec![index]);
                        for (dc, sub) in izip!(downward_connectivity[d].iter_mut(), down) {
                            dc.push(sub);
                        }
                        entity_cells[d].push((cell_index, local_index));
                    }
                    entities_d.push(index);
                }
                cell_entities.push(entities_d);
            }
        }
        downward_connectivity[0][0] = (0..nvertices).map(|v| vec![v]).collect();

        let mut entity_counts = vec![nvertices];
        for d in 1..dim + 1 {
            entity_counts.push(entity_maps[d].len());
        }
        if dim > 0 && entity_counts[dim] != ncells {
            return Err(GridError::InvalidConfiguration(
                "Two cells have the same vertices".to_string(),
            ));
        }
        if seen_vertex.iter().any(|s| !s) {
            return Err(GridError::InvalidConfiguration(
                "Vertices are not numbered consecutively".to_string(),
            ));
        }

        let mut upward_connectivity = (0..dim)
            .map(|d0| vec![vec![vec![]; entity_counts[d0]]; dim - d0])
            .collect::<Vec<Vec<Vec<Vec<usize>>>>>();
        for d1 in 1..dim + 1 {
            for (e1, down) in downward_connectivity[d1][0].iter().enumerate() {
                for v in down {
                    upward_connectivity[0][d1 - 1][*v].push(e1);
                }
            }
            for d0 in 1..d1 {
                for (e1, down) in downward_connectivity[d1][d0].iter().enumerate() {
                    for e0 in down {
                        upward_connectivity[d0][d1 - d0 - 1][*e0].push(e1);
                    }
                }
            }
        }

        let mut ids = vec![vertex_ids];
        for _ in 1..dim {
            ids.push(None);
        }
        if dim > 0 {
            ids.push(cell_ids);
        }
        Ok(Self {
            dim,
            ids,
            entity_types,
            entity_counts,
            downward_connectivity,
            upward_connectivity,
            entity_cells,
        })
    }
    /// Topological dimension
    pub fn dim(&self) -> usize {
        self.dim
    }
    /// Entity types
    pub fn entity_types(&self) -> &[ReferenceCellType] {
        &self.entity_types
    }
    /// Entity counts
    pub fn entity_counts(&self) -> &[usize] {
        &self.entity_counts
    }
    /// Entity count
    pub fn entity_count(&self, entity_type: ReferenceCellType) -> usize {
        if !self.entity_types.contains(&entity_type) {
            0
        } else {
            self.entity_counts[reference_cell::dim(entity_type)]
        }
    }
    /// Downward connectivity
    pub fn downward_connectivity(&self) -> &[Vec<Vec<Vec<usize>>>] {
        &self.downward_connectivity
    }
    /// Upward connectivity
    pub fn upward_connectivity(&self) -> &[Vec<Vec<Vec<usize>>>] {
        &self.upward_connectivity
    }
    /// Cell sub-entity index
    pub fn cell_entity_index(
        &self,
        cell_index: usize,
        entity_dim: usize,
        entity_index: usize,
    ) -> usize {
        self.downward_connectivity[self.dim][entity_dim][cell_index][entity_index]
    }
    /// The vertices of an entity
    pub fn entity_vertices(&self, entity_dim: usize, entity_index: usize) -> &[usize] {
        &self.downward_connectivity[entity_dim][0][entity_index]
    }
    /// The cells that contain a facet
    pub fn facet_cells(&self, facet_index: usize) -> &[usize] {
        &self.upward_connectivity[self.dim - 1][0][facet_index]
    }
    /// Entity id
    pub fn entity_id(&self, entity_dim: usize, entity_index: usize) -> Option<usize> {
        self.ids[entity_dim].as_ref().map(|a| a[entity_index])
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn example_topology_interval() -> SingleTypeTopology {
        //! An example topology
        SingleTypeTopology::new(&[0, 1, 1, 2], ReferenceCellType::Interval, None, None).unwrap()
    }

    fn example_topology_triangle() -> SingleTypeTopology {
        //! An example topology
        SingleTypeTopology::new(&[0, 1, 2, 2, 1, 3], ReferenceCellType::Triangle, None, None)
            .unwrap()
    }

    fn example_topology_quadrilateral() -> SingleTypeTopology {
        //! An example topology
        SingleTypeTopology::new(
            &[0, 1, 3, 4, 1, 2, 4, 5],
            ReferenceCellType::Quadrilateral,
            None,
            None,
        )
        .unwrap()
    }

    fn example_topology_tetrahedron() -> SingleTypeTopology {
        //! An example topology
        SingleTypeTopology::new(
            &[0, 1, 2, 3, 4, 0, 2, 3],
            ReferenceCellType::Tetrahedron,
            None,
            None,
        )
        .unwrap()
    }

    fn example_topology_hexahedron() -> SingleTypeTopology {
        //! An example topology
        SingleTypeTopology::new(
            &[0, 1, 2, 3, 4, 5, 6, 7, 4, 5, 6, 7, 8, 9, 10, 11],
            ReferenceCellType::Hexahedron,
            None,
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_empty() {
        assert!(SingleTypeTopology::new(&[], ReferenceCellType::Triangle, None, None).is_err());
    }

    #[test]
    fn test_gap_in_vertex_numbering() {
        assert!(
            SingleTypeTopology::new(&[0, 1, 3], ReferenceCellType::Triangle, None, None).is_err()
        );
    }

    #[test]
    fn test_sub_entities_interval() {
        //! Test sub-entities of an interval
        let t = example_topology_interval();
        assert_eq!(t.entity_counts(), &[3, 2]);
        assert_eq!(t.cell_entity_index(0, 0, 0), 0);
        assert_eq!(t.cell_entity_index(0, 0, 1), 1);
        assert_eq!(t.cell_entity_index(1, 0, 0), 1);
        assert_eq!(t.cell_entity_index(1, 0, 1), 2);
        assert_eq!(t.facet_cells(1), &[0, 1]);
        assert_eq!(t.facet_cells(2), &[1]);
    }

    #[test]
    fn test_sub_entities_triangle() {
        //! Test sub-entities of a triangle
        let t = example_topology_triangle();
        assert_eq!(t.entity_counts(), &[4, 5, 2]);
        assert_eq!(t.cell_entity_index(0, 1, 0), 0);
        assert_eq!(t.cell_entity_index(0, 1, 1), 1);
        assert_eq!(t.cell_entity_index(0, 1, 2), 2);
        assert_eq!(t.cell_entity_index(1, 1, 0), 3);
        assert_eq!(t.cell_entity_index(1, 1, 1), 4);
        assert_eq!(t.cell_entity_index(1, 1, 2), 0);
        assert_eq!(t.entity_vertices(1, 0), &[1, 2]);
        assert_eq!(t.entity_vertices(1, 3), &[1, 3]);
        assert_eq!(t.entity_vertices(1, 4), &[2, 3]);
        assert_eq!(t.facet_cells(0), &[0, 1]);
        assert_eq!(t.facet_cells(1), &[0]);
    }

    #[test]
    fn test_sub_entities_tetrahedron() {
        //! Test sub-entities of a tetrahedron
        let t = example_topology_tetrahedron();
        assert_eq!(t.entity_counts(), &[5, 9, 7, 2]);
        // Face [0, 2, 3] is shared
        let shared = t.cell_entity_index(0, 2, 1);
        assert_eq!(t.cell_entity_index(1, 2, 0), shared);
        assert_eq!(t.facet_cells(shared), &[0, 1]);
    }

    macro_rules! make_tests {
        ($cellname:ident) => {
            paste::item! {
                #[test]
                fn [< test_up_and_down_ $cellname >]() {
                    //! Test that upward and downward connectivities agree
                    let t = [< example_topology_ $cellname >]();

                    for (i, dc_i) in t.downward_connectivity.iter().enumerate() {
                        for (j, dc_ij) in dc_i.iter().enumerate() {
                            if i != j {
                                let uc_ji = &t.upward_connectivity[j][i - j - 1];
                                for (c, col) in dc_ij.iter().enumerate() {
                                    for value in col {
                                        assert!(uc_ji[*value].contains(&c));
                                    }
                                }
                                for (k, uc_jik) in uc_ji.iter().enumerate() {
                                    for value in uc_jik {
                                        assert!(dc_ij[*value].contains(&k));
                                    }
                                }
                            }
                        }
                    }
                }
                #[test]
                fn [< test_entity_cells_ $cellname >]() {
                    //! Test that each entity is found in the cell recorded for it
                    let t = [< example_topology_ $cellname >]();
                    for (d, cells_d) in t.entity_cells.iter().enumerate() {
                        assert_eq!(cells_d.len(), t.entity_counts()[d]);
                        for (i, (cell, local)) in cells_d.iter().enumerate() {
                            assert_eq!(t.cell_entity_index(*cell, d, *local), i);
                        }
                    }
                }
            }
        };
    }

    make_tests!(interval);
    make_tests!(triangle);
    make_tests!(quadrilateral);
    make_tests!(tetrahedron);
    make_tests!(hexahedron);
}
