//! Cube grids

use crate::{
    grid::{SingleTypeGrid, SingleTypeGridBuilder},
    reference_cell::{self, ReferenceCellType},
    traits::Builder,
    types::{scalar, GridError, GridResult, RealScalar},
};
use itertools::{izip, Itertools};

/// Configuration of a structured grid of a box
///
/// If `level` is set it overrides `num_elements` with `2^level` elements in every direction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct CubeGridConfig {
    /// Lower left corner of the box
    pub lower_left: Vec<f64>,
    /// Upper right corner of the box
    pub upper_right: Vec<f64>,
    /// Number of elements in each direction
    pub num_elements: Vec<usize>,
    /// Refinement level
    pub level: Option<usize>,
    /// Cell type: a cube type for a cube grid or a simplex type for a simplex grid
    pub cell_type: ReferenceCellType,
}

impl Default for CubeGridConfig {
    fn default() -> Self {
        Self {
            lower_left: vec![0.0, 0.0],
            upper_right: vec![1.0, 1.0],
            num_elements: vec![1, 1],
            level: None,
            cell_type: ReferenceCellType::Quadrilateral,
        }
    }
}

impl CubeGridConfig {
    /// Configuration of a box with the same number of elements in each direction
    pub fn new(
        lower_left: &[f64],
        upper_right: &[f64],
        num_elements: usize,
        cell_type: ReferenceCellType,
    ) -> Self {
        Self {
            lower_left: lower_left.to_vec(),
            upper_right: upper_right.to_vec(),
            num_elements: vec![num_elements; lower_left.len()],
            level: None,
            cell_type,
        }
    }

    /// Load a configuration from a RON string
    #[cfg(feature = "serde")]
    pub fn from_ron_string(s: &str) -> GridResult<Self> {
        Ok(ron::from_str(s)?)
    }

    /// Number of elements in each direction after applying `level`
    pub fn elements_per_direction(&self) -> GridResult<Vec<usize>> {
        match self.level {
            Some(level) => u32::try_from(level)
                .ok()
                .and_then(|level| 1usize.checked_shl(level))
                .map(|n| vec![n; self.lower_left.len()])
                .ok_or_else(|| {
                    GridError::InvalidConfiguration(format!("Refinement level {level} is too large"))
                }),
            None => Ok(self.num_elements.clone()),
        }
    }

    /// Check that the configuration describes a grid
    pub fn validate(&self) -> GridResult<()> {
        let dim = self.lower_left.len();
        if !(1..=3).contains(&dim) {
            return Err(GridError::InvalidConfiguration(format!(
                "Cube grids of dimension {dim} are not supported"
            )));
        }
        if self.upper_right.len() != dim
            || (self.level.is_none() && self.num_elements.len() != dim)
        {
            return Err(GridError::InvalidConfiguration(format!(
                "lower_left, upper_right and num_elements must all have length {dim}"
            )));
        }
        for (d, (ll, ur)) in self.lower_left.iter().zip(&self.upper_right).enumerate() {
            if ll >= ur {
                return Err(GridError::InvalidConfiguration(format!(
                    "lower_left[{d}] = {ll} is not below upper_right[{d}] = {ur}"
                )));
            }
        }
        let n = self.elements_per_direction()?;
        if n.contains(&0) {
            return Err(GridError::InvalidConfiguration(
                "At least one element is needed in each direction".to_string(),
            ));
        }
        // Vertex and cell counts must be addressable
        let cells_per_cube = (1..=dim).product::<usize>();
        let npoints = n.iter().try_fold(1usize, |acc, ni| {
            ni.checked_add(1).and_then(|ni| acc.checked_mul(ni))
        });
        let ncells = n
            .iter()
            .try_fold(cells_per_cube, |acc, ni| acc.checked_mul(*ni));
        if npoints.is_none() || ncells.is_none() {
            return Err(GridError::InvalidConfiguration(format!(
                "A grid with {n:?} elements per direction is too large"
            )));
        }
        if reference_cell::dim(self.cell_type) != dim {
            return Err(GridError::InvalidConfiguration(format!(
                "{:?} cells cannot be used for a grid of dimension {dim}",
                self.cell_type
            )));
        }
        Ok(())
    }
}

/// Create a structured grid of a box
pub fn cube_grid<T: RealScalar>(config: &CubeGridConfig) -> GridResult<SingleTypeGrid<T>> {
    config.validate()?;
    let dim = config.lower_left.len();
    let n = config.elements_per_direction()?;
    let simplex = reference_cell::is_simplex(config.cell_type);

    // Vertex (i, j, k) has index i + (nx + 1) * (j + (ny + 1) * k)
    let mut strides = vec![1; dim];
    for d in 1..dim {
        strides[d] = strides[d - 1] * (n[d - 1] + 1);
    }
    let npoints = strides[dim - 1] * (n[dim - 1] + 1);
    let ncubes = n.iter().product::<usize>();
    let cells_per_cube = if simplex {
        (1..dim + 1).product::<usize>()
    } else {
        1
    };

    let mut b = SingleTypeGridBuilder::<T>::new_with_capacity(
        dim,
        npoints,
        ncubes * cells_per_cube,
        config.cell_type,
    );

    let lower_left = config
        .lower_left
        .iter()
        .map(|x| scalar::<T, _>(*x))
        .collect::<GridResult<Vec<_>>>()?;
    let h = izip!(&config.upper_right, &lower_left, &n)
        .map(|(ur, ll, nd)| Ok((scalar::<T, _>(*ur)? - *ll) / scalar::<T, _>(*nd)?))
        .collect::<GridResult<Vec<_>>>()?;

    let mut point = vec![T::zero(); dim];
    for p in 0..npoints {
        for d in 0..dim {
            let i = (p / strides[d]) % (n[d] + 1);
            point[d] = if i == n[d] {
                scalar(config.upper_right[d])?
            } else {
                lower_left[d] + scalar::<T, _>(i)? * h[d]
            };
        }
        b.add_point(p, &point)?;
    }

    let mut cell_id = 0;
    for c in 0..ncubes {
        let mut origin = 0;
        let mut rest = c;
        for d in 0..dim {
            origin += (rest % n[d]) * strides[d];
            rest /= n[d];
        }
        if simplex {
            // Kuhn triangulation: one simplex per ordering of the axes
            for axes in (0..dim).permutations(dim) {
                let mut vertices = vec![origin];
                let mut v = origin;
                for d in axes {
                    v += strides[d];
                    vertices.push(v);
                }
                b.add_cell(cell_id, &vertices)?;
                cell_id += 1;
            }
        } else {
            // Reference vertex r has coordinate bit d of r in direction d
            let vertices = (0..1 << dim)
                .map(|r| {
                    (0..dim)
                        .filter(|d| r & (1 << d) != 0)
                        .map(|d| strides[d])
                        .sum::<usize>()
                        + origin
                })
                .collect::<Vec<_>>();
            b.add_cell(cell_id, &vertices)?;
            cell_id += 1;
        }
    }

    b.create_grid()
}

/// Create a unit interval grid
///
/// The unit interval is the interval between (0,) and (1,)
pub fn unit_interval<T: RealScalar>(nx: usize) -> GridResult<SingleTypeGrid<T>> {
    cube_grid(&CubeGridConfig {
        lower_left: vec![0.0],
        upper_right: vec![1.0],
        num_elements: vec![nx],
        level: None,
        cell_type: ReferenceCellType::Interval,
    })
}

/// Create a unit square grid
///
/// The unit square is the square with corners at (0,0), (1,0), (0,1) and (1,1)
pub fn unit_square<T: RealScalar>(
    nx: usize,
    ny: usize,
    cell_type: ReferenceCellType,
) -> GridResult<SingleTypeGrid<T>> {
    cube_grid(&CubeGridConfig {
        lower_left: vec![0.0, 0.0],
        upper_right: vec![1.0, 1.0],
        num_elements: vec![nx, ny],
        level: None,
        cell_type,
    })
}

/// Create a unit cube grid
///
/// The unit cube is the cube with corners at (0,0,0), (1,0,0), (0,1,0), (1,1,0), (0,0,1),
/// (1,0,1), (0,1,1) and (1,1,1)
pub fn unit_cube<T: RealScalar>(
    nx: usize,
    ny: usize,
    nz: usize,
    cell_type: ReferenceCellType,
) -> GridResult<SingleTypeGrid<T>> {
    cube_grid(&CubeGridConfig {
        lower_left: vec![0.0, 0.0, 0.0],
        upper_right: vec![1.0, 1.0, 1.0],
        num_elements: vec![nx, ny, nz],
        level: None,
        cell_type,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::traits::{Entity, Geometry, GridView};
    use approx::assert_relative_eq;
    use paste::paste;

    macro_rules! test_volume {
        ($name:ident, $grid:expr, $volume:expr) => {
            paste! {
                #[test]
                fn [<test_volume_ $name>]() {
                    let grid = $grid;
                    let volume = grid
                        .entity_iter(0)
                        .map(|c| c.geometry().volume())
                        .sum::<f64>();
                    assert_relative_eq!(volume, $volume, epsilon = 1e-10);
                }
            }
        };
    }

    test_volume!(interval, unit_interval::<f64>(5).unwrap(), 1.0);
    test_volume!(
        triangles,
        unit_square::<f64>(3, 2, ReferenceCellType::Triangle).unwrap(),
        1.0
    );
    test_volume!(
        quadrilaterals,
        unit_square::<f64>(3, 2, ReferenceCellType::Quadrilateral).unwrap(),
        1.0
    );
    test_volume!(
        tetrahedra,
        unit_cube::<f64>(2, 2, 1, ReferenceCellType::Tetrahedron).unwrap(),
        1.0
    );
    test_volume!(
        hexahedra,
        unit_cube::<f64>(2, 1, 3, ReferenceCellType::Hexahedron).unwrap(),
        1.0
    );
    test_volume!(
        box_quadrilaterals,
        cube_grid::<f64>(&CubeGridConfig::new(
            &[-1.0, 2.0],
            &[1.0, 3.5],
            4,
            ReferenceCellType::Quadrilateral
        ))
        .unwrap(),
        3.0
    );

    #[test]
    fn test_counts_square() {
        let grid = unit_square::<f64>(4, 4, ReferenceCellType::Quadrilateral).unwrap();
        assert_eq!(grid.size(0), 16);
        assert_eq!(grid.size(1), 40);
        assert_eq!(grid.size(2), 25);
        let grid = unit_square::<f64>(4, 4, ReferenceCellType::Triangle).unwrap();
        assert_eq!(grid.size(0), 32);
        assert_eq!(grid.size(1), 56);
        assert_eq!(grid.size(2), 25);
    }

    #[test]
    fn test_counts_cube() {
        let grid = unit_cube::<f64>(2, 2, 2, ReferenceCellType::Hexahedron).unwrap();
        assert_eq!(grid.size(0), 8);
        assert_eq!(grid.size(1), 36);
        assert_eq!(grid.size(2), 54);
        assert_eq!(grid.size(3), 27);
        let grid = unit_cube::<f64>(1, 1, 1, ReferenceCellType::Tetrahedron).unwrap();
        assert_eq!(grid.size(0), 6);
        assert_eq!(grid.size(3), 8);
    }

    #[test]
    fn test_level() {
        let config = CubeGridConfig {
            level: Some(2),
            ..Default::default()
        };
        let grid = cube_grid::<f64>(&config).unwrap();
        assert_eq!(grid.size(0), 16);
    }

    #[test]
    fn test_positive_volumes() {
        let grid = unit_cube::<f64>(2, 2, 2, ReferenceCellType::Tetrahedron).unwrap();
        for cell in grid.entity_iter(0) {
            assert_relative_eq!(cell.geometry().volume(), 1.0 / 48.0, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_invalid_configs() {
        let flipped = CubeGridConfig::new(&[1.0, 0.0], &[0.0, 1.0], 2, ReferenceCellType::Triangle);
        assert!(matches!(
            cube_grid::<f64>(&flipped),
            Err(GridError::InvalidConfiguration(_))
        ));
        let wrong_type =
            CubeGridConfig::new(&[0.0, 0.0], &[1.0, 1.0], 2, ReferenceCellType::Hexahedron);
        assert!(cube_grid::<f64>(&wrong_type).is_err());
        let no_elements = CubeGridConfig::new(&[0.0], &[1.0], 0, ReferenceCellType::Interval);
        assert!(cube_grid::<f64>(&no_elements).is_err());
        let mismatched = CubeGridConfig {
            upper_right: vec![1.0],
            ..Default::default()
        };
        assert!(cube_grid::<f64>(&mismatched).is_err());
    }

    #[test]
    fn test_level_too_large() {
        for level in [64, 200, usize::MAX] {
            let config = CubeGridConfig {
                level: Some(level),
                ..Default::default()
            };
            assert!(matches!(
                cube_grid::<f64>(&config),
                Err(GridError::InvalidConfiguration(_))
            ));
        }
        // 2^40 elements per direction in 2D has too many cells
        let config = CubeGridConfig {
            level: Some(40),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(GridError::InvalidConfiguration(_))
        ));
        let config = CubeGridConfig::new(&[0.0], &[1.0], usize::MAX, ReferenceCellType::Interval);
        assert!(matches!(
            config.validate(),
            Err(GridError::InvalidConfiguration(_))
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_from_ron() {
        let config = CubeGridConfig::from_ron_string(
            "(lower_left: [0.0, 0.0, 0.0], upper_right: [1.0, 2.0, 3.0], num_elements: [1, 2, 3], cell_type: Hexahedron)",
        )
        .unwrap();
        assert_eq!(config.level, None);
        let grid = cube_grid::<f64>(&config).unwrap();
        assert_eq!(grid.size(0), 6);
    }
}
