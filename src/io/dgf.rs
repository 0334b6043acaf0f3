//! DGF I/O
//!
//! Reads grids from the Dune grid format. An `INTERVAL` block describes a structured grid of a
//! box, and a `VERTEX` block together with a `CUBE` or `SIMPLEX` block describes an unstructured
//! grid. Other blocks are skipped.
use crate::{
    grid::{SingleTypeGrid, SingleTypeGridBuilder},
    reference_cell,
    shapes::{cube_grid, CubeGridConfig},
    traits::{Builder, DGFImport},
    types::{scalar, GridError, GridResult, RealScalar},
};
use log::debug;
use std::str::FromStr;

/// Configuration of a grid read from a DGF file
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct DgfGridConfig {
    /// Path of the DGF file
    pub filename: String,
}

impl DgfGridConfig {
    /// Configuration reading `dgf_{dim}d_interval.dgf`
    pub fn for_dim(dim: usize) -> Self {
        Self {
            filename: format!("dgf_{dim}d_interval.dgf"),
        }
    }

    /// Load a configuration from a RON string
    #[cfg(feature = "serde")]
    pub fn from_ron_string(s: &str) -> GridResult<Self> {
        Ok(ron::from_str(s)?)
    }
}

impl Default for DgfGridConfig {
    fn default() -> Self {
        Self::for_dim(1)
    }
}

/// Read the grid described by a configuration
pub fn dgf_grid<T: RealScalar>(config: &DgfGridConfig) -> GridResult<SingleTypeGrid<T>> {
    SingleTypeGrid::import_from_dgf(&config.filename)
}

/// A block of a DGF file: its keyword and its lines split into tokens
struct Block<'a> {
    keyword: String,
    lines: Vec<Vec<&'a str>>,
}

impl<'a> Block<'a> {
    /// The value of a `name value` line inside the block
    fn option(&self, name: &str) -> GridResult<Option<usize>> {
        for line in &self.lines {
            if line[0].eq_ignore_ascii_case(name) {
                return match line[..] {
                    [_, value] => parse::<usize>(value).map(Some),
                    _ => Err(GridError::Parse(format!(
                        "Expected a single value after {name} in {} block",
                        self.keyword
                    ))),
                };
            }
        }
        Ok(None)
    }

    /// The lines that hold data rather than options
    fn data(&self) -> impl Iterator<Item = &Vec<&'a str>> {
        self.lines.iter().filter(|line| {
            !line[0].eq_ignore_ascii_case("firstindex") && !line[0].eq_ignore_ascii_case("parameters")
        })
    }
}

fn parse<N: FromStr>(token: &str) -> GridResult<N> {
    token
        .parse::<N>()
        .map_err(|_| GridError::Parse(format!("Could not parse {token:?}")))
}

/// Split a DGF file into blocks
fn blocks(s: &str) -> GridResult<Vec<Block<'_>>> {
    let mut lines = s
        .lines()
        .map(|line| line.split('%').next().unwrap_or("").trim())
        .filter(|line| !line.is_empty());

    match lines.next() {
        Some(header) if header.eq_ignore_ascii_case("DGF") => {}
        _ => {
            return Err(GridError::Parse(
                "A DGF file must start with the keyword DGF".to_string(),
            ))
        }
    }

    let mut blocks = vec![];
    let mut current: Option<Block> = None;
    for line in lines {
        if line.starts_with('#') {
            if let Some(block) = current.take() {
                blocks.push(block);
            }
            continue;
        }
        let tokens = line.split_whitespace().collect::<Vec<_>>();
        match current.as_mut() {
            Some(block) => block.lines.push(tokens),
            None => {
                if tokens.len() != 1 || !tokens[0].chars().all(|c| c.is_ascii_alphabetic()) {
                    return Err(GridError::Parse(format!(
                        "Expected a block keyword, found {line:?}"
                    )));
                }
                current = Some(Block {
                    keyword: tokens[0].to_ascii_uppercase(),
                    lines: vec![],
                });
            }
        }
    }
    // The last block does not need to be closed
    if let Some(block) = current {
        blocks.push(block);
    }
    Ok(blocks)
}

/// Number of values per line that are parameters rather than coordinates or vertices
fn parameter_count(block: &Block) -> GridResult<usize> {
    Ok(block.option("parameters")?.unwrap_or(0))
}

fn interval_grid<T: RealScalar>(block: &Block, simplex: bool) -> GridResult<SingleTypeGrid<T>> {
    let lines = block.data().collect::<Vec<_>>();
    let [lower_left, upper_right, num_elements] = lines[..] else {
        return Err(GridError::Parse(format!(
            "An INTERVAL block must have 3 lines, found {}",
            lines.len()
        )));
    };
    let lower_left = lower_left
        .iter()
        .map(|v| parse::<f64>(v))
        .collect::<GridResult<Vec<_>>>()?;
    let upper_right = upper_right
        .iter()
        .map(|v| parse::<f64>(v))
        .collect::<GridResult<Vec<_>>>()?;
    let num_elements = num_elements
        .iter()
        .map(|v| parse::<usize>(v))
        .collect::<GridResult<Vec<_>>>()?;
    let dim = lower_left.len();
    let cell_type = reference_cell::cell_of_dim(dim, simplex).ok_or_else(|| {
        GridError::Parse(format!("INTERVAL blocks of dimension {dim} are not supported"))
    })?;
    debug!("Creating {dim}-dimensional interval grid with {num_elements:?} {cell_type:?} cells");
    cube_grid(&CubeGridConfig {
        lower_left,
        upper_right,
        num_elements,
        level: None,
        cell_type,
    })
}

fn unstructured_grid<T: RealScalar>(
    vertices: &Block,
    cells: &Block,
    simplex: bool,
) -> GridResult<SingleTypeGrid<T>> {
    let first_index = vertices.option("firstindex")?.unwrap_or(0);

    let nparameters = parameter_count(vertices)?;
    let points = vertices
        .data()
        .map(|line| {
            let ncoords = line.len().checked_sub(nparameters).ok_or_else(|| {
                GridError::Parse("Vertex has fewer values than parameters".to_string())
            })?;
            line[..ncoords]
                .iter()
                .map(|v| scalar::<T, f64>(parse::<f64>(v)?))
                .collect::<GridResult<Vec<_>>>()
        })
        .collect::<GridResult<Vec<_>>>()?;
    let gdim = points.first().map_or(0, |p| p.len());
    if gdim == 0 || points.iter().any(|p| p.len() != gdim) {
        return Err(GridError::Parse(
            "All vertices must have the same number of coordinates".to_string(),
        ));
    }

    let nparameters = parameter_count(cells)?;
    let cell_vertices = cells
        .data()
        .map(|line| {
            let nvertices = line.len().checked_sub(nparameters).ok_or_else(|| {
                GridError::Parse("Cell has fewer values than parameters".to_string())
            })?;
            line[..nvertices]
                .iter()
                .map(|v| {
                    parse::<usize>(v)?.checked_sub(first_index).ok_or_else(|| {
                        GridError::Parse(format!("Vertex index {v} is below firstindex"))
                    })
                })
                .collect::<GridResult<Vec<_>>>()
        })
        .collect::<GridResult<Vec<_>>>()?;
    let nvertices = cell_vertices.first().map_or(0, |c| c.len());
    let tdim = if simplex {
        nvertices.checked_sub(1).filter(|d| *d > 0)
    } else {
        [2, 4, 8].iter().position(|n| *n == nvertices).map(|d| d + 1)
    };
    let cell_type = tdim
        .and_then(|d| reference_cell::cell_of_dim(d, simplex))
        .filter(|_| cell_vertices.iter().all(|c| c.len() == nvertices))
        .ok_or_else(|| {
            GridError::Parse(format!(
                "Cells in {} block do not have a supported number of vertices",
                cells.keyword
            ))
        })?;
    debug!(
        "Creating grid with {} points and {} {cell_type:?} cells",
        points.len(),
        cell_vertices.len()
    );

    let mut b = SingleTypeGridBuilder::<T>::new_with_capacity(
        gdim,
        points.len(),
        cell_vertices.len(),
        cell_type,
    );
    for (i, p) in points.iter().enumerate() {
        b.add_point(i, p)?;
    }
    for (i, c) in cell_vertices.iter().enumerate() {
        b.add_cell(i, c)?;
    }
    b.create_grid()
}

impl<T: RealScalar> DGFImport for SingleTypeGrid<T> {
    fn from_dgf_string(s: &str) -> GridResult<Self> {
        let blocks = blocks(s)?;
        let find = |keyword: &str| blocks.iter().find(|b| b.keyword == keyword);
        for b in &blocks {
            if !["INTERVAL", "VERTEX", "CUBE", "SIMPLEX"].contains(&b.keyword.as_str()) {
                debug!("Skipping DGF block {}", b.keyword);
            }
        }

        let simplex = find("SIMPLEX");
        let cube = find("CUBE");
        if let Some(interval) = find("INTERVAL") {
            return interval_grid(interval, simplex.is_some());
        }
        let vertices = find("VERTEX")
            .ok_or_else(|| GridError::Parse("No INTERVAL or VERTEX block found".to_string()))?;
        match (cube, simplex) {
            (Some(_), Some(_)) => Err(GridError::Parse(
                "Grids with both CUBE and SIMPLEX cells are not supported".to_string(),
            )),
            (Some(cells), None) => unstructured_grid(vertices, cells, false),
            (None, Some(cells)) => unstructured_grid(vertices, cells, true),
            (None, None) => Err(GridError::Parse(
                "A VERTEX block needs a CUBE or SIMPLEX block".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        reference_cell::ReferenceCellType,
        traits::{Entity, Geometry, GridView},
    };
    use approx::assert_relative_eq;

    #[test]
    fn test_interval_1d() {
        let g = SingleTypeGrid::<f64>::from_dgf_string(
            "DGF
            INTERVAL
            0   % lower left
            2   % upper right
            8   % elements
            #",
        )
        .unwrap();
        assert_eq!(g.dim(), 1);
        assert_eq!(g.size(0), 8);
        assert_eq!(g.size(1), 9);
    }

    #[test]
    fn test_interval_2d() {
        let g = SingleTypeGrid::<f64>::from_dgf_string(
            "DGF
            Interval
            -1 0
            1 1
            4 2
            #
            GRIDPARAMETER
            name test
            #
            #",
        )
        .unwrap();
        assert_eq!(g.types(0), [ReferenceCellType::Quadrilateral]);
        assert_eq!(g.size(0), 8);
        assert_eq!(g.size(2), 15);
        let volume = g
            .entity_iter(0)
            .map(|c| c.geometry().volume())
            .sum::<f64>();
        assert_relative_eq!(volume, 2.0, epsilon = 1e-10);
    }

    #[test]
    fn test_interval_simplex() {
        let g = SingleTypeGrid::<f64>::from_dgf_string(
            "DGF
            INTERVAL
            0 0
            1 1
            2 2
            #
            SIMPLEX
            #",
        )
        .unwrap();
        assert_eq!(g.types(0), [ReferenceCellType::Triangle]);
        assert_eq!(g.size(0), 8);
    }

    #[test]
    fn test_vertex_cube() {
        let g = SingleTypeGrid::<f64>::from_dgf_string(
            "DGF
            VERTEX
            firstindex 1
            0 0
            1 0
            0 1
            1 1
            2 0
            2 1
            #
            CUBE
            1 2 3 4
            2 5 4 6
            #",
        )
        .unwrap();
        assert_eq!(g.types(0), [ReferenceCellType::Quadrilateral]);
        assert_eq!(g.size(0), 2);
        assert_eq!(g.size(1), 7);
        assert_eq!(g.size(2), 6);
    }

    #[test]
    fn test_vertex_simplex_with_parameters() {
        let g = SingleTypeGrid::<f64>::from_dgf_string(
            "DGF
            VERTEX
            parameters 1
            0 0 0 7.5
            1 0 0 7.5
            0 1 0 7.5
            0 0 1 7.5
            #
            SIMPLEX
            0 1 2 3
            #",
        )
        .unwrap();
        assert_eq!(g.types(0), [ReferenceCellType::Tetrahedron]);
        assert_eq!(g.world_dim(), 3);
        let cell = g.entity_iter(0).next().unwrap();
        assert_relative_eq!(cell.geometry().volume(), 1.0 / 6.0, epsilon = 1e-10);
    }

    #[test]
    fn test_surface_simplices() {
        let g = SingleTypeGrid::<f64>::from_dgf_string(
            "DGF
            VERTEX
            0 0 0
            1 0 0
            0 1 0
            0 0 1
            #
            SIMPLEX
            0 1 2
            0 1 3
            0 2 3
            1 2 3
            #",
        )
        .unwrap();
        assert_eq!(g.dim(), 2);
        assert_eq!(g.world_dim(), 3);
        assert_eq!(g.size(1), 6);
    }

    #[test]
    fn test_invalid_files() {
        for content in [
            "INTERVAL\n0\n1\n2\n#",
            "DGF\nINTERVAL\n0\n1\n#",
            "DGF\nINTERVAL\n0\n1\nx\n#",
            "DGF\nVERTEX\n0 0\n1 0\n0 1\n#",
            "DGF\nVERTEX\n0 0\n1 0\n0 1\n#\nSIMPLEX\n0 1\n0 1 2\n#",
            "DGF\nVERTEX\n0 0\n1 0\n0 1\n#\nCUBE\n0 1 2\n#",
            "DGF\n0 0\n#",
        ] {
            assert!(
                matches!(
                    SingleTypeGrid::<f64>::from_dgf_string(content),
                    Err(GridError::Parse(_))
                ),
                "{content:?} should not parse"
            );
        }
    }

    #[test]
    fn test_unknown_vertex() {
        assert!(matches!(
            SingleTypeGrid::<f64>::from_dgf_string("DGF\nVERTEX\n0 0\n1 0\n0 1\n#\nSIMPLEX\n0 1 3\n#"),
            Err(GridError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            dgf_grid::<f64>(&DgfGridConfig {
                filename: "this_file_does_not_exist.dgf".to_string()
            }),
            Err(GridError::Io(_))
        ));
    }

    #[test]
    fn test_default_config() {
        assert_eq!(DgfGridConfig::default().filename, "dgf_1d_interval.dgf");
        assert_eq!(DgfGridConfig::for_dim(3).filename, "dgf_3d_interval.dgf");
    }
}
