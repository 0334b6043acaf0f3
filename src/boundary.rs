//! Classification of boundary intersections
use crate::{
    traits::Intersection,
    types::{GridError, GridResult},
};
use itertools::izip;
use num::ToPrimitive;
use std::fmt;

/// The type of a boundary
///
/// Two boundary types are the same if they compare equal; intersections in the interior of the
/// domain have type [BoundaryType::NoBoundary].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BoundaryType {
    /// Not a boundary
    #[default]
    NoBoundary,
    /// A boundary of unknown type
    Unknown,
    /// Dirichlet boundary
    Dirichlet,
    /// Neumann boundary
    Neumann,
    /// Robin boundary
    Robin,
    /// Reflecting boundary
    Reflecting,
    /// Absorbing boundary
    Absorbing,
    /// Inflow boundary
    Inflow,
    /// Outflow boundary
    Outflow,
    /// Inflow or outflow boundary
    InflowOutflow,
    /// Impermeable boundary
    Impermeable,
}

impl BoundaryType {
    /// A string that identifies the boundary type
    pub fn id(&self) -> &'static str {
        match self {
            BoundaryType::NoBoundary => "no_boundary",
            BoundaryType::Unknown => "unknown_boundary",
            BoundaryType::Dirichlet => "dirichlet_boundary",
            BoundaryType::Neumann => "neumann_boundary",
            BoundaryType::Robin => "robin_boundary",
            BoundaryType::Reflecting => "reflecting_boundary",
            BoundaryType::Absorbing => "absorbing_boundary",
            BoundaryType::Inflow => "inflow_boundary",
            BoundaryType::Outflow => "outflow_boundary",
            BoundaryType::InflowOutflow => "inflow_outflow_boundary",
            BoundaryType::Impermeable => "impermeable_boundary",
        }
    }
}

impl fmt::Display for BoundaryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Assigns a boundary type to intersections
pub trait BoundaryInfo<I: Intersection>: Send + Sync {
    /// The boundary type of an intersection
    fn boundary_type(&self, intersection: &I) -> BoundaryType;
}

impl<I: Intersection, B: BoundaryInfo<I> + ?Sized> BoundaryInfo<I> for Box<B> {
    fn boundary_type(&self, intersection: &I) -> BoundaryType {
        (**self).boundary_type(intersection)
    }
}

/// Every boundary intersection is a Dirichlet boundary
#[derive(Debug, Clone, Copy, Default)]
pub struct AllDirichletBoundaryInfo;

impl<I: Intersection> BoundaryInfo<I> for AllDirichletBoundaryInfo {
    fn boundary_type(&self, intersection: &I) -> BoundaryType {
        if intersection.boundary() {
            BoundaryType::Dirichlet
        } else {
            BoundaryType::NoBoundary
        }
    }
}

/// Every boundary intersection is a Neumann boundary
#[derive(Debug, Clone, Copy, Default)]
pub struct AllNeumannBoundaryInfo;

impl<I: Intersection> BoundaryInfo<I> for AllNeumannBoundaryInfo {
    fn boundary_type(&self, intersection: &I) -> BoundaryType {
        if intersection.boundary() {
            BoundaryType::Neumann
        } else {
            BoundaryType::NoBoundary
        }
    }
}

/// Boundary types chosen by the direction of the outer normal
///
/// A boundary intersection whose unit outer normal matches a registered normal gets the type
/// registered with it. All other boundary intersections get the default type.
#[derive(Debug, Clone)]
pub struct NormalBasedBoundaryInfo {
    default: BoundaryType,
    tolerance: f64,
    normals: Vec<(Vec<f64>, BoundaryType)>,
}

impl NormalBasedBoundaryInfo {
    /// Create new
    pub fn new(default: BoundaryType, tolerance: f64) -> GridResult<Self> {
        if tolerance <= 0.0 {
            return Err(GridError::InvalidConfiguration(format!(
                "Tolerance must be positive, not {tolerance}"
            )));
        }
        Ok(Self {
            default,
            tolerance,
            normals: vec![],
        })
    }

    /// Register a boundary type for an outer normal
    ///
    /// The normal does not need to be of unit length.
    pub fn register(&mut self, normal: &[f64], boundary_type: BoundaryType) -> GridResult<()> {
        let length = normal.iter().map(|x| x * x).sum::<f64>().sqrt();
        if length < self.tolerance {
            return Err(GridError::InvalidConfiguration(format!(
                "Cannot register the normal {normal:?}"
            )));
        }
        let normal = normal.iter().map(|x| x / length).collect::<Vec<_>>();
        if self
            .normals
            .iter()
            .any(|(n, _)| self.matches(n, &normal))
        {
            return Err(GridError::InvalidConfiguration(format!(
                "A boundary type is already registered for the normal {normal:?}"
            )));
        }
        self.normals.push((normal, boundary_type));
        Ok(())
    }

    /// The type of boundary intersections with no registered normal
    pub fn default_type(&self) -> BoundaryType {
        self.default
    }

    fn matches(&self, a: &[f64], b: &[f64]) -> bool {
        a.len() == b.len() && izip!(a, b).all(|(x, y)| (x - y).abs() < self.tolerance)
    }
}

impl<I: Intersection> BoundaryInfo<I> for NormalBasedBoundaryInfo {
    fn boundary_type(&self, intersection: &I) -> BoundaryType {
        if !intersection.boundary() {
            return BoundaryType::NoBoundary;
        }
        let normal = intersection
            .center_unit_outer_normal()
            .iter()
            .map(|x| x.to_f64().unwrap_or(f64::NAN))
            .collect::<Vec<_>>();
        self.normals
            .iter()
            .find(|(n, _)| self.matches(n, &normal))
            .map_or(self.default, |(_, t)| *t)
    }
}

/// The kind of boundary info created by [make_boundary_info]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BoundaryInfoKind {
    /// [AllDirichletBoundaryInfo]
    #[default]
    AllDirichlet,
    /// [AllNeumannBoundaryInfo]
    AllNeumann,
    /// [NormalBasedBoundaryInfo]
    NormalBased,
}

/// Configuration of a boundary info
///
/// `default`, `tolerance` and `normals` are only used by normal based boundary infos.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct BoundaryInfoConfig {
    /// Kind of boundary info
    pub kind: BoundaryInfoKind,
    /// Type of boundary intersections with no registered normal
    pub default: BoundaryType,
    /// Tolerance when comparing normals
    pub tolerance: f64,
    /// Outer normals and their boundary types
    pub normals: Vec<(Vec<f64>, BoundaryType)>,
}

impl Default for BoundaryInfoConfig {
    fn default() -> Self {
        Self {
            kind: BoundaryInfoKind::AllDirichlet,
            default: BoundaryType::Unknown,
            tolerance: 1e-10,
            normals: vec![],
        }
    }
}

impl BoundaryInfoConfig {
    /// Load a configuration from a RON string
    #[cfg(feature = "serde")]
    pub fn from_ron_string(s: &str) -> GridResult<Self> {
        Ok(ron::from_str(s)?)
    }
}

/// Create a boundary info from a configuration
pub fn make_boundary_info<I: Intersection>(
    config: &BoundaryInfoConfig,
) -> GridResult<Box<dyn BoundaryInfo<I>>> {
    Ok(match config.kind {
        BoundaryInfoKind::AllDirichlet => Box::new(AllDirichletBoundaryInfo),
        BoundaryInfoKind::AllNeumann => Box::new(AllNeumannBoundaryInfo),
        BoundaryInfoKind::NormalBased => {
            let mut info = NormalBasedBoundaryInfo::new(config.default, config.tolerance)?;
            for (normal, boundary_type) in &config.normals {
                info.register(normal, *boundary_type)?;
            }
            Box::new(info)
        }
    })
}
