use std::fmt;

use serde::{Deserialize, Serialize};

use super::TileCoord;

/// Structural class of a tile, fixing its adjacency pattern.
///
/// Nodal tiles sit where five lattice triangles meet; inter-nodal tiles lie on
/// the lines joining nodes to the poles or to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectorType {
    PolarNorth,
    InterNodalPolarNorth,
    CentralPolarNorth,
    NodalTropicalNorth,
    InterNodalTropicalNorth,
    Equatorial,
    InterNodalTropicalSouth,
    NodalTropicalSouth,
    CentralPolarSouth,
    InterNodalPolarSouth,
    PolarSouth,
}

impl SectorType {
    /// Classifies a tile from its ring band and whether its offset lands on a
    /// multiple of the ring's segment length.
    pub fn classify(coord: TileCoord, detail_factor: u32) -> Self {
        let f = detail_factor;
        let TileCoord { ring, offset } = coord;
        if ring == 0 {
            SectorType::PolarNorth
        } else if ring < f {
            if offset % ring == 0 {
                SectorType::InterNodalPolarNorth
            } else {
                SectorType::CentralPolarNorth
            }
        } else if ring == f {
            if offset % f == 0 {
                SectorType::NodalTropicalNorth
            } else {
                SectorType::InterNodalTropicalNorth
            }
        } else if ring < 2 * f {
            SectorType::Equatorial
        } else if ring == 2 * f {
            if offset % f == 0 {
                SectorType::NodalTropicalSouth
            } else {
                SectorType::InterNodalTropicalSouth
            }
        } else if ring < 3 * f {
            let segment = 3 * f - ring;
            if offset % segment == 0 {
                SectorType::InterNodalPolarSouth
            } else {
                SectorType::CentralPolarSouth
            }
        } else {
            SectorType::PolarSouth
        }
    }

    /// Neighbor count every tile of this sector must end up with.
    pub fn expected_degree(self, facets: u32) -> usize {
        match self {
            SectorType::PolarNorth | SectorType::PolarSouth => facets as usize,
            SectorType::NodalTropicalNorth | SectorType::NodalTropicalSouth => 5,
            _ => 6,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SectorType::PolarNorth => "polar-north",
            SectorType::InterNodalPolarNorth => "inter-nodal-polar-north",
            SectorType::CentralPolarNorth => "central-polar-north",
            SectorType::NodalTropicalNorth => "nodal-tropical-north",
            SectorType::InterNodalTropicalNorth => "inter-nodal-tropical-north",
            SectorType::Equatorial => "equatorial",
            SectorType::InterNodalTropicalSouth => "inter-nodal-tropical-south",
            SectorType::NodalTropicalSouth => "nodal-tropical-south",
            SectorType::CentralPolarSouth => "central-polar-south",
            SectorType::InterNodalPolarSouth => "inter-nodal-polar-south",
            SectorType::PolarSouth => "polar-south",
        }
    }
}

impl fmt::Display for SectorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
