//! Temperature, biome resolution and movement costs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::MobilityConfig;
use crate::diffusion::{AltitudeTier, HumidityTier};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Biome {
    Ice,
    Mountains,
    Hills,
    Forest,
    Meadow,
    Savanna,
    Desert,
    Coast,
    Sea,
    Ocean,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown biome `{0}`")]
pub struct UnknownBiome(pub String);

impl Biome {
    pub const ALL: [Biome; 10] = [
        Biome::Ice,
        Biome::Mountains,
        Biome::Hills,
        Biome::Forest,
        Biome::Meadow,
        Biome::Savanna,
        Biome::Desert,
        Biome::Coast,
        Biome::Sea,
        Biome::Ocean,
    ];

    /// Resolution order: frost first, then relief, then moisture on plains.
    pub fn resolve(temperature: f64, altitude: AltitudeTier, humidity: HumidityTier) -> Biome {
        if temperature < 0.0 {
            return Biome::Ice;
        }
        match altitude {
            AltitudeTier::Mountain => Biome::Mountains,
            AltitudeTier::Plateau => Biome::Hills,
            AltitudeTier::Shelf => Biome::Coast,
            AltitudeTier::Barrier => Biome::Sea,
            AltitudeTier::Abyssal => Biome::Ocean,
            AltitudeTier::Plain => match humidity {
                HumidityTier::Humid => Biome::Forest,
                HumidityTier::Fertile => Biome::Meadow,
                HumidityTier::SemiArid => Biome::Savanna,
                HumidityTier::Arid => Biome::Desert,
            },
        }
    }

    pub fn is_maritime(self) -> bool {
        matches!(self, Biome::Coast | Biome::Sea | Biome::Ocean)
    }

    /// Unscaled movement coefficient.
    pub fn base_mobility(self) -> f64 {
        match self {
            Biome::Ice | Biome::Mountains => 3.0,
            Biome::Hills => 2.0,
            Biome::Forest | Biome::Desert => 1.5,
            Biome::Meadow | Biome::Savanna | Biome::Coast => 1.0,
            Biome::Sea => 0.8,
            Biome::Ocean => 0.5,
        }
    }

    pub fn color(self) -> [u8; 3] {
        match self {
            Biome::Ice => [220, 232, 245],
            Biome::Mountains => [128, 118, 110],
            Biome::Hills => [150, 160, 100],
            Biome::Forest => [56, 118, 72],
            Biome::Meadow => [136, 186, 90],
            Biome::Savanna => [196, 186, 104],
            Biome::Desert => [222, 196, 140],
            Biome::Coast => [96, 164, 200],
            Biome::Sea => [56, 112, 170],
            Biome::Ocean => [34, 60, 120],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Biome::Ice => "ice",
            Biome::Mountains => "mountains",
            Biome::Hills => "hills",
            Biome::Forest => "forest",
            Biome::Meadow => "meadow",
            Biome::Savanna => "savanna",
            Biome::Desert => "desert",
            Biome::Coast => "coast",
            Biome::Sea => "sea",
            Biome::Ocean => "ocean",
        }
    }
}

impl fmt::Display for Biome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Biome {
    type Err = UnknownBiome;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Biome::ALL
            .into_iter()
            .find(|biome| biome.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownBiome(s.to_string()))
    }
}

impl AltitudeTier {
    pub fn temperature_adjustment(self) -> f64 {
        match self {
            AltitudeTier::Abyssal | AltitudeTier::Barrier | AltitudeTier::Shelf => 3.0,
            AltitudeTier::Plain => 1.0,
            AltitudeTier::Plateau => -1.0,
            AltitudeTier::Mountain => -3.0,
        }
    }
}

impl HumidityTier {
    pub fn temperature_adjustment(self) -> f64 {
        match self {
            HumidityTier::Humid => 1.5,
            HumidityTier::Fertile => 0.5,
            HumidityTier::SemiArid => -0.5,
            HumidityTier::Arid => -1.5,
        }
    }
}

/// Angle of incidence in degrees: 0 on the equator ring `1.5F`, 90 at the poles.
pub fn incidence_angle(ring: u32, detail_factor: u32) -> f64 {
    let equator = 1.5 * f64::from(detail_factor);
    (f64::from(ring) - equator).abs() / equator * 90.0
}

pub fn temperature(
    ring: u32,
    detail_factor: u32,
    altitude: AltitudeTier,
    humidity: HumidityTier,
) -> f64 {
    let angle = incidence_angle(ring, detail_factor).to_radians();
    40.0 * angle.cos() - 8.0 + altitude.temperature_adjustment() + humidity.temperature_adjustment()
        - 4.0
}

pub fn tile_mobility_cost(biome: Biome, mobility: &MobilityConfig) -> f64 {
    biome.base_mobility() * mobility.movement_cost
}

/// Cost of crossing between two tiles; independent of endpoint order.
pub fn edge_mobility_cost(a: Biome, b: Biome, mobility: &MobilityConfig) -> f64 {
    let cost_a = tile_mobility_cost(a, mobility);
    let cost_b = tile_mobility_cost(b, mobility);
    match (a.is_maritime(), b.is_maritime()) {
        (true, true) => (cost_a + cost_b) / 2.0 * mobility.sea_lane_discount,
        (false, false) => (cost_a + cost_b) / 2.0,
        _ => cost_a.max(cost_b) * 2.0 + mobility.transition_penalty * mobility.movement_cost,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mobility() -> MobilityConfig {
        MobilityConfig::default()
    }

    #[test]
    fn equator_is_warm_and_poles_freeze() {
        let warm = temperature(6, 4, AltitudeTier::Plain, HumidityTier::Fertile);
        assert!((warm - (40.0 - 8.0 + 1.0 + 0.5 - 4.0)).abs() < 1e-9);
        let pole = temperature(0, 4, AltitudeTier::Abyssal, HumidityTier::Humid);
        assert!(pole < 0.0);
        assert!((incidence_angle(12, 4) - 90.0).abs() < 1e-9);
    }

    #[test]
    fn frost_overrides_relief_and_moisture() {
        for altitude in AltitudeTier::ALL {
            for humidity in HumidityTier::ALL {
                assert_eq!(Biome::resolve(-0.1, altitude, humidity), Biome::Ice);
            }
        }
    }

    #[test]
    fn relief_then_moisture_decide_warm_tiles() {
        let any = HumidityTier::Arid;
        assert_eq!(Biome::resolve(10.0, AltitudeTier::Mountain, any), Biome::Mountains);
        assert_eq!(Biome::resolve(10.0, AltitudeTier::Plateau, any), Biome::Hills);
        assert_eq!(Biome::resolve(10.0, AltitudeTier::Shelf, any), Biome::Coast);
        assert_eq!(Biome::resolve(10.0, AltitudeTier::Barrier, any), Biome::Sea);
        assert_eq!(Biome::resolve(10.0, AltitudeTier::Abyssal, any), Biome::Ocean);
        assert_eq!(
            Biome::resolve(0.0, AltitudeTier::Plain, HumidityTier::Humid),
            Biome::Forest
        );
        assert_eq!(
            Biome::resolve(5.0, AltitudeTier::Plain, HumidityTier::Fertile),
            Biome::Meadow
        );
        assert_eq!(
            Biome::resolve(5.0, AltitudeTier::Plain, HumidityTier::SemiArid),
            Biome::Savanna
        );
        assert_eq!(Biome::resolve(5.0, AltitudeTier::Plain, any), Biome::Desert);
    }

    #[test]
    fn every_biome_is_reachable() {
        let mut seen = Vec::new();
        for temperature in [-5.0, 5.0] {
            for altitude in AltitudeTier::ALL {
                for humidity in HumidityTier::ALL {
                    seen.push(Biome::resolve(temperature, altitude, humidity));
                }
            }
        }
        for biome in Biome::ALL {
            assert!(seen.contains(&biome), "{biome} unreachable");
        }
    }

    #[test]
    fn edge_cost_is_order_independent() {
        let mobility = mobility();
        for a in Biome::ALL {
            for b in Biome::ALL {
                assert_eq!(
                    edge_mobility_cost(a, b, &mobility),
                    edge_mobility_cost(b, a, &mobility)
                );
            }
        }
    }

    #[test]
    fn shoreline_crossings_cost_more_than_sea_lanes() {
        let mobility = mobility();
        let landing = edge_mobility_cost(Biome::Meadow, Biome::Coast, &mobility);
        assert!((landing - (10.0 * 2.0 + 2.0 * 10.0)).abs() < 1e-9);
        let lane = edge_mobility_cost(Biome::Ocean, Biome::Ocean, &mobility);
        assert!((lane - 5.0 * 0.7).abs() < 1e-9);
        let overland = edge_mobility_cost(Biome::Meadow, Biome::Hills, &mobility);
        assert!((overland - 15.0).abs() < 1e-9);
    }

    #[test]
    fn biome_names_parse_case_insensitively() {
        assert_eq!("Meadow".parse::<Biome>(), Ok(Biome::Meadow));
        assert_eq!(" ICE ".parse::<Biome>(), Ok(Biome::Ice));
        assert_eq!(
            "tundra".parse::<Biome>(),
            Err(UnknownBiome("tundra".to_string()))
        );
        for biome in Biome::ALL {
            assert_eq!(biome.to_string().parse::<Biome>(), Ok(biome));
            assert!(biome.base_mobility() > 0.0);
        }
    }
}
