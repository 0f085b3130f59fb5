use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::climate::Biome;
use crate::error::GenerationError;
use crate::topology::{MAX_FACETS, MIN_FACETS};

fn default_name() -> String {
    "world".to_string()
}

fn default_facets() -> u32 {
    5
}

fn default_altitude_samples() -> u32 {
    3
}

fn default_humidity_samples() -> u32 {
    2
}

fn default_land_fraction() -> FractionRange {
    FractionRange {
        min: 0.35,
        max: 0.45,
    }
}

fn default_abyssal_share() -> f64 {
    0.45
}

fn default_barrier_share() -> f64 {
    0.30
}

fn default_shelf_share() -> f64 {
    0.25
}

fn default_plain_share() -> f64 {
    0.60
}

fn default_plateau_share() -> f64 {
    0.25
}

fn default_mountain_share() -> f64 {
    0.15
}

fn default_movement_cost() -> f64 {
    10.0
}

fn default_transition_penalty() -> f64 {
    2.0
}

fn default_sea_lane_discount() -> f64 {
    0.7
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Inclusive bounds for the integer raw values seeded on reference tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRange {
    pub min: u32,
    pub max: u32,
}

impl Default for RawRange {
    fn default() -> Self {
        Self { min: 0, max: 1000 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FractionRange {
    pub min: f64,
    pub max: f64,
}

/// Everything needed to generate one world.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_name")]
    pub name: String,
    pub detail_factor: u32,
    pub starting_biome: Biome,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_facets")]
    pub facets: u32,
    #[serde(default)]
    pub altitude: AltitudeConfig,
    #[serde(default)]
    pub humidity: HumidityConfig,
    #[serde(default)]
    pub mobility: MobilityConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AltitudeConfig {
    #[serde(default = "default_altitude_samples")]
    pub samples_per_factor: u32,
    #[serde(default)]
    pub raw_range: RawRange,
    #[serde(default = "default_land_fraction")]
    pub land_fraction: FractionRange,
    #[serde(default = "default_abyssal_share")]
    pub abyssal_share: f64,
    #[serde(default = "default_barrier_share")]
    pub barrier_share: f64,
    #[serde(default = "default_shelf_share")]
    pub shelf_share: f64,
    #[serde(default = "default_plain_share")]
    pub plain_share: f64,
    #[serde(default = "default_plateau_share")]
    pub plateau_share: f64,
    #[serde(default = "default_mountain_share")]
    pub mountain_share: f64,
}

impl Default for AltitudeConfig {
    fn default() -> Self {
        Self {
            samples_per_factor: default_altitude_samples(),
            raw_range: RawRange::default(),
            land_fraction: default_land_fraction(),
            abyssal_share: default_abyssal_share(),
            barrier_share: default_barrier_share(),
            shelf_share: default_shelf_share(),
            plain_share: default_plain_share(),
            plateau_share: default_plateau_share(),
            mountain_share: default_mountain_share(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HumidityConfig {
    #[serde(default = "default_humidity_samples")]
    pub samples_per_factor: u32,
    #[serde(default)]
    pub raw_range: RawRange,
}

impl Default for HumidityConfig {
    fn default() -> Self {
        Self {
            samples_per_factor: default_humidity_samples(),
            raw_range: RawRange::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MobilityConfig {
    #[serde(default = "default_movement_cost")]
    pub movement_cost: f64,
    #[serde(default = "default_transition_penalty")]
    pub transition_penalty: f64,
    #[serde(default = "default_sea_lane_discount")]
    pub sea_lane_discount: f64,
}

impl Default for MobilityConfig {
    fn default() -> Self {
        Self {
            movement_cost: default_movement_cost(),
            transition_penalty: default_transition_penalty(),
            sea_lane_discount: default_sea_lane_discount(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl GenerationConfig {
    pub fn new(detail_factor: u32, starting_biome: Biome) -> Self {
        Self {
            name: default_name(),
            detail_factor,
            starting_biome,
            seed: None,
            facets: default_facets(),
            altitude: AltitudeConfig::default(),
            humidity: HumidityConfig::default(),
            mobility: MobilityConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_facets(mut self, facets: u32) -> Self {
        self.facets = facets;
        self
    }

    /// Rejects configurations that would fail or misbehave mid-pipeline.
    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.detail_factor == 0 {
            return Err(GenerationError::InvalidDetailFactor(self.detail_factor));
        }
        if !(MIN_FACETS..=MAX_FACETS).contains(&self.facets) {
            return Err(GenerationError::InvalidFacets(self.facets));
        }

        let altitude = &self.altitude;
        check_raw_range("altitude", altitude.raw_range)?;
        check_raw_range("humidity", self.humidity.raw_range)?;
        if altitude.samples_per_factor == 0 || self.humidity.samples_per_factor == 0 {
            return invalid("samples_per_factor must be at least 1");
        }

        let land = altitude.land_fraction;
        if !(land.min > 0.0 && land.min <= land.max && land.max < 1.0) {
            return invalid(format!(
                "land fraction range {}..{} must lie inside (0, 1)",
                land.min, land.max
            ));
        }
        check_shares(
            "sea",
            &[
                altitude.abyssal_share,
                altitude.barrier_share,
                altitude.shelf_share,
            ],
        )?;
        check_shares(
            "land",
            &[
                altitude.plain_share,
                altitude.plateau_share,
                altitude.mountain_share,
            ],
        )?;

        let mobility = &self.mobility;
        if !(mobility.movement_cost > 0.0
            && mobility.transition_penalty >= 0.0
            && mobility.sea_lane_discount > 0.0)
        {
            return invalid("mobility constants must be positive");
        }
        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> Result<(), GenerationError> {
    Err(GenerationError::InvalidConfig(message.into()))
}

fn check_raw_range(field: &str, range: RawRange) -> Result<(), GenerationError> {
    if range.min > range.max {
        return invalid(format!(
            "{field} raw range {}..={} is empty",
            range.min, range.max
        ));
    }
    Ok(())
}

fn check_shares(band: &str, shares: &[f64]) -> Result<(), GenerationError> {
    let total: f64 = shares.iter().sum();
    let negative = shares.iter().any(|share| *share < 0.0);
    if negative || !total.is_finite() || (total - 1.0).abs() > 1e-6 {
        return invalid(format!("{band} band shares must be non-negative and sum to 1, got {total}"));
    }
    Ok(())
}

pub struct PresetLoader {
    base_dir: PathBuf,
}

impl PresetLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<GenerationConfig> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read preset file {}", path.display()))?;
        let config: GenerationConfig = serde_yaml::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid preset {}", path.display()))?;
        Ok(config)
    }
}
