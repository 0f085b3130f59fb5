use std::collections::HashSet;

use spheregen::{
    build_world, build_world_with, diffusion::AltitudeTier, plates::PLATE_COUNT, Biome,
    GenerationConfig, GenerationError, PresetLoader,
};

#[test]
fn three_facet_worlds_have_six_f_squared_plus_two_tiles() {
    for detail_factor in 1..=6 {
        let config = GenerationConfig::new(detail_factor, Biome::Ice)
            .with_facets(3)
            .with_seed(u64::from(detail_factor));
        let world = build_world_with(config).expect("world generates");
        let f = detail_factor as usize;
        assert_eq!(world.tile_count(), 6 * f * f + 2);
    }
}

#[test]
fn default_worlds_are_icosahedral() {
    let world = build_world(4, Biome::Ocean, Some(11)).expect("world generates");
    assert_eq!(world.tile_count(), 162);
    assert_eq!(world.facets(), 5);
    let pentagons = world
        .tiles()
        .iter()
        .filter(|tile| world.neighbors(tile.coord).len() == 5)
        .count();
    assert_eq!(pentagons, 12);
}

#[test]
fn meadow_world_at_detail_four() {
    let mut successes = 0;
    for seed in 0..10 {
        let base = GenerationConfig::new(4, Biome::Ocean)
            .with_facets(3)
            .with_seed(seed);
        let reference = build_world_with(base.clone()).expect("ocean world generates");
        let meadows = reference
            .biome_census()
            .get(&Biome::Meadow)
            .copied()
            .unwrap_or(0);

        let mut config = base;
        config.starting_biome = Biome::Meadow;
        match build_world_with(config) {
            Ok(world) => {
                successes += 1;
                assert_eq!(world.tile_count(), 98);
                assert!(!world.capitals().is_empty());
                assert_eq!(world.capitals().len(), meadows / 2);
                assert_eq!(world.tiles(), reference.tiles());
                for capital in world.capitals() {
                    assert_eq!(world.tile(*capital).expect("tile").biome, Biome::Meadow);
                }
            }
            Err(GenerationError::Capacity { available, .. }) => {
                assert!(meadows < 2);
                assert_eq!(available, meadows);
            }
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    assert!(successes > 0);
}

#[test]
fn scarce_biome_at_detail_one_is_a_capacity_error() {
    for seed in 0..8 {
        let err = build_world(1, Biome::Mountains, Some(seed))
            .expect_err("a 12-tile world has at most one mountain tile");
        assert!(matches!(
            err,
            GenerationError::Capacity {
                biome: Biome::Mountains,
                ..
            }
        ));
    }
}

#[test]
fn polar_ice_hosts_exactly_one_capital_at_detail_one() {
    let world = build_world(1, Biome::Ice, Some(3)).expect("poles are always ice");
    assert_eq!(world.biome_census().get(&Biome::Ice), Some(&2));
    assert_eq!(world.capitals().len(), 1);
}

#[test]
fn every_tile_is_fully_annotated() {
    let world = build_world(5, Biome::Ocean, Some(21)).expect("world generates");
    let biomes: HashSet<Biome> = Biome::ALL.into_iter().collect();
    for tile in world.tiles() {
        assert!(biomes.contains(&tile.biome));
        assert!(tile.plate.index() < PLATE_COUNT);
        assert!(tile.mobility_cost > 0.0);
        assert!((0.0..=1000.0).contains(&tile.raw_altitude));
        assert!((0.0..=1000.0).contains(&tile.raw_humidity));
        assert_eq!(
            tile.biome,
            Biome::resolve(tile.temperature, tile.altitude, tile.humidity)
        );
    }

    let land = world
        .tiles()
        .iter()
        .filter(|tile| tile.altitude >= AltitudeTier::Plain)
        .count() as f64;
    let expected = world.land_fraction() * world.tile_count() as f64;
    assert!((land - expected).abs() <= 1.0);
}

#[test]
fn capitals_are_distinct_and_well_spread() {
    let world = build_world(6, Biome::Ocean, Some(5)).expect("world generates");
    let unique: HashSet<_> = world.capitals().iter().collect();
    assert_eq!(unique.len(), world.capitals().len());
    let ocean = world.biome_census()[&Biome::Ocean];
    assert_eq!(world.capitals().len(), ocean / 2);
}

#[test]
fn zero_detail_factor_is_rejected_before_generation() {
    assert!(matches!(
        build_world(0, Biome::Meadow, Some(1)),
        Err(GenerationError::InvalidDetailFactor(0))
    ));
}

#[test]
fn tiny_preset_generates() {
    let loader = PresetLoader::new(env!("CARGO_MANIFEST_DIR"));
    let mut config = loader.load("presets/tiny.yaml").expect("preset loads");
    config.starting_biome = Biome::Ocean;
    let world = build_world_with(config).expect("world generates");
    assert_eq!(world.tile_count(), 98);
    assert_eq!(world.seed(), 7);
    assert_eq!(world.name(), "tiny");
}
