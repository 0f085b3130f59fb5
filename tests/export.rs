use spheregen::{build_world, Biome, ExportError, ExportWriter, GenerationConfig, WorldGenerator};

#[test]
fn export_round_trips_through_disk() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut config = GenerationConfig::new(4, Biome::Ocean).with_seed(99);
    config.name = "archipelago".to_string();
    let world = WorldGenerator::new(config)
        .and_then(|generator| generator.generate())
        .expect("world generates");

    let writer = ExportWriter::new(dir.path());
    let path = writer.write(&world).expect("export written");
    assert_eq!(path, dir.path().join("archipelago"));
    assert!(path.join("world.json").is_file());
    assert!(path.join("metadata.json").is_file());

    let metadata = writer.read_metadata("archipelago").expect("metadata");
    assert_eq!(metadata.name, "archipelago");
    assert_eq!(metadata.detail_factor, 4);
    assert_eq!(metadata.tile_count, 162);
    assert_eq!(metadata.capital_count, world.capitals().len());
    assert_eq!(metadata.seed, 99);

    let restored = writer.read_world("archipelago").expect("world restored");
    assert_eq!(restored.capitals(), world.capitals());
    assert_eq!(restored.seed(), world.seed());
    for (before, after) in world.tiles().iter().zip(restored.tiles()) {
        assert_eq!(before.coord, after.coord);
        assert_eq!(before.sector, after.sector);
        assert_eq!(before.biome, after.biome);
        assert_eq!(before.plate, after.plate);
        assert_eq!(before.altitude, after.altitude);
        assert_eq!(before.humidity, after.humidity);
        assert_eq!(before.mobility_cost, after.mobility_cost);
        assert_eq!(before.plate_color(), after.plate_color());
        assert!((before.raw_altitude - after.raw_altitude).abs() < 1e-9);
    }
}

#[test]
fn derived_attributes_are_not_exported() {
    let dir = tempfile::tempdir().expect("temp dir");
    let world = build_world(2, Biome::Ocean, Some(4)).expect("world generates");
    let path = ExportWriter::new(dir.path()).write(&world).expect("export written");
    let record = std::fs::read_to_string(path.join("world.json")).expect("record");
    assert!(!record.contains("mobility_cost"));
    assert!(!record.contains("plate_color"));
    assert!(!record.contains("sector"));
    assert!(!record.contains("temperature"));
}

#[test]
fn reading_a_missing_world_is_an_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let writer = ExportWriter::new(dir.path());
    assert!(matches!(writer.read_world("nowhere"), Err(ExportError::Io(_))));
}
