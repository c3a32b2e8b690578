//! Integration tests for bedmap-data with the real Bedmap2 files.
//!
//! These tests require the GeoTIFF files in data/bedmap2_tiff/ at the
//! workspace root to be present; they never download.

use bedmap_data::{flat_profile, CoordMode, DataConfig, Dataset, Layer, Sample};
use bedmap_transform::{latlon_to_index, LatLon, GRID};
use std::path::Path;
use std::time::Instant;

const BEDMAP_DATA_DIR: &str = "../../data/bedmap2_tiff";

fn bedmap_data_available() -> bool {
    Path::new(BEDMAP_DATA_DIR).join("bedmap2_bed.tif").exists()
}

fn dataset() -> Dataset {
    Dataset::new(DataConfig::with_data_dir(BEDMAP_DATA_DIR).offline())
        .expect("Failed to create dataset")
}

#[test]
fn test_full_size_layers() {
    if !bedmap_data_available() {
        eprintln!("Skipping test: {} not found", BEDMAP_DATA_DIR);
        return;
    }

    let dataset = dataset();
    for layer in [Layer::Bed, Layer::Surface, Layer::Thickness] {
        let start = Instant::now();
        let raster = dataset.layer(layer).expect("Failed to load layer");
        println!("Loaded {} in {:?}", layer, start.elapsed());
        assert_eq!(raster.dimensions(), (GRID.size, GRID.size));
    }
}

#[test]
fn test_pole_samples_centre_cell() {
    if !bedmap_data_available() {
        eprintln!("Skipping test: {} not found", BEDMAP_DATA_DIR);
        return;
    }

    let dataset = dataset();
    let pole = latlon_to_index(LatLon::new(-90.0, 0.0)).unwrap();
    let raster = dataset.layer(Layer::Bed).unwrap();

    let bed = dataset
        .bed(&[-90.0], &[0.0], CoordMode::Geographic)
        .unwrap();
    assert_eq!(bed[0], raster.get(pole));
    println!("Bed at the South Pole: {}", bed[0]);

    // Ice at the pole is close to 3 km thick
    let thickness = dataset
        .thickness(&[-90.0], &[0.0], CoordMode::Geographic)
        .unwrap();
    match thickness[0] {
        Sample::Value(v) => assert!(v > 2000.0 && v < 3500.0, "thickness {}", v),
        other => panic!("expected a thickness at the pole, got {}", other),
    }
}

#[test]
fn test_far_north_is_out_of_grid() {
    if !bedmap_data_available() {
        eprintln!("Skipping test: {} not found", BEDMAP_DATA_DIR);
        return;
    }

    let dataset = dataset();
    let samples = dataset
        .surface(&[-10.0, -85.0], &[0.0, 0.0], CoordMode::Geographic)
        .unwrap();
    assert_eq!(samples[0], Sample::OutOfGrid);
    assert_ne!(samples[1], Sample::OutOfGrid);
}

#[test]
fn test_profile_across_dome_c() {
    if !bedmap_data_available() {
        eprintln!("Skipping test: {} not found", BEDMAP_DATA_DIR);
        return;
    }

    let dataset = dataset();
    let start = Instant::now();
    let profile = flat_profile(
        &dataset,
        LatLon::new(-74.0, 120.0),
        LatLon::new(-76.0, 126.0),
        1000.0,
    )
    .unwrap();
    println!("Built {} point profile in {:?}", profile.len(), start.elapsed());

    assert!(!profile.is_empty());
    // Surface is never below the bed where both are defined
    for (s, b) in profile.surface_km.iter().zip(&profile.bed_km) {
        if let (Some(s), Some(b)) = (s, b) {
            assert!(s >= b, "surface {} below bed {}", s, b);
        }
    }
}
