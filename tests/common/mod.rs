//! Fixtures shared by the integration tests

#![allow(dead_code)]

use ndarray::Array1;
use segy::{SampleFormat, SegyFile, Sorting, VolumeSpec};
use std::path::{Path, PathBuf};

pub const ILINES: [i32; 5] = [1, 2, 3, 4, 5];
pub const XLINES: [i32; 5] = [20, 21, 22, 23, 24];
pub const SAMPLES: usize = 50;

/// Install a test-friendly subscriber; repeated calls are harmless
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Value stored at (inline, crossline, sample) of the reference volume
pub fn reference_value(il: i32, xl: i32, sample: usize) -> f32 {
    il as f32 + 0.01 * (xl - 20) as f32 + 1e-5 * sample as f32
}

pub fn reference_trace(il: i32, xl: i32) -> Array1<f32> {
    (0..SAMPLES).map(|s| reference_value(il, xl, s)).collect()
}

/// 5 inlines x 5 crosslines x 50 IBM float samples
pub fn reference_spec(sorting: Sorting) -> VolumeSpec {
    VolumeSpec::new(
        SampleFormat::IbmFloat32,
        sorting,
        SAMPLES,
        ILINES.to_vec(),
        XLINES.to_vec(),
    )
}

/// Write the reference volume to `dir/name` and return its path
pub fn create_reference(dir: &Path, name: &str, sorting: Sorting) -> PathBuf {
    let path = dir.join(name);
    let file = SegyFile::create(&path, &reference_spec(sorting)).expect("Failed to create volume");
    fill_lines(&file);
    file.close().expect("Failed to close volume");
    path
}

/// Write every trace of `file` from its own inline and crossline numbers
pub fn fill_lines(file: &SegyFile) {
    let geometry = file.geometry();
    for (il_pos, &il) in file.ilines().iter().enumerate() {
        for (xl_pos, &xl) in file.xlines().iter().enumerate() {
            for offset in 0..file.offsets() {
                let index = geometry
                    .trace_index(il_pos, xl_pos, offset)
                    .expect("Grid position out of range");
                let trace = reference_trace(il, xl) + offset as f32 * 100.0;
                file.traces()
                    .write(index, &trace)
                    .expect("Failed to write trace");
            }
        }
    }
}

pub fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-4,
        "expected {}, got {}",
        expected,
        actual
    );
}
