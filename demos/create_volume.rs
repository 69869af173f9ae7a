//! Example: Create a synthetic post-stack volume and read it back
//!
//! Run with: cargo run --example create_volume -- [out.sgy] [spec.json]
//!
//! Without a spec file a 40 x 30 x 250 IBM float volume is written.

use ndarray::Array2;
use segy::{OpenMode, SampleFormat, SegyFile, Sorting, TraceField, VolumeSpec};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let temp_dir = tempfile::tempdir()?;
    let path = match args.first() {
        Some(path) => PathBuf::from(path),
        None => temp_dir.path().join("synthetic.sgy"),
    };
    let spec = match args.get(1) {
        Some(json) => VolumeSpec::from_json(&std::fs::read_to_string(json)?)?,
        None => VolumeSpec::new(
            SampleFormat::IbmFloat32,
            Sorting::InlineMajor,
            250,
            (1000..1040).collect(),
            (2000..2030).collect(),
        )
        .with_interval(2000),
    };

    println!("SEG-Y Example: Synthetic Volume");
    println!("=====================================\n");
    println!("Volume specification:");
    println!("{}\n", spec.to_json()?);

    println!("Creating volume at: {}", path.display());
    let file = SegyFile::create(&path, &spec)?;
    let text = format!(
        "{:<80}{:<80}",
        "C 1 SYNTHETIC VOLUME", "C 2 DIPPING REFLECTORS, 50 SAMPLE PERIOD"
    );
    file.write_text(0, &text)?;

    // one dipping reflector per 50 samples, shifted along both line directions
    let (nxl, samples) = file.iline().shape();
    for (il_pos, &il) in spec.ilines.iter().enumerate() {
        let line = Array2::from_shape_fn((nxl, samples), |(xl_pos, sample)| {
            let shifted = sample as f32 - 0.5 * il_pos as f32 - 0.25 * xl_pos as f32;
            (shifted * std::f32::consts::TAU / 50.0).sin()
        });
        file.iline().set(il, &line)?;
    }
    file.headers().update_all([(TraceField::SourceGroupScalar, -100)])?;
    file.close()?;
    println!("✓ Volume created successfully\n");

    let file = SegyFile::open(&path, OpenMode::Read)?;
    println!("Reopened:");
    println!("  {}", file.summary());
    println!("  Geometry: {}", file.geometry_json()?);

    let depth = file.depth_slice().get(samples / 2)?;
    println!(
        "  Depth slice {}: shape {:?}, mean {:.4}",
        samples / 2,
        depth.dim(),
        depth.mean().unwrap_or(0.0)
    );
    if let Some(&xl) = file.xlines().first() {
        let line = file.xline().get(xl)?;
        println!("  Crossline {}: shape {:?}", xl, line.dim());
    }

    println!("\n✓ Example complete!");
    Ok(())
}
