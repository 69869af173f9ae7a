//! Example: Print the headers, geometry and a few statistics of a SEG-Y file
//!
//! Run with: cargo run --example inspect -- <file.sgy> [iline-byte xline-byte]
//!
//! Set RUST_LOG=segy=debug to see the geometry scan.

use segy::{BinField, OpenMode, SegyFile, SegyOptions, TraceField};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(path) = args.first() else {
        eprintln!("usage: inspect <file.sgy> [iline-byte xline-byte]");
        std::process::exit(2);
    };

    let mut options = SegyOptions::default();
    if let [_, il, xl] = args.as_slice() {
        let field = |byte: &str| -> Result<TraceField, Box<dyn std::error::Error>> {
            let position: i64 = byte.parse()?;
            TraceField::from_position(position)
                .ok_or_else(|| format!("byte {} does not start a trace header field", byte).into())
        };
        options = options.with_fields(field(il)?, field(xl)?);
    }

    let file = SegyFile::open_with(path, OpenMode::parse("r")?, options)?;

    println!("SEG-Y Inspect: {}", path);
    println!("=====================================\n");
    println!("{}\n", file.summary());

    println!("Textual header:");
    let text = file.text(0)?;
    let cards: Vec<char> = text.chars().collect();
    for card in cards.chunks(80).take(40) {
        let line: String = card.iter().collect();
        let line = line.trim_end();
        if !line.is_empty() {
            println!("  {}", line);
        }
    }
    println!();

    println!("Binary header (non-zero fields):");
    let bin = file.bin()?;
    for (field, value) in bin.fields().filter(|(_, value)| *value != 0) {
        println!("  {:>4} {:<28} {}", field.position(), field.name(), value);
    }
    println!("  format from {}: {}", BinField::Format, file.format());
    println!();

    println!("Geometry:");
    println!("  Sorting:    {}", file.sorting());
    println!("  Offsets:    {}", file.offsets());
    println!("  Regular:    {}", file.geometry().is_regular());
    if let (Some(first), Some(last)) = (file.ilines().first(), file.ilines().last()) {
        println!("  Inlines:    {} ({} .. {})", file.ilines().len(), first, last);
    }
    if let (Some(first), Some(last)) = (file.xlines().first(), file.xlines().last()) {
        println!("  Crosslines: {} ({} .. {})", file.xlines().len(), first, last);
    }
    println!("  Interval:   {} ms", file.sample_interval()?);
    println!();

    if file.tracecount() > 0 {
        println!("Trace 0 header (non-zero fields):");
        let header = file.headers().get(0)?;
        for (field, value) in header.fields().filter(|(_, value)| *value != 0) {
            println!("  {:>4} {:<28} {}", field.position(), field.name(), value);
        }
        println!();

        let trace = file.traces().read(0)?;
        let (min, max) = trace
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        println!(
            "Trace 0 samples: min {:.4}, max {:.4}, mean {:.4}",
            min,
            max,
            trace.mean().unwrap_or(0.0)
        );
    }

    if file.sorting().is_known() {
        if let Some(&il) = file.ilines().get(file.ilines().len() / 2) {
            let line = file.iline().get(il)?;
            let rms = (line.mapv(|v| v * v).mean().unwrap_or(0.0)).sqrt();
            println!("Inline {}: shape {:?}, rms {:.4}", il, line.dim(), rms);
        }
    }

    println!("\n✓ Inspection complete!");
    Ok(())
}
