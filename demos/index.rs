use std::{fs::File, time::Instant};

use anyhow::Result;
use clap::Parser;
use fastmarc::{Reader, ReaderOptions};

#[derive(Parser)]
struct Args {
    /// Path to a length-prefixed record file (e.g. a MARC .mrc file)
    #[clap(required = true)]
    path: String,
    /// Number of iteration passes to time after the index is built
    #[clap(long, default_value_t = 3)]
    repeats: usize,
    /// Skip memory mapping and read through the file handle
    #[clap(long)]
    streaming: bool,
    /// Print the offset of every record
    #[clap(long)]
    seek_map: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let options = if args.streaming {
        ReaderOptions::streaming()
    } else {
        ReaderOptions::default()
    };

    let file = File::open(&args.path)?;
    let start = Instant::now();
    let reader = Reader::<_>::open_with_options(&file, options)?;
    let build = start.elapsed();

    eprintln!("Records: {}", reader.len());
    eprintln!("Trailing bytes ignored: {}", reader.trailing_bytes());
    eprintln!("Index build: {:?}", build);

    for pass in 0..args.repeats {
        let start = Instant::now();
        let mut bytes = 0;
        for record in reader.iter()? {
            bytes += record?.len();
        }
        let elapsed = start.elapsed();
        eprintln!(
            "Pass {}: {:?} ({:.2} GB/s)",
            pass + 1,
            elapsed,
            bytes as f64 / elapsed.as_secs_f64().max(f64::EPSILON) / 1_000_000_000.0
        );
    }

    if args.seek_map {
        for offset in reader.seek_map() {
            println!("{}", offset);
        }
    }

    Ok(())
}
