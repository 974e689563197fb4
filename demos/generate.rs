use std::{
    fs::File,
    io::{BufWriter, Write},
    time::Instant,
};

use anyhow::{ensure, Result};
use clap::Parser;
use fastmarc::{LENGTH_PREFIX, MAX_RECORD_LEN};
use rand::{rngs::SmallRng, Rng, SeedableRng};

#[derive(Parser)]
struct Args {
    /// Output file path
    #[clap(required = true)]
    path: String,
    /// Number of records to generate (in thousands)
    #[clap(long, default_value_t = 100.0)]
    records: f64,
    /// Smallest record length, prefix included
    #[clap(long, default_value_t = 256)]
    min_len: u32,
    /// Largest record length, prefix included
    #[clap(long, default_value_t = 4096)]
    max_len: u32,
    /// Bytes of non-record padding appended after the last record
    #[clap(long, default_value_t = 0)]
    trailing: usize,
    #[clap(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    ensure!(
        args.min_len as usize >= LENGTH_PREFIX && args.min_len <= args.max_len,
        "record lengths must satisfy {} <= min-len <= max-len",
        LENGTH_PREFIX
    );
    ensure!(
        args.max_len <= MAX_RECORD_LEN,
        "max-len cannot exceed {}",
        MAX_RECORD_LEN
    );

    let mut writer = File::create(&args.path).map(BufWriter::new)?;
    let mut rng = if let Some(seed) = args.seed {
        SmallRng::seed_from_u64(seed)
    } else {
        SmallRng::from_os_rng()
    };

    let start = Instant::now();
    let num_records = (args.records * 1_000.0) as usize;
    let mut body = Vec::with_capacity(args.max_len as usize);
    let mut total_bytes = 0;
    for _ in 0..num_records {
        let len = rng.random_range(args.min_len..=args.max_len) as usize;
        body.clear();
        body.resize(len - LENGTH_PREFIX, 0);
        rng.fill(&mut body[..]);
        // printable body ending in the MARC record terminator
        body.iter_mut().for_each(|b| *b = b'!' + *b % 90);
        if let Some(last) = body.last_mut() {
            *last = 0x1d;
        }

        write!(writer, "{:05}", len)?;
        writer.write_all(&body)?;
        total_bytes += len;
    }
    writer.write_all(&vec![b'\n'; args.trailing])?;
    writer.flush()?;
    let elapsed = start.elapsed();

    eprintln!("Finished generating {} records", num_records);
    eprintln!("Elapsed time: {:?}", elapsed);
    eprintln!(
        "Bandwidth: {:.2} GB/s",
        (total_bytes + args.trailing) as f64
            / elapsed.as_secs_f64().max(f64::EPSILON)
            / 1_000_000_000.0
    );

    Ok(())
}
