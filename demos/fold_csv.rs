//! Fold a CSV file two ways
//!
//! Usage: cargo run --example fold_csv -- <file.csv> [row-id]
//!
//! 1. Collect every record and look one up by `id`
//! 2. Sum the numeric period columns of the matching row

use csvfold::{CsvFoldError, CsvFolder, Record};
use std::error::Error;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<(), Box<dyn Error>> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let mut args = std::env::args().skip(1);
    let path = args.next().ok_or("missing CSV path argument")?;
    let wanted = args.next();

    let folder = CsvFolder::new(&path);

    // 1. Collect all records
    let records: Vec<Record> = folder.fold_default(|acc: &mut Vec<Record>, record| {
        acc.push(record);
        Ok::<_, CsvFoldError>(())
    })?;
    info!(records = records.len(), "collected records");

    let Some(id) = wanted.or_else(|| records.first().and_then(|r| r.get("id")).map(String::from))
    else {
        info!("file has no rows");
        return Ok(());
    };

    if let Some(row) = records.iter().find(|r| r.get("id") == Some(id.as_str())) {
        for (header, value) in row.iter() {
            println!("{header:>12}: {value}");
        }
    }

    // 2. Running sum over the period columns of one row
    let (sum, count) = folder.fold((0.0f64, 0usize), |(sum, count), record| {
        if record.get("id") != Some(id.as_str()) {
            return Ok((sum, count));
        }
        let mut sum = sum;
        let mut count = count;
        for (header, value) in record.iter() {
            if header == "id" || header == "scale" {
                continue;
            }
            sum += value.parse::<f64>()?;
            count += 1;
        }
        Ok::<_, std::num::ParseFloatError>((sum, count))
    })?;

    if count > 0 {
        println!("mean for {}: {}", id, sum / count as f64);
    }
    Ok(())
}
