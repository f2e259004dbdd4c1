//! Convert an ESP32 serial capture into a readings CSV and an SQL seed script.
//!
//! Usage: `serial_to_csv [LOG] [CSV_OUT] [SQL_OUT]`. Without a log path a short
//! built-in capture is used.
mod common;

use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor};

use sensorcast_serial::{
    ReadingsPlan, SeedTargets, parse_serial_log, write_readings_csv, write_sql_seed,
};

const SAMPLE_LOG: &str = "\
--- Terminal on /dev/ttyUSB0 | 115200 8-N-1
contador,fosforo,potassio,ph,umidade,bomba
1,1,0,6.5,42.0,0
2,1,1,6.6,41.5,0
3,0,1,6.8,39.0,1
4,0,0,7.1,37.2,1
";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    common::init();
    let args: Vec<String> = std::env::args().skip(1).collect();

    let rows = match args.first() {
        Some(path) => parse_serial_log(BufReader::new(File::open(path)?))?,
        None => parse_serial_log(Cursor::new(SAMPLE_LOG))?,
    };
    println!("parsed {} serial rows", rows.len());

    let now = chrono::Utc::now().naive_utc();
    let plan = ReadingsPlan::ending_at(now, ReadingsPlan::DEFAULT_INTERVAL, rows.len());
    let readings = plan.readings(&rows, &mut rand::rng());

    let csv_out = args.get(1).map_or("readings.csv", String::as_str);
    write_readings_csv(BufWriter::new(File::create(csv_out)?), &readings)?;
    println!("wrote {csv_out}");

    let sql_out = args.get(2).map_or("seed.sql", String::as_str);
    write_sql_seed(
        BufWriter::new(File::create(sql_out)?),
        &readings,
        &SeedTargets::default(),
    )?;
    println!("wrote {sql_out}");

    Ok(())
}
