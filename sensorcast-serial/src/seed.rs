use std::io::Write;

use sensorcast_core::SensorcastError;

use crate::readings::{Reading, TS_FORMAT};

/// Sensor ids the seed script writes readings under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedTargets {
    /// Sensor id for temperature values.
    pub temperature_sensor: u32,
    /// Sensor id for humidity values.
    pub humidity_sensor: u32,
}

impl Default for SeedTargets {
    fn default() -> Self {
        Self {
            temperature_sensor: 1,
            humidity_sensor: 2,
        }
    }
}

/// Write an SQL script inserting every reading under both sensor ids.
///
/// Each reading yields one temperature and one humidity `INSERT` into
/// `LEITURA_SENSOR (SENSOR_ID, DATA_HORA, VALOR)`; the script ends with `COMMIT;`.
///
/// # Errors
/// Returns `Io` when the writer fails.
pub fn write_sql_seed<W: Write>(
    mut out: W,
    readings: &[Reading],
    targets: &SeedTargets,
) -> Result<(), SensorcastError> {
    writeln!(out, "-- generated from an ESP32 serial capture")?;
    writeln!(
        out,
        "ALTER SESSION SET NLS_TIMESTAMP_FORMAT = 'YYYY-MM-DD HH24:MI:SS';"
    )?;
    for r in readings {
        let ts = r.ts.format(TS_FORMAT);
        for (sensor, value) in [
            (targets.temperature_sensor, r.temperature),
            (targets.humidity_sensor, r.humidity),
        ] {
            writeln!(
                out,
                "INSERT INTO LEITURA_SENSOR (SENSOR_ID, DATA_HORA, VALOR) VALUES ({sensor}, TO_TIMESTAMP('{ts}','YYYY-MM-DD HH24:MI:SS'), {value:.2});"
            )?;
        }
    }
    writeln!(out, "COMMIT;")?;
    out.flush()?;
    Ok(())
}
