mod common;

use sensorcast::{Sensorcast, StreamSpec};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    common::init();

    let threshold: f64 = std::env::var("SENSORCAST_ALERT_THRESHOLD")
        .ok()
        .and_then(|t| t.parse().ok())
        .unwrap_or(28.0);

    let sc = Sensorcast::builder()
        .with_source(common::get_source())
        .target(StreamSpec::new(1, "TEMP"))
        .auxiliary(StreamSpec::new(2, "HUMIDITY"))
        .metrics_path(
            std::env::var("SENSORCAST_METRICS_PATH").unwrap_or_else(|_| "metrics.json".to_string()),
        )
        .build()?;

    let report = match sc.dashboard(&common::window(), threshold).await {
        Ok(r) => r,
        Err(e) if e.is_insufficient_data() => {
            eprintln!("nothing to show: {e}");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let snap = &report.snapshot;
    println!("{} rows ({} / {})", snap.rows, snap.target_label, snap.aux_label);
    if let (Some(min), Some(max), Some(mean)) = (snap.target_min, snap.target_max, snap.target_mean)
    {
        println!("{}: min {min:.2} max {max:.2} mean {mean:.2}", snap.target_label);
    }
    if let Some(aux) = snap.aux_mean {
        println!("{}: mean {aux:.2}", snap.aux_label);
    }

    println!("{} alert(s) above {threshold:.1}", snap.alert_count());
    for alert in &snap.alerts {
        println!("  {} -> {:.2}", alert.bucket, alert.value);
    }

    if let Some(m) = &report.model {
        println!("model {}: {} = {:.3}", m.model, m.metric, m.value);
    }

    if !report.warnings.is_empty() {
        eprintln!("warnings:");
        for w in &report.warnings {
            eprintln!("- {w}");
        }
    }

    Ok(())
}
