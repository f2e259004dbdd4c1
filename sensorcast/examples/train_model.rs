mod common;

use sensorcast::{
    LinearRegressor, PersistenceRegressor, Regressor, Sensorcast, StreamSpec, write_metrics,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    common::init();

    // 1. Temperature is predicted one minute ahead from itself plus humidity.
    let sc = Sensorcast::builder()
        .with_source(common::get_source())
        .target(StreamSpec::new(1, "TEMP"))
        .auxiliary(StreamSpec::new(2, "HUMIDITY"))
        .build()?;

    // 2. Score a baseline and the linear model on the same frame.
    let window = common::window();
    let mut models: Vec<Box<dyn Regressor>> = vec![
        Box::new(PersistenceRegressor::new()),
        Box::new(LinearRegressor::new()),
    ];
    let mut best = None;
    for model in &mut models {
        let report = match sc.train(&window, model.as_mut()).await {
            Ok(r) => r,
            Err(e) if e.is_insufficient_data() => {
                eprintln!("insufficient data: {e}");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };
        println!(
            "{:<18} MAE={:.4} train={} test={}{}",
            report.metrics.model,
            report.metrics.value,
            report.train_rows,
            report.test_rows,
            if report.in_sample { " (in-sample)" } else { "" }
        );
        best = Some(report.metrics);
    }

    // 3. Hand the linear model's metrics to whatever displays them.
    if let Some(metrics) = best {
        let path = std::env::var("SENSORCAST_METRICS_PATH")
            .unwrap_or_else(|_| "metrics.json".to_string());
        write_metrics(&path, &metrics)?;
        println!("wrote {path}");
    }

    Ok(())
}
