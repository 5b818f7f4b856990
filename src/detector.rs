use crate::model::{Anomaly, Series};
use crate::stats::Accumulator;
use anyhow::{Result, bail};

/// Default number of standard deviations from the mean beyond which a sample is anomalous.
pub const DEFAULT_THRESHOLD_STD: f64 = 3.0;

/// Flag samples whose thrust deviates from the series mean by more than
/// `threshold_std` sample standard deviations.
///
/// A sample is anomalous when its thrust is strictly greater than
/// `mean + threshold_std * std` or strictly less than `mean - threshold_std * std`.
/// Anomalies are returned in series order.
///
/// An empty series, a single sample or a constant series yields no anomalies.
///
/// # Errors
/// Returns an error if `threshold_std` is not a positive finite number.
pub fn detect_anomalies(series: &Series, threshold_std: f64) -> Result<Vec<Anomaly>> {
    if !(threshold_std.is_finite() && threshold_std > 0.0) {
        bail!("threshold must be a positive finite number, but is {threshold_std:?}");
    }

    let report = series.thrust().collect::<Accumulator>().report();
    if report.n_vals < 2 {
        return Ok(Vec::new());
    }

    let upper = report.mean + threshold_std * report.std_dev;
    let lower = report.mean - threshold_std * report.std_dev;

    let anomalies: Vec<_> = series
        .samples()
        .iter()
        .enumerate()
        .filter(|(_, smp)| smp.thrust > upper || smp.thrust < lower)
        .map(|(index, &sample)| Anomaly { index, sample })
        .collect();

    log::debug!(
        "mean {} std {} bounds [{lower}, {upper}]: {} anomalies",
        report.mean,
        report.std_dev,
        anomalies.len()
    );

    Ok(anomalies)
}
