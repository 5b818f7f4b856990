use crate::model::Series;
use crate::stats::{Accumulator, trapezoid};
use anyhow::{Result, bail};

/// Summary metrics of a thrust curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    /// Time integral of thrust (N s).
    pub total_impulse: f64,
    /// Time between the first and last sample (s).
    pub burn_time: f64,
    /// Mean thrust over all samples (N).
    pub average_thrust: f64,
}

/// Compute the total impulse (trapezoidal rule), burn time and average thrust.
///
/// # Errors
/// Returns an error if the series has fewer than 2 samples.
pub fn calculate_metrics(series: &Series) -> Result<Metrics> {
    let (Some(first), Some(last)) = (series.first(), series.last()) else {
        bail!("series must contain at least 2 samples, but is empty");
    };
    if series.len() < 2 {
        bail!(
            "series must contain at least 2 samples, but has {}",
            series.len()
        );
    }

    let time: Vec<f64> = series.samples().iter().map(|smp| smp.time).collect();
    let thrust: Vec<f64> = series.thrust().collect();
    let thrust_report = thrust.iter().copied().collect::<Accumulator>().report();

    let metrics = Metrics {
        total_impulse: trapezoid(&time, &thrust),
        burn_time: last.time - first.time,
        average_thrust: thrust_report.mean,
    };
    log::debug!("{metrics:?}");

    Ok(metrics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Sample;
    use crate::source::load_data;

    #[test]
    fn two_point_scenario() {
        let series = Series::new(vec![Sample::new(0.0, 10.0), Sample::new(1.0, 12.0)])
            .expect("valid series");
        let metrics = calculate_metrics(&series).expect("two samples");

        assert_eq!(metrics.burn_time, 1.0);
        assert_eq!(metrics.average_thrust, 11.0);
        assert_eq!(metrics.total_impulse, 11.0);
    }

    #[test]
    fn reference_curve_metrics() {
        let series = load_data().expect("reference curve");
        let metrics = calculate_metrics(&series).expect("reference curve");

        assert_eq!(metrics.burn_time, 10.0);

        // The sampled sine term does not average out exactly over [0, 10].
        let sin_mean = series.samples().iter().map(|s| s.time.sin()).sum::<f64>() / 100.0;
        let expected = 15.0 + 10.0 * sin_mean;
        assert!((metrics.average_thrust - expected).abs() < 1e-9);
        assert!((metrics.average_thrust - 15.0).abs() < 2.0);

        // Exact integral of 10 sin(t) + 15 over [0, 10].
        let exact = 10.0 * (1.0 - 10.0_f64.cos()) + 150.0;
        assert!((metrics.total_impulse - exact).abs() < 0.1);
    }

    #[test]
    fn metrics_are_pure() {
        let series = load_data().expect("reference curve");
        let first = calculate_metrics(&series).expect("first call");
        let second = calculate_metrics(&series).expect("second call");
        assert_eq!(first, second);
    }

    #[test]
    fn rejects_fewer_than_two_samples() {
        assert!(calculate_metrics(&Series::default()).is_err());

        let series = Series::new(vec![Sample::new(0.0, 10.0)]).expect("valid series");
        assert!(calculate_metrics(&series).is_err());
    }
}
