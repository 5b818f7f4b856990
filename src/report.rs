use crate::metrics::Metrics;
use crate::model::Anomaly;
use anyhow::Result;
use std::io::Write;

/// Write the anomaly table, or nothing if there are no anomalies.
pub fn write_anomalies<W: Write>(out: &mut W, anomalies: &[Anomaly]) -> Result<()> {
    if anomalies.is_empty() {
        return Ok(());
    }

    writeln!(out, "Anomalies detected:")?;
    writeln!(out, "{:>8} {:>16} {:>16}", "index", "time", "thrust")?;
    for anm in anomalies {
        writeln!(
            out,
            "{:>8} {:>16.6} {:>16.6}",
            anm.index, anm.sample.time, anm.sample.thrust
        )?;
    }
    Ok(())
}

pub fn write_metrics<W: Write>(out: &mut W, metrics: &Metrics) -> Result<()> {
    writeln!(out, "Total Impulse: {} Ns", metrics.total_impulse)?;
    writeln!(out, "Burn Time: {} seconds", metrics.burn_time)?;
    writeln!(out, "Average Thrust: {} N", metrics.average_thrust)?;
    Ok(())
}
