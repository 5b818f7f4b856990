use crate::config::Config;
use crate::detector::detect_anomalies;
use crate::metrics::{Metrics, calculate_metrics};
use crate::model::{Anomaly, Series};
use crate::render::Renderer;
use crate::report::{write_anomalies, write_metrics};
use crate::source::generate_series;
use anyhow::{Context, Result};
use std::io::Write;

/// Results of a single run.
#[derive(Debug)]
pub struct Outcome {
    pub series: Series,
    pub anomalies: Vec<Anomaly>,
    pub metrics: Metrics,
}

/// Generate, screen, summarize and plot a thrust curve.
pub struct Pipeline {
    cfg: Config,
}

impl Pipeline {
    pub fn new(cfg: Config) -> Result<Self> {
        cfg.validate().context("failed to validate config")?;
        log::info!("{cfg:#?}");
        Ok(Self { cfg })
    }

    /// Run the pipeline, writing the textual report to `out`.
    ///
    /// The report is flushed before the renderer (if any) is invoked.
    pub fn run<W: Write>(
        &self,
        out: &mut W,
        renderer: Option<&mut dyn Renderer>,
    ) -> Result<Outcome> {
        let series = generate_series(&self.cfg.signal).context("failed to generate series")?;

        let anomalies = detect_anomalies(&series, self.cfg.detection.threshold_std)
            .context("failed to detect anomalies")?;
        log::info!("detected {} anomalies", anomalies.len());
        write_anomalies(out, &anomalies).context("failed to write anomalies")?;

        let metrics = calculate_metrics(&series).context("failed to calculate metrics")?;
        write_metrics(out, &metrics).context("failed to write metrics")?;
        out.flush().context("failed to flush report")?;

        if let Some(renderer) = renderer {
            renderer
                .render(&series, &anomalies)
                .context("failed to render plot")?;
        }

        Ok(Outcome {
            series,
            anomalies,
            metrics,
        })
    }
}
