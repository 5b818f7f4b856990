use crate::detector::DEFAULT_THRESHOLD_STD;
use crate::source::linspace;
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::{fmt::Debug, fs, ops::RangeBounds, path::Path};

/// Run configuration.
///
/// Every field has a default, so an empty file (or no file at all)
/// reproduces the reference thrust curve. See [`Config::from_file`] for loading.
#[derive(Debug, Default, PartialEq, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Synthetic signal parameters.
    pub signal: SignalConfig,
    /// Anomaly detection parameters.
    pub detection: DetectionConfig,
    /// Output parameters.
    pub output: OutputConfig,
}

/// Synthetic thrust signal parameters.
#[derive(Debug, PartialEq, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SignalConfig {
    /// Number of samples, at least 2.
    pub n_samples: usize,
    /// Time of the first sample (s).
    pub t_start: f64,
    /// Time of the last sample (s).
    pub t_end: f64,

    /// Amplitude of the sine oscillation (N).
    pub amplitude: f64,
    /// Constant thrust offset (N).
    pub offset: f64,

    /// Standard deviation of the additive Gaussian noise (N).
    pub noise_std: f64,
    /// Seed of the noise generator.
    pub seed: u64,
    /// Thrust spikes added on top of the signal.
    pub spikes: Vec<Spike>,
}

/// Thrust disturbance added to a single sample.
#[derive(Debug, PartialEq, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Spike {
    /// Sample index.
    pub index: usize,
    /// Thrust added to the sample (N).
    pub delta: f64,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            n_samples: 100,
            t_start: 0.0,
            t_end: 10.0,
            amplitude: 10.0,
            offset: 15.0,
            noise_std: 0.0,
            seed: 0,
            spikes: Vec::new(),
        }
    }
}

/// Anomaly detection parameters.
#[derive(Debug, PartialEq, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DetectionConfig {
    /// Number of standard deviations from the mean beyond which a sample is anomalous.
    pub threshold_std: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            threshold_std: DEFAULT_THRESHOLD_STD,
        }
    }
}

#[derive(Debug, PartialEq, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Show the interactive thrust plot.
    pub plot: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { plot: true }
    }
}

impl Config {
    /// Load a [`Config`] from a TOML file.
    ///
    /// Missing fields take their default values.
    /// Performs validation on all parameters before returning.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, deserialized,
    /// or if the configuration values are invalid.
    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<Self> {
        let file = file.as_ref();
        let contents =
            fs::read_to_string(file).with_context(|| format!("failed to read {file:?}"))?;

        Self::from_toml(&contents)
    }

    /// Parse and validate a [`Config`] from a TOML string.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents).context("failed to deserialize config")?;

        config.validate().context("failed to validate config")?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.signal.validate().context("invalid signal parameters")?;
        check_num(
            self.detection.threshold_std,
            f64::MIN_POSITIVE..f64::INFINITY,
        )
        .context("invalid anomaly threshold")?;
        Ok(())
    }
}

impl SignalConfig {
    fn validate(&self) -> Result<()> {
        check_num(self.n_samples, 2..=1_000_000).context("invalid number of samples")?;

        check_finite(self.t_start).context("invalid start time")?;
        check_finite(self.t_end).context("invalid end time")?;
        if self.t_end <= self.t_start {
            bail!(
                "end time must be greater than start time ({}), but is {}",
                self.t_start,
                self.t_end
            );
        }
        let time = linspace(self.t_start, self.t_end, self.n_samples);
        if time.windows(2).any(|pair| pair[1] <= pair[0]) {
            bail!(
                "time step over [{}, {}] with {} samples is below floating point resolution",
                self.t_start,
                self.t_end,
                self.n_samples
            );
        }

        check_finite(self.amplitude).context("invalid amplitude")?;
        check_finite(self.offset).context("invalid offset")?;
        check_num(self.noise_std, 0.0..f64::INFINITY)
            .context("invalid noise standard deviation")?;

        for (i_spike, spike) in self.spikes.iter().enumerate() {
            check_num(spike.index, 0..self.n_samples)
                .with_context(|| format!("invalid index of spike {i_spike}"))?;
            check_finite(spike.delta)
                .with_context(|| format!("invalid delta of spike {i_spike}"))?;
        }

        Ok(())
    }
}

fn check_num<T, R>(num: T, range: R) -> Result<()>
where
    T: PartialOrd + Debug,
    R: RangeBounds<T> + Debug,
{
    if !range.contains(&num) {
        bail!("number must be in the range {range:?}, but is {num:?}");
    }
    Ok(())
}

fn check_finite(num: f64) -> Result<()> {
    if !num.is_finite() {
        bail!("number must be finite, but is {num:?}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::from_toml("").expect("empty config should parse");
        assert_eq!(config, Config::default());
        assert_eq!(config.signal.n_samples, 100);
        assert_eq!(config.detection.threshold_std, 3.0);
        assert!(config.output.plot);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = Config::from_toml(
            "[signal]\n\
             noise_std = 0.5\n\
             spikes = [ { index = 10, delta = 50.0 } ]\n\
             \n\
             [detection]\n\
             threshold_std = 2.5\n",
        )
        .expect("config should parse");

        assert_eq!(config.signal.noise_std, 0.5);
        assert_eq!(config.signal.t_end, 10.0);
        assert_eq!(
            config.signal.spikes,
            vec![Spike {
                index: 10,
                delta: 50.0
            }]
        );
        assert_eq!(config.detection.threshold_std, 2.5);
    }

    #[test]
    fn rejects_non_positive_threshold() {
        assert!(Config::from_toml("[detection]\nthreshold_std = 0.0\n").is_err());
        assert!(Config::from_toml("[detection]\nthreshold_std = -1.0\n").is_err());
    }

    #[test]
    fn rejects_bad_signal() {
        assert!(Config::from_toml("[signal]\nn_samples = 0\n").is_err());
        assert!(Config::from_toml("[signal]\nn_samples = 1\n").is_err());
        assert!(Config::from_toml("[signal]\nt_start = 5.0\nt_end = 5.0\n").is_err());
        assert!(Config::from_toml("[signal]\nnoise_std = -0.1\n").is_err());
        assert!(
            Config::from_toml("[signal]\nspikes = [ { index = 100, delta = 1.0 } ]\n").is_err()
        );
    }

    #[test]
    fn rejects_unresolvable_time_grid() {
        // Steps of about 1 s fall below the spacing of f64 values near 1e17.
        let collapsed = "[signal]\nt_start = 1e17\nt_end = 1.000000000000001e17\n";
        let err = Config::from_toml(collapsed).expect_err("collapsed time grid");
        assert!(format!("{err:#}").contains("floating point resolution"));

        let resolved = "[signal]\nt_start = 1e6\nt_end = 1.0001e6\n";
        assert!(Config::from_toml(resolved).is_ok());
    }

    #[test]
    fn rejects_unknown_fields() {
        assert!(Config::from_toml("[signal]\nn_sample = 10\n").is_err());
    }
}
