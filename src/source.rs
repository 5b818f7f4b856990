use crate::config::SignalConfig;
use crate::model::{Sample, Series};
use anyhow::{Context, Result};
use rand::prelude::*;
use rand_chacha::ChaCha12Rng;
use rand_distr::Normal;

/// Generate the reference thrust curve.
///
/// 100 evenly spaced samples over [0, 10] s with thrust `10 sin(t) + 15` N.
pub fn load_data() -> Result<Series> {
    generate_series(&SignalConfig::default())
}

/// Generate a synthetic thrust curve.
///
/// Time points are evenly spaced over `[t_start, t_end]`, both ends included.
/// Thrust is `amplitude sin(t) + offset`, plus optional seeded Gaussian noise
/// and spikes. The output only depends on `cfg`.
pub fn generate_series(cfg: &SignalConfig) -> Result<Series> {
    let time = linspace(cfg.t_start, cfg.t_end, cfg.n_samples);
    let mut thrust: Vec<f64> = time
        .iter()
        .map(|&t| cfg.amplitude * t.sin() + cfg.offset)
        .collect();

    if cfg.noise_std > 0.0 {
        let mut rng = ChaCha12Rng::seed_from_u64(cfg.seed);
        let noise_dist = Normal::new(0.0, cfg.noise_std)?;
        thrust
            .iter_mut()
            .for_each(|val| *val += noise_dist.sample(&mut rng));
    }

    for spike in &cfg.spikes {
        let val = thrust
            .get_mut(spike.index)
            .with_context(|| format!("spike index {} is out of range", spike.index))?;
        *val += spike.delta;
    }

    let samples = time
        .into_iter()
        .zip(thrust)
        .map(|(time, thrust)| Sample::new(time, thrust))
        .collect();

    let series = Series::new(samples).context("failed to construct series")?;
    log::debug!("generated {} samples", series.len());

    Ok(series)
}

/// Evenly spaced values over `[start, end]`.
///
/// The last value is exactly `end` and a single value sits at `start`.
pub(crate) fn linspace(start: f64, end: f64, n_vals: usize) -> Vec<f64> {
    match n_vals {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n_vals - 1) as f64;
            let mut vals: Vec<f64> = (0..n_vals).map(|i| start + i as f64 * step).collect();
            vals[n_vals - 1] = end;
            vals
        }
    }
}
