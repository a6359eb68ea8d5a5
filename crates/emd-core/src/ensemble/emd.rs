//! Plain EMD: a single, noise-free sifting pass per mode (§4.E "EMD").

use ndarray::Array2;

use crate::config::EmdConfig;
use crate::error::EmdError;
use crate::kernels;
use crate::modes::emd_num_imfs;
use crate::sift::{sift, SiftWorkspace};

/// Decompose `input` into an `m x n` matrix of IMFs plus residual.
///
/// # Arguments
///
/// * `input` - the signal, length `n`.
/// * `config` - sifting parameters (§4.G); validated first (§4.F).
/// * `m` - requested row count; `0` requests [`emd_num_imfs`].
///
/// # Errors
///
/// Returns [`EmdError::NoConvergencePossible`] if neither `s_number` nor
/// `num_siftings` is set, or propagates a spline error from the sifter.
pub fn emd(input: &[f64], config: &EmdConfig, m: usize) -> Result<Array2<f64>, EmdError> {
    config.validate()?;
    let n = input.len();
    let m = if m == 0 { emd_num_imfs(n) } else { m };
    tracing::info!(n, m, "running emd");
    run_into_matrix(input, config, m)
}

/// Shared core used both by the public `emd` entry point and by each EEMD
/// ensemble member (§4.E "EEMD" — "Run EMD on it").
pub(crate) fn run_into_matrix(
    input: &[f64],
    config: &EmdConfig,
    m: usize,
) -> Result<Array2<f64>, EmdError> {
    let n = input.len();
    let mut out = Array2::<f64>::zeros((m, n));
    if n == 0 || m == 0 {
        return Ok(out);
    }

    let mut residual = input.to_vec();
    let mut ws = SiftWorkspace::new(n);

    for imf_i in 0..m - 1 {
        let mut working = residual.clone();
        let outcome = sift(
            &mut working,
            &mut ws,
            config.s_number,
            config.num_siftings,
            config.max_sift_iterations,
        )?;
        tracing::debug!(imf = imf_i, iterations = outcome.iterations, "extracted imf");
        out.row_mut(imf_i)
            .assign(&ndarray::ArrayView1::from(working.as_slice()));
        kernels::sub(&working, &mut residual);
    }
    out.row_mut(m - 1)
        .assign(&ndarray::ArrayView1::from(residual.as_slice()));
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_length_input_succeeds_with_empty_output() {
        let cfg = EmdConfig::default();
        let out = emd(&[], &cfg, 0).unwrap();
        assert_eq!(out.shape(), &[0, 0]);
    }

    #[test]
    fn constant_input_reconstructs_from_the_residual_row() {
        let input = vec![3.0_f64; 128];
        let cfg = EmdConfig {
            s_number: 4,
            num_siftings: 50,
            ..Default::default()
        };
        let out = emd(&input, &cfg, 0).unwrap();
        assert_eq!(out.nrows(), crate::modes::emd_num_imfs(128));
        let last = out.nrows() - 1;
        for j in 0..128 {
            assert!((out[(last, j)] - 3.0).abs() < 1e-9);
        }
        let sum: f64 = (0..out.nrows()).map(|i| out[(i, 0)]).sum();
        assert!((sum - 3.0).abs() < 1e-9);
    }

    #[test]
    fn reconstruction_holds_for_a_pure_sinusoid() {
        let n = 256;
        let input: Vec<f64> = (0..n)
            .map(|i| (2.0 * std::f64::consts::PI * i as f64 / 64.0).sin())
            .collect();
        let cfg = EmdConfig {
            s_number: 4,
            num_siftings: 10,
            ..Default::default()
        };
        let out = emd(&input, &cfg, 0).unwrap();
        let max_abs_input = input.iter().fold(0.0_f64, |a, &v| a.max(v.abs()));
        let tol = 1e-10 * n as f64 * max_abs_input;
        for j in 0..n {
            let sum: f64 = (0..out.nrows()).map(|i| out[(i, j)]).sum();
            assert!((sum - input[j]).abs() < tol.max(1e-6));
        }
        // First IMF should closely track the sinusoid itself.
        let linf: f64 = (0..n)
            .map(|j| (out[(0, j)] - input[j]).abs())
            .fold(0.0, f64::max);
        assert!(linf < 1e-2, "first IMF diverges from input: linf={linf}");
    }

    #[test]
    fn two_tone_signal_separates_high_and_low_frequency() {
        let n = 512;
        let input: Vec<f64> = (0..n)
            .map(|i| {
                (2.0 * std::f64::consts::PI * i as f64 / 16.0).sin()
                    + 0.5 * (2.0 * std::f64::consts::PI * i as f64 / 128.0).sin()
            })
            .collect();
        let cfg = EmdConfig {
            s_number: 4,
            num_siftings: 20,
            ..Default::default()
        };
        let out = emd(&input, &cfg, 0).unwrap();
        let peak0 = (0..n).map(|j| out[(0, j)].abs()).fold(0.0, f64::max);
        assert!((peak0 - 1.0).abs() / 1.0 < 0.10, "peak0={peak0}");
    }

    #[test]
    fn missing_stopping_criterion_is_rejected() {
        let cfg = EmdConfig {
            s_number: 0,
            num_siftings: 0,
            ..Default::default()
        };
        let err = emd(&[1.0, 2.0, 3.0, 4.0], &cfg, 0).unwrap_err();
        assert_eq!(err, EmdError::NoConvergencePossible);
    }
}
