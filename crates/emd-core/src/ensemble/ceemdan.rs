//! CEEMDAN: complete ensemble EMD with adaptive noise (§4.E "CEEMDAN").
//!
//! Unlike EEMD, which averages independent full-EMD runs, CEEMDAN extracts
//! one mode at a time from a single running residual, re-seeding each
//! ensemble member's forcing noise from that member's own running
//! decomposition of its noise realisation (the "noise-mode recurrence").

use std::sync::Mutex;

use ndarray::Array2;
use rayon::prelude::*;

use crate::config::CeemdanConfig;
use crate::error::EmdError;
use crate::kernels;
use crate::modes::emd_num_imfs;
use crate::rng::{fill_unit_gaussian, member_rng};
use crate::sift::{sift, SiftWorkspace};

/// Per-member state carried across outer mode iterations: the evolving
/// forcing noise (`noise`), its running decomposition residual
/// (`noise_residual`), and a workspace reused across both (§5's "allocate
/// outside inner loops").
struct MemberState {
    noise: Vec<f64>,
    noise_residual: Vec<f64>,
    ws: SiftWorkspace,
}

/// Decompose `input` with CEEMDAN: each IMF is extracted from a shared
/// running residual, forced on every ensemble member by a distinct mode of
/// that member's own white-noise realisation.
///
/// # Arguments
///
/// * `input` - the signal, length `n`.
/// * `config` - ensemble parameters (§4.G); validated first (§4.F).
/// * `m` - requested row count; `0` requests [`emd_num_imfs`].
///
/// # Errors
///
/// Propagates the first [`EmdError`] observed while sifting any member's
/// forced signal or noise realisation.
pub fn ceemdan(input: &[f64], config: &CeemdanConfig, m: usize) -> Result<Array2<f64>, EmdError> {
    config.validate()?;
    let n = input.len();
    let m = if m == 0 { emd_num_imfs(n) } else { m };
    tracing::info!(
        n,
        m,
        ensemble_size = config.ensemble_size,
        noise_strength = config.noise_strength,
        "running ceemdan"
    );

    if n == 0 || m == 0 {
        return Ok(Array2::zeros((m, n)));
    }

    let mut members: Vec<MemberState> = (0..config.ensemble_size)
        .map(|en_i| {
            let mut rng = member_rng(config.rng_seed, en_i);
            let mut noise = vec![0.0; n];
            fill_unit_gaussian(&mut rng, &mut noise);
            MemberState {
                noise,
                noise_residual: Vec::new(),
                ws: SiftWorkspace::new(n),
            }
        })
        .collect();

    let mut residual = input.to_vec();
    let mut out = Array2::<f64>::zeros((m, n));
    let first_error: Mutex<Option<EmdError>> = Mutex::new(None);

    for imf_i in 0..m - 1 {
        let residual_sigma = kernels::stddev(&residual);
        let output_row = Mutex::new(vec![0.0; n]);

        members.par_iter_mut().for_each(|mem| {
            if first_error.lock().unwrap().is_some() {
                return;
            }

            let noise_denom = kernels::stddev(&mem.noise);
            let sigma = if noise_denom == 0.0 {
                0.0
            } else {
                config.noise_strength * residual_sigma / noise_denom
            };

            let mut member_signal = vec![0.0; n];
            kernels::addmul_to(&residual, &mem.noise, sigma, &mut member_signal);

            let sifted = sift(
                &mut member_signal,
                &mut mem.ws,
                config.base.s_number,
                config.base.num_siftings,
                config.base.max_sift_iterations,
            );
            if let Err(e) = sifted {
                set_first_error(&first_error, e);
                return;
            }

            {
                let mut guard = output_row.lock().unwrap();
                kernels::add(&member_signal, &mut guard);
            }

            // Advance this member's own noise decomposition by one mode, so
            // the next outer iteration forces with a fresh noise mode rather
            // than reusing the same realisation (§4.E).
            let noise_sifted = if imf_i == 0 {
                sift(
                    &mut mem.noise,
                    &mut mem.ws,
                    config.base.s_number,
                    config.base.num_siftings,
                    config.base.max_sift_iterations,
                )
            } else {
                kernels::copy(&mem.noise_residual, &mut mem.noise);
                sift(
                    &mut mem.noise,
                    &mut mem.ws,
                    config.base.s_number,
                    config.base.num_siftings,
                    config.base.max_sift_iterations,
                )
            };
            match noise_sifted {
                Ok(_) if imf_i == 0 => {
                    mem.noise_residual = mem.noise.clone();
                }
                Ok(_) => {
                    kernels::sub(&mem.noise, &mut mem.noise_residual);
                }
                Err(e) => set_first_error(&first_error, e),
            }
        });

        if let Some(e) = *first_error.lock().unwrap() {
            return Err(e);
        }

        let scale = 1.0 / config.ensemble_size as f64;
        let mut acc = output_row.into_inner().unwrap();
        kernels::scale(&mut acc, scale);
        tracing::debug!(imf = imf_i, "extracted ceemdan imf");
        out.row_mut(imf_i)
            .assign(&ndarray::ArrayView1::from(acc.as_slice()));
        kernels::sub(&acc, &mut residual);
    }

    out.row_mut(m - 1)
        .assign(&ndarray::ArrayView1::from(residual.as_slice()));
    Ok(out)
}

fn set_first_error(cell: &Mutex<Option<EmdError>>, e: EmdError) {
    let mut guard = cell.lock().unwrap();
    if guard.is_none() {
        *guard = Some(e);
    }
}
