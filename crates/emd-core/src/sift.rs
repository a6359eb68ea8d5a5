//! The sifter (§4.D): iteratively subtracts the envelope mean from a signal
//! until a stopping criterion fires, producing one IMF.

use crate::error::EmdError;
use crate::extrema::Extrema;
use crate::spline::eval_natural_cubic_spline;

/// Preallocated scratch buffers for one sifter instance, sized for the worst
/// case (every sample an extremum), per §3. Not shared across threads
/// without external synchronisation — each ensemble worker owns one.
pub struct SiftWorkspace {
    upper: Vec<f64>,
    lower: Vec<f64>,
    y2_buf: Vec<f64>,
    solver_scratch: Vec<f64>,
}

impl SiftWorkspace {
    /// Allocate a workspace sized for signals of length `n`.
    pub fn new(n: usize) -> Self {
        // Extrema arrays can hold at most `n` interior points plus two
        // virtual endpoints.
        let cap = n + 2;
        Self {
            upper: vec![0.0; n],
            lower: vec![0.0; n],
            y2_buf: vec![0.0; cap],
            solver_scratch: vec![0.0; (5 * cap).saturating_sub(10)],
        }
    }
}

/// Diagnostics returned alongside the extracted IMF.
#[derive(Debug, Clone, Copy)]
pub struct SiftOutcome {
    pub iterations: u32,
}

/// Sift `signal` in place until the S-number criterion fires, `num_siftings`
/// is reached, or (in principle) forever — matching §4.D's stopping
/// sentinel, which only warns at `max_sift_iterations` without terminating
/// the loop.
///
/// # Errors
///
/// Propagates [`EmdError`] from the envelope spline builder.
pub fn sift(
    signal: &mut [f64],
    ws: &mut SiftWorkspace,
    s_number: u32,
    num_siftings: u32,
    max_sift_iterations: u32,
) -> Result<SiftOutcome, EmdError> {
    let n = signal.len();
    if n == 0 {
        return Ok(SiftOutcome { iterations: 0 });
    }

    let mut prev_counts: Option<(usize, usize, usize)> = None;
    let mut stable_run: u32 = 0;
    let mut iter: u32 = 0;

    loop {
        let ext = Extrema::find(signal);

        if s_number > 0 {
            if let Some((pmax, pmin, pzc)) = prev_counts {
                let delta = (ext.num_max as i64 - pmax as i64).abs()
                    + (ext.num_min as i64 - pmin as i64).abs()
                    + (ext.num_zc as i64 - pzc as i64).abs();
                let balanced =
                    ((ext.num_max + ext.num_min) as i64 - 4 - ext.num_zc as i64).abs() <= 1;
                if delta <= 1 && balanced {
                    stable_run += 1;
                } else {
                    stable_run = 0;
                }
            }
            prev_counts = Some((ext.num_max, ext.num_min, ext.num_zc));

            if stable_run >= s_number {
                tracing::debug!(iterations = iter, "sift converged via S-number criterion");
                return Ok(SiftOutcome { iterations: iter });
            }
        }

        if num_siftings > 0 && iter >= num_siftings {
            tracing::debug!(iterations = iter, "sift stopped at fixed iteration cap");
            return Ok(SiftOutcome { iterations: iter });
        }

        if iter == max_sift_iterations {
            tracing::warn!(
                iterations = iter,
                "sifting has not converged after the configured iteration bound; \
                 this may indicate divergence"
            );
        }

        let upper = &mut ws.upper[..n];
        let lower = &mut ws.lower[..n];
        eval_natural_cubic_spline(
            &ext.maxx,
            &ext.maxy,
            &mut ws.y2_buf[..ext.maxx.len()],
            &mut ws.solver_scratch,
            upper,
        )?;
        eval_natural_cubic_spline(
            &ext.minx,
            &ext.miny,
            &mut ws.y2_buf[..ext.minx.len()],
            &mut ws.solver_scratch,
            lower,
        )?;

        for i in 0..n {
            signal[i] -= 0.5 * (ws.upper[i] + ws.lower[i]);
        }
        iter += 1;
    }
}
