//! Extrema and zero-crossing detection (§4.B).
//!
//! [`Extrema::find`] locates strict local maxima and minima of a signal
//! (with plateau handling), counts zero-crossings, and appends the two
//! "virtual" endpoint extrema on each side that let the envelope builder
//! reach `x = 0` and `x = N - 1` without extrapolating.

/// Extrema and zero-crossing counts for one signal, with the virtual
/// endpoint extrema already folded into `maxx`/`maxy` and `minx`/`miny`.
#[derive(Debug, Clone)]
pub struct Extrema {
    /// Knot x-coordinates for the upper envelope, strictly increasing,
    /// including the two virtual endpoints.
    pub maxx: Vec<f64>,
    pub maxy: Vec<f64>,
    /// Knot x-coordinates for the lower envelope, strictly increasing,
    /// including the two virtual endpoints.
    pub minx: Vec<f64>,
    pub miny: Vec<f64>,
    /// Count of *interior* maxima (virtual endpoints excluded), used by the
    /// S-number criterion.
    pub num_max: usize,
    /// Count of *interior* minima (virtual endpoints excluded).
    pub num_min: usize,
    /// Zero-crossing count over the raw signal.
    pub num_zc: usize,
}

enum Side {
    Left,
    Right,
}

impl Extrema {
    /// Locate extrema and zero-crossings in `x`, per §4.B.
    pub fn find(x: &[f64]) -> Self {
        let interior_max = find_interior_extrema(x, true);
        let interior_min = find_interior_extrema(x, false);
        let num_max = interior_max.len();
        let num_min = interior_min.len();
        let num_zc = count_zero_crossings(x);

        let (maxx, maxy) = with_virtual_endpoints(x, &interior_max, true);
        let (minx, miny) = with_virtual_endpoints(x, &interior_min, false);

        Extrema {
            maxx,
            maxy,
            minx,
            miny,
            num_max,
            num_min,
            num_zc,
        }
    }
}

/// Find strict interior local extrema of one kind (max or min), with plateau
/// midpoint reporting. Shared by both detectors, parameterised on direction.
fn find_interior_extrema(x: &[f64], want_max: bool) -> Vec<(usize, f64)> {
    let n = x.len();
    let mut out = Vec::new();
    if n < 3 {
        return out;
    }
    let is_candidate = |a: f64, b: f64| if want_max { a > b } else { a < b };

    let mut i = 1usize;
    while i < n - 1 {
        if is_candidate(x[i], x[i - 1]) {
            // Find the end of a plateau of samples equal to x[i].
            let mut j = i;
            while j + 1 < n && x[j + 1] == x[i] {
                j += 1;
            }
            if j < n - 1 && is_candidate(x[i], x[j + 1]) {
                let mid = (i + j) / 2;
                out.push((mid, x[i]));
            }
            i = j + 1;
        } else {
            i += 1;
        }
    }
    out
}

/// Count sign-change transitions plus one crossing per maximal run of exact
/// zeros (§4.B).
fn count_zero_crossings(x: &[f64]) -> usize {
    let n = x.len();
    if n == 0 {
        return 0;
    }
    let mut count = 0usize;
    let mut i = 0usize;
    while i < n {
        if x[i] == 0.0 {
            count += 1;
            while i < n && x[i] == 0.0 {
                i += 1;
            }
        } else {
            if i + 1 < n && x[i + 1] != 0.0 && x[i].signum() != x[i + 1].signum() {
                count += 1;
            }
            i += 1;
        }
    }
    count
}

/// Reflect the boundary extremum (or the boundary sample itself, if no
/// interior extrema of this type exist) across one end of the signal.
fn reflect_end(signal: &[f64], extrema: &[(usize, f64)], want_max: bool, side: Side) -> (f64, f64) {
    let n = signal.len();
    let last = n - 1;
    match side {
        Side::Left => {
            let boundary_val = signal[0];
            let neighbor = if n > 1 { signal[1] } else { signal[0] };
            let boundary_is_extreme = if want_max {
                boundary_val > neighbor
            } else {
                boundary_val < neighbor
            };
            match extrema.first() {
                Some(&(x1, y1)) => {
                    let reflected_y = if boundary_is_extreme { boundary_val } else { y1 };
                    (-(x1 as f64), reflected_y)
                }
                None => (0.0, boundary_val),
            }
        }
        Side::Right => {
            let boundary_val = signal[last];
            let neighbor = if n > 1 { signal[last - 1] } else { signal[last] };
            let boundary_is_extreme = if want_max {
                boundary_val > neighbor
            } else {
                boundary_val < neighbor
            };
            match extrema.last() {
                Some(&(xk, yk)) => {
                    let reflected_y = if boundary_is_extreme { boundary_val } else { yk };
                    (2.0 * last as f64 - xk as f64, reflected_y)
                }
                None => (last as f64, boundary_val),
            }
        }
    }
}

/// Build the full knot sequence (virtual left, interior, virtual right) for
/// one envelope side.
fn with_virtual_endpoints(
    signal: &[f64],
    interior: &[(usize, f64)],
    want_max: bool,
) -> (Vec<f64>, Vec<f64>) {
    let (lx, ly) = reflect_end(signal, interior, want_max, Side::Left);
    let (rx, ry) = reflect_end(signal, interior, want_max, Side::Right);

    let mut xs = Vec::with_capacity(interior.len() + 2);
    let mut ys = Vec::with_capacity(interior.len() + 2);
    xs.push(lx);
    ys.push(ly);
    for &(ix, iy) in interior {
        xs.push(ix as f64);
        ys.push(iy);
    }
    xs.push(rx);
    ys.push(ry);
    (xs, ys)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_single_interior_maximum_and_minimum() {
        let x = [0.0, 1.0, 0.0, -1.0, 0.0];
        let e = Extrema::find(&x);
        assert_eq!(e.num_max, 1);
        assert_eq!(e.num_min, 1);
        // Interior max at index 1 (value 1.0), interior min at index 3 (-1.0).
        assert!(e.maxy.contains(&1.0));
        assert!(e.miny.contains(&-1.0));
    }

    #[test]
    fn knot_xs_are_strictly_increasing() {
        let x = [0.3, 1.0, -0.2, 0.8, -0.9, 0.4, 0.1];
        let e = Extrema::find(&x);
        for w in e.maxx.windows(2) {
            assert!(w[0] < w[1], "maxx not increasing: {:?}", e.maxx);
        }
        for w in e.minx.windows(2) {
            assert!(w[0] < w[1], "minx not increasing: {:?}", e.minx);
        }
    }

    #[test]
    fn plateau_reports_midpoint() {
        // Plateau of maxima at indices 2,3,4 (value 5.0), strictly bounded.
        let x = [0.0, 1.0, 5.0, 5.0, 5.0, 1.0, 0.0];
        let e = Extrema::find(&x);
        assert_eq!(e.num_max, 1);
        assert!(e.maxx.contains(&3.0)); // midpoint of 2..4
    }

    #[test]
    fn zero_crossings_count_run_as_one() {
        let x = [1.0, 0.0, 0.0, -1.0, 1.0];
        // one run-of-zeros crossing at index 1, plus one sign flip between
        // index 3 (-1.0) and index 4 (1.0).
        assert_eq!(count_zero_crossings(&x), 2);
    }

    #[test]
    fn zero_crossings_ignore_non_crossing_equal_runs() {
        let x = [1.0, 1.0, 1.0];
        assert_eq!(count_zero_crossings(&x), 0);
    }

    #[test]
    fn flat_signal_has_no_interior_extrema() {
        let x = [3.0; 16];
        let e = Extrema::find(&x);
        assert_eq!(e.num_max, 0);
        assert_eq!(e.num_min, 0);
        assert_eq!(e.maxx.len(), 2);
        assert_eq!(e.minx.len(), 2);
    }
}
