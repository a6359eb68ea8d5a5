//! Typed, documented parameter structs for each entry point (§4.G), and the
//! up-front validation rules of §4.F.

use crate::error::EmdError;

/// Shared sifting parameters used by every algorithm.
///
/// # Fields
///
/// * `s_number` - the S-number stopping criterion (§4.D). `0` disables it.
/// * `num_siftings` - a hard cap on sift iterations. `0` disables the cap.
/// * `max_sift_iterations` - purely diagnostic: a `tracing::warn!` fires once
///   the sift loop reaches this many iterations without otherwise stopping.
#[derive(Debug, Clone, Copy)]
pub struct EmdConfig {
    pub s_number: u32,
    pub num_siftings: u32,
    pub max_sift_iterations: u32,
}

impl Default for EmdConfig {
    fn default() -> Self {
        EmdConfig {
            s_number: 4,
            num_siftings: 0,
            max_sift_iterations: 10_000,
        }
    }
}

impl EmdConfig {
    /// Validate the single rule that applies to plain EMD (§4.F): at least
    /// one of `s_number`/`num_siftings` must offer a stopping criterion.
    pub fn validate(&self) -> Result<(), EmdError> {
        if self.s_number == 0 && self.num_siftings == 0 {
            return Err(EmdError::NoConvergencePossible);
        }
        Ok(())
    }
}

/// Parameters for [`crate::ensemble::eemd`].
///
/// # Fields
///
/// * `base` - shared sifting parameters (§4.G).
/// * `ensemble_size` - number of noise realisations averaged; must be `>= 1`.
/// * `noise_strength` - multiplier on `stddev(input)` used as the Gaussian
///   noise's standard deviation; must be `>= 0`.
/// * `rng_seed` - base seed; member `i` draws from `seed(rng_seed + i)`.
#[derive(Debug, Clone, Copy)]
pub struct EemdConfig {
    pub base: EmdConfig,
    pub ensemble_size: usize,
    pub noise_strength: f64,
    pub rng_seed: u64,
}

impl Default for EemdConfig {
    fn default() -> Self {
        EemdConfig {
            base: EmdConfig::default(),
            ensemble_size: 1,
            noise_strength: 0.0,
            rng_seed: 0,
        }
    }
}

impl EemdConfig {
    /// Validate all of §4.F's ensemble-aware rules.
    pub fn validate(&self) -> Result<(), EmdError> {
        self.base.validate()?;
        validate_ensemble_params(self.ensemble_size, self.noise_strength)
    }
}

/// Parameters for [`crate::ensemble::ceemdan`].
///
/// Distinct from [`EemdConfig`] (rather than a shared struct) so the two
/// algorithms can never be confused for one another at a call site, even
/// though the fields are identical today.
#[derive(Debug, Clone, Copy)]
pub struct CeemdanConfig {
    pub base: EmdConfig,
    pub ensemble_size: usize,
    pub noise_strength: f64,
    pub rng_seed: u64,
}

impl Default for CeemdanConfig {
    fn default() -> Self {
        CeemdanConfig {
            base: EmdConfig::default(),
            ensemble_size: 1,
            noise_strength: 0.0,
            rng_seed: 0,
        }
    }
}

impl CeemdanConfig {
    pub fn validate(&self) -> Result<(), EmdError> {
        self.base.validate()?;
        validate_ensemble_params(self.ensemble_size, self.noise_strength)
    }
}

fn validate_ensemble_params(ensemble_size: usize, noise_strength: f64) -> Result<(), EmdError> {
    if ensemble_size == 0 {
        return Err(EmdError::InvalidEnsembleSize);
    }
    if noise_strength < 0.0 {
        return Err(EmdError::InvalidNoiseStrength);
    }
    if ensemble_size == 1 && noise_strength > 0.0 {
        return Err(EmdError::NoiseAddedToEmd);
    }
    if ensemble_size > 1 && noise_strength == 0.0 {
        return Err(EmdError::NoNoiseAddedToEemd);
    }
    Ok(())
}

/// Parameters for [`crate::bemd::bemd`].
///
/// # Fields
///
/// * `num_siftings` - fixed sift count per IMF (BEMD has no S-number
///   analogue in this design; see §4.E).
/// * `directions` - projection angles `{φ_d}` in radians.
/// * `parallel_directions` - when `true`, the direction loop is reduced with
///   `rayon` instead of run sequentially (§4.E, §5); both paths produce the
///   same result up to floating-point associativity.
#[derive(Debug, Clone)]
pub struct BemdConfig {
    pub num_siftings: u32,
    pub directions: Vec<f64>,
    pub parallel_directions: bool,
}

impl BemdConfig {
    /// Build a config with `num_directions` angles evenly spaced over
    /// `[0, 2*pi)`, matching the §8.7 test scenario's construction.
    pub fn uniform(num_directions: usize, num_siftings: u32) -> Self {
        let directions = (0..num_directions)
            .map(|d| 2.0 * std::f64::consts::PI * d as f64 / num_directions as f64)
            .collect();
        BemdConfig {
            num_siftings,
            directions,
            parallel_directions: false,
        }
    }

    /// Validate the one rule that applies to BEMD: at least one direction
    /// and at least one sift per IMF.
    pub fn validate(&self) -> Result<(), EmdError> {
        if self.directions.is_empty() {
            return Err(EmdError::NoConvergencePossible);
        }
        if self.num_siftings == 0 {
            return Err(EmdError::NoConvergencePossible);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensemble_size_zero_is_rejected() {
        let cfg = EemdConfig {
            ensemble_size: 0,
            noise_strength: 0.1,
            ..Default::default()
        };
        assert_eq!(cfg.validate().unwrap_err(), EmdError::InvalidEnsembleSize);
    }

    #[test]
    fn negative_noise_strength_is_rejected() {
        let cfg = EemdConfig {
            ensemble_size: 4,
            noise_strength: -0.1,
            ..Default::default()
        };
        assert_eq!(cfg.validate().unwrap_err(), EmdError::InvalidNoiseStrength);
    }

    #[test]
    fn noise_on_single_realisation_is_rejected() {
        let cfg = EemdConfig {
            ensemble_size: 1,
            noise_strength: 0.2,
            ..Default::default()
        };
        assert_eq!(cfg.validate().unwrap_err(), EmdError::NoiseAddedToEmd);
    }

    #[test]
    fn ensemble_without_noise_is_rejected() {
        let cfg = EemdConfig {
            ensemble_size: 8,
            noise_strength: 0.0,
            ..Default::default()
        };
        assert_eq!(cfg.validate().unwrap_err(), EmdError::NoNoiseAddedToEemd);
    }

    #[test]
    fn no_stopping_criterion_is_rejected() {
        let cfg = EmdConfig {
            s_number: 0,
            num_siftings: 0,
            ..Default::default()
        };
        assert_eq!(cfg.validate().unwrap_err(), EmdError::NoConvergencePossible);
    }

    #[test]
    fn valid_eemd_config_passes() {
        let cfg = EemdConfig {
            ensemble_size: 16,
            noise_strength: 0.2,
            rng_seed: 42,
            base: EmdConfig {
                s_number: 4,
                num_siftings: 50,
                ..Default::default()
            },
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn uniform_directions_are_evenly_spaced() {
        let cfg = BemdConfig::uniform(4, 10);
        assert_eq!(cfg.directions.len(), 4);
        assert!((cfg.directions[0] - 0.0).abs() < 1e-12);
        assert!((cfg.directions[1] - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert!(cfg.validate().is_ok());
    }
}
