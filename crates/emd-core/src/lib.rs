//! Empirical Mode Decomposition: EMD, EEMD, CEEMDAN and BEMD over real or
//! complex time series.
//!
//! The public surface is four decomposition entry points
//! ([`emd`], [`eemd`], [`ceemdan`], [`bemd`]), their typed `*Config`
//! parameter structs, [`emd_num_imfs`] (the default IMF-row-count rule), and
//! the [`EmdError`] / [`EmdErrorCode`] taxonomy. Everything else is an
//! internal building block the ensemble driver composes.

pub mod bemd;
pub mod config;
pub mod ensemble;
pub mod error;
pub mod extrema;
pub mod kernels;
pub mod modes;
pub mod rng;
pub mod sift;
pub mod spline;

pub use bemd::bemd;
pub use config::{BemdConfig, CeemdanConfig, EemdConfig, EmdConfig};
pub use ensemble::{ceemdan, eemd, emd};
pub use error::{emd_error_string, EmdError, EmdErrorCode};
pub use modes::emd_num_imfs;

pub use ndarray::Array2;
pub use num_complex::Complex64;
