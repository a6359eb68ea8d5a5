//! The ensemble driver (§4.E): EMD, EEMD and CEEMDAN, built on top of the
//! array kernels, extrema detector, spline builder and sifter.

pub mod ceemdan;
pub mod eemd;
pub mod emd;

pub use ceemdan::ceemdan;
pub use eemd::eemd;
pub use emd::emd;
