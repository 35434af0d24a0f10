//! Core primitives for `densematch-rs`.
//!
//! This crate contains:
//! - linear algebra type aliases (`Real`, `Vec2`, `Pt3`, ...),
//! - the [`LensModel`] capability consumed by the matching engine, with a
//!   concrete pinhole + Brown-Conrady implementation,
//! - a multi-channel floating-point [`Image`] grid with bilinear sampling,
//! - the per-pixel [`RayField`] used to parameterize plane-sweep search,
//! - [`CorrespondenceMap`] / [`PointMap`] output containers where NaN marks
//!   an invalid estimate,
//! - deterministic synthetic scene helpers for workspace test suites.
//!
//! Invalidity convention: every per-pixel degeneracy (out-of-bounds sample,
//! failed projection, empty neighborhood) is a NaN value, never an error.

/// Multi-channel floating-point image grid.
pub mod image;
/// Lens models: pixel normalization, distortion and projection.
pub mod lens;
/// Correspondence and point map containers.
pub mod map;
/// Linear algebra type aliases and helpers.
pub mod math;
/// Per-pixel back-projected ray directions.
pub mod ray_field;
/// Deterministic synthetic scenes for tests and examples.
pub mod synthetic;

pub use image::*;
pub use lens::*;
pub use map::*;
pub use math::*;
pub use ray_field::*;
