//! Systems - per-mode particle kernels

pub mod patterns;
