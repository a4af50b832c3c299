//! Core numeric building blocks shared by every pattern

pub mod math;
pub mod random;
