//! Registration entity.

pub mod model;

pub use model::Registration;
