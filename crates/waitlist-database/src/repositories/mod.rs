//! Repositories for the waitlist tables.

pub mod capacity;
pub mod registration;

pub use capacity::CapacityRepository;
pub use registration::RegistrationRepository;
