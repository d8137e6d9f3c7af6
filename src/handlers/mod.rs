// handlers/mod.rs - request handlers
//
// Gram handlers forward the resolved principal to the controller and turn
// its outcome into a response. Everything else is a small leaf endpoint.

pub mod grams;
pub mod health;
pub mod params;
pub mod pictures;
pub mod sessions;
