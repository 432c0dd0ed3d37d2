pub mod action;
pub mod error;
pub mod housing;

// Normalized table types
pub mod csv;
