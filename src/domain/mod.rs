//! Domain Layer
//!
//! Pure types, normalization and scoring logic, and the outbound ports
//! the application layer talks through.

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
