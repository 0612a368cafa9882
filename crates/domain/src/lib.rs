//! Domain layer for the geocoder
//!
//! Contains the coordinate value object, the address record entity and
//! domain errors. This layer performs no I/O.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
