//! Bibliographic input types handed to the naming engine

mod request;
mod series;

pub use request::{Fc, NamingRequest};
pub use series::{Part, Series, Volume};
