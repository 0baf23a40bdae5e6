//! Serialpub Core Library
//!
//! This crate provides the naming engine used when packaging serialized
//! fiction: a small rule language compiled into pipelines that turn series,
//! volume and part metadata into a title, a file name and a folder name.
//!
//! ```
//! use serialpub_core::{Fc, NameGenerator, NamingRequest, Part, Series, Volume};
//!
//! let request = NamingRequest::new(
//!     Series::new("Tearmoon Empire"),
//!     vec![Volume::new(1, "Tearmoon Empire Volume 1")],
//!     vec![Part::new(1, 1, "Tearmoon Empire Volume 1 Part 1")],
//!     Fc::default(),
//! )?;
//! let names = NameGenerator::default().generate(&request)?;
//! assert_eq!(names.filename, "Tearmoon_Empire_Volume_1_Part_1");
//! # Ok::<(), serialpub_core::NamingError>(())
//! ```

pub mod config;
pub mod error;
pub mod namegen;
pub mod types;

pub use config::Config;
pub use error::{ConfigError, NamingError, ParseError, Result};
pub use namegen::{compile, Channel, CompiledProgram, NameGenerator, Names, Overrides};
pub use types::{Fc, NamingRequest, Part, Series, Volume};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_creation() {
        let request = NamingRequest::new(
            Series::new("Test Series"),
            vec![Volume::new(1, "Test Series Volume 1")],
            vec![Part::new(1, 1, "Test Series Volume 1 Part 1")],
            Fc::default(),
        )
        .unwrap();
        assert_eq!(request.series.title, "Test Series");
        assert_eq!(request.parts.len(), 1);
    }
}
