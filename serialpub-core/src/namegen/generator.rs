//! The public entry point of the naming engine

use std::env::consts::DLL_EXTENSION;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::compiler::{compile, CompiledProgram};
use super::executor::run_channel;
use super::overrides::Overrides;
use super::Channel;
use crate::error::{NamingError, Result};
use crate::types::NamingRequest;

/// File name stem looked up in the configuration directory for an override library
pub const OVERRIDE_STEM: &str = "namegen";

/// The three names of a package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Names {
    pub title: String,
    /// File name without extension
    pub filename: String,
    pub folder: String,
}

/// A compiled naming configuration, reusable across requests and threads
#[derive(Debug, Clone, Default)]
pub struct NameGenerator {
    program: CompiledProgram,
    overrides: Overrides,
}

impl NameGenerator {
    pub fn new(program: CompiledProgram) -> Self {
        Self {
            program,
            overrides: Overrides::new(),
        }
    }

    /// Compile a rule expression; `None` gives the default naming
    pub fn from_expression(expression: Option<&str>) -> Result<Self> {
        Ok(Self::new(compile(expression)?))
    }

    /// Build a generator from a configured option
    ///
    /// An option ending in `.so` (`.dylib`, `.dll`) is the absolute path of an
    /// override library; anything else is a rule expression. Without an
    /// option, a `namegen.so` in `config_dir` is used when present.
    pub fn from_option(option: Option<&str>, config_dir: Option<&Path>) -> Result<Self> {
        let option = option.map(str::trim).filter(|o| !o.is_empty());
        let suffix = format!(".{}", DLL_EXTENSION);

        match option {
            Some(option) if option.ends_with(&suffix) => {
                let path = PathBuf::from(option);
                if !path.is_absolute() {
                    return Err(NamingError::ScriptLoad {
                        path,
                        message: "override library path must be absolute".to_string(),
                    });
                }
                if !path.is_file() {
                    return Err(NamingError::ScriptLoad {
                        path,
                        message: "file not found".to_string(),
                    });
                }
                tracing::debug!(path = %path.display(), "Override library from option");
                Ok(Self::default().with_overrides(Overrides::load(&path)?))
            }
            Some(expression) => Self::from_expression(Some(expression)),
            None => {
                let discovered = config_dir
                    .map(|dir| dir.join(format!("{}.{}", OVERRIDE_STEM, DLL_EXTENSION)))
                    .filter(|path| path.is_file());
                match discovered {
                    Some(path) => {
                        tracing::debug!(
                            path = %path.display(),
                            "Override library from config directory"
                        );
                        Ok(Self::default().with_overrides(Overrides::load(&path)?))
                    }
                    None => Ok(Self::default()),
                }
            }
        }
    }

    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn program(&self) -> &CompiledProgram {
        &self.program
    }

    pub fn overrides(&self) -> &Overrides {
        &self.overrides
    }

    /// Compute the title, file name and folder name of a package
    ///
    /// The title is computed first; `_t` in the other channels reads it, and
    /// it is the overridden title whenever a title override is present.
    pub fn generate(&self, request: &NamingRequest) -> Result<Names> {
        request.validate()?;

        let title = self.channel(Channel::Title, request, None)?;
        let filename = self.channel(Channel::Filename, request, Some(&title))?;
        let folder = self.channel(Channel::Folder, request, Some(&title))?;
        Ok(Names {
            title,
            filename,
            folder,
        })
    }

    fn channel(
        &self,
        channel: Channel,
        request: &NamingRequest,
        title: Option<&str>,
    ) -> Result<String> {
        match self.overrides.call(channel, request) {
            Some(result) => result,
            None => run_channel(self.program.channel(channel), channel, request, title),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Fc, Part, Series, Volume};

    fn request() -> NamingRequest {
        NamingRequest::new(
            Series::new("Tearmoon Empire"),
            vec![Volume::new(1, "Tearmoon Empire Volume 1")],
            vec![Part::new(1, 1, "Tearmoon Empire Volume 1 Part 1")],
            Fc::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_default_names() {
        let names = NameGenerator::default().generate(&request()).unwrap();
        assert_eq!(
            names,
            Names {
                title: "Tearmoon Empire Volume 1 Part 1".into(),
                filename: "Tearmoon_Empire_Volume_1_Part_1".into(),
                folder: "Tearmoon Empire".into(),
            }
        );
    }

    #[test]
    fn test_option_expression() {
        let generator = NameGenerator::from_option(Some("t:p_title>fc_full"), None).unwrap();
        assert!(generator.overrides().is_empty());
        assert_eq!(
            generator.generate(&request()).unwrap().title,
            "Tearmoon Empire Volume 1 Part 1"
        );
    }

    #[test]
    fn test_option_relative_library_path() {
        let err = NameGenerator::from_option(Some(&format!("namegen.{}", DLL_EXTENSION)), None)
            .unwrap_err();
        assert!(matches!(err, NamingError::ScriptLoad { .. }));
    }

    #[test]
    fn test_blank_option_without_library() {
        let dir = tempfile::tempdir().unwrap();
        let generator = NameGenerator::from_option(Some("  "), Some(dir.path())).unwrap();
        assert_eq!(generator.program(), &CompiledProgram::default());
        assert!(generator.overrides().is_empty());
    }
}
