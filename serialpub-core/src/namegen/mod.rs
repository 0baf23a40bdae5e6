//! Naming engine
//!
//! A rule expression such as `t:legacy_t|n:_t>str_filesafe|f:legacy_f` is
//! compiled into one pipeline per output channel. Each pipeline threads a
//! [`Value`](value::Value) from a seed chosen by the request cardinality down
//! to a plain string.
//!
//! ```text
//! expression --compile--> CompiledProgram
//! request    --seed-----> Value --rule--> Value --rule--> ... --> String
//! ```
//!
//! Override libraries can replace any channel; see [`overrides`].

pub mod compiler;
pub mod executor;
pub mod generator;
pub mod legacy;
pub mod overrides;
pub mod rules;
pub mod seed;
pub mod text;
pub mod value;

use std::fmt;

pub use compiler::{compile, ChannelProgram, CompiledProgram, Seed, DEFAULT_RULES};
pub use generator::{NameGenerator, Names};
pub use overrides::Overrides;

/// One of the three naming outputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Human readable title (`t:`)
    Title,
    /// File name without extension (`n:`)
    Filename,
    /// Folder name (`f:`)
    Folder,
}

impl Channel {
    /// Channels in execution order; the title always comes first
    pub const ALL: [Channel; 3] = [Channel::Title, Channel::Filename, Channel::Folder];

    pub fn prefix(self) -> char {
        match self {
            Channel::Title => 't',
            Channel::Filename => 'n',
            Channel::Folder => 'f',
        }
    }

    pub fn from_prefix(prefix: &str) -> Option<Channel> {
        match prefix {
            "t" => Some(Channel::Title),
            "n" => Some(Channel::Filename),
            "f" => Some(Channel::Folder),
            _ => None,
        }
    }

    /// Name of the override function for this channel
    pub fn override_symbol(self) -> &'static str {
        match self {
            Channel::Title => "to_title",
            Channel::Filename => "to_filename",
            Channel::Folder => "to_folder",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.prefix())
    }
}
