//! Pipeline execution

use super::compiler::{ChannelProgram, Seed};
use super::rules::{self, RuleContext};
use super::seed::initial_value;
use super::value::Value;
use super::Channel;
use crate::error::{NamingError, Result};
use crate::types::NamingRequest;

/// Run one channel pipeline to its final string
///
/// `title` is the already computed title channel, read by `_t`. The result
/// must be a non-empty string.
pub fn run_channel(
    program: &ChannelProgram,
    channel: Channel,
    request: &NamingRequest,
    title: Option<&str>,
) -> Result<String> {
    let mut value = match program.seed {
        Seed::Request => initial_value(request)?,
        Seed::Title => match title {
            Some(title) => Value::string(title),
            None => {
                return Err(NamingError::InvalidRequest(format!(
                    "channel {} reads the title before it is computed",
                    channel
                )))
            }
        },
    };

    let ctx = RuleContext::new(request, channel);
    for call in &program.steps {
        value = rules::apply(call, value, &ctx)?;
    }

    match value {
        Value::String(s) if s.text.is_empty() => Err(NamingError::EmptyName { channel }),
        Value::String(s) => {
            tracing::debug!(channel = %channel, name = %s.text, "Channel done");
            Ok(s.text)
        }
        other => Err(NamingError::Unterminated {
            channel,
            variant: other.variant(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namegen::compile;
    use crate::types::{Fc, Part, Series, Volume};

    fn request() -> NamingRequest {
        NamingRequest::new(
            Series::new("Rebuild World"),
            vec![Volume::new(6, "Volume 6 Part One")],
            vec![Part::new(6, 2, "Part 2")],
            Fc::default(),
        )
        .unwrap()
    }

    fn run(expression: &str, channel: Channel, title: Option<&str>) -> Result<String> {
        let program = compile(Some(expression)).unwrap();
        run_channel(program.channel(channel), channel, &request(), title)
    }

    #[test]
    fn test_split_and_merge_volume_number() {
        let name = run(
            "n:fc_rm>p_split_part>v_split_volume>pn_0pad>vn_number>vn_0pad>vn_merge>pn_rm_if_complete>pn_prepend_vn>pn_short>s_title>ss_rm_subtitle>to_string",
            Channel::Filename,
            Some("ignored"),
        )
        .unwrap();
        assert_eq!(name, "Rebuild World 06.01.02");
    }

    #[test]
    fn test_backref_reads_title_verbatim() {
        let name = run("n:_t", Channel::Filename, Some("Exact Title [Final]")).unwrap();
        assert_eq!(name, "Exact Title [Final]");
    }

    #[test]
    fn test_string_rule_before_string_is_mismatch() {
        let err = run("t:str_filesafe", Channel::Title, None).unwrap_err();
        assert!(matches!(
            err,
            NamingError::TypeMismatch {
                rule: "str_filesafe",
                variant: "PartValue",
                ..
            }
        ));
    }

    #[test]
    fn test_structural_rule_after_string_is_mismatch() {
        let err = run("t:p_title>p_to_volume", Channel::Title, None).unwrap_err();
        assert!(matches!(
            err,
            NamingError::TypeMismatch {
                rule: "p_to_volume",
                variant: "StringValue",
                ..
            }
        ));
    }

    #[test]
    fn test_unterminated_channel() {
        let err = run("t:p_to_volume", Channel::Title, None).unwrap_err();
        assert!(matches!(
            err,
            NamingError::Unterminated {
                channel: Channel::Title,
                variant: "VolumeValue"
            }
        ));
    }

    #[test]
    fn test_empty_name() {
        let err = run("t:fc_rm>to_string", Channel::Title, None).unwrap_err();
        assert!(matches!(err, NamingError::EmptyName { channel: Channel::Title }));
    }
}
