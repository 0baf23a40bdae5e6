//! fc_*: the finality / completeness marker

use super::{map_notes, RuleCall, RuleContext};
use crate::error::Result;
use crate::namegen::value::{Slot, StringValue, Value};
use crate::types::Fc;

pub(super) fn fc_rm(value: Value, _call: &RuleCall, _ctx: &RuleContext<'_>) -> Result<Value> {
    Ok(map_notes(value, |notes| {
        if notes.marker.is_raw() {
            notes.marker = Slot::Absent;
        }
    }))
}

pub(super) fn fc_rm_if_complete(
    value: Value,
    _call: &RuleCall,
    ctx: &RuleContext<'_>,
) -> Result<Value> {
    if !ctx.request.fc.is_complete {
        return Ok(value);
    }
    Ok(map_notes(value, |notes| {
        if notes.marker.is_raw() {
            notes.marker = Slot::Absent;
        }
    }))
}

pub(super) fn fc_short(value: Value, _call: &RuleCall, _ctx: &RuleContext<'_>) -> Result<Value> {
    Ok(render(value, short_marker))
}

pub(super) fn fc_full(value: Value, _call: &RuleCall, _ctx: &RuleContext<'_>) -> Result<Value> {
    Ok(render(value, full_marker))
}

/// Complete takes priority over final
fn short_marker(fc: Fc) -> &'static str {
    if fc.is_complete {
        "[C]"
    } else if fc.is_final {
        "[F]"
    } else {
        ""
    }
}

fn full_marker(fc: Fc) -> &'static str {
    if fc.is_complete {
        "[Complete]"
    } else if fc.is_final {
        "[Final]"
    } else {
        ""
    }
}

/// Render the marker slot, or append a marker still pending on a terminal string
///
/// A marker removed or rendered before the value collapsed is never brought
/// back.
fn render(value: Value, marker: fn(Fc) -> &'static str) -> Value {
    match value {
        Value::String(StringValue {
            text,
            marker: Some(fc),
        }) => {
            let mark = marker(fc);
            let text = match (text.is_empty(), mark.is_empty()) {
                (_, true) => text,
                (true, false) => mark.to_string(),
                (false, false) => format!("{} {}", text, mark),
            };
            Value::string(text)
        }
        value => map_notes(value, |notes| {
            if let Slot::Raw(fc) = notes.marker {
                notes.marker = Slot::Rendered(marker(fc).to_string());
            }
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namegen::rules::{apply, RuleCall, RuleId};
    use crate::namegen::value::{Notes, PartValue};
    use crate::namegen::Channel;
    use crate::types::{NamingRequest, Part, Series, Volume};

    fn request(fc: Fc) -> NamingRequest {
        NamingRequest::new(
            Series::new("Tearmoon Empire"),
            vec![Volume::new(1, "Tearmoon Empire Volume 1")],
            vec![Part::new(1, 1, "Tearmoon Empire Volume 1 Part 1")],
            fc,
        )
        .unwrap()
    }

    fn run(rules: &[RuleId], value: Value, request: &NamingRequest) -> Value {
        let ctx = RuleContext::new(request, Channel::Title);
        rules.iter().fold(value, |value, id| {
            apply(&RuleCall::new(*id), value, &ctx).unwrap()
        })
    }

    fn part(fc: Fc) -> Value {
        Value::Part(PartValue {
            part: 0,
            notes: Notes::marker(fc),
        })
    }

    #[test]
    fn test_pending_marker_is_appended_once() {
        let fc = Fc::new(true, false);
        let value = run(&[RuleId::PTitle, RuleId::FcFull, RuleId::FcShort], part(fc), &request(fc));
        assert_eq!(value, Value::string("Tearmoon Empire Volume 1 Part 1 [Final]"));
    }

    #[test]
    fn test_removed_marker_stays_removed() {
        let fc = Fc::new(true, false);
        let value = run(&[RuleId::FcRm, RuleId::PTitle, RuleId::FcFull], part(fc), &request(fc));
        assert_eq!(value, Value::string("Tearmoon Empire Volume 1 Part 1"));
    }

    #[test]
    fn test_rendered_marker_is_not_repeated() {
        let fc = Fc::new(true, false);
        let value = run(&[RuleId::FcShort, RuleId::PTitle, RuleId::FcFull], part(fc), &request(fc));
        assert_eq!(value, Value::string("Tearmoon Empire Volume 1 Part 1 [F]"));
    }

    #[test]
    fn test_string_without_marker_is_unchanged() {
        let fc = Fc::new(false, true);
        let value = run(&[RuleId::FcFull], Value::string("Copied title"), &request(fc));
        assert_eq!(value, Value::string("Copied title"));
    }
}
