//! v_* and vn_*: the volume and volume-number rules

use regex::Regex;
use std::sync::LazyLock;

use super::{map_notes, pass_through, RuleCall, RuleContext};
use crate::error::Result;
use crate::namegen::text::zero_pad;
use crate::namegen::value::{
    SeriesValue, Slot, Value, VnKind, VnSegment, VolumeNumber, VolumeNumbers, VolumeValue,
};

const PAD_WIDTH: usize = 2;

static VOLUME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Volume (\d+)").expect("valid volume regex"));
static PART_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Part (\w+)").expect("valid part regex"));

/// Spelled-out numbers understood by `vn_number`
const EN_NUMBERS: &[(&str, u32)] = &[
    ("one", 1),
    ("two", 2),
    ("three", 3),
    ("four", 4),
    ("five", 5),
    ("six", 6),
    ("seven", 7),
    ("eight", 8),
    ("nine", 9),
    ("ten", 10),
    ("eleven", 11),
    ("twelve", 12),
    ("thirteen", 13),
    ("fourteen", 14),
    ("fifteen", 15),
    ("sixteen", 16),
    ("seventeen", 17),
    ("eighteen", 18),
    ("nineteen", 19),
    ("twenty", 20),
];

pub(super) fn v_to_series(value: Value, _call: &RuleCall, ctx: &RuleContext<'_>) -> Result<Value> {
    match value {
        Value::Volume(v) => {
            let num = ctx.request.volumes[v.volume].num;
            Ok(volume_to_series(v, vec![VolumeNumber::internal(0, num)]))
        }
        other => pass_through(other, "v_to_series"),
    }
}

/// Split the volume title into the series and a parsed volume number
///
/// "Ascendance of a Bookworm: Part 5 Volume 2" becomes the series plus the
/// compound number `[Part 5, Volume 2]`.
pub(super) fn v_split_volume(
    value: Value,
    _call: &RuleCall,
    ctx: &RuleContext<'_>,
) -> Result<Value> {
    let v = match value {
        Value::Volume(v) => v,
        other => return pass_through(other, "v_split_volume"),
    };

    let title = &ctx.request.volumes[v.volume].title;
    let series = &ctx.request.series;
    let rest = title
        .strip_prefix(series.full_title().as_str())
        .or_else(|| title.strip_prefix(series.title.as_str()))
        .unwrap_or(title)
        .trim_matches(':')
        .trim();
    if rest.is_empty() {
        return pass_through(Value::Volume(v), "v_split_volume");
    }

    let segments = parse_volume_number(rest);
    Ok(volume_to_series(v, vec![VolumeNumber { volume: 0, segments }]))
}

pub(super) fn v_title(value: Value, _call: &RuleCall, ctx: &RuleContext<'_>) -> Result<Value> {
    match value {
        Value::Volume(v) => {
            let title = ctx.request.volumes[v.volume].title.clone();
            Ok(Value::Volume(v).collapse(Some(title)))
        }
        other => pass_through(other, "v_title"),
    }
}

pub(super) fn vn_rm(value: Value, _call: &RuleCall, _ctx: &RuleContext<'_>) -> Result<Value> {
    Ok(map_notes(value, |notes| {
        if notes.volume_numbers.is_raw() {
            notes.volume_numbers = Slot::Absent;
        }
    }))
}

/// Drop volume numbers when part numbers are there to carry them
pub(super) fn vn_rm_if_pn(value: Value, _call: &RuleCall, _ctx: &RuleContext<'_>) -> Result<Value> {
    Ok(map_notes(value, |notes| {
        if notes.volume_numbers.is_raw() && notes.part_numbers.is_raw() {
            notes.volume_numbers = Slot::Absent;
        }
    }))
}

pub(super) fn vn_number(value: Value, _call: &RuleCall, _ctx: &RuleContext<'_>) -> Result<Value> {
    Ok(map_segments(value, |segment| {
        let lower = segment.text.to_lowercase();
        if let Some((_, n)) = EN_NUMBERS.iter().find(|(word, _)| *word == lower) {
            segment.text = n.to_string();
        }
    }))
}

/// Merge compound numbers into dotted ones and a list of volumes into compact
/// notation
///
/// The per-volume numbers are kept so `pn_prepend_vn` still finds them; only
/// the rendering of the list changes ("1-3,5").
pub(super) fn vn_merge(value: Value, _call: &RuleCall, _ctx: &RuleContext<'_>) -> Result<Value> {
    Ok(map_notes(value, |notes| {
        if let Slot::Raw(numbers) = &mut notes.volume_numbers {
            merge(numbers);
        }
    }))
}

pub(super) fn vn_0pad(value: Value, _call: &RuleCall, _ctx: &RuleContext<'_>) -> Result<Value> {
    Ok(map_segments(value, |segment| {
        segment.text = zero_pad(&segment.text, PAD_WIDTH);
    }))
}

pub(super) fn vn_short(value: Value, _call: &RuleCall, _ctx: &RuleContext<'_>) -> Result<Value> {
    Ok(map_notes(value, |notes| {
        if let Slot::Raw(numbers) = &mut notes.volume_numbers {
            merge(numbers);
            let text = numbers.compact();
            notes.volume_numbers = Slot::Rendered(text);
        }
    }))
}

pub(super) fn vn_full(value: Value, _call: &RuleCall, _ctx: &RuleContext<'_>) -> Result<Value> {
    Ok(map_notes(value, |notes| {
        if let Slot::Raw(numbers) = &notes.volume_numbers {
            let text = spell_out(numbers);
            notes.volume_numbers = Slot::Rendered(text);
        }
    }))
}

fn volume_to_series(v: VolumeValue, mut numbers: Vec<VolumeNumber>) -> Value {
    for vn in numbers.iter_mut() {
        vn.volume = v.volume;
    }
    let mut notes = v.notes;
    notes.volume_numbers = Slot::Raw(VolumeNumbers::new(numbers));
    Value::Series(SeriesValue {
        volumes: vec![v.volume],
        parts: v.parts,
        notes,
    })
}

/// Parse "Volume N" and "Part X" segments, kept in textual order
///
/// Text with neither is kept whole as a special number ("Short Stories").
fn parse_volume_number(text: &str) -> Vec<VnSegment> {
    let mut found: Vec<(usize, VnSegment)> = Vec::new();
    if let Some(caps) = VOLUME_RE.captures(text) {
        if let (Some(all), Some(n)) = (caps.get(0), caps.get(1)) {
            found.push((all.start(), VnSegment::new(n.as_str(), VnKind::Volume)));
        }
    }
    if let Some(caps) = PART_RE.captures(text) {
        if let (Some(all), Some(n)) = (caps.get(0), caps.get(1)) {
            found.push((all.start(), VnSegment::new(n.as_str(), VnKind::Part)));
        }
    }
    if found.is_empty() {
        return vec![VnSegment::new(text, VnKind::Special)];
    }
    found.sort_by_key(|(start, _)| *start);
    found.into_iter().map(|(_, segment)| segment).collect()
}

fn map_segments(value: Value, mut f: impl FnMut(&mut VnSegment)) -> Value {
    map_notes(value, |notes| {
        if let Slot::Raw(numbers) = &mut notes.volume_numbers {
            let segments = numbers.numbers.iter_mut().flat_map(|vn| vn.segments.iter_mut());
            for segment in segments {
                f(segment);
            }
        }
    })
}

/// Collapse every compound number into a single dotted segment; a list of
/// several volumes is marked for compact rendering
fn merge(numbers: &mut VolumeNumbers) {
    for vn in numbers.numbers.iter_mut() {
        if vn.segments.len() > 1 {
            vn.segments = vec![VnSegment::new(vn.dotted(), VnKind::Merged)];
        }
    }
    if numbers.len() > 1 {
        numbers.merged = true;
    }
}

fn spell_out(numbers: &VolumeNumbers) -> String {
    if numbers.merged {
        return format!("Volumes {}", numbers.compact());
    }
    if numbers.len() > 1 {
        let texts: Vec<String> = numbers.numbers.iter().map(VolumeNumber::dotted).collect();
        let Some((last, init)) = texts.split_last() else {
            return String::new();
        };
        return format!("Volumes {} & {}", init.join(", "), last);
    }

    let Some(vn) = numbers.numbers.first() else {
        return String::new();
    };
    match vn.segments.as_slice() {
        [segment] if segment.kind == VnKind::Special => segment.text.clone(),
        [segment] => format!("Volume {}", segment.text),
        segments => segments
            .iter()
            .map(|s| match s.kind.label() {
                Some(label) => format!("{} {}", label, s.text),
                None => s.text.clone(),
            })
            .collect::<Vec<_>>()
            .join(" "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namegen::rules::{apply, RuleCall, RuleId};
    use crate::namegen::value::Notes;
    use crate::namegen::Channel;
    use crate::types::{Fc, NamingRequest, Part, Series, Volume};

    fn numbers(texts: &[&str]) -> VolumeNumbers {
        VolumeNumbers::new(
            texts
                .iter()
                .enumerate()
                .map(|(i, t)| VolumeNumber {
                    volume: i,
                    segments: vec![VnSegment::new(*t, VnKind::Internal)],
                })
                .collect(),
        )
    }

    fn series_value(numbers: VolumeNumbers) -> Value {
        Value::Series(SeriesValue {
            volumes: numbers.numbers.iter().map(|vn| vn.volume).collect(),
            parts: Vec::new(),
            notes: Notes {
                volume_numbers: Slot::Raw(numbers),
                part_numbers: Slot::Absent,
                marker: Slot::Absent,
            },
        })
    }

    fn request() -> NamingRequest {
        NamingRequest::new(
            Series::new("Tearmoon Empire"),
            [1, 2, 3, 5]
                .into_iter()
                .map(|n| Volume::new(n, format!("Tearmoon Empire Volume {}", n)))
                .collect(),
            vec![Part::new(1, 1, "Part 1"), Part::new(5, 1, "Part 1")],
            Fc::default(),
        )
        .unwrap()
    }

    fn run(rules: &[RuleId], value: Value) -> Value {
        let request = request();
        let ctx = RuleContext::new(&request, Channel::Title);
        rules.iter().fold(value, |value, id| {
            apply(&RuleCall::new(*id), value, &ctx).unwrap()
        })
    }

    fn rendered_volumes(value: &Value) -> Option<&str> {
        match &value.notes()?.volume_numbers {
            Slot::Rendered(text) => Some(text.as_str()),
            _ => None,
        }
    }

    #[test]
    fn test_parse_volume_then_part() {
        let segments = parse_volume_number("Volume 6 Part One");
        assert_eq!(
            segments,
            vec![
                VnSegment::new("6", VnKind::Volume),
                VnSegment::new("One", VnKind::Part)
            ]
        );
    }

    #[test]
    fn test_parse_part_then_volume() {
        let segments = parse_volume_number("Part 5 Volume 2");
        assert_eq!(
            segments,
            vec![
                VnSegment::new("5", VnKind::Part),
                VnSegment::new("2", VnKind::Volume)
            ]
        );
    }

    #[test]
    fn test_parse_special() {
        assert_eq!(
            parse_volume_number("Short Stories"),
            vec![VnSegment::new("Short Stories", VnKind::Special)]
        );
    }

    #[test]
    fn test_merge_marks_volume_lists() {
        let value = run(&[RuleId::VnMerge], series_value(numbers(&["1", "2", "3", "5"])));
        let merged = match &value.notes().unwrap().volume_numbers {
            Slot::Raw(numbers) => numbers.clone(),
            other => panic!("volume numbers should stay raw, got {:?}", other),
        };
        assert!(merged.merged);
        assert_eq!(merged.len(), 4);
        assert_eq!(merged.compact(), "1-3,5");
    }

    #[test]
    fn test_merge_keeps_single_volume_unmarked() {
        let value = run(&[RuleId::VnMerge], series_value(numbers(&["4"])));
        assert_eq!(
            value.notes().unwrap().volume_numbers.raw().map(|n| n.merged),
            Some(false)
        );
    }

    #[test]
    fn test_full_renders_merged_list_compactly() {
        let merged = run(
            &[RuleId::VnMerge, RuleId::VnFull],
            series_value(numbers(&["1", "2", "3", "5"])),
        );
        assert_eq!(rendered_volumes(&merged), Some("Volumes 1-3,5"));

        let listed = run(&[RuleId::VnFull], series_value(numbers(&["1", "2", "3", "5"])));
        assert_eq!(rendered_volumes(&listed), Some("Volumes 1, 2, 3 & 5"));
    }

    #[test]
    fn test_short_renders_compactly() {
        let value = run(&[RuleId::VnShort], series_value(numbers(&["1", "2", "3", "5"])));
        assert_eq!(rendered_volumes(&value), Some("1-3,5"));
    }

    #[test]
    fn test_spell_out_multiple() {
        assert_eq!(spell_out(&numbers(&["1", "2", "3"])), "Volumes 1, 2 & 3");
    }

    #[test]
    fn test_spell_out_compound() {
        let vns = VolumeNumbers::new(vec![VolumeNumber {
            volume: 0,
            segments: vec![
                VnSegment::new("5", VnKind::Part),
                VnSegment::new("2", VnKind::Volume),
            ],
        }]);
        assert_eq!(spell_out(&vns), "Part 5 Volume 2");
    }

    #[test]
    fn test_spell_out_single() {
        assert_eq!(spell_out(&numbers(&["4"])), "Volume 4");
    }
}
