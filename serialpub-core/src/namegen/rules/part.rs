//! p_* and pn_*: the part and part-number rules

use super::{map_notes, pass_through, RuleCall, RuleContext};
use crate::error::Result;
use crate::namegen::text::zero_pad;
use crate::namegen::value::{
    Notes, PartNumber, PartValue, SeriesValue, Slot, Value, VolumeNumber, VolumeNumbers,
    VolumeValue,
};
use crate::types::NamingRequest;

const PAD_WIDTH: usize = 2;

pub(super) fn p_to_volume(value: Value, _call: &RuleCall, ctx: &RuleContext<'_>) -> Result<Value> {
    match value {
        Value::Part(p) => part_to_volume(p, ctx),
        other => pass_through(other, "p_to_volume"),
    }
}

/// Same shape as `p_to_volume`: the part number moves into the part-number
/// slot and the head becomes the part's volume.
pub(super) fn p_split_part(value: Value, _call: &RuleCall, ctx: &RuleContext<'_>) -> Result<Value> {
    match value {
        Value::Part(p) => part_to_volume(p, ctx),
        other => pass_through(other, "p_split_part"),
    }
}

pub(super) fn p_to_series(value: Value, _call: &RuleCall, ctx: &RuleContext<'_>) -> Result<Value> {
    match value {
        Value::Part(p) => {
            let volume = ctx.volume_of_part(p.part)?;
            let num = ctx.request.volumes[volume].num;
            let mut notes = p.notes;
            notes.volume_numbers =
                Slot::Raw(VolumeNumbers::new(vec![VolumeNumber::internal(volume, num)]));
            notes.part_numbers = Slot::Raw(vec![part_number(ctx.request, p.part)]);
            Ok(Value::Series(SeriesValue {
                volumes: vec![volume],
                parts: vec![p.part],
                notes,
            }))
        }
        other => pass_through(other, "p_to_series"),
    }
}

pub(super) fn p_title(value: Value, _call: &RuleCall, ctx: &RuleContext<'_>) -> Result<Value> {
    match value {
        Value::Part(p) => {
            let title = ctx.request.parts[p.part].title.clone();
            Ok(Value::Part(p).collapse(Some(title)))
        }
        other => pass_through(other, "p_title"),
    }
}

pub(super) fn pn_rm(value: Value, _call: &RuleCall, _ctx: &RuleContext<'_>) -> Result<Value> {
    Ok(remove_part_numbers(value))
}

pub(super) fn pn_rm_if_complete(
    value: Value,
    _call: &RuleCall,
    ctx: &RuleContext<'_>,
) -> Result<Value> {
    if ctx.request.fc.is_complete {
        Ok(remove_part_numbers(value))
    } else {
        Ok(value)
    }
}

pub(super) fn pn_prepend_vn(
    value: Value,
    _call: &RuleCall,
    ctx: &RuleContext<'_>,
) -> Result<Value> {
    prepend_volume_numbers(value, ctx, false)
}

pub(super) fn pn_prepend_vn_if_multiple(
    value: Value,
    _call: &RuleCall,
    ctx: &RuleContext<'_>,
) -> Result<Value> {
    prepend_volume_numbers(value, ctx, true)
}

pub(super) fn pn_0pad(value: Value, _call: &RuleCall, _ctx: &RuleContext<'_>) -> Result<Value> {
    Ok(map_notes(value, |notes| {
        if let Slot::Raw(numbers) = &mut notes.part_numbers {
            for pn in numbers.iter_mut() {
                pn.text = zero_pad(&pn.text, PAD_WIDTH);
            }
        }
    }))
}

pub(super) fn pn_short(value: Value, _call: &RuleCall, _ctx: &RuleContext<'_>) -> Result<Value> {
    Ok(render_part_numbers(value, |numbers| match numbers {
        [single] => single.text.clone(),
        [first, .., last] => format!("{}-{}", first.text, last.text),
        [] => String::new(),
    }))
}

pub(super) fn pn_full(value: Value, _call: &RuleCall, _ctx: &RuleContext<'_>) -> Result<Value> {
    Ok(render_part_numbers(value, |numbers| match numbers {
        [single] => format!("Part {}", single.text),
        [first, .., last] => format!("Parts {} to {}", first.text, last.text),
        [] => String::new(),
    }))
}

fn part_to_volume(p: PartValue, ctx: &RuleContext<'_>) -> Result<Value> {
    let volume = ctx.volume_of_part(p.part)?;
    let mut notes: Notes = p.notes;
    notes.part_numbers = Slot::Raw(vec![part_number(ctx.request, p.part)]);
    Ok(Value::Volume(VolumeValue {
        volume,
        parts: vec![p.part],
        notes,
    }))
}

/// Default part number: the part's position inside its volume
pub(crate) fn part_number(request: &NamingRequest, part: usize) -> PartNumber {
    PartNumber {
        part,
        text: request.parts[part].num_in_volume.to_string(),
    }
}

fn remove_part_numbers(value: Value) -> Value {
    map_notes(value, |notes| {
        if notes.part_numbers.is_raw() {
            notes.part_numbers = Slot::Absent;
        }
    })
}

fn render_part_numbers(value: Value, render: impl FnOnce(&[PartNumber]) -> String) -> Value {
    map_notes(value, |notes| {
        if let Slot::Raw(numbers) = &notes.part_numbers {
            notes.part_numbers = Slot::Rendered(render(numbers));
        }
    })
}

/// Prefix each part number with the dotted number of its volume ("6" + "2" -> "6.2")
fn prepend_volume_numbers(
    mut value: Value,
    ctx: &RuleContext<'_>,
    only_if_multiple: bool,
) -> Result<Value> {
    if let Some(notes) = value.notes_mut() {
        if let (Slot::Raw(volume_numbers), Slot::Raw(part_numbers)) =
            (&notes.volume_numbers, &mut notes.part_numbers)
        {
            if !only_if_multiple || volume_numbers.len() > 1 {
                for pn in part_numbers.iter_mut() {
                    let volume = ctx.volume_of_part(pn.part)?;
                    if let Some(vn) = volume_numbers.find(volume) {
                        pn.text = format!("{}.{}", vn.dotted(), pn.text);
                    }
                }
            }
        }
    }
    Ok(value)
}
