//! s_* and ss_*: series names

use std::collections::HashSet;
use std::sync::LazyLock;

use super::{pass_through, RuleCall, RuleContext};
use crate::error::Result;
use crate::namegen::text::{slugify, strip_punctuation, truncate_chars};
use crate::namegen::value::{SeriesStringValue, Value};

static STOPWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    include_str!("en_stopwords.txt")
        .lines()
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .collect()
});

pub(super) fn s_title(value: Value, _call: &RuleCall, ctx: &RuleContext<'_>) -> Result<Value> {
    to_series_string(value, "s_title", || ctx.request.series.full_title())
}

/// The catalog slug when there is one, otherwise a slug of the title
pub(super) fn s_slug(value: Value, _call: &RuleCall, ctx: &RuleContext<'_>) -> Result<Value> {
    let series = &ctx.request.series;
    to_series_string(value, "s_slug", || match series.slug.as_deref() {
        Some(slug) if !slug.is_empty() => slug.to_string(),
        _ => slugify(&series.full_title()),
    })
}

pub(super) fn ss_rm_stopwords(
    value: Value,
    _call: &RuleCall,
    _ctx: &RuleContext<'_>,
) -> Result<Value> {
    map_name(value, "ss_rm_stopwords", |name| {
        name.split_whitespace()
            .filter(|word| !STOPWORDS.contains(word.to_lowercase().as_str()))
            .collect::<Vec<_>>()
            .join(" ")
    })
}

/// Everything before the first ':'
pub(super) fn ss_rm_subtitle(
    value: Value,
    _call: &RuleCall,
    _ctx: &RuleContext<'_>,
) -> Result<Value> {
    map_name(value, "ss_rm_subtitle", |name| {
        name.split(':').next().unwrap_or_default().trim().to_string()
    })
}

pub(super) fn ss_acronym(value: Value, _call: &RuleCall, _ctx: &RuleContext<'_>) -> Result<Value> {
    map_name(value, "ss_acronym", |name| {
        strip_punctuation(name)
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .collect()
    })
}

pub(super) fn ss_first(value: Value, call: &RuleCall, _ctx: &RuleContext<'_>) -> Result<Value> {
    let words = call.count(0).max(1);
    map_name(value, "ss_first", |name| {
        strip_punctuation(name)
            .split_whitespace()
            .take(words)
            .collect::<Vec<_>>()
            .join(" ")
    })
}

pub(super) fn ss_max_len(value: Value, call: &RuleCall, _ctx: &RuleContext<'_>) -> Result<Value> {
    let max = call.count(0);
    map_name(value, "ss_max_len", |name| truncate_chars(name, max))
}

fn to_series_string(
    value: Value,
    rule: &'static str,
    name: impl FnOnce() -> String,
) -> Result<Value> {
    match value {
        Value::Series(s) => Ok(Value::SeriesString(SeriesStringValue {
            name: name(),
            volumes: s.volumes,
            parts: s.parts,
            notes: s.notes,
        })),
        other => pass_through(other, rule),
    }
}

fn map_name(value: Value, rule: &'static str, f: impl FnOnce(&str) -> String) -> Result<Value> {
    match value {
        Value::SeriesString(mut s) => {
            s.name = f(&s.name);
            Ok(Value::SeriesString(s))
        }
        other => pass_through(other, rule),
    }
}
