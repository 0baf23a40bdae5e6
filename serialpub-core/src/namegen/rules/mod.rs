//! The rule registry
//!
//! Every rule is a pure transformation `Value -> Value` that may read the
//! naming request for context. Rules are identified by [`RuleId`] and
//! described by a static [`RuleDef`] table, so compiling an expression can
//! resolve every name up front and execution never looks anything up by
//! string.

mod marker;
mod meta;
mod part;
mod series;
mod string;
mod volume;

pub(crate) use part::part_number;

use super::value::{Notes, Value};
use super::Channel;
use crate::error::{NamingError, ParseError, Result};
use crate::types::NamingRequest;

/// Signature shared by every rule implementation
type RuleFn = fn(Value, &RuleCall, &RuleContext<'_>) -> Result<Value>;

/// Which values a rule can be applied to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accepts {
    /// Non-terminal values only
    Structured,
    /// `StringValue` only
    Terminal,
    /// Any value
    Any,
}

/// Default value of a rule parameter (also fixes its type)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamDefault {
    Int(i64),
    Str(&'static str),
}

/// A declared rule parameter
#[derive(Debug, Clone, Copy)]
pub struct Param {
    pub name: &'static str,
    pub default: ParamDefault,
    /// String values must be ASCII
    pub ascii: bool,
}

impl Param {
    const fn int(name: &'static str, default: i64) -> Self {
        Self {
            name,
            default: ParamDefault::Int(default),
            ascii: false,
        }
    }

    const fn str(name: &'static str, default: &'static str) -> Self {
        Self {
            name,
            default: ParamDefault::Str(default),
            ascii: false,
        }
    }

    const fn ascii(name: &'static str, default: &'static str) -> Self {
        Self {
            ascii: true,
            ..Self::str(name, default)
        }
    }
}

/// Static description of a rule
pub struct RuleDef {
    pub id: RuleId,
    pub name: &'static str,
    pub accepts: Accepts,
    pub params: &'static [Param],
    apply: RuleFn,
}

macro_rules! rule_ids {
    ($($variant:ident),* $(,)?) => {
        /// Identifier of a registered rule
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum RuleId {
            $($variant),*
        }

        impl RuleId {
            /// Every registered rule, in registry order
            pub const ALL: &'static [RuleId] = &[$(RuleId::$variant),*];
        }
    };
}

rule_ids!(
    FcRm,
    FcRmIfComplete,
    FcShort,
    FcFull,
    PToVolume,
    PToSeries,
    PSplitPart,
    PTitle,
    PnRm,
    PnRmIfComplete,
    PnPrependVn,
    PnPrependVnIfMultiple,
    Pn0pad,
    PnShort,
    PnFull,
    VToSeries,
    VSplitVolume,
    VTitle,
    VnRm,
    VnRmIfPn,
    VnNumber,
    VnMerge,
    Vn0pad,
    VnShort,
    VnFull,
    ToSeries,
    STitle,
    SSlug,
    SsRmStopwords,
    SsRmSubtitle,
    SsAcronym,
    SsFirst,
    SsMaxLen,
    LegacyT,
    LegacyF,
    ToString,
    StrRmSpace,
    StrReplaceSpace,
    StrFilesafe,
);

const fn def(
    id: RuleId,
    name: &'static str,
    accepts: Accepts,
    params: &'static [Param],
    apply: RuleFn,
) -> RuleDef {
    RuleDef {
        id,
        name,
        accepts,
        params,
        apply,
    }
}

const NO_PARAMS: &[Param] = &[];

use Accepts::{Any, Structured, Terminal};

/// The registry, indexed by `RuleId as usize`
static RULES: &[RuleDef] = &[
    def(RuleId::FcRm, "fc_rm", Structured, NO_PARAMS, marker::fc_rm),
    def(
        RuleId::FcRmIfComplete,
        "fc_rm_if_complete",
        Structured,
        NO_PARAMS,
        marker::fc_rm_if_complete,
    ),
    def(RuleId::FcShort, "fc_short", Any, NO_PARAMS, marker::fc_short),
    def(RuleId::FcFull, "fc_full", Any, NO_PARAMS, marker::fc_full),
    def(RuleId::PToVolume, "p_to_volume", Structured, NO_PARAMS, part::p_to_volume),
    def(RuleId::PToSeries, "p_to_series", Structured, NO_PARAMS, part::p_to_series),
    def(RuleId::PSplitPart, "p_split_part", Structured, NO_PARAMS, part::p_split_part),
    def(RuleId::PTitle, "p_title", Structured, NO_PARAMS, part::p_title),
    def(RuleId::PnRm, "pn_rm", Structured, NO_PARAMS, part::pn_rm),
    def(
        RuleId::PnRmIfComplete,
        "pn_rm_if_complete",
        Structured,
        NO_PARAMS,
        part::pn_rm_if_complete,
    ),
    def(RuleId::PnPrependVn, "pn_prepend_vn", Structured, NO_PARAMS, part::pn_prepend_vn),
    def(
        RuleId::PnPrependVnIfMultiple,
        "pn_prepend_vn_if_multiple",
        Structured,
        NO_PARAMS,
        part::pn_prepend_vn_if_multiple,
    ),
    def(RuleId::Pn0pad, "pn_0pad", Structured, NO_PARAMS, part::pn_0pad),
    def(RuleId::PnShort, "pn_short", Structured, NO_PARAMS, part::pn_short),
    def(RuleId::PnFull, "pn_full", Structured, NO_PARAMS, part::pn_full),
    def(RuleId::VToSeries, "v_to_series", Structured, NO_PARAMS, volume::v_to_series),
    def(RuleId::VSplitVolume, "v_split_volume", Structured, NO_PARAMS, volume::v_split_volume),
    def(RuleId::VTitle, "v_title", Structured, NO_PARAMS, volume::v_title),
    def(RuleId::VnRm, "vn_rm", Structured, NO_PARAMS, volume::vn_rm),
    def(RuleId::VnRmIfPn, "vn_rm_if_pn", Structured, NO_PARAMS, volume::vn_rm_if_pn),
    def(RuleId::VnNumber, "vn_number", Structured, NO_PARAMS, volume::vn_number),
    def(RuleId::VnMerge, "vn_merge", Structured, NO_PARAMS, volume::vn_merge),
    def(RuleId::Vn0pad, "vn_0pad", Structured, NO_PARAMS, volume::vn_0pad),
    def(RuleId::VnShort, "vn_short", Structured, NO_PARAMS, volume::vn_short),
    def(RuleId::VnFull, "vn_full", Structured, NO_PARAMS, volume::vn_full),
    def(RuleId::ToSeries, "to_series", Structured, NO_PARAMS, meta::to_series),
    def(RuleId::STitle, "s_title", Structured, NO_PARAMS, series::s_title),
    def(RuleId::SSlug, "s_slug", Structured, NO_PARAMS, series::s_slug),
    def(RuleId::SsRmStopwords, "ss_rm_stopwords", Structured, NO_PARAMS, series::ss_rm_stopwords),
    def(RuleId::SsRmSubtitle, "ss_rm_subtitle", Structured, NO_PARAMS, series::ss_rm_subtitle),
    def(RuleId::SsAcronym, "ss_acronym", Structured, NO_PARAMS, series::ss_acronym),
    def(RuleId::SsFirst, "ss_first", Structured, &[Param::int("n", 1)], series::ss_first),
    def(RuleId::SsMaxLen, "ss_max_len", Structured, &[Param::int("n", 30)], series::ss_max_len),
    def(RuleId::LegacyT, "legacy_t", Structured, NO_PARAMS, meta::legacy_t),
    def(RuleId::LegacyF, "legacy_f", Structured, NO_PARAMS, meta::legacy_f),
    def(RuleId::ToString, "to_string", Any, &[Param::int("add_colon", 0)], meta::to_string),
    def(RuleId::StrRmSpace, "str_rm_space", Terminal, NO_PARAMS, string::str_rm_space),
    def(
        RuleId::StrReplaceSpace,
        "str_replace_space",
        Terminal,
        &[Param::str("replacement", "_")],
        string::str_replace_space,
    ),
    def(
        RuleId::StrFilesafe,
        "str_filesafe",
        Terminal,
        &[Param::ascii("replacement", "_"), Param::str("preserve", "")],
        string::str_filesafe,
    ),
];

impl RuleId {
    /// Look a rule up by its expression name
    pub fn from_name(name: &str) -> Option<RuleId> {
        RULES.iter().find(|d| d.name == name).map(|d| d.id)
    }

    pub fn def(self) -> &'static RuleDef {
        &RULES[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.def().name
    }
}

/// A literal argument as written in an expression
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Str(String),
}

/// A typed, fully defaulted rule argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    Int(i64),
    Str(String),
}

/// A rule with its resolved arguments, as stored in a compiled program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleCall {
    rule: RuleId,
    args: Vec<Arg>,
}

impl RuleCall {
    /// Call a rule with all parameters at their defaults
    pub fn new(rule: RuleId) -> Self {
        let args = rule.def().params.iter().map(|p| default_arg(p.default)).collect();
        Self { rule, args }
    }

    /// Type-check literal arguments against the rule's parameters
    ///
    /// Omitted trailing arguments take their declared defaults.
    pub fn resolve(
        rule: RuleId,
        literals: Vec<Literal>,
        position: usize,
    ) -> std::result::Result<Self, ParseError> {
        let def = rule.def();
        if literals.len() > def.params.len() {
            return Err(ParseError::Arity {
                rule: def.name,
                expected: def.params.len(),
                found: literals.len(),
                position,
            });
        }

        let mut call = Self::new(rule);
        for (index, (literal, param)) in literals.into_iter().zip(def.params).enumerate() {
            call.args[index] = match (param.default, literal) {
                (ParamDefault::Int(_), Literal::Int(v)) => Arg::Int(v),
                (ParamDefault::Str(_), Literal::Str(s)) if param.ascii && !s.is_ascii() => {
                    return Err(ParseError::NonAsciiArgument {
                        rule: def.name,
                        index,
                        position,
                    })
                }
                (ParamDefault::Str(_), Literal::Str(s)) => Arg::Str(s),
                (default, _) => {
                    return Err(ParseError::ArgumentType {
                        rule: def.name,
                        index,
                        expected: match default {
                            ParamDefault::Int(_) => "an integer",
                            ParamDefault::Str(_) => "a string",
                        },
                        position,
                    })
                }
            };
        }
        Ok(call)
    }

    pub fn rule(&self) -> RuleId {
        self.rule
    }

    pub fn args(&self) -> &[Arg] {
        &self.args
    }

    /// Integer argument `index`, or the parameter default
    fn int(&self, index: usize) -> i64 {
        match self.args.get(index) {
            Some(Arg::Int(v)) => *v,
            _ => match self.rule.def().params.get(index).map(|p| p.default) {
                Some(ParamDefault::Int(v)) => v,
                _ => 0,
            },
        }
    }

    /// Integer argument `index` as a count; negative values count as zero
    fn count(&self, index: usize) -> usize {
        usize::try_from(self.int(index)).unwrap_or(0)
    }

    /// String argument `index`, or the parameter default
    fn str(&self, index: usize) -> &str {
        match self.args.get(index) {
            Some(Arg::Str(s)) => s,
            _ => match self.rule.def().params.get(index).map(|p| p.default) {
                Some(ParamDefault::Str(s)) => s,
                _ => "",
            },
        }
    }
}

fn default_arg(default: ParamDefault) -> Arg {
    match default {
        ParamDefault::Int(v) => Arg::Int(v),
        ParamDefault::Str(s) => Arg::Str(s.to_string()),
    }
}

/// Read-only context available to every rule
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub request: &'a NamingRequest,
    pub channel: Channel,
}

impl<'a> RuleContext<'a> {
    pub fn new(request: &'a NamingRequest, channel: Channel) -> Self {
        Self { request, channel }
    }

    /// Index of the volume the part at `part` belongs to
    fn volume_of_part(&self, part: usize) -> Result<usize> {
        self.request
            .parts
            .get(part)
            .and_then(|p| self.request.volume_index(p.volume))
            .ok_or_else(|| {
                NamingError::InvalidRequest(format!("part #{} has no known volume", part))
            })
    }
}

/// Apply one rule to a value
///
/// Fails with [`NamingError::TypeMismatch`] when the rule does not accept
/// the value's variant.
pub fn apply(call: &RuleCall, value: Value, ctx: &RuleContext<'_>) -> Result<Value> {
    let def = call.rule.def();
    let accepted = match def.accepts {
        Accepts::Structured => !value.is_terminal(),
        Accepts::Terminal => value.is_terminal(),
        Accepts::Any => true,
    };
    if !accepted {
        return Err(NamingError::TypeMismatch {
            channel: ctx.channel,
            rule: def.name,
            variant: value.variant(),
        });
    }
    tracing::debug!(rule = def.name, channel = %ctx.channel, "Apply rule");
    (def.apply)(value, call, ctx)
}

/// Run `f` on the annotation slots of a non-terminal value
fn map_notes(mut value: Value, f: impl FnOnce(&mut Notes)) -> Value {
    if let Some(notes) = value.notes_mut() {
        f(notes);
    }
    value
}

/// Log and return a value a structural rule does not touch
fn pass_through(value: Value, rule: &'static str) -> Result<Value> {
    tracing::trace!(rule, variant = value.variant(), "Rule target absent, value unchanged");
    Ok(value)
}
