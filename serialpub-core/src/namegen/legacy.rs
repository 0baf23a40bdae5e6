//! Historical naming, kept so existing libraries keep their file names
//!
//! These are what `legacy_t` and `legacy_f` produce, and they are exposed
//! on their own for callers and override libraries that only want to tweak
//! the legacy output.

use super::text::{ends_with_punctuation, to_safe_filename, to_safe_foldername};
use crate::types::{Fc, Part, Series, Volume};

/// Title of a package
///
/// - one part: `"<part title>"`, with `" [Final]"` for the last part of a volume
/// - one volume: `"<volume title> [Parts 1 to 3]"` or `"<volume title> [Complete]"`
/// - several volumes: `"<series title>: Volumes 1, 2 & 3 [Parts 1.2 to 3.4]"`
pub fn legacy_title(series: &Series, volumes: &[Volume], parts: &[Part], fc: Fc) -> String {
    let (first, last) = match (parts.first(), parts.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return series.title.clone(),
    };

    if parts.len() == 1 {
        let suffix = if fc.is_final { " [Final]" } else { "" };
        return format!("{}{}", first.title, suffix);
    }

    let final_suffix = if fc.is_final { " - Final" } else { "" };
    match volumes {
        [volume] => {
            let part_segment = if fc.is_complete {
                "Complete".to_string()
            } else {
                format!(
                    "Parts {} to {}{}",
                    first.num_in_volume, last.num_in_volume, final_suffix
                )
            };
            format!("{} [{}]", volume.title, part_segment)
        }
        _ => {
            let base = &series.title;
            let colon = if ends_with_punctuation(base) { "" } else { ":" };
            let nums: Vec<String> = volumes.iter().map(|v| v.num.to_string()).collect();
            let volume_segment = match nums.split_last() {
                Some((last_num, init)) if !init.is_empty() => {
                    format!("Volumes {} & {}", init.join(", "), last_num)
                }
                Some((last_num, _)) => format!("Volume {}", last_num),
                None => String::new(),
            };
            format!(
                "{}{} {} [Parts {}.{} to {}.{}{}]",
                base,
                colon,
                volume_segment,
                first.volume,
                first.num_in_volume,
                last.volume,
                last.num_in_volume,
                final_suffix
            )
        }
    }
}

/// File-safe form of [`legacy_title`]
pub fn legacy_filename(series: &Series, volumes: &[Volume], parts: &[Part], fc: Fc) -> String {
    to_safe_filename(&legacy_title(series, volumes, parts, fc), "_", "")
}

/// Folder named after the series
pub fn legacy_folder(series: &Series) -> String {
    to_safe_foldername(&series.title)
}
