//! Initial value of a channel pipeline
//!
//! The seed matches what is being packaged: a single part, several parts
//! of one volume, or parts spread over several volumes.

use super::rules::part_number;
use super::value::{
    Notes, PartValue, SeriesValue, Slot, Value, VolumeNumber, VolumeNumbers, VolumeValue,
};
use crate::error::{NamingError, Result};
use crate::types::NamingRequest;

pub fn initial_value(request: &NamingRequest) -> Result<Value> {
    let parts: Vec<usize> = (0..request.parts.len()).collect();
    let notes = Notes::marker(request.fc);

    if let [part] = parts.as_slice() {
        return Ok(Value::Part(PartValue { part: *part, notes }));
    }

    let volumes = request.spanned_volumes();
    let part_numbers = Slot::Raw(parts.iter().map(|&p| part_number(request, p)).collect());
    match volumes.as_slice() {
        [] => Err(NamingError::InvalidRequest("no volumes".to_string())),
        [volume] => Ok(Value::Volume(VolumeValue {
            volume: *volume,
            parts,
            notes: Notes {
                part_numbers,
                ..notes
            },
        })),
        _ => {
            let volume_numbers = volumes
                .iter()
                .map(|&v| VolumeNumber::internal(v, request.volumes[v].num))
                .collect();
            Ok(Value::Series(SeriesValue {
                volumes,
                parts,
                notes: Notes {
                    volume_numbers: Slot::Raw(VolumeNumbers::new(volume_numbers)),
                    part_numbers,
                    ..notes
                },
            }))
        }
    }
}
