//! The immutable input of one naming decision

use serde::{Deserialize, Serialize};

use super::{Part, Series, Volume};
use crate::error::{NamingError, Result};

/// Finality / completeness flags
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Fc {
    /// The last packaged part is the last part of its volume
    #[serde(rename = "final")]
    pub is_final: bool,

    /// The package covers an entire volume
    #[serde(rename = "complete")]
    pub is_complete: bool,
}

impl Fc {
    pub fn new(is_final: bool, is_complete: bool) -> Self {
        Self {
            is_final,
            is_complete,
        }
    }
}

/// Everything the naming engine knows about the package being produced
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NamingRequest {
    pub series: Series,

    /// Ordered volumes covered by the package
    pub volumes: Vec<Volume>,

    /// Ordered parts covered by the package
    pub parts: Vec<Part>,

    pub fc: Fc,
}

impl NamingRequest {
    /// Build a validated request
    ///
    /// Volumes and parts must be non-empty and every part must belong to one
    /// of the listed volumes.
    pub fn new(series: Series, volumes: Vec<Volume>, parts: Vec<Part>, fc: Fc) -> Result<Self> {
        let request = Self {
            series,
            volumes,
            parts,
            fc,
        };
        request.validate()?;
        Ok(request)
    }

    /// Check the invariants the naming engine relies on
    pub fn validate(&self) -> Result<()> {
        if self.volumes.is_empty() {
            return Err(NamingError::InvalidRequest("no volumes".to_string()));
        }
        if self.parts.is_empty() {
            return Err(NamingError::InvalidRequest("no parts".to_string()));
        }
        if let Some(part) = self
            .parts
            .iter()
            .find(|p| self.volume_index(p.volume).is_none())
        {
            return Err(NamingError::InvalidRequest(format!(
                "part '{}' refers to unknown volume {}",
                part.title, part.volume
            )));
        }
        Ok(())
    }

    /// Index in `volumes` of the volume with the given number
    pub fn volume_index(&self, num: u32) -> Option<usize> {
        self.volumes.iter().position(|v| v.num == num)
    }

    /// The volume a part belongs to
    pub fn volume_of(&self, part: &Part) -> Option<&Volume> {
        self.volume_index(part.volume).map(|i| &self.volumes[i])
    }

    /// Indices of the volumes actually spanned by the parts, in order
    pub fn spanned_volumes(&self) -> Vec<usize> {
        let mut spanned = Vec::new();
        for part in &self.parts {
            if let Some(i) = self.volume_index(part.volume) {
                if !spanned.contains(&i) {
                    spanned.push(i);
                }
            }
        }
        spanned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series() -> Series {
        Series::new("My Series")
    }

    #[test]
    fn test_request_rejects_empty_parts() {
        let err = NamingRequest::new(
            series(),
            vec![Volume::new(1, "My Series: Volume 1")],
            Vec::new(),
            Fc::default(),
        )
        .unwrap_err();
        assert!(matches!(err, NamingError::InvalidRequest(_)));
    }

    #[test]
    fn test_request_rejects_unknown_volume() {
        let err = NamingRequest::new(
            series(),
            vec![Volume::new(1, "My Series: Volume 1")],
            vec![Part::new(2, 1, "Part 1")],
            Fc::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("unknown volume 2"));
    }

    #[test]
    fn test_spanned_volumes_keep_part_order() {
        let request = NamingRequest::new(
            series(),
            vec![Volume::new(1, "V1"), Volume::new(2, "V2")],
            vec![
                Part::new(2, 1, "a"),
                Part::new(1, 3, "b"),
                Part::new(2, 2, "c"),
            ],
            Fc::default(),
        )
        .unwrap();
        assert_eq!(request.spanned_volumes(), vec![1, 0]);
    }

    #[test]
    fn test_fc_serialization_uses_short_names() {
        let json = serde_json::to_string(&Fc::new(true, false)).unwrap();
        assert_eq!(json, r#"{"final":true,"complete":false}"#);
    }
}
