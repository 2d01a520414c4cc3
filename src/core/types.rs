use serde::{Deserialize, Serialize};

use crate::core::error::EngineError;
use crate::core::fragment_id::FragmentId;

/// Cluster (bin) label assigned by an external binner. Opaque token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClusterLabel(pub String);

impl ClusterLabel {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ClusterLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Window geometry used when cutting contigs.
///
/// Only constructed through [`WindowConfig::new`], so `window_size >
/// overlap_size > 0` always holds. Deserializing goes through the same check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WindowSizes")]
pub struct WindowConfig {
    window_size: usize,
    overlap_size: usize,
}

/// Unchecked wire form of [`WindowConfig`]
#[derive(Deserialize)]
struct WindowSizes {
    window_size: usize,
    overlap_size: usize,
}

impl TryFrom<WindowSizes> for WindowConfig {
    type Error = EngineError;

    fn try_from(sizes: WindowSizes) -> Result<Self, Self::Error> {
        Self::new(sizes.window_size, sizes.overlap_size)
    }
}

impl WindowConfig {
    /// Validate and build a window configuration.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Configuration` unless
    /// `window_size > overlap_size > 0`.
    pub fn new(window_size: usize, overlap_size: usize) -> Result<Self, EngineError> {
        if overlap_size == 0 {
            return Err(EngineError::Configuration(
                "overlap size must be greater than 0".to_string(),
            ));
        }
        if window_size <= overlap_size {
            return Err(EngineError::Configuration(format!(
                "window size ({window_size}) must be greater than overlap size ({overlap_size})"
            )));
        }
        Ok(Self {
            window_size,
            overlap_size,
        })
    }

    #[must_use]
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    #[must_use]
    pub fn overlap_size(&self) -> usize {
        self.overlap_size
    }

    /// Distance between the starts of consecutive windows
    #[must_use]
    pub fn stride(&self) -> usize {
        self.window_size - self.overlap_size
    }
}

/// One window of a parent contig, as half-open 0-based offsets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub id: FragmentId,
    pub start: usize,
    pub end: usize,
}

impl Fragment {
    /// The fragment's bases, sliced out of its parent sequence
    #[must_use]
    pub fn sequence<'a>(&self, parent: &'a [u8]) -> &'a [u8] {
        &parent[self.start..self.end]
    }

    #[must_use]
    pub fn to_coordinate_record(&self) -> CoordinateRecord {
        CoordinateRecord {
            parent_contig_id: self.id.parent.clone(),
            start: self.start as u64,
            end: self.end as u64,
            fragment_id: self.id.to_string(),
        }
    }
}

/// One row of the coordinate table: where a fragment sits in its parent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinateRecord {
    pub parent_contig_id: String,
    pub start: u64,
    pub end: u64,
    pub fragment_id: String,
}

/// A binner's label for one fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterAssignment {
    pub fragment_id: String,
    pub label: ClusterLabel,
}

impl ClusterAssignment {
    pub fn new(fragment_id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            fragment_id: fragment_id.into(),
            label: ClusterLabel::new(label),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_config_valid() {
        let config = WindowConfig::new(100, 20).unwrap();
        assert_eq!(config.stride(), 80);
    }

    #[test]
    fn test_window_config_rejects_zero_overlap() {
        assert!(matches!(
            WindowConfig::new(100, 0),
            Err(EngineError::Configuration(_))
        ));
    }

    #[test]
    fn test_window_config_rejects_overlap_not_smaller() {
        assert!(WindowConfig::new(100, 100).is_err());
        assert!(WindowConfig::new(50, 100).is_err());
    }

    #[test]
    fn test_fragment_coordinate_record() {
        let fragment = Fragment {
            id: FragmentId::new("c1", 2),
            start: 160,
            end: 260,
        };
        let record = fragment.to_coordinate_record();
        assert_eq!(record.parent_contig_id, "c1");
        assert_eq!(record.start, 160);
        assert_eq!(record.end, 260);
        assert_eq!(record.fragment_id, "c1.concoct_part_2");
    }

    #[test]
    fn test_window_config_getters() {
        let config = WindowConfig::new(10_000, 100).unwrap();
        assert_eq!(config.window_size(), 10_000);
        assert_eq!(config.overlap_size(), 100);
        assert_eq!(config.stride(), 9_900);
    }

    #[test]
    fn test_window_config_json_round_trip() {
        let config = WindowConfig::new(100, 20).unwrap();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(json, r#"{"window_size":100,"overlap_size":20}"#);
        let back: WindowConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_window_config_json_rejects_invalid_sizes() {
        for json in [
            r#"{"window_size":100,"overlap_size":0}"#,
            r#"{"window_size":100,"overlap_size":100}"#,
            r#"{"window_size":100,"overlap_size":120}"#,
        ] {
            let err = serde_json::from_str::<WindowConfig>(json).unwrap_err();
            assert!(err.to_string().contains("Invalid configuration"), "{json}: {err}");
        }
    }
}
