//! Construction-time options for the checksum layer.

use serde::{Deserialize, Serialize};

/// Option markers accepted by [`ChecksumLayer`](crate::ChecksumLayer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChecksumOption {
    /// Verify the checksum before handing bytes to the inner layer.
    VerifyBeforeRead,
    /// No-op marker.
    Empty,
    /// A group of markers, flattened during resolution.
    Bundle(Vec<ChecksumOption>),
}

/// Order in which reading and checksum verification happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verification {
    /// Verify the whole range first, then let the inner layer decode.
    BeforeRead,
    /// Let the inner layer decode, then verify what it consumed.
    #[default]
    AfterRead,
}

/// Resolved options, stored by the layer for its whole lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChecksumLayerOptions {
    pub verify_before_read: bool,
}

impl ChecksumLayerOptions {
    /// Resolves a list of markers. Bundles are flattened recursively and
    /// `Empty` markers are ignored.
    pub fn resolve(options: &[ChecksumOption]) -> Self {
        let mut resolved = Self::default();
        resolved.apply(options);
        resolved
    }

    fn apply(&mut self, options: &[ChecksumOption]) {
        for option in options {
            match option {
                ChecksumOption::VerifyBeforeRead => self.verify_before_read = true,
                ChecksumOption::Empty => {}
                ChecksumOption::Bundle(inner) => self.apply(inner),
            }
        }
    }

    pub fn verifies_before_read(&self) -> bool {
        self.verify_before_read
    }

    pub fn verification(&self) -> Verification {
        if self.verify_before_read {
            Verification::BeforeRead
        } else {
            Verification::AfterRead
        }
    }
}

/// Serializable form of the layer options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChecksumLayerConfig {
    /// Whether the checksum is verified before the inner layer reads.
    pub verify_before_read: bool,
}

impl From<&ChecksumLayerConfig> for ChecksumLayerOptions {
    fn from(config: &ChecksumLayerConfig) -> Self {
        Self {
            verify_before_read: config.verify_before_read,
        }
    }
}
