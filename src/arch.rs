// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Architecture-aware selection of build configurations.
//!
//! Build configuration fixtures are written for `x86_64` and carry that token in
//! their reference (file name). Before a configuration is applied, the reference is
//! rewritten so it targets an architecture actually present among the cluster's
//! worker nodes.
//!
//! # Example
//!
//! ```rust
//! use entitled_builds::arch::{resolve, BuildConfigRef, NodeArchitectureInventory, Resolution};
//!
//! let config = BuildConfigRef::new("buildconfig-x86_64-rhel8.yaml");
//! let inventory = NodeArchitectureInventory::from_labels(["arm64"]);
//!
//! assert_eq!(
//!     resolve(&config, &inventory),
//!     Resolution::Found(BuildConfigRef::new("buildconfig-arm64-rhel8.yaml"))
//! );
//! ```

use crate::constants::ARCH_PLACEHOLDER;
use std::fmt;

/// CPU architecture of a worker node, as reported in `status.nodeInfo.architecture`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Architecture {
    /// 64-bit x86; the architecture fixtures are written for
    Amd64,
    /// 64-bit ARM
    Arm64,
    /// 64-bit little-endian POWER
    Ppc64le,
    /// IBM Z
    S390x,
    /// Any label this crate has no build configurations for
    Unknown(String),
}

impl Architecture {
    /// Parse a node architecture label. Unrecognized labels map to [`Architecture::Unknown`].
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label {
            "amd64" => Self::Amd64,
            "arm64" => Self::Arm64,
            "ppc64le" => Self::Ppc64le,
            "s390x" => Self::S390x,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// The label as Kubernetes reports it.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Amd64 => "amd64",
            Self::Arm64 => "arm64",
            Self::Ppc64le => "ppc64le",
            Self::S390x => "s390x",
            Self::Unknown(label) => label,
        }
    }

    /// Whether build configurations exist for this architecture.
    #[must_use]
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Architectures observed across a cluster's worker nodes, in the order the API
/// returned the nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeArchitectureInventory {
    architectures: Vec<Architecture>,
}

impl NodeArchitectureInventory {
    /// Build an inventory from raw node architecture labels.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            architectures: labels
                .into_iter()
                .map(|label| Architecture::from_label(label.as_ref()))
                .collect(),
        }
    }

    /// An inventory with no nodes, used when the node query fails.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.architectures.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.architectures.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Architecture> {
        self.architectures.iter()
    }
}

/// Reference to a build configuration document, carrying the `x86_64` placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BuildConfigRef(String);

impl BuildConfigRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Copy of this reference with every placeholder occurrence replaced by `arch`.
    #[must_use]
    pub fn for_architecture(&self, arch: &Architecture) -> Self {
        Self(self.0.replace(ARCH_PLACEHOLDER, arch.as_str()))
    }
}

impl fmt::Display for BuildConfigRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of resolving a build configuration against the worker inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A configuration targeting an available architecture
    Found(BuildConfigRef),
    /// No worker node reports a recognized architecture
    NotFound,
}

/// Select the build configuration matching the first recognized worker architecture.
///
/// Entries are visited in inventory order and the first recognized one decides:
/// `amd64` keeps the reference as is, any other recognized architecture replaces
/// every `x86_64` token with its own label. Unknown labels are skipped. If nothing
/// is recognized (including an empty inventory) the result is [`Resolution::NotFound`];
/// there is no fallback architecture.
#[must_use]
pub fn resolve(config: &BuildConfigRef, inventory: &NodeArchitectureInventory) -> Resolution {
    match inventory.iter().find(|arch| arch.is_recognized()) {
        Some(Architecture::Amd64) => Resolution::Found(config.clone()),
        Some(arch) => Resolution::Found(config.for_architecture(arch)),
        None => Resolution::NotFound,
    }
}

#[cfg(test)]
#[path = "arch_tests.rs"]
mod arch_tests;
