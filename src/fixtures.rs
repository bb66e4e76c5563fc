// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Fixture documents used by the scenarios.
//!
//! The fixture directory holds the image stream manifest and one build
//! configuration per RHEL major version and architecture:
//!
//! ```text
//! testdata/subscription-content/
//! ├── build-imagestream.yaml
//! ├── buildconfig-subscription-content-x86_64-rhel7.yaml
//! ├── buildconfig-subscription-content-arm64-rhel7.yaml
//! └── ...
//! ```
//!
//! Build configurations are addressed by [`BuildConfigRef`] (the file name), which
//! is what [`crate::arch::resolve`] rewrites.

use crate::arch::BuildConfigRef;
use crate::constants::{
    ARCH_PLACEHOLDER, BUILD_CONFIG_FIXTURE_PREFIX, BUILD_CONFIG_NAME_PREFIX,
    IMAGE_STREAM_FIXTURE,
};
use anyhow::{Context, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// RHEL major version a scenario builds on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RhelVersion {
    Rhel7,
    Rhel8,
    Rhel9,
}

impl RhelVersion {
    /// All versions, in the order scenarios run.
    pub const ALL: [RhelVersion; 3] = [Self::Rhel7, Self::Rhel8, Self::Rhel9];

    #[must_use]
    pub fn major(self) -> u8 {
        match self {
            Self::Rhel7 => 7,
            Self::Rhel8 => 8,
            Self::Rhel9 => 9,
        }
    }

    /// Name of the `BuildConfig` declared by this version's fixture.
    #[must_use]
    pub fn build_config_name(self) -> String {
        format!("{BUILD_CONFIG_NAME_PREFIX}-rhel{}", self.major())
    }

    /// Reference to this version's `x86_64` build configuration fixture.
    #[must_use]
    pub fn build_config_ref(self) -> BuildConfigRef {
        BuildConfigRef::new(format!(
            "{BUILD_CONFIG_FIXTURE_PREFIX}-{ARCH_PLACEHOLDER}-rhel{}.yaml",
            self.major()
        ))
    }
}

impl fmt::Display for RhelVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RHEL {}", self.major())
    }
}

impl FromStr for RhelVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("RHEL")
            .or_else(|| trimmed.strip_prefix("rhel"))
            .unwrap_or(trimmed)
            .trim_start();
        match digits {
            "7" => Ok(Self::Rhel7),
            "8" => Ok(Self::Rhel8),
            "9" => Ok(Self::Rhel9),
            _ => Err(format!("unsupported RHEL version '{s}' (expected 7, 8 or 9)")),
        }
    }
}

/// Directory of fixture documents.
#[derive(Debug, Clone)]
pub struct FixtureSet {
    dir: PathBuf,
}

impl FixtureSet {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of a build configuration fixture.
    #[must_use]
    pub fn build_config_path(&self, config: &BuildConfigRef) -> PathBuf {
        self.dir.join(config.as_str())
    }

    /// Read the image stream manifest.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub async fn image_stream(&self) -> Result<String> {
        read_fixture(&self.dir.join(IMAGE_STREAM_FIXTURE)).await
    }

    /// Read a build configuration manifest.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read; in particular when no fixture
    /// exists for the resolved architecture.
    pub async fn build_config(&self, config: &BuildConfigRef) -> Result<String> {
        read_fixture(&self.build_config_path(config)).await
    }
}

async fn read_fixture(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading fixture {}", path.display()))
}

#[cfg(test)]
#[path = "fixtures_tests.rs"]
mod fixtures_tests;
