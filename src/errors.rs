// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Error types for the entitled build scenarios.
//!
//! Every failure a scenario can hit maps to exactly one variant, so the runner can
//! report *why* a scenario failed without parsing messages. Cluster I/O helpers
//! return `anyhow::Result`; the orchestrator folds those into these variants,
//! keeping the full error chain in `reason`.
//!
//! The entitlement secret being absent is not an error: it is reported as a skipped
//! scenario (see [`crate::scenario::Outcome`]).

use thiserror::Error;

/// Errors that fail a scenario.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScenarioError {
    /// Looking up the source entitlement secret failed for a reason other than 404
    #[error("Failed to get secret {namespace}/{name}: {reason}")]
    EntitlementLookupFailed {
        /// Namespace of the source secret
        namespace: String,
        /// Name of the source secret
        name: String,
        /// Underlying API error
        reason: String,
    },

    /// Applying the namespaced copy of the entitlement secret failed
    #[error("Failed to create secret {namespace}/{name}: {reason}")]
    EntitlementCopyFailed {
        /// Target namespace
        namespace: String,
        /// Secret name
        name: String,
        /// Underlying API error
        reason: String,
    },

    /// Applying the image stream that receives build output failed
    #[error("Failed to create build output imagestream in {namespace}: {reason}")]
    ImageOutputFailed {
        /// Target namespace
        namespace: String,
        /// Underlying error
        reason: String,
    },

    /// No worker node reports an architecture with build configurations
    #[error("No worker node architecture matches build configuration '{config}'")]
    NoMatchingArchitecture {
        /// The unresolved configuration reference
        config: String,
    },

    /// A fixture document could not be read or parsed
    #[error("Invalid fixture '{fixture}': {reason}")]
    InvalidFixture {
        /// Fixture reference (file name)
        fixture: String,
        /// What went wrong
        reason: String,
    },

    /// Applying the resolved `BuildConfig` failed
    #[error("Failed to create BuildConfig from '{config}' in {namespace}: {reason}")]
    BuildConfigApplyFailed {
        /// Resolved configuration reference
        config: String,
        /// Target namespace
        namespace: String,
        /// Underlying API error
        reason: String,
    },

    /// Instantiating a build from its `BuildConfig` failed
    #[error("Failed to start build from BuildConfig {namespace}/{build_config}: {reason}")]
    BuildStartFailed {
        /// `BuildConfig` name
        build_config: String,
        /// Namespace
        namespace: String,
        /// Underlying API error
        reason: String,
    },

    /// Reading build status failed while waiting for completion
    #[error("Failed to get status of build {namespace}/{build}: {reason}")]
    BuildStatusFailed {
        /// Build name
        build: String,
        /// Namespace
        namespace: String,
        /// Underlying API error
        reason: String,
    },

    /// The build reached a terminal phase other than `Complete`
    #[error("Build {namespace}/{build} finished in phase {phase}: {message}")]
    BuildFailed {
        /// Build name
        build: String,
        /// Namespace
        namespace: String,
        /// Terminal phase reported by the build
        phase: String,
        /// Status message, or a placeholder when the build reports none
        message: String,
    },

    /// The build did not reach a terminal phase in time
    #[error("Build {namespace}/{build} did not finish within {timeout_secs}s (last phase {phase})")]
    BuildTimedOut {
        /// Build name
        build: String,
        /// Namespace
        namespace: String,
        /// Last observed phase
        phase: String,
        /// Wait limit in seconds
        timeout_secs: u64,
    },
}

impl ScenarioError {
    /// Whether this error happened before any build was started.
    #[must_use]
    pub fn is_setup_failure(&self) -> bool {
        matches!(
            self,
            Self::EntitlementLookupFailed { .. }
                | Self::EntitlementCopyFailed { .. }
                | Self::ImageOutputFailed { .. }
                | Self::InvalidFixture { .. }
                | Self::BuildConfigApplyFailed { .. }
        )
    }
}

/// Render an `anyhow` error with its full chain of causes.
#[must_use]
pub fn reason(err: &anyhow::Error) -> String {
    format!("{err:#}")
}

#[cfg(test)]
#[path = "errors_tests.rs"]
mod errors_tests;
