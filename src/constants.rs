// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for the entitled build scenarios.
//!
//! This module contains all numeric and string constants used throughout the codebase.
//! Constants are organized by category for easy maintenance.

// ============================================================================
// Entitlement Constants
// ============================================================================

/// Namespace where the Insights Operator syncs the cluster entitlement keys
pub const ENTITLEMENT_SOURCE_NAMESPACE: &str = "openshift-config-managed";

/// Name of the entitlement secret, both at the source and in the build namespace
pub const ENTITLEMENT_SECRET_NAME: &str = "etc-pki-entitlement";

// ============================================================================
// OpenShift Build API Constants
// ============================================================================

/// API group for OpenShift builds
pub const BUILD_API_GROUP: &str = "build.openshift.io";

/// API version for OpenShift builds
pub const BUILD_API_VERSION: &str = "v1";

/// Fully qualified build API version (group/version)
pub const BUILD_API_GROUP_VERSION: &str = "build.openshift.io/v1";

/// Kind name for `BuildConfig` resource
pub const KIND_BUILD_CONFIG: &str = "BuildConfig";

/// Kind name for `Build` resource
pub const KIND_BUILD: &str = "Build";

/// Kind name for the body posted to the `instantiate` subresource
pub const KIND_BUILD_REQUEST: &str = "BuildRequest";

/// Subresource used to start a new build from a `BuildConfig`
pub const BUILD_INSTANTIATE_SUBRESOURCE: &str = "instantiate";

/// Prefix of every `BuildConfig` name created by the scenarios (suffixed with `rhelN`)
pub const BUILD_CONFIG_NAME_PREFIX: &str = "subscription-content";

// ============================================================================
// Architecture Constants
// ============================================================================

/// Placeholder architecture token carried by every build configuration reference
pub const ARCH_PLACEHOLDER: &str = "x86_64";

/// Label selector used to list worker nodes
pub const WORKER_NODE_SELECTOR: &str = "node-role.kubernetes.io/worker";

// ============================================================================
// Fixture Constants
// ============================================================================

/// Default directory holding the scenario fixtures
pub const DEFAULT_FIXTURES_DIR: &str = "testdata/subscription-content";

/// File name of the image stream receiving build output
pub const IMAGE_STREAM_FIXTURE: &str = "build-imagestream.yaml";

/// File name prefix of the per-version build configuration documents
pub const BUILD_CONFIG_FIXTURE_PREFIX: &str = "buildconfig-subscription-content";

// ============================================================================
// Namespace Constants
// ============================================================================

/// Prefix of generated test namespaces
pub const TEST_NAMESPACE_PREFIX: &str = "e2e-test-build-subscription-content";

/// Pod security level the test namespace is labeled with
pub const POD_SECURITY_LEVEL: &str = "baseline";

// ============================================================================
// Timing Constants
// ============================================================================

/// Default time to wait for a build to reach a terminal phase (30 minutes)
pub const DEFAULT_BUILD_TIMEOUT_SECS: u64 = 1800;

/// Default interval between build status polls
pub const DEFAULT_BUILD_POLL_INTERVAL_SECS: u64 = 5;

// ============================================================================
// Kubernetes API Constants
// ============================================================================

/// Page size for list operations against the API server
pub const KUBE_LIST_PAGE_SIZE: u32 = 100;

/// Field manager used for server-side apply
pub const FIELD_MANAGER: &str = "entitled-builds";

/// Number of log lines fetched per container during diagnostics dumps
pub const DIAGNOSTICS_LOG_TAIL_LINES: i64 = 200;

// ============================================================================
// Runtime Constants
// ============================================================================

/// Number of worker threads for the Tokio runtime
pub const TOKIO_WORKER_THREADS: usize = 2;
