// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! # Entitled Builds - subscription content build scenarios for OpenShift
//!
//! End-to-end scenarios verifying that container image builds installing RHEL
//! subscription (entitled) content succeed on a cluster, whatever CPU architecture
//! its worker nodes run (amd64, arm64, ppc64le, s390x).
//!
//! ## Overview
//!
//! For each RHEL major version (7, 8, 9) a scenario:
//!
//! - copies the cluster entitlement keys into a test namespace (or is skipped when
//!   the cluster is not entitled)
//! - applies the image stream receiving build output
//! - picks the build configuration matching the worker architecture, applies it,
//!   starts a build and requires it to complete
//! - dumps pods, config maps and logs when anything fails
//!
//! ## Modules
//!
//! - [`arch`] - Architecture-aware build configuration selection
//! - [`scenario`] - Scenario orchestration and outcomes
//! - [`cluster`] - The cluster client seam and its Kubernetes implementation
//! - [`build`] - Starting builds and waiting for them
//! - [`entitlement`] - Namespaced copies of the entitlement secret
//! - [`manifest`] - Server-side apply of YAML fixtures
//! - [`fixtures`] - Fixture documents and RHEL versions
//! - [`diagnostics`] - Post-mortem namespace dumps
//!
//! ## Example
//!
//! ```rust
//! use entitled_builds::arch::{resolve, NodeArchitectureInventory, Resolution};
//! use entitled_builds::fixtures::RhelVersion;
//!
//! let inventory = NodeArchitectureInventory::from_labels(["s390x"]);
//! match resolve(&RhelVersion::Rhel9.build_config_ref(), &inventory) {
//!     Resolution::Found(config) => {
//!         assert_eq!(config.as_str(), "buildconfig-subscription-content-s390x-rhel9.yaml");
//!     }
//!     Resolution::NotFound => unreachable!(),
//! }
//! ```

pub mod arch;
pub mod build;
pub mod cluster;
pub mod config;
pub mod constants;
pub mod diagnostics;
pub mod entitlement;
pub mod errors;
pub mod fixtures;
pub mod inventory;
pub mod labels;
pub mod manifest;
pub mod scenario;

#[cfg(test)]
mod testing;
