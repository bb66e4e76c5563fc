// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Builds installing subscription content.
//!
//! Each RHEL major version is an independent scenario:
//!
//! 1. **Setup**: copy the cluster entitlement keys into the test namespace and apply
//!    the image stream receiving build output. A cluster without entitlement keys is
//!    not eligible, and the scenario is *skipped*.
//! 2. **Build**: resolve the version's build configuration for the worker
//!    architecture, apply it, start a build and require it to complete.
//! 3. **After a failure**: dump pod states, config maps and pod logs of the namespace.
//!
//! Nothing is retried: the first failing call fails the scenario.

use crate::arch::{resolve, Resolution};
use crate::build::{start_build_and_wait, WaitOptions};
use crate::cluster::ClusterClient;
use crate::constants::{ENTITLEMENT_SECRET_NAME, ENTITLEMENT_SOURCE_NAMESPACE};
use crate::entitlement::{key_names, render_namespaced_copy};
use crate::errors::{reason, ScenarioError};
use crate::fixtures::{FixtureSet, RhelVersion};
use crate::inventory::worker_inventory;
use std::fmt;
use tracing::{error, info, warn};

/// Verdict of one scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The build completed
    Passed {
        /// Name of the completed build
        build: String,
    },
    /// The cluster is not eligible; no verdict
    Skipped {
        /// Why the scenario did not run
        reason: String,
    },
    /// The scenario failed
    Failed(ScenarioError),
}

impl Outcome {
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Passed { build } => write!(f, "passed (build {build})"),
            Self::Skipped { reason } => write!(f, "skipped: {reason}"),
            Self::Failed(err) => write!(f, "failed: {err}"),
        }
    }
}

/// Result of the setup step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Setup {
    Ready,
    Skip(String),
}

/// Outcome of one RHEL version's scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioReport {
    pub version: RhelVersion,
    pub outcome: Outcome,
}

/// Outcomes of a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub reports: Vec<ScenarioReport>,
}

impl RunSummary {
    #[must_use]
    pub fn passed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Passed { .. }))
    }

    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Skipped { .. }))
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(Outcome::is_failed)
    }

    /// A run succeeds when nothing failed; skipped scenarios do not count against it.
    #[must_use]
    pub fn success(&self) -> bool {
        self.failed() == 0
    }

    fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.reports.iter().filter(|r| pred(&r.outcome)).count()
    }
}

/// Settings shared by all scenarios of a run.
#[derive(Debug, Clone)]
pub struct ScenarioSettings {
    pub namespace: String,
    pub fixtures: FixtureSet,
    pub wait: WaitOptions,
}

/// The subscription content scenarios, bound to a cluster and a test namespace.
pub struct SubscriptionContentScenarios<'a, C: ClusterClient + ?Sized> {
    client: &'a C,
    settings: ScenarioSettings,
}

impl<'a, C: ClusterClient + ?Sized> SubscriptionContentScenarios<'a, C> {
    pub fn new(client: &'a C, settings: ScenarioSettings) -> Self {
        Self { client, settings }
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.settings.namespace
    }

    /// Copy the entitlement keys into the namespace and set up build outputs.
    ///
    /// # Errors
    ///
    /// Returns an error if the entitlement secret cannot be read (other than it being
    /// absent), or if the secret copy or image stream cannot be applied.
    pub async fn setup(&self) -> Result<Setup, ScenarioError> {
        let namespace = self.namespace();
        info!(namespace = %namespace, "copying entitlement keys to namespace");

        let source = match self.client.entitlement_secret().await {
            Ok(Some(secret)) => secret,
            Ok(None) => {
                warn!(
                    "Secret {}/{} not found, cluster is not entitled",
                    ENTITLEMENT_SOURCE_NAMESPACE, ENTITLEMENT_SECRET_NAME
                );
                return Ok(Setup::Skip("cluster entitlements not found".to_string()));
            }
            Err(e) => {
                return Err(ScenarioError::EntitlementLookupFailed {
                    namespace: ENTITLEMENT_SOURCE_NAMESPACE.to_string(),
                    name: ENTITLEMENT_SECRET_NAME.to_string(),
                    reason: reason(&e),
                })
            }
        };

        let copy = render_namespaced_copy(&source, namespace);
        self.client
            .apply_secret(&copy)
            .await
            .map_err(|e| ScenarioError::EntitlementCopyFailed {
                namespace: namespace.to_string(),
                name: ENTITLEMENT_SECRET_NAME.to_string(),
                reason: reason(&e),
            })?;
        info!(namespace = %namespace, keys = ?key_names(&copy), "Copied entitlement keys");

        info!(namespace = %namespace, "setting up build outputs");
        let image_output_failed = |e: anyhow::Error| ScenarioError::ImageOutputFailed {
            namespace: namespace.to_string(),
            reason: reason(&e),
        };
        let image_stream = self
            .settings
            .fixtures
            .image_stream()
            .await
            .map_err(image_output_failed)?;
        self.client
            .apply_manifest(namespace, &image_stream)
            .await
            .map_err(image_output_failed)?;

        Ok(Setup::Ready)
    }

    /// Build `version`'s image on the cluster's worker architecture and require success.
    ///
    /// Returns the name of the completed build.
    ///
    /// # Errors
    ///
    /// Returns an error if no worker architecture has a build configuration, the
    /// configuration cannot be applied, or the build does not complete.
    pub async fn run_build(&self, version: RhelVersion) -> Result<String, ScenarioError> {
        let namespace = self.namespace();
        let base = version.build_config_ref();

        let inventory = worker_inventory(self.client).await;
        let config = match resolve(&base, &inventory) {
            Resolution::Found(config) => config,
            Resolution::NotFound => {
                return Err(ScenarioError::NoMatchingArchitecture {
                    config: base.to_string(),
                })
            }
        };
        info!(%version, config = %config, "Resolved build configuration");

        let fixtures = &self.settings.fixtures;
        let yaml = fixtures
            .build_config(&config)
            .await
            .map_err(|e| ScenarioError::InvalidFixture {
                fixture: config.to_string(),
                reason: reason(&e),
            })?;
        self.client
            .apply_manifest(namespace, &yaml)
            .await
            .map_err(|e| ScenarioError::BuildConfigApplyFailed {
                config: config.to_string(),
                namespace: namespace.to_string(),
                reason: reason(&e),
            })?;

        let result = start_build_and_wait(
            self.client,
            namespace,
            &version.build_config_name(),
            self.settings.wait,
        )
        .await?;
        result.assert_success()?;

        Ok(result.build)
    }

    /// Run one scenario: setup, build, and diagnostics if it failed.
    pub async fn run(&self, version: RhelVersion) -> Outcome {
        info!(%version, namespace = %self.namespace(), "should succeed for {version} base images");

        let outcome = match self.setup().await {
            Ok(Setup::Skip(reason)) => Outcome::Skipped { reason },
            Ok(Setup::Ready) => match self.run_build(version).await {
                Ok(build) => Outcome::Passed { build },
                Err(err) => Outcome::Failed(err),
            },
            Err(err) => Outcome::Failed(err),
        };

        match &outcome {
            Outcome::Passed { build } => info!(%version, build = %build, "Scenario passed"),
            Outcome::Skipped { reason } => warn!(%version, "Scenario skipped: {reason}"),
            Outcome::Failed(err) => {
                error!(%version, "Scenario failed: {err}");
                self.dump_diagnostics().await;
            }
        }
        outcome
    }

    /// Run the scenarios for `versions`, one after another or all at once.
    pub async fn run_all(&self, versions: &[RhelVersion], parallel: bool) -> RunSummary {
        let reports = if parallel {
            futures::future::join_all(versions.iter().map(|&version| async move {
                ScenarioReport {
                    version,
                    outcome: self.run(version).await,
                }
            }))
            .await
        } else {
            let mut reports = Vec::with_capacity(versions.len());
            for &version in versions {
                reports.push(ScenarioReport {
                    version,
                    outcome: self.run(version).await,
                });
            }
            reports
        };

        RunSummary { reports }
    }

    async fn dump_diagnostics(&self) {
        if let Err(e) = self.client.dump_diagnostics(self.namespace()).await {
            warn!(namespace = %self.namespace(), "Diagnostics dump incomplete: {e:#}");
        }
    }
}

#[cfg(test)]
#[path = "scenario_tests.rs"]
mod scenario_tests;
