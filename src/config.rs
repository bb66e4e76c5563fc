// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Command-line configuration of the scenario runner.
//!
//! Every option can also be set through an environment variable, which is how CI
//! jobs usually drive the runner. The Kubernetes connection itself comes from the
//! ambient kubeconfig (`KUBECONFIG`) or the in-cluster service account.

use crate::build::WaitOptions;
use crate::constants::{
    DEFAULT_BUILD_POLL_INTERVAL_SECS, DEFAULT_BUILD_TIMEOUT_SECS, DEFAULT_FIXTURES_DIR,
    POD_SECURITY_LEVEL, TEST_NAMESPACE_PREFIX,
};
use crate::fixtures::{FixtureSet, RhelVersion};
use crate::scenario::ScenarioSettings;
use chrono::{DateTime, Utc};
use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(name = "entitled-builds")]
#[command(author, version, about, long_about = None)]
pub struct RunnerConfig {
    /// Directory containing the image stream and build configuration fixtures
    #[arg(long, env = "ENTITLED_BUILDS_FIXTURES_DIR", default_value = DEFAULT_FIXTURES_DIR)]
    pub fixtures_dir: PathBuf,

    /// Namespace to run builds in (generated when not set)
    #[arg(long, env = "ENTITLED_BUILDS_NAMESPACE")]
    pub namespace: Option<String>,

    /// RHEL major versions to build (7, 8, 9); repeatable or comma-separated
    #[arg(long = "rhel", value_delimiter = ',', env = "ENTITLED_BUILDS_RHEL")]
    pub rhel: Vec<RhelVersion>,

    /// Seconds to wait for each build to finish
    #[arg(long, env = "ENTITLED_BUILDS_BUILD_TIMEOUT_SECS", default_value_t = DEFAULT_BUILD_TIMEOUT_SECS)]
    pub build_timeout_secs: u64,

    /// Seconds between build status polls
    #[arg(long, env = "ENTITLED_BUILDS_POLL_INTERVAL_SECS", default_value_t = DEFAULT_BUILD_POLL_INTERVAL_SECS)]
    pub poll_interval_secs: u64,

    /// Pod security level the test namespace enforces
    #[arg(long, env = "ENTITLED_BUILDS_POD_SECURITY_LEVEL", default_value = POD_SECURITY_LEVEL)]
    pub pod_security_level: String,

    /// Leave the test namespace in place after the run
    #[arg(long, env = "ENTITLED_BUILDS_KEEP_NAMESPACE", action = ArgAction::SetTrue, value_parser = BoolishValueParser::new())]
    pub keep_namespace: bool,

    /// Run the RHEL versions concurrently
    #[arg(long, env = "ENTITLED_BUILDS_PARALLEL", action = ArgAction::SetTrue, value_parser = BoolishValueParser::new())]
    pub parallel: bool,
}

impl RunnerConfig {
    /// Versions to run; all of them when none were requested. Duplicates are dropped.
    #[must_use]
    pub fn versions(&self) -> Vec<RhelVersion> {
        if self.rhel.is_empty() {
            return RhelVersion::ALL.to_vec();
        }
        let mut versions = self.rhel.clone();
        versions.sort_unstable();
        versions.dedup();
        versions
    }

    /// The namespace to use, generating one from `now` if none was configured.
    #[must_use]
    pub fn namespace_at(&self, now: DateTime<Utc>) -> String {
        self.namespace
            .clone()
            .unwrap_or_else(|| generated_namespace(now))
    }

    #[must_use]
    pub fn wait_options(&self) -> WaitOptions {
        WaitOptions {
            timeout: Duration::from_secs(self.build_timeout_secs),
            poll_interval: Duration::from_secs(self.poll_interval_secs.max(1)),
        }
    }

    #[must_use]
    pub fn scenario_settings(&self, namespace: String) -> ScenarioSettings {
        ScenarioSettings {
            namespace,
            fixtures: FixtureSet::new(self.fixtures_dir.clone()),
            wait: self.wait_options(),
        }
    }
}

/// Test namespace name unique to the second it was generated in.
#[must_use]
pub fn generated_namespace(now: DateTime<Utc>) -> String {
    format!("{TEST_NAMESPACE_PREFIX}-{}", now.format("%Y%m%d%H%M%S"))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
