// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Starting OpenShift builds and waiting for them to finish.
//!
//! A build is started by posting a `BuildRequest` to the `instantiate` subresource of
//! its `BuildConfig`; the API answers with the new `Build`. Completion is observed
//! by polling `Build.status.phase` until it reaches a terminal phase.

use crate::cluster::ClusterClient;
use crate::constants::{BUILD_API_GROUP_VERSION, KIND_BUILD_REQUEST};
use crate::errors::{reason, ScenarioError};
use serde_json::{json, Value};
use std::fmt;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Lifecycle phase of an OpenShift `Build`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildPhase {
    New,
    Pending,
    Running,
    Complete,
    Failed,
    Error,
    Cancelled,
    Unknown(String),
}

impl BuildPhase {
    #[must_use]
    pub fn parse(phase: &str) -> Self {
        match phase {
            "New" => Self::New,
            "Pending" => Self::Pending,
            "Running" => Self::Running,
            "Complete" => Self::Complete,
            "Failed" => Self::Failed,
            "Error" => Self::Error,
            "Cancelled" => Self::Cancelled,
            other => Self::Unknown(other.to_string()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::New => "New",
            Self::Pending => "Pending",
            Self::Running => "Running",
            Self::Complete => "Complete",
            Self::Failed => "Failed",
            Self::Error => "Error",
            Self::Cancelled => "Cancelled",
            Self::Unknown(phase) => phase,
        }
    }

    /// Whether the build will not change phase anymore.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Complete | Self::Failed | Self::Error | Self::Cancelled
        )
    }
}

impl fmt::Display for BuildPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Observed status of a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildStatus {
    pub phase: BuildPhase,
    pub message: Option<String>,
    pub log_snippet: Option<String>,
}

impl BuildStatus {
    /// Read the status of a `Build` object. A build without status is `New`.
    #[must_use]
    pub fn from_object(build: &Value) -> Self {
        let status = build.get("status");
        let text = |field: &str| {
            status
                .and_then(|s| s.get(field))
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        Self {
            phase: text("phase").map_or(BuildPhase::New, |p| BuildPhase::parse(&p)),
            message: text("message"),
            log_snippet: text("logSnippet"),
        }
    }

    /// Human readable failure detail.
    #[must_use]
    pub fn detail(&self) -> String {
        match (&self.message, &self.log_snippet) {
            (Some(message), Some(snippet)) => format!("{message}\n{snippet}"),
            (Some(message), None) => message.clone(),
            (None, Some(snippet)) => snippet.clone(),
            (None, None) => "no status message".to_string(),
        }
    }
}

/// Body posted to `buildconfigs/{name}/instantiate`.
#[must_use]
pub fn build_request(build_config: &str) -> Value {
    json!({
        "apiVersion": BUILD_API_GROUP_VERSION,
        "kind": KIND_BUILD_REQUEST,
        "metadata": {
            "name": build_config,
        },
    })
}

/// How long to wait for a build and how often to look.
#[derive(Debug, Clone, Copy)]
pub struct WaitOptions {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

/// Outcome of a build that reached a terminal phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildResult {
    pub namespace: String,
    pub build: String,
    pub status: BuildStatus,
}

impl BuildResult {
    /// Fail unless the build completed.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::BuildFailed`] for any terminal phase other than `Complete`.
    pub fn assert_success(&self) -> Result<(), ScenarioError> {
        if self.status.phase == BuildPhase::Complete {
            return Ok(());
        }
        Err(ScenarioError::BuildFailed {
            build: self.build.clone(),
            namespace: self.namespace.clone(),
            phase: self.status.phase.to_string(),
            message: self.status.detail(),
        })
    }
}

/// Start a build from `build_config` and block until it reaches a terminal phase.
///
/// # Errors
///
/// Returns an error if the build cannot be started, its status cannot be read, or it
/// does not finish within `options.timeout`. A build that finishes unsuccessfully is
/// *not* an error here; see [`BuildResult::assert_success`].
pub async fn start_build_and_wait<C>(
    client: &C,
    namespace: &str,
    build_config: &str,
    options: WaitOptions,
) -> Result<BuildResult, ScenarioError>
where
    C: ClusterClient + ?Sized,
{
    let build = client
        .start_build(namespace, build_config)
        .await
        .map_err(|e| ScenarioError::BuildStartFailed {
            build_config: build_config.to_string(),
            namespace: namespace.to_string(),
            reason: reason(&e),
        })?;
    info!(namespace = %namespace, build = %build, "Started build");

    let status = wait_for_build(client, namespace, &build, options).await?;
    Ok(BuildResult {
        namespace: namespace.to_string(),
        build,
        status,
    })
}

/// Poll a build until it reaches a terminal phase.
///
/// # Errors
///
/// Returns [`ScenarioError::BuildStatusFailed`] if the status cannot be read and
/// [`ScenarioError::BuildTimedOut`] once `options.timeout` has elapsed.
pub async fn wait_for_build<C>(
    client: &C,
    namespace: &str,
    build: &str,
    options: WaitOptions,
) -> Result<BuildStatus, ScenarioError>
where
    C: ClusterClient + ?Sized,
{
    let deadline = Instant::now() + options.timeout;
    let mut last_phase = BuildPhase::New;

    loop {
        let status = client.build_status(namespace, build).await.map_err(|e| {
            ScenarioError::BuildStatusFailed {
                build: build.to_string(),
                namespace: namespace.to_string(),
                reason: reason(&e),
            }
        })?;

        if status.phase != last_phase {
            debug!(build = %build, phase = %status.phase, "Build phase changed");
            last_phase = status.phase.clone();
        }

        if status.phase.is_terminal() {
            info!(namespace = %namespace, build = %build, phase = %status.phase, "Build finished");
            return Ok(status);
        }

        if Instant::now() >= deadline {
            warn!(namespace = %namespace, build = %build, phase = %status.phase, "Timed out waiting for build");
            return Err(ScenarioError::BuildTimedOut {
                build: build.to_string(),
                namespace: namespace.to_string(),
                phase: status.phase.to_string(),
                timeout_secs: options.timeout.as_secs(),
            });
        }

        tokio::time::sleep(options.poll_interval).await;
    }
}

#[cfg(test)]
#[path = "build_tests.rs"]
mod build_tests;
