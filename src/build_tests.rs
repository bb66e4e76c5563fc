// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `build.rs`

#[cfg(test)]
mod tests {
    use crate::build::*;
    use crate::errors::ScenarioError;
    use crate::testing::FakeCluster;
    use serde_json::json;
    use std::time::Duration;

    fn fast_wait() -> WaitOptions {
        WaitOptions {
            timeout: Duration::from_secs(5),
            poll_interval: Duration::from_millis(1),
        }
    }

    // ========================================================================
    // Phases and status parsing
    // ========================================================================

    #[test]
    fn test_terminal_phases() {
        for phase in ["Complete", "Failed", "Error", "Cancelled"] {
            assert!(BuildPhase::parse(phase).is_terminal(), "{phase}");
        }
        for phase in ["New", "Pending", "Running", "Paused"] {
            assert!(!BuildPhase::parse(phase).is_terminal(), "{phase}");
        }
        assert_eq!(
            BuildPhase::parse("Paused"),
            BuildPhase::Unknown("Paused".to_string())
        );
    }

    #[test]
    fn test_status_from_build_object() {
        let build = json!({
            "spec": {},
            "status": {
                "phase": "Failed",
                "message": "Docker build strategy has failed.",
                "logSnippet": "error: No package kernel-devel available."
            }
        });

        let status = BuildStatus::from_object(&build);
        assert_eq!(status.phase, BuildPhase::Failed);
        assert_eq!(
            status.detail(),
            "Docker build strategy has failed.\nerror: No package kernel-devel available."
        );
    }

    #[test]
    fn test_status_without_status_is_new() {
        let status = BuildStatus::from_object(&json!({ "spec": {} }));
        assert_eq!(status.phase, BuildPhase::New);
        assert_eq!(status.detail(), "no status message");
    }

    #[test]
    fn test_build_request_body() {
        assert_eq!(
            build_request("subscription-content-rhel7"),
            json!({
                "apiVersion": "build.openshift.io/v1",
                "kind": "BuildRequest",
                "metadata": { "name": "subscription-content-rhel7" }
            })
        );
    }

    #[test]
    fn test_assert_success() {
        let mut result = BuildResult {
            namespace: "e2e".to_string(),
            build: "subscription-content-rhel9-1".to_string(),
            status: BuildStatus {
                phase: BuildPhase::Complete,
                message: None,
                log_snippet: None,
            },
        };
        assert!(result.assert_success().is_ok());

        result.status.phase = BuildPhase::Cancelled;
        assert_eq!(
            result.assert_success(),
            Err(ScenarioError::BuildFailed {
                build: "subscription-content-rhel9-1".to_string(),
                namespace: "e2e".to_string(),
                phase: "Cancelled".to_string(),
                message: "no status message".to_string(),
            })
        );
    }

    // ========================================================================
    // Waiting
    // ========================================================================

    #[tokio::test]
    async fn test_waits_through_phases_until_terminal() {
        let cluster = FakeCluster::entitled(&["amd64"]).with_build_phases(&[
            BuildPhase::New,
            BuildPhase::Pending,
            BuildPhase::Running,
            BuildPhase::Complete,
        ]);

        let result = start_build_and_wait(&cluster, "e2e", "subscription-content-rhel8", fast_wait())
            .await
            .unwrap();

        assert_eq!(result.build, "subscription-content-rhel8-1");
        assert_eq!(result.status.phase, BuildPhase::Complete);
        let polls = cluster
            .calls()
            .iter()
            .filter(|c| c.starts_with("build_status"))
            .count();
        assert_eq!(polls, 4);
    }

    #[tokio::test]
    async fn test_failed_build_is_returned_not_raised() {
        let cluster = FakeCluster::entitled(&["amd64"]).with_build_phases(&[BuildPhase::Failed]);

        let result = start_build_and_wait(&cluster, "e2e", "subscription-content-rhel7", fast_wait())
            .await
            .unwrap();
        assert_eq!(result.status.phase, BuildPhase::Failed);
        assert!(result.assert_success().is_err());
    }

    #[tokio::test]
    async fn test_start_failure() {
        let mut cluster = FakeCluster::entitled(&["amd64"]);
        cluster.fail_start_build = true;

        let err = start_build_and_wait(&cluster, "e2e", "subscription-content-rhel7", fast_wait())
            .await
            .unwrap_err();
        assert!(matches!(err, ScenarioError::BuildStartFailed { .. }));
        assert!(!cluster.called("build_status"));
    }

    #[tokio::test]
    async fn test_status_failure() {
        let mut cluster = FakeCluster::entitled(&["amd64"]);
        cluster.fail_build_status = true;

        let err = wait_for_build(&cluster, "e2e", "subscription-content-rhel7-1", fast_wait())
            .await
            .unwrap_err();
        assert!(matches!(err, ScenarioError::BuildStatusFailed { .. }));
    }

    #[tokio::test]
    async fn test_times_out_on_running_build() {
        let cluster = FakeCluster::entitled(&["amd64"]).with_build_phases(&[BuildPhase::Running]);
        let options = WaitOptions {
            timeout: Duration::from_millis(20),
            poll_interval: Duration::from_millis(5),
        };

        let err = wait_for_build(&cluster, "e2e", "subscription-content-rhel9-1", options)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ScenarioError::BuildTimedOut {
                build: "subscription-content-rhel9-1".to_string(),
                namespace: "e2e".to_string(),
                phase: "Running".to_string(),
                timeout_secs: 0,
            }
        );
    }
}
