// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `cluster.rs`
//!
//! These run `KubeClusterClient` against a mock API server and check the requests it
//! sends and how it reads the responses.

#[cfg(test)]
mod tests {
    use crate::build::BuildPhase;
    use crate::cluster::*;
    use kube::Client;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const NAMESPACE: &str = "e2e-test-build-subscription-content-test";

    fn cluster_for(server: &MockServer) -> KubeClusterClient {
        let config = kube::Config::new(server.uri().parse().unwrap());
        KubeClusterClient::new(Client::try_from(config).unwrap())
    }

    #[tokio::test]
    async fn test_start_build_posts_build_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(format!(
                "/apis/build.openshift.io/v1/namespaces/{NAMESPACE}/buildconfigs/subscription-content-rhel9/instantiate"
            )))
            .and(body_partial_json(json!({
                "apiVersion": "build.openshift.io/v1",
                "kind": "BuildRequest",
                "metadata": { "name": "subscription-content-rhel9" },
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "apiVersion": "build.openshift.io/v1",
                "kind": "Build",
                "metadata": {
                    "name": "subscription-content-rhel9-1",
                    "namespace": NAMESPACE,
                },
            })))
            .expect(1)
            .mount(&server)
            .await;

        let build = cluster_for(&server)
            .start_build(NAMESPACE, "subscription-content-rhel9")
            .await
            .unwrap();

        assert_eq!(build, "subscription-content-rhel9-1");
    }

    #[tokio::test]
    async fn test_start_build_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "apiVersion": "v1",
                "kind": "Status",
                "metadata": {},
                "status": "Failure",
                "message": "buildconfigs.build.openshift.io \"subscription-content-rhel7\" not found",
                "reason": "NotFound",
                "code": 404,
            })))
            .mount(&server)
            .await;

        let err = cluster_for(&server)
            .start_build(NAMESPACE, "subscription-content-rhel7")
            .await
            .unwrap_err();

        assert!(format!("{err:#}").contains("instantiating BuildConfig"));
    }

    #[tokio::test]
    async fn test_build_status_reads_phase() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!(
                "/apis/build.openshift.io/v1/namespaces/{NAMESPACE}/builds/subscription-content-rhel8-1"
            )))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "apiVersion": "build.openshift.io/v1",
                "kind": "Build",
                "metadata": { "name": "subscription-content-rhel8-1", "namespace": NAMESPACE },
                "status": { "phase": "Failed", "message": "Docker build strategy has failed." },
            })))
            .mount(&server)
            .await;

        let status = cluster_for(&server)
            .build_status(NAMESPACE, "subscription-content-rhel8-1")
            .await
            .unwrap();

        assert_eq!(status.phase, BuildPhase::Failed);
        assert_eq!(status.message.as_deref(), Some("Docker build strategy has failed."));
    }

    #[tokio::test]
    async fn test_missing_entitlement_secret_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(
                "/api/v1/namespaces/openshift-config-managed/secrets/etc-pki-entitlement",
            ))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "apiVersion": "v1",
                "kind": "Status",
                "metadata": {},
                "status": "Failure",
                "message": "secrets \"etc-pki-entitlement\" not found",
                "reason": "NotFound",
                "code": 404,
            })))
            .mount(&server)
            .await;

        let secret = cluster_for(&server).entitlement_secret().await.unwrap();
        assert!(secret.is_none());
    }
}
