// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Common test utilities for integration tests

use entitled_builds::cluster::KubeClusterClient;
use kube::client::Client;

/// Get a cluster client or skip the test if no cluster is reachable
pub async fn get_cluster_or_skip() -> Option<KubeClusterClient> {
    match Client::try_default().await {
        Ok(client) => {
            println!("✓ Successfully connected to Kubernetes cluster");
            Some(KubeClusterClient::new(client))
        }
        Err(e) => {
            eprintln!("⊘ Skipping integration test: not running in Kubernetes cluster: {e}");
            None
        }
    }
}

/// Unique namespace for one integration test
pub fn test_namespace(test: &str) -> String {
    format!(
        "entitled-builds-{test}-{}",
        chrono::Utc::now().format("%H%M%S")
    )
}
