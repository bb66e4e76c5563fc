// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Post-mortem dumps of a namespace after a failed scenario.
//!
//! Everything is written to the log; nothing here changes cluster state.

use crate::constants::DIAGNOSTICS_LOG_TAIL_LINES;
use anyhow::{Context, Result};
use k8s_openapi::api::core::v1::{ConfigMap, Pod};
use kube::api::{Api, ListParams, LogParams};
use kube::{Client, ResourceExt};
use tracing::{info, warn};

/// One-line summary of a pod: phase and per-container state.
#[must_use]
pub fn summarize_pod(pod: &Pod) -> String {
    let status = pod.status.as_ref();
    let phase = status
        .and_then(|s| s.phase.as_deref())
        .unwrap_or("Unknown");

    let containers: Vec<String> = status
        .and_then(|s| s.container_statuses.as_ref())
        .map(|statuses| {
            statuses
                .iter()
                .map(|cs| {
                    let state = cs.state.as_ref().map_or("unknown".to_string(), |state| {
                        if let Some(waiting) = &state.waiting {
                            format!("waiting({})", waiting.reason.as_deref().unwrap_or(""))
                        } else if let Some(terminated) = &state.terminated {
                            format!(
                                "terminated({}, exit {})",
                                terminated.reason.as_deref().unwrap_or(""),
                                terminated.exit_code
                            )
                        } else if state.running.is_some() {
                            "running".to_string()
                        } else {
                            "unknown".to_string()
                        }
                    });
                    format!(
                        "{}={} ready={} restarts={}",
                        cs.name, state, cs.ready, cs.restart_count
                    )
                })
                .collect()
        })
        .unwrap_or_default();

    if containers.is_empty() {
        format!("{} phase={}", pod.name_any(), phase)
    } else {
        format!("{} phase={} [{}]", pod.name_any(), phase, containers.join(", "))
    }
}

/// One-line summary of a config map: its data keys.
#[must_use]
pub fn summarize_config_map(cm: &ConfigMap) -> String {
    let mut keys: Vec<&str> = cm
        .data
        .iter()
        .flat_map(|d| d.keys())
        .chain(cm.binary_data.iter().flat_map(|d| d.keys()))
        .map(String::as_str)
        .collect();
    keys.sort_unstable();
    format!("{} keys=[{}]", cm.name_any(), keys.join(", "))
}

/// Names of the containers (init containers first) of a pod.
#[must_use]
pub fn container_names(pod: &Pod) -> Vec<String> {
    pod.spec
        .as_ref()
        .map(|spec| {
            spec.init_containers
                .iter()
                .flatten()
                .chain(spec.containers.iter())
                .map(|c| c.name.clone())
                .collect()
        })
        .unwrap_or_default()
}

/// Log the state of every pod in `namespace`.
///
/// # Errors
///
/// Returns an error if pods cannot be listed.
pub async fn dump_pod_states(client: &Client, namespace: &str) -> Result<()> {
    let pods: Api<Pod> = Api::namespaced(client.clone(), namespace);
    let list = pods
        .list(&ListParams::default())
        .await
        .with_context(|| format!("listing pods in {namespace}"))?;

    info!(namespace = %namespace, pods = list.items.len(), "Dumping pod states");
    for pod in &list.items {
        info!(namespace = %namespace, "pod {}", summarize_pod(pod));
    }
    Ok(())
}

/// Log the config maps in `namespace`.
///
/// # Errors
///
/// Returns an error if config maps cannot be listed.
pub async fn dump_config_map_states(client: &Client, namespace: &str) -> Result<()> {
    let config_maps: Api<ConfigMap> = Api::namespaced(client.clone(), namespace);
    let list = config_maps
        .list(&ListParams::default())
        .await
        .with_context(|| format!("listing config maps in {namespace}"))?;

    info!(namespace = %namespace, config_maps = list.items.len(), "Dumping config maps");
    for cm in &list.items {
        info!(namespace = %namespace, "configmap {}", summarize_config_map(cm));
    }
    Ok(())
}

/// Log the tail of every container log of pods whose name starts with `prefix`.
/// An empty prefix selects every pod.
///
/// # Errors
///
/// Returns an error if pods cannot be listed. Failing to read a single container's
/// log is only logged.
pub async fn dump_pod_logs_starting_with(
    client: &Client,
    namespace: &str,
    prefix: &str,
) -> Result<()> {
    let pods: Api<Pod> = Api::namespaced(client.clone(), namespace);
    let list = pods
        .list(&ListParams::default())
        .await
        .with_context(|| format!("listing pods in {namespace}"))?;

    for pod in list.items.iter().filter(|p| p.name_any().starts_with(prefix)) {
        let name = pod.name_any();
        for container in container_names(pod) {
            let params = LogParams {
                container: Some(container.clone()),
                tail_lines: Some(DIAGNOSTICS_LOG_TAIL_LINES),
                ..LogParams::default()
            };
            match pods.logs(&name, &params).await {
                Ok(logs) => info!(
                    namespace = %namespace,
                    pod = %name,
                    container = %container,
                    "container logs:\n{logs}"
                ),
                Err(e) => warn!(
                    namespace = %namespace,
                    pod = %name,
                    container = %container,
                    "Failed to read container logs: {e}"
                ),
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "diagnostics_tests.rs"]
mod diagnostics_tests;
