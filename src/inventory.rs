// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Worker node architecture inventory.

use crate::arch::NodeArchitectureInventory;
use crate::cluster::ClusterClient;
use tracing::{debug, warn};

/// Snapshot the architectures of the cluster's worker nodes.
///
/// A failing node query is not fatal: it is logged and yields an empty inventory,
/// which later resolves to "no matching architecture".
pub async fn worker_inventory<C>(client: &C) -> NodeArchitectureInventory
where
    C: ClusterClient + ?Sized,
{
    match client.worker_architectures().await {
        Ok(labels) => {
            let inventory = NodeArchitectureInventory::from_labels(labels);
            debug!(workers = inventory.len(), "Collected worker node architectures");
            inventory
        }
        Err(e) => {
            warn!("problem getting nodes for arch check: {e:#}");
            NodeArchitectureInventory::empty()
        }
    }
}
