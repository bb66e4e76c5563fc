// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Label constants applied to resources created by the scenarios.
//!
//! Keeping them in one place makes it easy to find everything the runner created
//! in a cluster (`kubectl get all -l app.kubernetes.io/managed-by=entitled-builds`).

use std::collections::BTreeMap;

// ============================================================================
// Kubernetes Standard Labels
// https://kubernetes.io/docs/concepts/overview/working-with-objects/common-labels/
// ============================================================================

/// Standard label for the tool being used to manage the operation of an application
pub const K8S_MANAGED_BY: &str = "app.kubernetes.io/managed-by";

/// Standard label for the name of a higher-level application this one is part of
pub const K8S_PART_OF: &str = "app.kubernetes.io/part-of";

/// Value for `app.kubernetes.io/managed-by` on everything the runner creates
pub const MANAGED_BY_ENTITLED_BUILDS: &str = "entitled-builds";

/// Value for `app.kubernetes.io/part-of`
pub const PART_OF_E2E: &str = "e2e";

// ============================================================================
// Pod Security Admission Labels
// ============================================================================

/// Enforced pod security level for a namespace
pub const POD_SECURITY_ENFORCE: &str = "pod-security.kubernetes.io/enforce";

/// Audited pod security level for a namespace
pub const POD_SECURITY_AUDIT: &str = "pod-security.kubernetes.io/audit";

/// Warned pod security level for a namespace
pub const POD_SECURITY_WARN: &str = "pod-security.kubernetes.io/warn";

/// Labels shared by every resource the runner creates.
#[must_use]
pub fn managed_labels() -> BTreeMap<String, String> {
    BTreeMap::from([
        (
            K8S_MANAGED_BY.to_string(),
            MANAGED_BY_ENTITLED_BUILDS.to_string(),
        ),
        (K8S_PART_OF.to_string(), PART_OF_E2E.to_string()),
    ])
}

/// Labels for a test namespace admitting pods at the given security level.
#[must_use]
pub fn namespace_labels(pod_security_level: &str) -> BTreeMap<String, String> {
    let mut labels = managed_labels();
    for key in [POD_SECURITY_ENFORCE, POD_SECURITY_AUDIT, POD_SECURITY_WARN] {
        labels.insert(key.to_string(), pod_security_level.to_string());
    }
    labels
}

#[cfg(test)]
#[path = "labels_tests.rs"]
mod labels_tests;
