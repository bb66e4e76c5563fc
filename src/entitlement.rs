// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Copying the cluster entitlement keys into the build namespace.
//!
//! The Insights Operator syncs the cluster's entitlement keys into
//! `openshift-config-managed/etc-pki-entitlement`. A cluster without that secret is
//! not subscribed and cannot build entitled RHEL content, so the scenarios are
//! skipped there. Builds can only mount secrets from their own namespace, so the
//! keys are copied into the test namespace under the same name.

use crate::constants::ENTITLEMENT_SECRET_NAME;
use crate::labels::managed_labels;
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

/// Secret type used when the source secret does not declare one
const DEFAULT_SECRET_TYPE: &str = "Opaque";

/// Render a copy of the entitlement secret scoped to `namespace`.
///
/// Only the key material is carried over. Server-populated metadata of the source
/// (uid, resourceVersion, owner references, managed fields) is dropped so the
/// result can be applied as a fresh object.
#[must_use]
pub fn render_namespaced_copy(source: &Secret, namespace: &str) -> Secret {
    Secret {
        metadata: ObjectMeta {
            name: Some(ENTITLEMENT_SECRET_NAME.to_string()),
            namespace: Some(namespace.to_string()),
            labels: Some(managed_labels()),
            ..Default::default()
        },
        data: source.data.clone(),
        type_: Some(
            source
                .type_
                .clone()
                .unwrap_or_else(|| DEFAULT_SECRET_TYPE.to_string()),
        ),
        ..Default::default()
    }
}

/// Names of the keys in an entitlement secret, for logging without leaking material.
#[must_use]
pub fn key_names(secret: &Secret) -> Vec<String> {
    secret
        .data
        .as_ref()
        .map(|data| data.keys().cloned().collect())
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "entitlement_tests.rs"]
mod entitlement_tests;
