// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Parsing and server-side apply of YAML manifests.
//!
//! Fixtures are plain YAML documents of kinds this crate has no typed bindings for
//! (`ImageStream`, `BuildConfig`), so they are applied as untyped objects through
//! `kube`'s dynamic API. Applying is idempotent: re-running a scenario against the
//! same namespace updates the existing objects in place.

use crate::constants::FIELD_MANAGER;
use anyhow::{anyhow, bail, Context, Result};
use kube::api::{Api, DynamicObject, Patch, PatchParams};
use kube::discovery::ApiResource;
use kube::Client;
use serde_json::Value;
use tracing::{debug, info};

/// A single parsed manifest, bound to the namespace it will be applied in.
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    pub api_version: String,
    pub kind: String,
    pub name: String,
    pub namespace: String,
    pub object: Value,
}

impl Manifest {
    /// Parse one YAML document.
    ///
    /// A document without `metadata.namespace` is placed in `namespace`; a document
    /// naming a different namespace is rejected, since every scenario resource must
    /// live in the test namespace.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid or `apiVersion`, `kind` or
    /// `metadata.name` are missing.
    pub fn parse(yaml: &str, namespace: &str) -> Result<Self> {
        let mut object: Value = serde_yaml::from_str(yaml).context("invalid YAML")?;
        if !object.is_object() {
            bail!("manifest is not a mapping");
        }

        let api_version = string_field(&object, "/apiVersion")?;
        let kind = string_field(&object, "/kind")?;
        let name = string_field(&object, "/metadata/name")?;

        let declared = object
            .pointer("/metadata/namespace")
            .and_then(Value::as_str)
            .map(str::to_string);
        match declared {
            Some(ns) if ns != namespace => {
                bail!("{kind}/{name} targets namespace {ns}, expected {namespace}")
            }
            Some(_) => {}
            None => {
                let metadata = object
                    .pointer_mut("/metadata")
                    .and_then(Value::as_object_mut)
                    .ok_or_else(|| anyhow!("metadata is not a mapping"))?;
                metadata.insert("namespace".to_string(), Value::String(namespace.to_string()));
            }
        }

        Ok(Self {
            api_version,
            kind,
            name,
            namespace: namespace.to_string(),
            object,
        })
    }

    /// The dynamic API resource addressing this manifest's kind.
    #[must_use]
    pub fn api_resource(&self) -> ApiResource {
        let (group, version) = split_api_version(&self.api_version);
        ApiResource {
            group: group.to_string(),
            version: version.to_string(),
            api_version: self.api_version.clone(),
            kind: self.kind.clone(),
            plural: pluralize_kind(&self.kind),
        }
    }
}

fn string_field(object: &Value, pointer: &str) -> Result<String> {
    object
        .pointer(pointer)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| anyhow!("missing {}", pointer.trim_start_matches('/').replace('/', ".")))
}

/// Split `group/version` into its parts; core resources (`v1`) have an empty group.
#[must_use]
pub fn split_api_version(api_version: &str) -> (&str, &str) {
    match api_version.rfind('/') {
        Some(idx) => (&api_version[..idx], &api_version[idx + 1..]),
        None => ("", api_version),
    }
}

/// Lowercase plural resource name for a kind (`BuildConfig` -> `buildconfigs`).
#[must_use]
pub fn pluralize_kind(kind: &str) -> String {
    let lower = kind.to_lowercase();
    if lower.ends_with('s') || lower.ends_with("ch") || lower.ends_with("sh") {
        format!("{lower}es")
    } else if lower.ends_with('y') && !lower.ends_with("ay") && !lower.ends_with("ey") {
        format!("{}ies", &lower[..lower.len() - 1])
    } else {
        format!("{lower}s")
    }
}

/// Apply a YAML manifest in `namespace` with server-side apply.
///
/// # Errors
///
/// Returns an error if the manifest does not parse or the API rejects it.
pub async fn apply_manifest(client: &Client, namespace: &str, yaml: &str) -> Result<()> {
    let manifest = Manifest::parse(yaml, namespace)?;
    let ar = manifest.api_resource();

    debug!(
        api_version = %manifest.api_version,
        kind = %manifest.kind,
        name = %manifest.name,
        namespace = %namespace,
        "Applying manifest"
    );

    let api: Api<DynamicObject> = Api::namespaced_with(client.clone(), namespace, &ar);
    api.patch(
        &manifest.name,
        &PatchParams::apply(FIELD_MANAGER).force(),
        &Patch::Apply(&manifest.object),
    )
    .await
    .with_context(|| format!("applying {}/{}", manifest.kind, manifest.name))?;

    info!("Applied {} {}/{}", manifest.kind, namespace, manifest.name);
    Ok(())
}

#[cfg(test)]
#[path = "manifest_tests.rs"]
mod manifest_tests;
