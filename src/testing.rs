// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! In-memory [`ClusterClient`] for unit tests.

use crate::build::{BuildPhase, BuildStatus};
use crate::cluster::ClusterClient;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::ByteString;
use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;

/// Fake cluster recording every call it receives.
///
/// Failures are injected per operation by setting the matching `fail_*` field.
/// Build status polls pop from `build_phases`; the last phase repeats forever.
pub struct FakeCluster {
    pub architectures: Result<Vec<String>, String>,
    pub entitlement: Option<Secret>,
    pub fail_entitlement_lookup: bool,
    pub fail_apply_secret: bool,
    pub fail_apply_kind: Option<String>,
    pub fail_start_build: bool,
    pub fail_build_status: bool,
    pub fail_diagnostics: bool,
    pub build_phases: Mutex<VecDeque<BuildPhase>>,
    pub build_message: Option<String>,
    pub calls: Mutex<Vec<String>>,
    pub applied_secrets: Mutex<Vec<Secret>>,
    pub applied_manifests: Mutex<Vec<String>>,
}

impl FakeCluster {
    /// An entitled amd64 cluster whose builds complete immediately.
    pub fn entitled(architectures: &[&str]) -> Self {
        Self {
            architectures: Ok(architectures.iter().map(|a| (*a).to_string()).collect()),
            entitlement: Some(entitlement_secret()),
            fail_entitlement_lookup: false,
            fail_apply_secret: false,
            fail_apply_kind: None,
            fail_start_build: false,
            fail_build_status: false,
            fail_diagnostics: false,
            build_phases: Mutex::new(VecDeque::from([BuildPhase::Complete])),
            build_message: None,
            calls: Mutex::new(Vec::new()),
            applied_secrets: Mutex::new(Vec::new()),
            applied_manifests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_build_phases(self, phases: &[BuildPhase]) -> Self {
        *self.build_phases.lock().unwrap() = phases.iter().cloned().collect();
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn called(&self, prefix: &str) -> bool {
        self.calls().iter().any(|c| c.starts_with(prefix))
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

/// Source entitlement secret as the Insights Operator publishes it.
pub fn entitlement_secret() -> Secret {
    Secret {
        metadata: ObjectMeta {
            name: Some("etc-pki-entitlement".to_string()),
            namespace: Some("openshift-config-managed".to_string()),
            ..Default::default()
        },
        data: Some(BTreeMap::from([(
            "entitlement.pem".to_string(),
            ByteString(b"cert".to_vec()),
        )])),
        type_: Some("Opaque".to_string()),
        ..Default::default()
    }
}

#[async_trait]
impl ClusterClient for FakeCluster {
    async fn worker_architectures(&self) -> Result<Vec<String>> {
        self.record("worker_architectures".to_string());
        self.architectures.clone().map_err(|e| anyhow!(e))
    }

    async fn entitlement_secret(&self) -> Result<Option<Secret>> {
        self.record("entitlement_secret".to_string());
        if self.fail_entitlement_lookup {
            return Err(anyhow!("secrets is forbidden"));
        }
        Ok(self.entitlement.clone())
    }

    async fn apply_secret(&self, secret: &Secret) -> Result<()> {
        self.record(format!(
            "apply_secret {}",
            secret.metadata.namespace.as_deref().unwrap_or_default()
        ));
        if self.fail_apply_secret {
            return Err(anyhow!("admission webhook denied the request"));
        }
        self.applied_secrets.lock().unwrap().push(secret.clone());
        Ok(())
    }

    async fn apply_manifest(&self, namespace: &str, manifest: &str) -> Result<()> {
        let parsed = crate::manifest::Manifest::parse(manifest, namespace)?;
        self.record(format!("apply_manifest {} {}", parsed.kind, parsed.name));
        if self.fail_apply_kind.as_deref() == Some(parsed.kind.as_str()) {
            return Err(anyhow!("{} is invalid", parsed.kind));
        }
        self.applied_manifests
            .lock()
            .unwrap()
            .push(manifest.to_string());
        Ok(())
    }

    async fn start_build(&self, namespace: &str, build_config: &str) -> Result<String> {
        self.record(format!("start_build {namespace} {build_config}"));
        if self.fail_start_build {
            return Err(anyhow!("buildconfigs \"{build_config}\" not found"));
        }
        Ok(format!("{build_config}-1"))
    }

    async fn build_status(&self, _namespace: &str, build: &str) -> Result<BuildStatus> {
        self.record(format!("build_status {build}"));
        if self.fail_build_status {
            return Err(anyhow!("connection reset"));
        }
        let mut phases = self.build_phases.lock().unwrap();
        let phase = if phases.len() > 1 {
            phases.pop_front().unwrap_or(BuildPhase::New)
        } else {
            phases.front().cloned().unwrap_or(BuildPhase::New)
        };
        Ok(BuildStatus {
            phase,
            message: self.build_message.clone(),
            log_snippet: None,
        })
    }

    async fn dump_diagnostics(&self, namespace: &str) -> Result<()> {
        self.record(format!("dump_diagnostics {namespace}"));
        if self.fail_diagnostics {
            return Err(anyhow!("listing pods failed"));
        }
        Ok(())
    }
}
