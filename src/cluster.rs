// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Cluster access for the scenarios.
//!
//! Everything the scenarios do against a cluster goes through [`ClusterClient`], which
//! is handed to the orchestrator explicitly. [`KubeClusterClient`] implements it on top
//! of a `kube::Client`; tests substitute an in-memory fake.

use crate::build::{build_request, BuildStatus};
use crate::constants::{
    BUILD_API_GROUP, BUILD_API_GROUP_VERSION, BUILD_API_VERSION, BUILD_INSTANTIATE_SUBRESOURCE,
    ENTITLEMENT_SECRET_NAME, ENTITLEMENT_SOURCE_NAMESPACE, FIELD_MANAGER, KIND_BUILD,
    KIND_BUILD_CONFIG, KUBE_LIST_PAGE_SIZE, WORKER_NODE_SELECTOR,
};
use crate::diagnostics;
use crate::labels::namespace_labels;
use crate::manifest::{self, pluralize_kind};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::{Namespace, Node, Secret};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::api::{Api, DeleteParams, DynamicObject, ListParams, Patch, PatchParams, PostParams};
use kube::discovery::ApiResource;
use kube::{Client, ResourceExt};
use tracing::{debug, info, warn};

/// Operations the scenarios perform against a cluster.
#[async_trait]
pub trait ClusterClient: Send + Sync {
    /// Architecture labels of all worker nodes, in API order.
    async fn worker_architectures(&self) -> Result<Vec<String>>;

    /// The cluster entitlement secret, or `None` if the cluster has none (HTTP 404).
    async fn entitlement_secret(&self) -> Result<Option<Secret>>;

    /// Create or update a namespaced secret.
    async fn apply_secret(&self, secret: &Secret) -> Result<()>;

    /// Create or update the object described by a YAML manifest.
    async fn apply_manifest(&self, namespace: &str, manifest: &str) -> Result<()>;

    /// Start a build from a `BuildConfig` and return the new build's name.
    async fn start_build(&self, namespace: &str, build_config: &str) -> Result<String>;

    /// Current status of a build.
    async fn build_status(&self, namespace: &str, build: &str) -> Result<BuildStatus>;

    /// Log pod states, config maps and pod logs of a namespace.
    async fn dump_diagnostics(&self, namespace: &str) -> Result<()>;
}

/// [`ClusterClient`] backed by the Kubernetes API.
#[derive(Clone)]
pub struct KubeClusterClient {
    client: Client,
}

impl KubeClusterClient {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Create the test namespace with the given pod security level.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the namespace for any reason other than it
    /// already existing.
    pub async fn create_namespace(&self, name: &str, pod_security_level: &str) -> Result<()> {
        let namespaces: Api<Namespace> = Api::all(self.client.clone());
        let ns = Namespace {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                labels: Some(namespace_labels(pod_security_level)),
                ..Default::default()
            },
            ..Default::default()
        };

        match namespaces.create(&PostParams::default(), &ns).await {
            Ok(_) => {
                info!(namespace = %name, "Created test namespace");
                Ok(())
            }
            Err(kube::Error::Api(ae)) if ae.code == 409 => {
                debug!(namespace = %name, "Test namespace already exists");
                Ok(())
            }
            Err(e) => Err(e).with_context(|| format!("creating namespace {name}")),
        }
    }

    /// Delete the test namespace.
    ///
    /// # Errors
    ///
    /// Returns an error if deletion fails for any reason other than it being gone.
    pub async fn delete_namespace(&self, name: &str) -> Result<()> {
        let namespaces: Api<Namespace> = Api::all(self.client.clone());
        match namespaces.delete(name, &DeleteParams::default()).await {
            Ok(_) => {
                info!(namespace = %name, "Deleted test namespace");
                Ok(())
            }
            Err(kube::Error::Api(ae)) if ae.code == 404 => {
                debug!(namespace = %name, "Test namespace already deleted");
                Ok(())
            }
            Err(e) => Err(e).with_context(|| format!("deleting namespace {name}")),
        }
    }

    fn build_api(&self, namespace: &str, kind: &str) -> Api<DynamicObject> {
        let ar = ApiResource {
            group: BUILD_API_GROUP.to_string(),
            version: BUILD_API_VERSION.to_string(),
            api_version: BUILD_API_GROUP_VERSION.to_string(),
            kind: kind.to_string(),
            plural: pluralize_kind(kind),
        };
        Api::namespaced_with(self.client.clone(), namespace, &ar)
    }
}

#[async_trait]
impl ClusterClient for KubeClusterClient {
    async fn worker_architectures(&self) -> Result<Vec<String>> {
        let nodes: Api<Node> = Api::all(self.client.clone());
        let mut params = ListParams::default()
            .labels(WORKER_NODE_SELECTOR)
            .limit(KUBE_LIST_PAGE_SIZE);

        let mut architectures = Vec::new();
        loop {
            let page = nodes.list(&params).await.context("listing worker nodes")?;
            for node in &page.items {
                match node.status.as_ref().and_then(|s| s.node_info.as_ref()) {
                    Some(info) => architectures.push(info.architecture.clone()),
                    None => debug!(node = %node.name_any(), "Worker node reports no nodeInfo"),
                }
            }
            match page.metadata.continue_ {
                Some(token) if !token.is_empty() => params.continue_token = Some(token),
                _ => break,
            }
        }

        debug!(
            workers = architectures.len(),
            architectures = ?architectures,
            "Listed worker node architectures"
        );
        Ok(architectures)
    }

    async fn entitlement_secret(&self) -> Result<Option<Secret>> {
        let secrets: Api<Secret> = Api::namespaced(self.client.clone(), ENTITLEMENT_SOURCE_NAMESPACE);
        match secrets.get(ENTITLEMENT_SECRET_NAME).await {
            Ok(secret) => Ok(Some(secret)),
            Err(kube::Error::Api(ae)) if ae.code == 404 => Ok(None),
            Err(e) => Err(e).with_context(|| {
                format!("getting secret {ENTITLEMENT_SOURCE_NAMESPACE}/{ENTITLEMENT_SECRET_NAME}")
            }),
        }
    }

    async fn apply_secret(&self, secret: &Secret) -> Result<()> {
        let name = secret
            .metadata
            .name
            .as_deref()
            .ok_or_else(|| anyhow!("Secret must have a name"))?;
        let namespace = secret
            .metadata
            .namespace
            .as_deref()
            .ok_or_else(|| anyhow!("Secret {name} must have a namespace"))?;

        let secrets: Api<Secret> = Api::namespaced(self.client.clone(), namespace);
        secrets
            .patch(
                name,
                &PatchParams::apply(FIELD_MANAGER).force(),
                &Patch::Apply(secret),
            )
            .await
            .with_context(|| format!("applying secret {namespace}/{name}"))?;

        info!("Applied Secret {}/{}", namespace, name);
        Ok(())
    }

    async fn apply_manifest(&self, namespace: &str, yaml: &str) -> Result<()> {
        manifest::apply_manifest(&self.client, namespace, yaml).await
    }

    async fn start_build(&self, namespace: &str, build_config: &str) -> Result<String> {
        let api = self.build_api(namespace, KIND_BUILD_CONFIG);

        let build: DynamicObject = api
            .create_subresource(
                BUILD_INSTANTIATE_SUBRESOURCE,
                build_config,
                &PostParams::default(),
                &build_request(build_config),
            )
            .await
            .with_context(|| format!("instantiating BuildConfig {namespace}/{build_config}"))?;

        build
            .metadata
            .name
            .ok_or_else(|| anyhow!("instantiate of {build_config} returned a build without a name"))
    }

    async fn build_status(&self, namespace: &str, build: &str) -> Result<BuildStatus> {
        let api = self.build_api(namespace, KIND_BUILD);
        let object = api
            .get(build)
            .await
            .with_context(|| format!("getting build {namespace}/{build}"))?;
        Ok(BuildStatus::from_object(&object.data))
    }

    async fn dump_diagnostics(&self, namespace: &str) -> Result<()> {
        let mut first_error = None;

        if let Err(e) = diagnostics::dump_pod_states(&self.client, namespace).await {
            warn!(namespace = %namespace, "Failed to dump pod states: {e:#}");
            first_error.get_or_insert(e);
        }
        if let Err(e) = diagnostics::dump_config_map_states(&self.client, namespace).await {
            warn!(namespace = %namespace, "Failed to dump config maps: {e:#}");
            first_error.get_or_insert(e);
        }
        if let Err(e) = diagnostics::dump_pod_logs_starting_with(&self.client, namespace, "").await
        {
            warn!(namespace = %namespace, "Failed to dump pod logs: {e:#}");
            first_error.get_or_insert(e);
        }

        first_error.map_or(Ok(()), Err)
    }
}

#[cfg(test)]
#[path = "cluster_tests.rs"]
mod cluster_tests;
