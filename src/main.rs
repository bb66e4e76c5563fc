// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

use anyhow::Result;
use clap::Parser;
use entitled_builds::{
    cluster::KubeClusterClient,
    config::RunnerConfig,
    constants::TOKIO_WORKER_THREADS,
    inventory::worker_inventory,
    scenario::{Outcome, SubscriptionContentScenarios},
};
use kube::Client;
use tracing::{debug, error, info, warn};

fn main() -> Result<()> {
    let config = RunnerConfig::parse();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(TOKIO_WORKER_THREADS)
        .thread_name("entitled-builds")
        .enable_all()
        .build()?;

    let success = runtime.block_on(async_main(config))?;
    if !success {
        std::process::exit(1);
    }
    Ok(())
}

async fn async_main(config: RunnerConfig) -> Result<bool> {
    // Initialize logging with custom format
    // Format: timestamp file:line LEVEL message
    //
    // Respects RUST_LOG environment variable if set, otherwise defaults to INFO level
    // Respects RUST_LOG_FORMAT environment variable for output format (text or json)
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let log_format = std::env::var("RUST_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    match log_format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .json()
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .with_ansi(true)
                .compact()
                .init();
        }
    }

    info!("Starting subscription content build scenarios");
    debug!(?config, "Runner configuration");

    // Pre-test dump
    let kube_config = kube::Config::infer().await?;
    info!(server = %kube_config.cluster_url, "Connecting to Kubernetes cluster");
    let cluster = KubeClusterClient::new(Client::try_from(kube_config)?);

    let inventory = worker_inventory(&cluster).await;
    let architectures: Vec<String> = inventory.iter().map(ToString::to_string).collect();
    info!(workers = inventory.len(), architectures = ?architectures, "Worker node inventory");

    let namespace = config.namespace_at(chrono::Utc::now());
    cluster
        .create_namespace(&namespace, &config.pod_security_level)
        .await?;

    let scenarios =
        SubscriptionContentScenarios::new(&cluster, config.scenario_settings(namespace.clone()));
    let summary = scenarios
        .run_all(&config.versions(), config.parallel)
        .await;

    for report in &summary.reports {
        match &report.outcome {
            Outcome::Failed(err) => {
                let stage = if err.is_setup_failure() { "setup" } else { "build" };
                error!(version = %report.version, stage, "{}", report.outcome);
            }
            outcome => info!(version = %report.version, "{outcome}"),
        }
    }
    info!(
        passed = summary.passed(),
        skipped = summary.skipped(),
        failed = summary.failed(),
        "Scenarios finished"
    );

    if config.keep_namespace {
        info!(namespace = %namespace, "Keeping test namespace");
    } else if let Err(e) = cluster.delete_namespace(&namespace).await {
        warn!(namespace = %namespace, "Failed to delete test namespace: {e:#}");
    }

    Ok(summary.success())
}
