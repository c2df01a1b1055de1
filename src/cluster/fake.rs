use super::ClusterAccessor;
use crate::error::{Error, Result};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Container;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

const NAMESPACE: &str = "test";

/// In-memory cluster for tests. Records every secret lookup it serves.
#[derive(Default)]
pub struct FakeCluster {
    pods: HashMap<String, Vec<Container>>,
    deployments: HashMap<String, Vec<Container>>,
    secrets: HashMap<(String, String), String>,
    forbidden_secrets: Vec<String>,
    latency: Option<Duration>,
    secret_fetches: Mutex<Vec<(String, String)>>,
}

impl FakeCluster {
    pub fn with_pod(mut self, id: &str, containers: Vec<Container>) -> Self {
        self.pods.insert(id.to_owned(), containers);
        self
    }

    pub fn with_deployment(mut self, name: &str, containers: Vec<Container>) -> Self {
        self.deployments.insert(name.to_owned(), containers);
        self
    }

    pub fn with_secret(mut self, name: &str, key: &str, value: &str) -> Self {
        self.secrets
            .insert((name.to_owned(), key.to_owned()), value.to_owned());
        self
    }

    pub fn with_forbidden_secret(mut self, name: &str) -> Self {
        self.forbidden_secrets.push(name.to_owned());
        self
    }

    /// Every fetch sleeps this long before answering.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    async fn wait(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }

    pub fn secret_fetches(&self) -> Vec<(String, String)> {
        self.secret_fetches.lock().unwrap().clone()
    }
}

fn not_found(resource: String) -> Error {
    Error::NotFound {
        resource,
        namespace: NAMESPACE.to_owned(),
    }
}

#[async_trait]
impl ClusterAccessor for FakeCluster {
    async fn fetch_pod(&self, id: &str) -> Result<Vec<Container>> {
        self.wait().await;
        self.pods
            .get(id)
            .cloned()
            .ok_or_else(|| not_found(format!("pod {id}")))
    }

    async fn fetch_deployment(&self, name: &str) -> Result<Vec<Container>> {
        self.wait().await;
        self.deployments
            .get(name)
            .cloned()
            .ok_or_else(|| not_found(format!("deployment {name}")))
    }

    async fn fetch_secret_value(&self, secret_name: &str, key: &str) -> Result<String> {
        self.secret_fetches
            .lock()
            .unwrap()
            .push((secret_name.to_owned(), key.to_owned()));
        self.wait().await;

        if self.forbidden_secrets.iter().any(|s| s == secret_name) {
            return Err(Error::access(
                format!("secret {secret_name} in namespace {NAMESPACE}"),
                "secrets is forbidden",
            ));
        }

        self.secrets
            .get(&(secret_name.to_owned(), key.to_owned()))
            .cloned()
            .ok_or_else(|| not_found(format!("key {key} in secret {secret_name}")))
    }
}

/// Builds a container from a JSON `env` list, the way it would arrive from the API server.
pub fn container(name: &str, env: serde_json::Value) -> Container {
    serde_json::from_value(serde_json::json!({ "name": name, "env": env }))
        .expect("valid container fixture")
}
