mod kube;

#[cfg(test)]
pub mod fake;

pub use self::kube::KubeCluster;

use crate::error::Result;
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Container;

/// Where to talk to. Built once per run and handed to the accessor, so nothing
/// downstream reads ambient cluster state on its own.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClusterSettings {
    pub namespace: String,
    /// Kubeconfig context to pin. `None` uses the current context.
    pub context: Option<String>,
}

/// Read-only view of the cluster, scoped to a single namespace.
#[async_trait]
pub trait ClusterAccessor: Send + Sync {
    /// Containers of a live pod.
    async fn fetch_pod(&self, id: &str) -> Result<Vec<Container>>;

    /// Containers of a deployment's pod template, not of any running replica.
    async fn fetch_deployment(&self, name: &str) -> Result<Vec<Container>>;

    async fn fetch_secret_value(&self, secret_name: &str, key: &str) -> Result<String>;
}
