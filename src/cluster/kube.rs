use super::{ClusterAccessor, ClusterSettings};
use crate::error::{Error, Result};
use async_trait::async_trait;
use k8s_openapi::api::{apps::v1 as appsv1, core::v1 as corev1};
use ::kube::{config::KubeConfigOptions, Api, Client, Config};

/// `ClusterAccessor` backed by the Kubernetes API server.
#[derive(Clone)]
pub struct KubeCluster {
    client: Client,
    namespace: String,
}

impl KubeCluster {
    pub async fn connect(settings: &ClusterSettings) -> Result<Self> {
        let config = match settings.context.as_deref() {
            Some(context) => Config::from_kubeconfig(&kubeconfig_options(context))
                .await
                .map_err(|e| Error::access(format!("kubeconfig context {context}"), e))?,
            None => Config::infer()
                .await
                .map_err(|e| Error::access("kubernetes config", e))?,
        };

        tracing::debug!(
            cluster_url = %config.cluster_url,
            namespace = %settings.namespace,
            "connecting"
        );
        let client =
            Client::try_from(config).map_err(|e| Error::access("kubernetes client", e))?;

        Ok(Self {
            client,
            namespace: settings.namespace.clone(),
        })
    }
}

/// Loads the named context instead of the kubeconfig's current one.
fn kubeconfig_options(context: &str) -> KubeConfigOptions {
    KubeConfigOptions {
        context: Some(context.to_owned()),
        ..KubeConfigOptions::default()
    }
}

#[async_trait]
impl ClusterAccessor for KubeCluster {
    async fn fetch_pod(&self, id: &str) -> Result<Vec<corev1::Container>> {
        tracing::debug!(namespace = %self.namespace, pod = %id, "fetching pod");
        let pods: Api<corev1::Pod> = Api::namespaced(self.client.clone(), &self.namespace);
        let pod = pods
            .get(id)
            .await
            .map_err(|e| classify(e, format!("pod {id}"), &self.namespace))?;
        Ok(pod.spec.map(|spec| spec.containers).unwrap_or_default())
    }

    async fn fetch_deployment(&self, name: &str) -> Result<Vec<corev1::Container>> {
        tracing::debug!(
            namespace = %self.namespace,
            deployment = %name,
            "fetching deployment"
        );
        let deployments: Api<appsv1::Deployment> =
            Api::namespaced(self.client.clone(), &self.namespace);
        let deploy = deployments
            .get(name)
            .await
            .map_err(|e| classify(e, format!("deployment {name}"), &self.namespace))?;
        Ok(deploy
            .spec
            .and_then(|spec| spec.template.spec)
            .map(|spec| spec.containers)
            .unwrap_or_default())
    }

    async fn fetch_secret_value(&self, secret_name: &str, key: &str) -> Result<String> {
        tracing::debug!(
            namespace = %self.namespace,
            secret = %secret_name,
            %key,
            "fetching secret"
        );
        let secrets: Api<corev1::Secret> = Api::namespaced(self.client.clone(), &self.namespace);
        let secret = secrets
            .get(secret_name)
            .await
            .map_err(|e| classify(e, format!("secret {secret_name}"), &self.namespace))?;
        secret_value(&secret, secret_name, key, &self.namespace)
    }
}

/// A 404 from the API server means the object is absent; anything else is an
/// access problem.
fn classify(err: ::kube::Error, resource: String, namespace: &str) -> Error {
    match err {
        ::kube::Error::Api(ref response) if response.code == 404 => Error::NotFound {
            resource,
            namespace: namespace.to_owned(),
        },
        err => Error::access(format!("{resource} in namespace {namespace}"), err),
    }
}

fn secret_value(
    secret: &corev1::Secret,
    secret_name: &str,
    key: &str,
    namespace: &str,
) -> Result<String> {
    secret
        .data
        .as_ref()
        .and_then(|data| data.get(key))
        .map(|bytes| String::from_utf8_lossy(&bytes.0).into_owned())
        .ok_or_else(|| Error::NotFound {
            resource: format!("key {key} in secret {secret_name}"),
            namespace: namespace.to_owned(),
        })
}
