use crate::cluster::ClusterAccessor;
use crate::error::{Error, Result};
use k8s_openapi::api::core::v1::EnvVar;

/// Resolved variables of one container, in first-declaration order.
///
/// Inserting a name that is already present replaces its value but keeps its
/// position, so the last declaration of a name wins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolvedEnv {
    entries: Vec<(String, String)>,
}

impl ResolvedEnv {
    pub fn insert(&mut self, name: String, value: String) {
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some((_, v)) => *v = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Resolves every declared variable whose name is in `wanted`.
///
/// Names are matched exactly. A wanted name that is not declared is simply
/// absent from the result; a declared one that has no usable value aborts the
/// whole container.
pub async fn resolve<A>(
    accessor: &A,
    declared: &[EnvVar],
    wanted: &[String],
) -> Result<ResolvedEnv>
where
    A: ClusterAccessor + ?Sized,
{
    let mut resolved = ResolvedEnv::default();

    for var in declared {
        if !wanted.iter().any(|name| *name == var.name) {
            continue;
        }

        let value = value_of(accessor, var).await?;
        resolved.insert(var.name.clone(), value);
    }

    Ok(resolved)
}

async fn value_of<A>(accessor: &A, var: &EnvVar) -> Result<String>
where
    A: ClusterAccessor + ?Sized,
{
    if let Some(value) = var.value.as_deref().filter(|v| !v.is_empty()) {
        return Ok(value.to_owned());
    }

    // configMapKeyRef, fieldRef and resourceFieldRef are not followed.
    let secret_ref = var
        .value_from
        .as_ref()
        .and_then(|source| source.secret_key_ref.as_ref());

    match secret_ref {
        Some(selector) => {
            let secret_name = selector.name.as_deref().unwrap_or_default();
            tracing::debug!(
                variable = %var.name,
                secret = %secret_name,
                key = %selector.key,
                "resolving from secret"
            );
            accessor.fetch_secret_value(secret_name, &selector.key).await
        }
        None => Err(Error::Unresolvable(var.name.clone())),
    }
}
