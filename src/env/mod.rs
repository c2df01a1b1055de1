mod format;
mod resolve;

pub use format::LineFormat;

use self::resolve::resolve;

use crate::cluster::ClusterAccessor;
use crate::error::Result;
use std::fmt;

/// The workload whose containers are inspected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target {
    Pod(String),
    Deployment(String),
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Pod(id) => write!(f, "pod {id}"),
            Target::Deployment(name) => write!(f, "deployment {name}"),
        }
    }
}

/// Fetches the target's containers and renders one line per resolved
/// variable, container by container. Nothing is returned unless every
/// container resolves.
pub async fn yank_env<A>(
    accessor: &A,
    target: &Target,
    wanted: &[String],
    format: &LineFormat,
) -> Result<Vec<String>>
where
    A: ClusterAccessor + ?Sized,
{
    let containers = match target {
        Target::Pod(id) => accessor.fetch_pod(id).await?,
        Target::Deployment(name) => accessor.fetch_deployment(name).await?,
    };

    let mut lines = Vec::new();
    let mut seen: Vec<&str> = Vec::new();

    for container in &containers {
        let declared = container.env.as_deref().unwrap_or_default();
        let resolved = resolve(accessor, declared, wanted).await?;
        tracing::debug!(
            container = %container.name,
            resolved = resolved.len(),
            "resolved container env"
        );

        for (key, value) in resolved.iter() {
            lines.push(format.format(key, value));
        }
        seen.extend(wanted.iter().map(String::as_str).filter(|w| resolved.contains(w)));
    }

    for name in wanted.iter().filter(|w| !seen.contains(&w.as_str())) {
        tracing::warn!(variable = %name, workload = %target, "not declared by any container");
    }

    Ok(lines)
}
