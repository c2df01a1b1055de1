use crate::cluster::ClusterSettings;
use crate::env::{LineFormat, Target};
use crate::error::{Error, Result};
use crate::Cli;
use std::time::Duration;

/// Validated settings for a single run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub cluster: ClusterSettings,
    pub target: Target,
    pub wanted: Vec<String>,
    pub format: LineFormat,
    pub timeout: Duration,
}

impl TryFrom<Cli> for Config {
    type Error = Error;

    fn try_from(cli: Cli) -> Result<Self> {
        let namespace = non_empty(cli.namespace)
            .ok_or_else(|| Error::Configuration("a namespace is required (--namespace)".into()))?;

        let target = match (non_empty(cli.pod_id), non_empty(cli.deployment)) {
            (Some(id), None) => Target::Pod(id),
            (None, Some(name)) => Target::Deployment(name),
            (Some(_), Some(_)) => {
                return Err(Error::Configuration(
                    "--pod-id and --deployment are mutually exclusive".into(),
                ))
            }
            (None, None) => {
                return Err(Error::Configuration(
                    "one of --pod-id or --deployment is required".into(),
                ))
            }
        };

        let wanted: Vec<String> = cli
            .env
            .into_iter()
            .map(|name| name.trim().to_owned())
            .filter(|name| !name.is_empty())
            .collect();
        if wanted.is_empty() {
            return Err(Error::Configuration(
                "at least one environment variable is required (--env)".into(),
            ));
        }

        if cli.timeout == 0 {
            return Err(Error::Configuration("--timeout must be at least 1 second".into()));
        }

        Ok(Config {
            cluster: ClusterSettings {
                namespace,
                context: non_empty(cli.context),
            },
            target,
            wanted,
            format: LineFormat {
                prefix: cli.prefix.unwrap_or_default(),
                suffix: cli.suffix.unwrap_or_default(),
                separator: cli.separator,
            },
            timeout: Duration::from_secs(cli.timeout),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
