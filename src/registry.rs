use std::collections::HashSet;

use tracing::debug;

use crate::assumer::credential_process::CredentialProcessAssumer;
use crate::assumer::iam::IamAssumer;
use crate::assumer::sso::SsoAssumer;
use crate::assumer::Assumer;
use crate::profile::ProfileDescriptor;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("no assumers registered")]
    Empty,
    #[error("no catch-all assumer registered")]
    MissingCatchAll,
    #[error("more than one catch-all assumer registered. kinds:{0:?}")]
    MultipleCatchAll(Vec<&'static str>),
    #[error("catch-all assumer must be registered last. kind:{0}")]
    CatchAllNotLast(&'static str),
    #[error("assumer kind registered twice. kind:{0}")]
    DuplicateKind(&'static str),
}

/// Assumers in priority order. Dispatch returns the first whose predicate
/// matches; the single catch-all sits at the end and claims whatever is left.
pub struct Registry {
    assumers: Vec<Box<dyn Assumer>>,
}

impl Registry {
    pub fn new(assumers: Vec<Box<dyn Assumer>>) -> Result<Registry, RegistryError> {
        let last = assumers.last().ok_or(RegistryError::Empty)?;

        let mut kinds = HashSet::new();
        if let Some(a) = assumers.iter().find(|a| !kinds.insert(a.kind())) {
            return Err(RegistryError::DuplicateKind(a.kind()));
        }

        let catch_all = assumers
            .iter()
            .filter(|a| a.is_catch_all())
            .map(|a| a.kind())
            .collect::<Vec<_>>();
        if catch_all.is_empty() {
            return Err(RegistryError::MissingCatchAll);
        }
        if catch_all.len() > 1 {
            return Err(RegistryError::MultipleCatchAll(catch_all));
        }
        if !last.is_catch_all() {
            return Err(RegistryError::CatchAllNotLast(catch_all[0]));
        }

        Ok(Registry { assumers })
    }

    /// SSO, then external brokers, then plain IAM.
    pub fn builtin() -> Result<Registry, RegistryError> {
        Registry::new(vec![
            Box::new(SsoAssumer),
            Box::new(CredentialProcessAssumer),
            Box::new(IamAssumer),
        ])
    }

    pub fn select(&self, profile: &ProfileDescriptor) -> Option<&dyn Assumer> {
        let selected = self
            .assumers
            .iter()
            .find(|a| a.matches(&profile.normalized))
            .map(|a| a.as_ref());
        if let Some(a) = selected {
            debug!("assumer selected. profile:{}, kind:{}", profile.name(), a.kind());
        }
        selected
    }

    pub fn kinds(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.assumers.iter().map(|a| a.kind())
    }
}
