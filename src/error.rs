use std::fmt;

use crate::context::Interrupted;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    LoadProfile,
    DetectKind,
    ResolveTerminal,
    ResolveConsole,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Operation::LoadProfile => "load-profile",
            Operation::DetectKind => "detect-kind",
            Operation::ResolveTerminal => "resolve-terminal",
            Operation::ResolveConsole => "resolve-console",
        };
        f.write_str(s)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AssumeError {
    #[error("failed to load profile \"{profile}\"")]
    Config {
        profile: String,
        #[source]
        source: BoxError,
    },

    #[error("no assumer matches profile \"{profile}\"")]
    Dispatch { profile: String },

    #[error("{operation} failed. profile:{profile}, kind:{kind}")]
    Resolution {
        profile: String,
        kind: &'static str,
        operation: Operation,
        #[source]
        source: BoxError,
    },

    #[error("federation token could not be issued. profile:{profile}, kind:{kind}")]
    Federation {
        profile: String,
        kind: &'static str,
        #[source]
        source: BoxError,
    },

    #[error("{operation} interrupted. profile:{profile}")]
    Cancelled {
        profile: String,
        operation: Operation,
        #[source]
        reason: Interrupted,
    },
}

impl AssumeError {
    pub fn config<E: Into<BoxError>>(profile: &str, source: E) -> AssumeError {
        AssumeError::Config {
            profile: profile.to_string(),
            source: source.into(),
        }
    }

    pub fn resolution<E: Into<BoxError>>(
        profile: &str,
        kind: &'static str,
        operation: Operation,
        source: E,
    ) -> AssumeError {
        AssumeError::Resolution {
            profile: profile.to_string(),
            kind,
            operation,
            source: source.into(),
        }
    }

    pub fn federation<E: Into<BoxError>>(profile: &str, kind: &'static str, source: E) -> AssumeError {
        AssumeError::Federation {
            profile: profile.to_string(),
            kind,
            source: source.into(),
        }
    }

    pub fn cancelled(profile: &str, operation: Operation, reason: Interrupted) -> AssumeError {
        AssumeError::Cancelled {
            profile: profile.to_string(),
            operation,
            reason,
        }
    }

    pub fn is_cancellation(&self) -> bool {
        matches!(self, AssumeError::Cancelled { .. })
    }

    pub fn profile(&self) -> &str {
        match self {
            AssumeError::Config { profile, .. }
            | AssumeError::Dispatch { profile }
            | AssumeError::Resolution { profile, .. }
            | AssumeError::Federation { profile, .. }
            | AssumeError::Cancelled { profile, .. } => profile,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn resolution_error_names_profile_kind_and_operation() {
        let e = AssumeError::resolution(
            "dev",
            "AWS_IAM",
            Operation::ResolveTerminal,
            anyhow::anyhow!("expired token"),
        );
        assert_eq!(
            e.to_string(),
            "resolve-terminal failed. profile:dev, kind:AWS_IAM"
        );
        assert_eq!(e.source().unwrap().to_string(), "expired token");
        assert_eq!(e.profile(), "dev");
    }

    #[test]
    fn only_cancelled_is_a_cancellation() {
        let cancelled =
            AssumeError::cancelled("dev", Operation::ResolveConsole, Interrupted::DeadlineExceeded);
        assert!(cancelled.is_cancellation());
        assert!(!AssumeError::Dispatch {
            profile: "dev".to_string()
        }
        .is_cancellation());
    }
}
