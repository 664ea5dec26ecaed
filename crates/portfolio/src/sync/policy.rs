//! Reconciliation policy.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// What to do when a fetched repository already has a project row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReconcilePolicy {
    /// Leave existing rows untouched; only insert unseen repositories.
    InsertOnly,
    /// Overwrite the GitHub-sourced fields of existing rows.
    #[default]
    Upsert,
}

impl fmt::Display for ReconcilePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconcilePolicy::InsertOnly => write!(f, "insert-only"),
            ReconcilePolicy::Upsert => write!(f, "upsert"),
        }
    }
}

impl FromStr for ReconcilePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "insert-only" | "insertonly" => Ok(ReconcilePolicy::InsertOnly),
            "upsert" => Ok(ReconcilePolicy::Upsert),
            _ => Err(format!(
                "Unknown reconcile policy: {s} (expected 'upsert' or 'insert-only')"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_upsert() {
        assert_eq!(ReconcilePolicy::default(), ReconcilePolicy::Upsert);
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for policy in [ReconcilePolicy::InsertOnly, ReconcilePolicy::Upsert] {
            assert_eq!(policy.to_string().parse::<ReconcilePolicy>(), Ok(policy));
        }
    }

    #[test]
    fn from_str_accepts_variants() {
        assert_eq!("INSERT_ONLY".parse(), Ok(ReconcilePolicy::InsertOnly));
        assert_eq!(" upsert ".parse(), Ok(ReconcilePolicy::Upsert));
        assert!("merge".parse::<ReconcilePolicy>().is_err());
    }

    #[test]
    fn serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&ReconcilePolicy::InsertOnly).unwrap(),
            "\"insert-only\""
        );
    }
}
