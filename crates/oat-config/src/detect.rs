//! Internal-usage classification.
//!
//! Telemetry from the maintaining team's own developers and CI is tagged
//! so it can be separated from real-world usage during analysis. The
//! classifier is a disjunction of independent signals; any one of them
//! marks the process as internal. The result labels events, it never
//! gates transmission.

use std::path::Path;

use crate::env::{parse_bool, ENV_DEV, ENV_INTERNAL};

/// Environment variables set by known CI platforms.
const CI_ENV_VARS: &[&str] = &[
    "CI",
    "CONTINUOUS_INTEGRATION",
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "JENKINS_URL",
    "TRAVIS",
    "CIRCLECI",
    "BUILDKITE",
    "AZURE_PIPELINES",
    "TF_BUILD",
    "CODEBUILD_BUILD_ID",
    "TEAMCITY_VERSION",
    "BITBUCKET_BUILD_NUMBER",
];

/// The five independent internal-usage signals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InternalSignals {
    /// `OPENADAPT_INTERNAL` set to an affirmative value.
    pub explicit_internal: bool,
    /// `OPENADAPT_DEV` set to an affirmative value.
    pub explicit_dev: bool,
    /// Running from a non-packaged (debug) build.
    pub unpackaged_build: bool,
    /// A version-control directory is present (development checkout).
    pub vcs_checkout: bool,
    /// A known CI platform variable is set.
    pub ci: bool,
}

impl InternalSignals {
    /// Gather all signals from the process environment and filesystem.
    pub fn detect() -> Self {
        Self::detect_from(|name| std::env::var(name).ok())
    }

    /// Gather signals through an explicit environment lookup. Build kind
    /// and filesystem probes still come from the process itself.
    pub fn detect_from<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            explicit_internal: flag_set(&lookup, ENV_INTERNAL),
            explicit_dev: flag_set(&lookup, ENV_DEV),
            unpackaged_build: cfg!(debug_assertions),
            vcs_checkout: Path::new(".git").exists() || Path::new("../.git").exists(),
            ci: is_ci_from(&lookup),
        }
    }

    /// Internal when any single signal fires.
    pub fn is_internal(&self) -> bool {
        self.explicit_internal
            || self.explicit_dev
            || self.unpackaged_build
            || self.vcs_checkout
            || self.ci
    }
}

fn flag_set<F>(lookup: &F, name: &str) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .filter(|value| !value.is_empty())
        .is_some_and(|value| parse_bool(&value))
}

/// Whether the process runs under a known CI platform.
pub fn is_ci_environment() -> bool {
    is_ci_from(&|name| std::env::var(name).ok())
}

fn is_ci_from<F>(lookup: &F) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    CI_ENV_VARS
        .iter()
        .any(|name| lookup(name).is_some_and(|value| !value.is_empty()))
}

/// Whether the current process counts as internal usage.
pub fn is_internal_user() -> bool {
    InternalSignals::detect().is_internal()
}
