use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::ticket::TicketId;

// ASCII classes only: non-ASCII letters and spaces are dropped, not kept.
static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_ \t\n\r\f\v]").expect("static regex"));
static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t\n\r\f\v]+").expect("static regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchCategory {
    Feature,
    Hotfix,
}

impl BranchCategory {
    pub fn from_hotfix_flag(hotfix: bool) -> Self {
        if hotfix {
            BranchCategory::Hotfix
        } else {
            BranchCategory::Feature
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BranchCategory::Feature => "feature",
            BranchCategory::Hotfix => "hotfix",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchName(pub String);

impl BranchName {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `{category}/{ticket}-{slug}`, the naming used for new ticket branches.
    pub fn from_parts(category: BranchCategory, ticket: TicketId, title: &str) -> Self {
        Self(format!("{}/{}-{}", category.as_str(), ticket, slugify(title)))
    }

    /// Loose match: the decimal ticket ID appears anywhere in the name, so
    /// ticket 12 also matches `feature/123-other`.
    pub fn mentions(name: &str, ticket: TicketId) -> bool {
        name.contains(&ticket.to_string())
    }
}

impl fmt::Display for BranchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A branch ref under `refs/remotes/`, in short form (`origin/feature/1-x`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteBranch {
    pub remote: String,
    pub reference: String,
}

impl RemoteBranch {
    pub fn new(remote: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            remote: remote.into(),
            reference: reference.into(),
        }
    }

    /// Name of the local tracking branch: the ref without its remote segment.
    pub fn local_name(&self) -> BranchName {
        let stripped = self
            .reference
            .strip_prefix(&self.remote)
            .and_then(|rest| rest.strip_prefix('/'))
            .or_else(|| {
                self.reference
                    .split_once('/')
                    .map(|(_, rest)| rest)
            })
            .unwrap_or(&self.reference);
        BranchName(stripped.to_string())
    }
}

/// Outcome of branch resolution; the branch named here is checked out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchMatch {
    Local(BranchName),
    Remote {
        remote_ref: RemoteBranch,
        local: BranchName,
    },
    Created(BranchName),
}

impl BranchMatch {
    pub fn branch(&self) -> &BranchName {
        match self {
            BranchMatch::Local(branch) | BranchMatch::Created(branch) => branch,
            BranchMatch::Remote { local, .. } => local,
        }
    }
}

impl fmt::Display for BranchMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BranchMatch::Local(branch) => write!(f, "Checking out local branch {branch}"),
            BranchMatch::Remote { remote_ref, .. } => {
                write!(f, "Checking out remote branch {}", remote_ref.reference)
            }
            BranchMatch::Created(branch) => write!(f, "Created new branch {branch}"),
        }
    }
}

pub fn slugify(input: &str) -> String {
    let mut slug = input.to_lowercase();
    for c in [' ', '-', '.', '/'] {
        slug = slug.replace(c, "_");
    }
    let slug = NON_WORD.replace_all(&slug, "");
    let slug = slug.replace('_', " ");
    let slug = WHITESPACE_RUN.replace_all(&slug, " ");
    slug.trim().replace(' ', "-")
}
