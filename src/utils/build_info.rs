//! Stamps embedded by `build.rs`, read back for `version` and the banner.

const UNKNOWN: &str = "unknown";

/// State of the working tree the binary was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Commit {
    pub hash: &'static str,
    pub tree: &'static str,
}

impl Commit {
    pub fn is_dirty(&self) -> bool {
        self.tree == "dirty"
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BuildMetadata {
    pub version: &'static str,
    pub commit: Commit,
    pub built_at: &'static str,
    pub target: &'static str,
    pub profile: &'static str,
    pub rustc: &'static str,
}

impl BuildMetadata {
    /// One-line form such as `0.1.0 (3f2a9c1, dirty)`.
    pub fn short(&self) -> String {
        if self.commit.hash == UNKNOWN {
            return self.version.to_string();
        }
        let mut label = format!("{} ({}", self.version, self.commit.hash);
        if self.commit.is_dirty() {
            label.push_str(", dirty");
        }
        label.push(')');
        label
    }
}

fn stamp(value: Option<&'static str>) -> &'static str {
    value.filter(|value| !value.is_empty()).unwrap_or(UNKNOWN)
}

pub fn current() -> BuildMetadata {
    BuildMetadata {
        version: env!("CARGO_PKG_VERSION"),
        commit: Commit {
            hash: stamp(option_env!("BALLET_CORE_BUILD_HASH")),
            tree: stamp(option_env!("BALLET_CORE_BUILD_STATUS")),
        },
        built_at: stamp(option_env!("BALLET_CORE_BUILD_TIMESTAMP")),
        target: stamp(option_env!("BALLET_CORE_BUILD_TARGET")),
        profile: stamp(option_env!("BALLET_CORE_BUILD_PROFILE")),
        rustc: stamp(option_env!("BALLET_CORE_BUILD_RUSTC")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(hash: &'static str, tree: &'static str) -> BuildMetadata {
        BuildMetadata {
            version: "1.2.0",
            commit: Commit { hash, tree },
            built_at: UNKNOWN,
            target: UNKNOWN,
            profile: UNKNOWN,
            rustc: UNKNOWN,
        }
    }

    #[test]
    fn short_label_mentions_dirty_trees() {
        assert_eq!(metadata("3f2a9c1", "dirty").short(), "1.2.0 (3f2a9c1, dirty)");
        assert_eq!(metadata("3f2a9c1", "clean").short(), "1.2.0 (3f2a9c1)");
        assert_eq!(metadata(UNKNOWN, UNKNOWN).short(), "1.2.0");
    }

    #[test]
    fn current_reports_the_package_version() {
        assert_eq!(current().version, env!("CARGO_PKG_VERSION"));
        assert_eq!(stamp(Some("")), UNKNOWN);
    }
}
