//! Build identification for health checks and startup logs.

/// Crate version from Cargo.toml.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name reported by `/health`.
pub const SERVICE_NAME: &str = "pack-service";

const COMMIT: Option<&str> = option_env!("VERGEN_GIT_SHA");
const DIRTY: Option<&str> = option_env!("VERGEN_GIT_DIRTY");

/// `pack-service 0.1.0 (abc1234)`, or `pack-service 0.1.0` when the build had
/// no git metadata. Modified trees get a `-dirty` suffix on the commit.
pub fn version_string() -> String {
    describe(COMMIT, DIRTY == Some("true"))
}

fn describe(commit: Option<&str>, dirty: bool) -> String {
    match commit {
        Some(sha) => {
            let short = sha.get(..7).unwrap_or(sha);
            let suffix = if dirty { "-dirty" } else { "" };
            format!("{SERVICE_NAME} {PKG_VERSION} ({short}{suffix})")
        }
        None => format!("{SERVICE_NAME} {PKG_VERSION}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_is_shortened() {
        let label = describe(Some("0123456789abcdef"), false);
        assert_eq!(label, format!("pack-service {PKG_VERSION} (0123456)"));
    }

    #[test]
    fn dirty_tree_is_marked() {
        assert!(describe(Some("abc"), true).ends_with("(abc-dirty)"));
    }

    #[test]
    fn missing_git_metadata_is_omitted() {
        assert_eq!(describe(None, true), format!("pack-service {PKG_VERSION}"));
        assert!(version_string().starts_with(SERVICE_NAME));
    }
}
