//! HTTP application servers register themselves against

use tracing::debug;

/// A route a server mounted on the [`App`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mount {
    pub path: String,
    pub name: String,
}

/// Minimal HTTP application.
///
/// It only records middleware registrations and is never started: the test
/// client hands one to the server at construction so the server can run its
/// own registration step before any operation is executed.
#[derive(Debug, Default)]
pub struct App {
    mounts: Vec<Mount>,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register middleware `name` under `path`.
    ///
    /// Registering the same path again replaces the previous entry.
    pub fn mount(&mut self, path: impl Into<String>, name: impl Into<String>) {
        let mount = Mount {
            path: normalize_path(path.into()),
            name: name.into(),
        };
        debug!("Mounting {} at {}", mount.name, mount.path);

        match self.mounts.iter_mut().find(|m| m.path == mount.path) {
            Some(existing) => *existing = mount,
            None => self.mounts.push(mount),
        }
    }

    pub fn mounts(&self) -> &[Mount] {
        &self.mounts
    }

    pub fn is_mounted(&self, path: &str) -> bool {
        let path = normalize_path(path.to_string());
        self.mounts.iter().any(|m| m.path == path)
    }
}

fn normalize_path(path: String) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mount_normalizes_paths() {
        let mut app = App::new();
        app.mount("graphql/", "schema");

        assert!(app.is_mounted("/graphql"));
        assert!(app.is_mounted("graphql"));
        assert!(!app.is_mounted("/api"));
    }

    #[test]
    fn test_remount_replaces_entry() {
        let mut app = App::new();
        app.mount("/graphql", "first");
        app.mount("/graphql", "second");
        app.mount("/", "root");

        assert_eq!(app.mounts().len(), 2);
        assert_eq!(app.mounts()[0].name, "second");
        assert_eq!(app.mounts()[1].path, "/");
    }
}
