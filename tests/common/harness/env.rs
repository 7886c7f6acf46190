//! Isolated test environment with temp directory.

// Not every test binary uses every helper.
#![allow(dead_code)]

use super::{NoteportCommand, TestNote};
use noteport::service::Snapshot;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Isolated test environment with a snapshot file and an export directory.
///
/// Creates a temp directory that is automatically cleaned up on drop.
/// Notes added to the environment are written to `snapshot.json`, which
/// commands created with [`TestEnv::cmd`] read through `--snapshot`.
pub struct TestEnv {
    /// The temporary directory (kept for lifetime management)
    _temp_dir: TempDir,
    root: PathBuf,
    notes: RefCell<Vec<TestNote>>,
}

impl TestEnv {
    /// Creates a new isolated test environment with an empty snapshot.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path().to_path_buf();
        let env = Self {
            _temp_dir: temp_dir,
            root,
            notes: RefCell::new(Vec::new()),
        };
        env.write_snapshot();
        env.write_file("config.toml", "");
        env
    }

    /// Returns the root of the temp directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the path of the snapshot file.
    pub fn snapshot_path(&self) -> PathBuf {
        self.root.join("snapshot.json")
    }

    /// Returns the directory exports are written to.
    pub fn export_dir(&self) -> PathBuf {
        self.root.join("export")
    }

    /// Returns the path of the (empty) config file passed to commands.
    pub fn config_path(&self) -> PathBuf {
        self.root.join("config.toml")
    }

    /// Adds a test note and rewrites the snapshot.
    pub fn add_note(&self, note: &TestNote) {
        self.notes.borrow_mut().push(note.clone());
        self.write_snapshot();
    }

    fn write_snapshot(&self) {
        let snapshot = Snapshot {
            notes: self.notes.borrow().iter().map(TestNote::to_note).collect(),
        };
        let json = serde_json::to_string_pretty(&snapshot).expect("Failed to encode snapshot");
        std::fs::write(self.snapshot_path(), json).expect("Failed to write snapshot");
    }

    /// Creates a command isolated from the user's config and environment.
    pub fn cmd(&self) -> NoteportCommand {
        NoteportCommand::new().config(&self.config_path())
    }

    /// Creates a command reading this environment's snapshot.
    pub fn snapshot_cmd(&self, subcommand: &str) -> NoteportCommand {
        self.cmd().args([subcommand]).snapshot(&self.snapshot_path())
    }

    /// Writes a file to the test environment and returns its path.
    ///
    /// Useful for creating custom templates, CSS files, etc.
    pub fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.root.join(name);
        std::fs::write(&path, content).expect("Failed to write file");
        path
    }

    /// Reads a file under the export directory.
    pub fn read_export(&self, relative: &str) -> String {
        let path = self.export_dir().join(relative);
        std::fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e))
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_creates_temp_directory() {
        let env = TestEnv::new();
        assert!(env.root().is_dir());
        assert!(env.snapshot_path().is_file());
        assert!(env.config_path().is_file());
    }

    #[test]
    fn test_env_cleanup_on_drop() {
        let path = {
            let env = TestEnv::new();
            env.root().to_path_buf()
        };
        assert!(!path.exists(), "temp directory should be cleaned up on drop");
    }

    #[test]
    fn test_env_add_note_updates_snapshot() {
        let env = TestEnv::new();
        env.add_note(&TestNote::new("First"));
        env.add_note(&TestNote::new("Second"));

        let json = std::fs::read_to_string(env.snapshot_path()).unwrap();
        let snapshot: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snapshot.notes.len(), 2);
        assert_eq!(snapshot.notes[1].title(), "Second");
    }

    #[test]
    fn test_env_provides_isolated_command() {
        let env = TestEnv::new();
        let cmd = env.cmd();
        let args = cmd.get_args();
        assert_eq!(args[0], "--config");
        assert_eq!(args[1], env.config_path().to_string_lossy());
    }
}
