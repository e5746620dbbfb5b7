//! Shared test utilities for domain testing
//!
//! - `TestDataBuilder`: deterministic ids, names and emails derived from a test name
//! - `TempStoreDir`: throwaway directory for file-backed task stores
//! - `assertions`: custom assertion helpers
//!
//! # Usage
//!
//! ```rust,no_run
//! use test_utils::{TempStoreDir, TestDataBuilder};
//!
//! let dir = TempStoreDir::new();
//! let builder = TestDataBuilder::from_test_name("my_test");
//!
//! let user_id = builder.user_id();
//! let store_path = dir.tasks_path();
//! let collaborator = builder.email("alice");
//! ```

use std::path::{Path, PathBuf};
use tempfile::TempDir;
use uuid::Uuid;

/// Builder for test data with deterministic randomization
///
/// The same test name always yields the same ids, so failures are reproducible
/// while different tests never collide on shared stores.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    /// Create a new builder with a seed (for deterministic tests)
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Create from test name (generates seed from test name hash)
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_create_task");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Deterministic UUID for this seed
    pub fn uuid(&self) -> Uuid {
        let bytes = self.seed.to_le_bytes();
        let mut uuid_bytes = [0u8; 16];
        uuid_bytes[..8].copy_from_slice(&bytes);
        uuid_bytes[8..16].copy_from_slice(&bytes);
        Uuid::from_bytes(uuid_bytes)
    }

    /// Session user id (tasks key their owner by string id)
    pub fn user_id(&self) -> String {
        format!("user-{}", self.uuid())
    }

    /// Generate a unique name for testing
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::new(7);
    /// assert_eq!(builder.name("task", "main"), "test-task-7-main");
    /// ```
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }

    /// Unique, syntactically valid email address
    pub fn email(&self, local: &str) -> String {
        format!("{}.{}@example.com", local, self.seed)
    }
}

/// Temporary directory holding a task store file
///
/// The directory and everything in it is removed on drop.
pub struct TempStoreDir {
    dir: TempDir,
}

impl TempStoreDir {
    pub fn new() -> Self {
        let dir = tempfile::Builder::new()
            .prefix("taskflow-test-")
            .tempdir()
            .unwrap_or_else(|e| panic!("failed to create temp store dir: {}", e));
        tracing::debug!(path = %dir.path().display(), "Created temp store dir");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Default store file inside the directory
    pub fn tasks_path(&self) -> PathBuf {
        self.file("tasks.json")
    }

    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Overwrite a file with raw contents, e.g. to simulate corruption
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.file(name);
        std::fs::write(&path, contents)
            .unwrap_or_else(|e| panic!("failed to write {}: {}", path.display(), e));
        path
    }
}

impl Default for TempStoreDir {
    fn default() -> Self {
        Self::new()
    }
}

/// Test assertion helpers
pub mod assertions {
    use uuid::Uuid;

    /// Assert that two UUIDs are equal with a nice error message
    pub fn assert_uuid_eq(actual: Uuid, expected: Uuid, context: &str) {
        assert_eq!(
            actual, expected,
            "{}: expected UUID {}, got {}",
            context, expected, actual
        );
    }

    /// Assert that an optional value is Some
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }

    /// Assert that two collections hold the same items, ignoring order
    pub fn assert_same_items<T: Ord + std::fmt::Debug + Clone>(actual: &[T], expected: &[T], context: &str) {
        let mut actual = actual.to_vec();
        let mut expected = expected.to_vec();
        actual.sort();
        expected.sort();
        assert_eq!(actual, expected, "{}: collections differ", context);
    }
}
