use std::{fs, path::PathBuf};

/// Temporary filter file that is removed when dropped
pub struct TestFile {
    path: PathBuf,
}

impl TestFile {
    /// Create a path under the system temp dir, unique per test and process
    pub fn new(test_name: &str) -> Self {
        let path = std::env::temp_dir().join(format!(
            "ccbloom_{}_{}.ccbf",
            test_name,
            std::process::id()
        ));
        Self { path }
    }

    pub fn path(&self) -> PathBuf {
        self.path.clone()
    }
}

impl Drop for TestFile {
    fn drop(&mut self) {
        if self.path.exists() {
            let _ = fs::remove_file(&self.path);
        }
    }
}
