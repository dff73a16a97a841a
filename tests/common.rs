// Common test utilities for integration tests

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;

// Helper function to create a test CSV file
pub fn create_test_csv(
    temp_dir: &TempDir,
    filename: &str,
    header: &str,
    rows: &[&str],
) -> PathBuf {
    let csv_path = temp_dir.path().join(filename);
    let mut file = File::create(&csv_path).expect("Failed to create CSV file");

    writeln!(file, "{}", header).expect("Failed to write CSV header");
    for row in rows {
        writeln!(file, "{}", row).expect("Failed to write CSV data");
    }

    csv_path
}

// SQLAlchemy-style sqlite URL for a file inside the temp directory (the temp
// path is absolute, hence the four slashes).
pub fn sqlite_url(temp_dir: &TempDir, filename: &str) -> String {
    format!("sqlite:///{}", temp_dir.path().join(filename).display())
}
