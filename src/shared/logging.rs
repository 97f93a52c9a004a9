use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub fn wizard_log_path(state_root: &Path) -> PathBuf {
    state_root.join("logs/ragforge.log")
}

pub fn append_wizard_log_line(state_root: &Path, line: &str) -> std::io::Result<()> {
    let path = wizard_log_path(state_root);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)?;
    writeln!(file, "{line}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_lines_under_state_root() {
        let dir = tempfile::tempdir().expect("tempdir");
        append_wizard_log_line(dir.path(), "submitted id=abc").expect("first line");
        append_wizard_log_line(dir.path(), "reset").expect("second line");
        let body = fs::read_to_string(wizard_log_path(dir.path())).expect("read log");
        assert_eq!(body, "submitted id=abc\nreset\n");
    }
}
