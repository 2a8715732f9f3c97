use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// `$TIMETABLE_HOME`, or `~/.timetable`.
pub fn timetable_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("TIMETABLE_HOME") {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".timetable"))
}

pub fn ensure_timetable_home() -> Result<PathBuf> {
    let dir = timetable_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
}

/// Write `contents` to `out`, or to stdout when `out` is None.
pub fn write_output(out: Option<&Path>, contents: &str) -> Result<()> {
    match out {
        Some(p) => {
            fs::write(p, contents).with_context(|| format!("write {}", p.display()))?;
            tracing::info!("wrote {}", p.display());
        }
        None => print!("{contents}"),
    }
    Ok(())
}
