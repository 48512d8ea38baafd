use anyhow::{Context, Result};
use lexdec_session::{FileStorage, SessionStore};
use std::path::PathBuf;

pub fn execute(session_dir: PathBuf) -> Result<()> {
    let mut store = SessionStore::new(FileStorage::new(&session_dir));
    store
        .clear()
        .with_context(|| format!("cannot clear session in {}", session_dir.display()))?;
    println!("Session cleared");
    Ok(())
}
