//! `bazstat set-user` and `bazstat prefs` – saved preferences.

use anyhow::Result;
use bazstat_core::prefs::{self, PreferenceStore};

pub fn run_set_user(store: &dyn PreferenceStore, username: &str) -> Result<()> {
    if username.trim().is_empty() {
        anyhow::bail!("username must not be empty");
    }
    let saved = prefs::set_username(store, username)?;
    tracing::info!("saved username {}", saved.username);
    println!("Saved username: {}", saved.username);
    Ok(())
}

pub fn run_show_prefs(store: &dyn PreferenceStore) -> Result<()> {
    let prefs = store.load()?;
    println!("username:        {}", prefs.username().unwrap_or("(unset)"));
    println!("vconsoleEnabled: {}", prefs.vconsole_enabled);
    Ok(())
}
