//! Settings commands

use std::path::Path;

use anyhow::Result;
use devpub::config::vault_root;
use devpub::constants as C;
use devpub::util::display_path;
use devpub::Settings;

pub fn set_key(key: String) -> Result<()> {
    let mut settings = Settings::load_from(&Settings::config_path()?)?;
    settings.api_key = Some(key.trim().to_string());
    let path = settings.save()?;

    eprintln!("{}", C::API_KEY_STORAGE_WARNING);
    println!("API key saved to {}", display_path(&path));
    Ok(())
}

pub fn show(vault_flag: Option<&Path>) -> Result<()> {
    let settings = Settings::load()?;

    println!("config: {}", display_path(&Settings::config_path()?));
    println!("vault: {}", display_path(&vault_root(vault_flag)?));
    println!("api_base_url: {}", settings.api_base_url);
    match settings.masked_api_key() {
        Some(masked) => println!("api_key: {}", masked),
        None => println!("api_key: (not set)"),
    }
    Ok(())
}
