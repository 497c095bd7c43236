use std::io::{self, Write};
use std::path::Path;

use crate::config::{
    api_key_env_line, data_dir, ensure_directories, env_file_path, validate_api_key,
};
use crate::error::Result;

pub fn run(api_key: Option<String>, force: bool) -> Result<()> {
    ensure_directories()?;

    let env_file = env_file_path();

    if env_file.exists() && !force {
        println!("Config already exists at {}", env_file.display());
        println!("Use --force to overwrite.");
        return Ok(());
    }

    let api_key = if let Some(key) = api_key {
        key
    } else {
        print!("Enter your YouTube Data API key: ");
        io::stdout().flush()?;
        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        input.trim().to_string()
    };

    save_api_key(&env_file, &api_key)?;

    println!("Config saved to {}", env_file.display());
    println!("Data directory: {}", data_dir().display());

    Ok(())
}

/// Persist the key as the only line of the .env file at `path`
pub fn save_api_key(path: &Path, api_key: &str) -> Result<()> {
    validate_api_key(api_key)?;
    std::fs::write(path, api_key_env_line(api_key))?;
    Ok(())
}
