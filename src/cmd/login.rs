use crate::config::{CONFIG, CONFIG_PATH, Config};
use read_input::prelude::*;

/// Store an already issued access token in the config file.
pub fn login() -> std::io::Result<()> {
    let token: String = input()
        .msg("Input your Search Console access token: ")
        .get();
    let conf = Config {
        token: Some(token.trim().to_owned()),
        ..(*CONFIG).clone()
    };
    let s = toml::to_string(&conf).map_err(std::io::Error::other)?;
    let path = CONFIG_PATH.as_path();
    if let Some(dir) = path.parent().filter(|d| !d.exists()) {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(path, s)?;
    println!("saved token to {}", path.display());
    Ok(())
}
