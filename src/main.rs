use clap::Parser;
use config::{CONFIG, Format, Overrides, Settings};
use dotenv::{DEFAULT_ENV_FILE, Environment};
use std::path::PathBuf;

mod cmd;
mod config;
mod dotenv;
mod env_keys;
mod error;
mod filter;
mod inspect;
mod logging;
mod sitemap;
#[cfg(test)]
mod test_server;

#[derive(Parser)]
#[clap(version, about = "Submit sitemap guide/blog URLs to the Search Console URL Inspection API")]
struct Opt {
    /// Output format
    #[clap(short, long, value_enum, default_value = "text", global = true)]
    format: Format,
    /// Local settings file merged behind the process environment
    #[clap(long, default_value = DEFAULT_ENV_FILE, global = true)]
    env_file: PathBuf,
    /// Sitemap to read (overrides SITEMAP_URL)
    #[clap(long, global = true)]
    sitemap_url: Option<String>,
    /// Search Console property (overrides GC_SITE_URL)
    #[clap(long, global = true)]
    site_url: Option<String>,
    /// Pause between inspection requests
    #[clap(long, global = true)]
    delay_ms: Option<u64>,
    /// Path prefix to select; repeatable (default: /guides/ and /blog/)
    #[clap(long = "prefix", global = true)]
    prefixes: Vec<String>,
    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, clap::Subcommand)]
enum Command {
    /// Inspect every selected URL (default)
    Run,
    /// Print the selected URLs without inspecting them
    List,
    /// Store an access token in the config file
    Login,
}

impl Opt {
    fn overrides(&self) -> Overrides {
        Overrides {
            sitemap_url: self.sitemap_url.clone(),
            site_url: self.site_url.clone(),
            delay_ms: self.delay_ms,
            prefixes: self.prefixes.clone(),
        }
    }
}

async fn dispatch(opt: Opt) -> surf::Result<()> {
    let env = Environment::load(&opt.env_file).map_err(|source| error::Error::EnvFile {
        path: opt.env_file.display().to_string(),
        source,
    })?;
    tracing::debug!("{} entries from {}", env.len(), opt.env_file.display());
    match opt.command.as_ref().unwrap_or(&Command::Run) {
        Command::Run => {
            let settings = Settings::resolve(&opt.overrides(), &env, &CONFIG)?;
            cmd::run::run(&settings).await?
        }
        Command::List => {
            let settings = Settings::resolve_partial(&opt.overrides(), &env, &CONFIG);
            cmd::list::list(&settings).await?
        }
        Command::Login => cmd::login::login()?,
    };
    Ok(())
}

#[async_std::main]
async fn main() {
    logging::init_logging();
    let opt = Opt::parse();
    config::FORMAT.get_or_init(|| opt.format);
    if let Err(err) = dispatch(opt).await {
        eprintln!("sitemap-inspect: {}", err);
        std::process::exit(1);
    }
}
