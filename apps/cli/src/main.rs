mod config;
mod main_lib;
mod script;

use config::Config;
use main_lib::{init_tracing, run};

fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing(&config.log_format);
    let output = run(&config)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
