use std::env;

use anyhow::Context;
use mapscene::cli::{run, RunError, USAGE};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    match run(&args) {
        Ok(_) => Ok(()),
        Err(RunError::Args(e)) => {
            eprintln!("[scene_setup] error parsing arguments: {e}");
            eprintln!("{USAGE}");
            std::process::exit(1);
        }
        Err(RunError::Scene(e)) => {
            let category = e.category();
            Err(e).with_context(|| format!("scene setup failed ({category})"))
        }
    }
}
