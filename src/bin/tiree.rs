use std::env;
use std::path::Path;

use tiree::app::{run, RunOutcome};
use tiree::chart::DirectorySink;
use tiree::config::Config;
use tiree::source::yahoo::YahooSource;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args: Vec<String> = env::args().collect();

    let config = match args.get(1) {
        Some(path) => Config::from_path(Path::new(path))?,
        None => Config::default(),
    };

    let source = YahooSource::new(config.source_url.clone())?;
    let mut sink = DirectorySink::new(config.output_dir.clone());
    if let RunOutcome::Rendered { .. } = run(&config, &source, &mut sink)? {
        println!("Charts written to {}", sink.dir().display());
    }
    Ok(())
}
