use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use kanadrill::app::App;
use kanadrill::config::Config;
use kanadrill::session::quiz::StopReason;
use kanadrill::ui::console::LineConsole;
use kanadrill::ui::report;

#[derive(Parser)]
#[command(name = "kanadrill", version, about = "Terminal kana drill with adaptive item selection")]
struct Cli {
    #[arg(short, long, value_name = "BOOL", help = "Quiz katakana")]
    katakana: Option<bool>,

    #[arg(short = 'H', long, value_name = "BOOL", help = "Quiz hiragana")]
    hiragana: Option<bool>,

    #[arg(short, long, help = "Limit the number of kana to test")]
    limit: Option<usize>,

    #[arg(long = "vocab", value_name = "PATH", help = "Extra vocabulary file (repeatable)")]
    vocab: Vec<PathBuf>,

    #[arg(long, help = "Rows in the most-missed table")]
    top: Option<usize>,

    #[arg(long, help = "Seed for a reproducible drill")]
    seed: Option<u64>,

    #[arg(long, help = "Print the final report as JSON")]
    json: bool,

    #[arg(long, value_name = "PATH", help = "Config file to use")]
    config: Option<PathBuf>,

    #[arg(long, help = "Write the effective config and exit")]
    save_config: bool,

    #[arg(short, long, help = "Verbose logging on stderr")]
    verbose: bool,
}

impl Cli {
    fn apply(&self, config: &mut Config) {
        if let Some(katakana) = self.katakana {
            config.katakana = katakana;
        }
        if let Some(hiragana) = self.hiragana {
            config.hiragana = hiragana;
        }
        if let Some(limit) = self.limit {
            config.limit = limit;
        }
        if let Some(top) = self.top {
            config.report_top = top;
        }
        config.vocab_files.extend(self.vocab.iter().cloned());
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "kanadrill=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let mut config = Config::load_from(&config_path)?;
    cli.apply(&mut config);
    config.normalize();

    if cli.save_config {
        config.save_to(&config_path)?;
        println!("Wrote {}", config_path.display());
        return Ok(());
    }

    let app = App::new(config, cli.seed).context("preparing quiz session")?;
    let finished = app
        .run(LineConsole::stdio(), tokio::signal::ctrl_c())
        .await?;

    let rendered = if cli.json {
        report::render_json(finished.report.as_ref())?
    } else {
        report::render(finished.report.as_ref())
    };
    let mut stdout = io::stdout();
    writeln!(stdout, "{rendered}")?;
    stdout.flush()?;

    // The worker may still be blocked reading stdin; the runtime would wait
    // on it forever during shutdown.
    if finished.reason == StopReason::Interrupted {
        std::process::exit(0);
    }
    Ok(())
}
