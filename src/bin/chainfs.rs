//! ChainFS Shell Binary
//!
//! Interactive session over a ChainFS disk image. Commands are read from
//! stdin one per line; `cat >name` and `cat >>name` take the following line
//! as their text.

use std::io::{self, BufRead};
use std::path::PathBuf;

use chainfs::shell::{self, Command};
use chainfs::{Config, Engine};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

/// ChainFS shell
#[derive(Parser, Debug)]
#[command(name = "chainfs")]
#[command(about = "Educational cluster-chain file system with an undoable journal")]
#[command(version)]
struct Args {
    /// Disk image to load at startup (skipped when the file does not exist)
    image: Option<PathBuf>,

    /// Save the session back to IMAGE on exit
    #[arg(short, long, requires = "image")]
    save_on_exit: bool,
}

fn main() {
    // Initialize tracing/logging; stdout is reserved for command output
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,chainfs=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    tracing::info!("ChainFS v{}", chainfs::VERSION);

    // Build config from args
    let mut builder = Config::builder().save_on_close(args.save_on_exit);
    if let Some(image) = &args.image {
        tracing::info!("Disk image: {}", image.display());
        builder = builder.image_path(image);
    }
    let config = builder.build();

    // Open engine
    let mut engine = match Engine::open(config) {
        Ok(e) => e,
        Err(e) => {
            tracing::error!("Failed to open engine: {}", e);
            std::process::exit(1);
        }
    };

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    while let Some(line) = lines.next() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::error!("Failed to read input: {}", e);
                break;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let mut command = match Command::parse(&line) {
            Ok(command) => command,
            Err(e) => {
                println!("{}", shell::error_message(&e));
                continue;
            }
        };

        if command == Command::Exit {
            break;
        }

        if command.expects_text() {
            match lines.next() {
                Some(Ok(text)) => command = command.with_text(&text),
                Some(Err(e)) => {
                    tracing::error!("Failed to read input: {}", e);
                    break;
                }
                None => break,
            }
        }

        match engine.execute(command) {
            Ok(Some(output)) if !output.is_empty() => println!("{}", output),
            Ok(_) => {}
            Err(e) => println!("{}", shell::error_message(&e)),
        }
    }

    if let Err(e) = engine.close() {
        tracing::error!("Failed to close engine: {}", e);
        std::process::exit(1);
    }
}
