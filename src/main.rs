use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, LevelFilter};

use vcount::config::Config;
use vcount::mjpeg::MjpegWriter;
use vcount::pipeline::StreamProcessor;
use vcount::source::ImageSequence;
use vcount::CountDirection;

/// Counts vehicles crossing a horizontal line in a sequence of frames.
#[derive(Parser, Debug)]
#[command(name = "vcount")]
struct Args {
    /// Directory with the stream's frames, processed in file name order
    frames: PathBuf,

    /// JSON settings file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write annotated frames as a multipart JPEG stream to this file
    #[arg(long, value_name = "FILE")]
    mjpeg: Option<PathBuf>,

    /// Print every frame's count update as a JSON line
    #[arg(long)]
    json: bool,

    #[arg(long)]
    line_y: Option<i32>,
    #[arg(long)]
    max_unseen: Option<u32>,
    #[arg(long)]
    max_distance: Option<f32>,
    /// both, up or down
    #[arg(long)]
    direction: Option<CountDirection>,
}

impl Args {
    fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => Config::default(),
        };

        if self.line_y.is_some() {
            config.line_y = self.line_y;
        }
        if let Some(n) = self.max_unseen {
            config.counter.max_unseen = n;
        }
        if let Some(d) = self.max_distance {
            config.counter.max_distance = d;
        }
        if let Some(dir) = self.direction {
            config.counter.direction = dir;
        }

        Ok(config)
    }
}

fn handle_error(err: &anyhow::Error) {
    for (i, e) in err.chain().enumerate() {
        eprintln!("  {}: {}", i + 1, e);
    }
}

fn main() {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .format_timestamp_millis()
        .init();

    if let Err(err) = run() {
        handle_error(&err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();
    let config = args.load_config()?;

    let mut source = ImageSequence::open(&args.frames)
        .with_context(|| format!("opening frames {}", args.frames.display()))?;

    let mut mjpeg = match &args.mjpeg {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating {}", path.display()))?;
            Some(MjpegWriter::new(BufWriter::new(file)))
        }
        None => None,
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut processor = StreamProcessor::from_config(&config);

    let total = processor.run(&mut source, |p| {
        if p.update.crossed() > 0 {
            info!("frame #{}: count={}", p.update.frame, p.update.total);
        }

        if args.json {
            serde_json::to_writer(&mut out, &p.update)?;
            writeln!(out)?;
        }

        if let Some(w) = mjpeg.as_mut() {
            w.write_frame(&p.annotated)?;
        }

        Ok(())
    })?;

    if let Some(w) = mjpeg {
        info!("wrote {} frames", w.frames());
    }

    println!("{}", total);

    Ok(())
}
