//! Remote Write Dump
//!
//! Decodes a remote write request body and prints its series in the text exposition format.

use anyhow::{Context, Result};
use std::io::Read;
use std::path::PathBuf;
use structopt::StructOpt;

use telemetry_remote_write::{debug, encoding};

#[derive(Debug, StructOpt)]
#[structopt(name = "remote-write-dump")]
struct Args {
    /// A snappy compressed `WriteRequest`; read from stdin when omitted
    #[structopt(parse(from_os_str))]
    input: Option<PathBuf>,

    /// Also print each sample's timestamp (milliseconds since the epoch)
    #[structopt(short, long)]
    timestamps: bool,
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();
    let args = Args::from_args();

    let payload = match &args.input {
        Some(path) => std::fs::read(path).with_context(|| format!("reading {}", path.display()))?,
        None => {
            let mut payload = Vec::new();
            std::io::stdin()
                .read_to_end(&mut payload)
                .context("reading stdin")?;
            payload
        }
    };
    let request = encoding::decode(&payload).context("decoding write request")?;
    log::debug!(
        "Decoded {} series from {} bytes",
        request.timeseries.len(),
        payload.len()
    );

    if args.timestamps {
        for series in &request.timeseries {
            let single = encoding::proto::WriteRequest {
                timeseries: vec![series.clone()],
            };
            let text = debug::render_text(&single);
            for (line, sample) in text.lines().zip(&series.samples) {
                println!("{} {}", line, sample.timestamp);
            }
        }
    } else {
        print!("{}", debug::render_text(&request));
    }
    Ok(())
}
