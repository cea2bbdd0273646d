//! Signature Pad Replay Tool (Desktop)
//!
//! Replays a recorded pad interaction against the CPU raster surface and
//! writes the resulting PNG. For WASM/web builds, the entry point is in
//! lib.rs (wasm_start).

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use signature_pad::replay::ReplayScript;
use signature_pad::{PadResult, SubmitGuard};

#[derive(Parser, Debug)]
#[command(name = "signature_pad_replay", about = "Render a recorded signature pad session to PNG")]
struct Cli {
    /// Replay script (JSON)
    script: PathBuf,

    /// Where to write the PNG
    #[arg(short, long, default_value = "signature.png")]
    output: PathBuf,

    /// Print the PNG as a data URI on stdout as well
    #[arg(long)]
    data_url: bool,

    /// Fail when the replay leaves the pad empty, like a form requiring a signature
    #[arg(long)]
    require_signature: bool,
}

fn main() -> ExitCode {
    env_logger::init();

    match run(&Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> PadResult<()> {
    log::info!("Replaying {}", cli.script.display());

    let script = ReplayScript::load(&cli.script)?;
    let pad = script.run()?;

    SubmitGuard::default().check(cli.require_signature, pad.is_empty())?;

    let png = pad.export_png()?;
    std::fs::write(&cli.output, &png)?;

    let (width, height) = pad.surface_size();
    log::info!(
        "Wrote {}x{} PNG ({} bytes, {} points) to {}",
        width,
        height,
        png.len(),
        pad.points().len(),
        cli.output.display()
    );

    if cli.data_url {
        println!("{}", pad.to_data_url()?);
    }
    Ok(())
}
