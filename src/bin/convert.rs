use std::path::PathBuf;

use clap::Parser;
use locfont::asset::font::{FontDatConfig, convert_file};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Convert an AngelCode BMFont XML descriptor (.fnt) into the renderer's .dat layout."
)]
struct Cli {
    /// The BMFont XML descriptor to convert
    #[arg(value_name = "FNTFILE")]
    fnt_file: PathBuf,

    /// Name of the texture page written into the header (at most 255 bytes)
    #[arg(value_name = "TEXTUREFILENAME")]
    texture_filename: String,

    /// The path which the .dat file will be written to
    #[arg(value_name = "OUTFILE")]
    out_file: PathBuf,

    /// Accept descriptors whose chars count differs from the number of char elements
    #[arg(long)]
    lenient_count: bool,
}

fn main() {
    locfont::logging::init();

    let cli = Cli::parse();

    let config = FontDatConfig {
        strict_count: !cli.lenient_count,
        ..Default::default()
    };

    log::info!("Converting {}", cli.fnt_file.display());

    if let Err(e) = convert_file(&cli.fnt_file, &cli.texture_filename, &cli.out_file, &config) {
        eprintln!("Error: {}", e);

        error_exit();
    }
}

fn error_exit() -> ! {
    eprintln!("\nUnable to continue.");

    std::process::exit(1);
}
