use std::path::PathBuf;

use clap::Parser;
use locfont::asset::font::FontDat;

#[derive(Parser, Debug)]
#[command(version, about = "Dump a .dat font file as JSON.")]
struct Cli {
    /// The .dat file to read
    #[arg(value_name = "DATFILE")]
    dat_file: PathBuf,

    /// Write the JSON here instead of stdout
    #[arg(short = 'o', value_name = "FILE")]
    output_file: Option<PathBuf>,
}

fn main() {
    locfont::logging::init();

    let cli = Cli::parse();

    let bytes = match std::fs::read(&cli.dat_file) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Unable to open file {}. Error: {}", cli.dat_file.display(), e);

            error_exit();
        }
    };

    let dat = match FontDat::from_bytes(&bytes) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Unable to process {}: {}", cli.dat_file.display(), e);

            error_exit();
        }
    };

    log::info!(
        "Read {} glyph(s) for texture {}",
        dat.glyphs.len(),
        dat.texture_filename
    );

    let json = match serde_json::to_string_pretty(&dat) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("Failed to serialise font data. Error: {}", e);

            error_exit();
        }
    };

    match cli.output_file {
        Some(path) => {
            if let Err(e) = std::fs::write(&path, json) {
                eprintln!("Failed to write {}. Error: {}", path.display(), e);

                error_exit();
            }
        }
        None => println!("{json}"),
    }
}

fn error_exit() -> ! {
    eprintln!("\nUnable to continue.");

    std::process::exit(1);
}
