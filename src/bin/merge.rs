use std::path::PathBuf;

use clap::Parser;
use locfont::asset::loctext::merge_files_with;

#[derive(Parser, Debug)]
#[command(version, about = "Merge translations into an original localization file.")]
struct Cli {
    /// Base key=value file (e.g. English)
    #[arg(value_name = "ORIGINALFILE")]
    original_file: PathBuf,

    /// Key=value translation file (e.g. Russian)
    #[arg(value_name = "TRANSLATIONFILE")]
    translation_file: PathBuf,

    /// Output path for the merged localization
    #[arg(value_name = "OUTPUTFILE")]
    output_file: PathBuf,
}

fn main() {
    locfont::logging::init();

    let cli = Cli::parse();

    let result = merge_files_with(
        &cli.original_file,
        &cli.translation_file,
        &cli.output_file,
        |replacement| {
            println!(
                "Found matching tag: {} – wrote value: {}",
                replacement.tag, replacement.value
            );
        },
    );

    if let Err(e) = result {
        eprintln!("Error: {}", e);

        error_exit();
    }
}

fn error_exit() -> ! {
    eprintln!("\nUnable to continue.");

    std::process::exit(1);
}
