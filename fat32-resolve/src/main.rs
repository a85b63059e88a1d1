mod cli;

use std::fs::File;
use std::process::ExitCode;

use clap::Parser;
use fat32::{Error, FatFileSystem};
use typed_bytesize::ByteSizeIec;

use self::cli::Cli;

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(Error::NotFound | Error::NotADirectory | Error::IsADirectory) => {
            eprintln!("File not found.");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("{}: {e}", cli.image.display());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Error> {
    let image = File::open(&cli.image)?;
    let mut fs = FatFileSystem::open(image)?;
    log::debug!(
        "volume label: {}",
        String::from_utf8_lossy(fs.bpb().volume_label())
    );

    let entry = fs.resolve(&cli.path)?;

    println!("Clusters:");
    let mut count = 0u64;
    for cluster in fs.chain(entry.cluster) {
        println!("{}", cluster?);
        count += 1;
    }

    println!();
    println!("Number of clusters: {count}");
    println!(
        "File size: {} bytes ({})",
        entry.size,
        ByteSizeIec(entry.size as u64)
    );

    Ok(())
}
