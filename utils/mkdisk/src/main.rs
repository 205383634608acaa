use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use std::fs;
use std::path::{Path, PathBuf};

use mkdisk::{Manifest, inspect, layout};
use types::boot::{KERNEL_REGION, USER_REGION};

/// Build a bootable disk image from a kernel ELF and a user ELF
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Kernel ELF, placed at sector 4
    #[arg(short, long)]
    kernel: PathBuf,

    /// User program ELF, placed at sector 64
    #[arg(short, long)]
    user: PathBuf,

    /// Output disk image
    #[arg(short, long, default_value = "disk.img")]
    output: PathBuf,

    /// Also write a JSON manifest describing the layout
    #[arg(short, long)]
    manifest: Option<PathBuf>,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn read(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn run() -> Result<()> {
    let args = Args::parse();

    let kernel = read(&args.kernel)?;
    let user = read(&args.user)?;

    let kernel_elf = inspect("kernel", &kernel, KERNEL_REGION)?;
    let user_elf = inspect("user", &user, USER_REGION)?;

    let disk = layout::build(&kernel, &user)?;
    fs::write(&args.output, &disk.bytes)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    println!(
        "{} {} ({} bytes)",
        "Wrote".green().bold(),
        args.output.display(),
        disk.bytes.len()
    );
    for (placement, bytes) in disk.placements.iter().zip([&kernel, &user]) {
        let head = &bytes[..bytes.len().min(16)];
        println!(
            "  {:<6} sector {:>3}  {:>7} bytes  {}",
            placement.name.yellow(),
            placement.sector,
            placement.size,
            hex::encode(head).dimmed()
        );
    }

    if let Some(path) = &args.manifest {
        let parts = disk
            .placements
            .iter()
            .cloned()
            .zip([kernel_elf, user_elf])
            .zip([kernel.as_slice(), user.as_slice()])
            .map(|((placement, elf), bytes)| (placement, elf, bytes))
            .collect();
        let manifest = Manifest::new(disk.bytes.len(), parts);
        let json = serde_json::to_string_pretty(&manifest)?;
        fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        println!("{} {}", "Manifest".green().bold(), path.display());
    }

    Ok(())
}
