use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use log::LevelFilter;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use weather_icon_format::{
    select_weather_icon, select_wind_icon, Beaufort, ICON_SIZE_INFO, ICON_SIZE_LARGE,
    ICON_SIZE_SMALL,
};

mod catalog;
mod codegen;
mod commands;
mod encoder;
mod error;

use catalog::IconSizes;
use commands::GenerateOptions;

#[derive(Parser)]
#[command(name = "weather-icons")]
#[command(about = "Bake weather icons into LVGL RGB565 C arrays")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert the whole icon set into a C header/source pair
    Generate {
        /// Directory holding the 64/, 128/ and 256/ source folders
        #[arg(long, default_value = "assets/icons/weather-icons/production/fill/png")]
        icons_dir: PathBuf,
        /// Where the generated files go
        #[arg(short, long, default_value = "src/ui/icons")]
        output_dir: PathBuf,
        /// File stem of the generated files
        #[arg(short, long, default_value = "weather_icons")]
        name: String,
        /// Edge of the full-size weather icons
        #[arg(long, default_value_t = ICON_SIZE_LARGE)]
        large: u32,
        /// Edge of the small weather icons
        #[arg(long, default_value_t = ICON_SIZE_SMALL)]
        small: u32,
        /// Edge of the info and wind icons
        #[arg(long, default_value_t = ICON_SIZE_INFO)]
        info: u32,
    },
    /// Convert a single PNG into an LVGL .bin image
    Convert {
        /// Input PNG
        #[arg(short, long)]
        input: PathBuf,
        /// Output .bin file
        #[arg(short, long)]
        output: PathBuf,
        /// Target edge in pixels
        #[arg(short, long, default_value_t = ICON_SIZE_LARGE)]
        size: u32,
    },
    /// Show which icon the generated lookup functions pick
    Lookup {
        #[command(subcommand)]
        target: LookupTarget,
    },
}

#[derive(Subcommand)]
enum LookupTarget {
    /// WMO weather condition code
    Weather {
        #[arg(allow_negative_numbers = true)]
        code: i32,
        /// Night variant
        #[arg(long)]
        night: bool,
        /// Small variant
        #[arg(long)]
        small: bool,
    },
    /// Wind speed in mph, truncated to an int like the C argument
    Wind {
        #[arg(allow_negative_numbers = true)]
        mph: f32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.verbose {
        logger.filter_level(LevelFilter::Debug);
    }
    logger.init();

    match cli.command {
        Commands::Generate { icons_dir, output_dir, name, large, small, info } => {
            let options = GenerateOptions {
                icons_dir,
                output_dir,
                name,
                sizes: IconSizes { large, small, info },
            };
            println!("Converting weather icons from {:?}...", options.icons_dir);

            let started = Instant::now();
            let pb = ProgressBar::new(0);
            pb.set_style(ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} icons")?);

            let report = commands::generate(&options, &pb)
                .await
                .context("Icon conversion failed")?;
            pb.finish_and_clear();

            println!("Generated: {}", report.header_path.display());
            println!("Generated: {}", report.source_path.display());
            println!("  Bitmaps: {} ({} bytes of pixel data)", report.bitmaps, report.bitmap_bytes);
            if !report.skipped.is_empty() {
                println!("  Skipped: {} icon(s) with no source file", report.skipped.len());
            }
            println!("  SHA-256: {}", report.digest);
            println!("Done in {}", humantime::format_duration(truncate_to_millis(started.elapsed())));
        }

        Commands::Convert { input, output, size } => {
            println!("Converting {:?} to {size}×{size} RGB565...", input);

            let bitmap = commands::convert(&input, &output, size)
                .await
                .with_context(|| format!("Failed to convert {:?}", input))?;

            println!("Generated {:?}", output);
            println!("Dimensions: {}×{}", bitmap.width(), bitmap.height());
            println!("Stride: {} bytes", bitmap.stride());
            println!("Data size: {} bytes", bitmap.data().len());
            println!("CRC-16: 0x{:04X}", bitmap.crc());
        }

        Commands::Lookup { target } => match target {
            LookupTarget::Weather { code, night, small } => {
                println!("{}", select_weather_icon(code, !night, small));
            }
            LookupTarget::Wind { mph } => {
                let mph = as_c_int(mph);
                let level = Beaufort::from_mph(mph);
                println!("Beaufort {}: {}", level.level(), select_wind_icon(mph));
            }
        },
    }

    Ok(())
}

/// `get_wind_icon` takes an `int`, so C callers pass truncated speeds
fn as_c_int(mph: f32) -> f32 {
    mph.trunc()
}

fn truncate_to_millis(elapsed: Duration) -> Duration {
    Duration::from_millis(elapsed.as_millis() as u64)
}
