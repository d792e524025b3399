use std::path::{Path, PathBuf};

use indicatif::ProgressBar;
use log::{debug, info, warn};
use sha2::{Digest, Sha256};
use tokio::fs;

use crate::catalog::{self, IconEntry, IconSizes};
use crate::codegen::{self, GeneratedIcon};
use crate::encoder::{self, Bitmap};
use crate::error::{ConvertError, EncodeError};

#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub icons_dir: PathBuf,
    pub output_dir: PathBuf,
    /// File stem of the generated `.h`/`.cpp` pair
    pub name: String,
    pub sizes: IconSizes,
}

#[derive(Debug)]
pub struct GenerateReport {
    pub header_path: PathBuf,
    pub source_path: PathBuf,
    pub bitmaps: usize,
    pub bitmap_bytes: usize,
    /// Entries whose source file was missing
    pub skipped: Vec<ConvertError>,
    /// SHA-256 over header then source, hex encoded
    pub digest: String,
}

/// Convert every catalog entry and write the header/source pair.
///
/// Missing sources are skipped with a warning. Any other failure aborts
/// before an output file is touched.
pub async fn generate(
    options: &GenerateOptions,
    progress: &ProgressBar,
) -> Result<GenerateReport, ConvertError> {
    options.sizes.validate()?;

    let entries = catalog::entries(&options.sizes);
    progress.set_length(entries.len() as u64);

    let mut skipped = Vec::new();
    let mut sources = Vec::new();

    for entry in entries {
        let Some(path) = catalog::resolve_source(&options.icons_dir, &entry.file_name).await? else {
            let error = ConvertError::MissingAsset {
                name: entry.name,
                file_name: entry.file_name,
            };
            progress.suspend(|| warn!("{error}"));
            skipped.push(error);
            progress.inc(1);
            continue;
        };

        debug!("{} <- {}", entry.name, path.display());
        let bytes = fs::read(&path).await.map_err(ConvertError::io(&path))?;
        sources.push((entry, path, bytes));
    }

    let tasks: Vec<_> = sources
        .into_iter()
        .map(|(entry, path, bytes)| {
            progress.suspend(|| info!("Converting: {}", entry.file_name));
            tokio::task::spawn_blocking(move || encode_entry(&entry, &path, &bytes))
        })
        .collect();

    // Joined in catalog order so the output does not depend on scheduling.
    // Every task is awaited; the first failure in catalog order is reported.
    let mut icons = Vec::new();
    let mut failure = None;
    for task in tasks {
        match task.await {
            Ok(Ok(converted)) => icons.extend(converted),
            Ok(Err(error)) => {
                failure.get_or_insert(error);
            }
            Err(error) => {
                failure.get_or_insert(ConvertError::from(error));
            }
        }
        progress.inc(1);
    }
    if let Some(error) = failure {
        return Err(error);
    }

    let header = codegen::render_header(&options.name, &icons)?;
    let source = codegen::render_source(&options.name, &icons)?;
    let digest = hex::encode(Sha256::new().chain_update(&header).chain_update(&source).finalize());

    fs::create_dir_all(&options.output_dir)
        .await
        .map_err(ConvertError::io(&options.output_dir))?;

    let header_path = options.output_dir.join(format!("{}.h", options.name));
    let source_path = options.output_dir.join(format!("{}.cpp", options.name));
    fs::write(&header_path, &header)
        .await
        .map_err(ConvertError::io(&header_path))?;
    fs::write(&source_path, &source)
        .await
        .map_err(ConvertError::io(&source_path))?;

    Ok(GenerateReport {
        header_path,
        source_path,
        bitmaps: icons.len(),
        bitmap_bytes: icons.iter().map(|icon| icon.bitmap.data().len()).sum(),
        skipped,
        digest,
    })
}

fn encode_entry(
    entry: &IconEntry,
    path: &Path,
    bytes: &[u8],
) -> Result<Vec<GeneratedIcon>, ConvertError> {
    let image = encoder::decode(bytes).map_err(|error| entry_error(entry, path, 0, error))?;

    entry
        .outputs
        .iter()
        .map(|&(id, size)| {
            let bitmap = encoder::encode(&image, size)
                .map_err(|error| entry_error(entry, path, size, error))?;
            debug!("{id}: {size}x{size}, crc16 0x{:04x}", bitmap.crc());
            Ok(GeneratedIcon { id, bitmap })
        })
        .collect()
}

fn entry_error(entry: &IconEntry, path: &Path, size: u32, error: EncodeError) -> ConvertError {
    match error {
        EncodeError::Decode(source) => ConvertError::Decode {
            path: path.to_path_buf(),
            source,
        },
        EncodeError::InvalidSize(_) => ConvertError::InvalidSize {
            name: entry.name.clone(),
            size,
        },
    }
}

/// Encode one PNG into an LVGL `.bin` image file
pub async fn convert(input: &Path, output: &Path, size: u32) -> Result<Bitmap, ConvertError> {
    let bytes = fs::read(input).await.map_err(ConvertError::io(input))?;

    let path = input.to_path_buf();
    let bitmap = tokio::task::spawn_blocking(move || {
        encoder::encode_bytes(&bytes, size).map_err(|error| match error {
            EncodeError::Decode(source) => ConvertError::Decode { path, source },
            EncodeError::InvalidSize(size) => ConvertError::InvalidSize {
                name: path.display().to_string(),
                size,
            },
        })
    })
    .await??;

    fs::write(output, codegen::render_bin(&bitmap))
        .await
        .map_err(ConvertError::io(output))?;

    Ok(bitmap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use weather_icon_format::{ImageHeader, HEADER_SIZE};

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("weather-icons-{tag}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_png(dir: &Path, resolution: u32, file_name: &str) {
        let folder = dir.join(resolution.to_string());
        std::fs::create_dir_all(&folder).unwrap();
        RgbaImage::from_fn(resolution, resolution, |x, _| {
            Rgba([(x * 3) as u8, 120, 200, if x % 2 == 0 { 255 } else { 90 }])
        })
        .save(folder.join(file_name))
        .unwrap();
    }

    fn options(root: &Path) -> GenerateOptions {
        GenerateOptions {
            icons_dir: root.join("png"),
            output_dir: root.join("out"),
            name: "weather_icons".to_string(),
            sizes: IconSizes::default(),
        }
    }

    #[tokio::test]
    async fn test_generate_skips_missing_icons() {
        let root = scratch_dir("generate");
        write_png(&root.join("png"), 64, "clear-day.png");
        write_png(&root.join("png"), 128, "wind-beaufort-4.png");

        let report = generate(&options(&root), &ProgressBar::hidden()).await.unwrap();

        assert_eq!(report.bitmaps, 3);
        assert_eq!(report.bitmap_bytes, 56 * 112 + 28 * 56 + 32 * 64);
        assert_eq!(report.skipped.len(), 22);
        assert!(report
            .skipped
            .iter()
            .all(|error| matches!(error, ConvertError::MissingAsset { .. })));

        let header = std::fs::read_to_string(&report.header_path).unwrap();
        assert!(header.contains("extern const lv_image_dsc_t weather_icon_clear_day;"));
        assert!(header.contains("extern const lv_image_dsc_t weather_icon_clear_day_small;"));
        assert!(header.contains("extern const lv_image_dsc_t icon_wind_4;"));
        assert!(!header.contains("weather_icon_fog"));

        let source = std::fs::read_to_string(&report.source_path).unwrap();
        assert!(source.starts_with("#include \"weather_icons.h\"\n"));
        assert!(source.contains("        .w = 56,"));
        assert!(source.contains("        &icon_wind_4,\n"));

        std::fs::remove_dir_all(&root).unwrap();
    }

    #[tokio::test]
    async fn test_generate_is_reproducible() {
        let root = scratch_dir("reproducible");
        write_png(&root.join("png"), 64, "rain.png");
        write_png(&root.join("png"), 256, "sunset.png");

        let first = generate(&options(&root), &ProgressBar::hidden()).await.unwrap();
        let first_source = std::fs::read(&first.source_path).unwrap();
        let second = generate(&options(&root), &ProgressBar::hidden()).await.unwrap();
        let second_source = std::fs::read(&second.source_path).unwrap();

        assert_eq!(first.digest, second.digest);
        assert_eq!(first_source, second_source);
        assert_eq!(first.digest.len(), 64);

        std::fs::remove_dir_all(&root).unwrap();
    }

    #[tokio::test]
    async fn test_corrupt_icon_aborts_without_output() {
        let root = scratch_dir("corrupt");
        write_png(&root.join("png"), 64, "clear-day.png");
        std::fs::create_dir_all(root.join("png").join("64")).unwrap();
        std::fs::write(root.join("png").join("64").join("fog.png"), b"not a png").unwrap();

        let result = generate(&options(&root), &ProgressBar::hidden()).await;

        match result {
            Err(ConvertError::Decode { path, .. }) => assert!(path.ends_with("64/fog.png")),
            other => panic!("expected decode error, got {other:?}"),
        }
        assert!(!root.join("out").join("weather_icons.h").exists());

        std::fs::remove_dir_all(&root).unwrap();
    }

    #[tokio::test]
    async fn test_zero_size_is_fatal() {
        let root = scratch_dir("zero-size");
        write_png(&root.join("png"), 64, "sunset.png");
        let mut options = options(&root);
        options.sizes.info = 0;

        let result = generate(&options, &ProgressBar::hidden()).await;
        assert!(matches!(
            result,
            Err(ConvertError::InvalidSize { ref name, size: 0 }) if name == "info"
        ));

        std::fs::remove_dir_all(&root).unwrap();
    }

    #[tokio::test]
    async fn test_bad_size_is_fatal_without_matching_assets() {
        let root = scratch_dir("unused-size");
        // only a weather icon exists, nothing uses the info size
        write_png(&root.join("png"), 64, "fog.png");
        let mut options = options(&root);
        options.sizes.info = 0;

        let result = generate(&options, &ProgressBar::hidden()).await;
        assert!(matches!(result, Err(ConvertError::InvalidSize { size: 0, .. })));
        assert!(!root.join("out").exists());

        std::fs::remove_dir_all(&root).unwrap();
    }

    #[tokio::test]
    async fn test_first_failure_in_catalog_order_is_reported() {
        let root = scratch_dir("two-corrupt");
        let folder = root.join("png").join("64");
        std::fs::create_dir_all(&folder).unwrap();
        std::fs::write(folder.join("clear-day.png"), b"broken").unwrap();
        write_png(&root.join("png"), 64, "cloudy.png");
        std::fs::write(folder.join("snow.png"), b"also broken").unwrap();

        let progress = ProgressBar::hidden();
        let result = generate(&options(&root), &progress).await;

        match result {
            Err(ConvertError::Decode { path, .. }) => assert!(path.ends_with("64/clear-day.png")),
            other => panic!("expected decode error, got {other:?}"),
        }
        // every entry was accounted for, none left running
        assert_eq!(progress.position(), 24);
        assert!(!root.join("out").exists());

        std::fs::remove_dir_all(&root).unwrap();
    }

    #[tokio::test]
    async fn test_convert_writes_bin_file() {
        let root = scratch_dir("convert");
        write_png(&root, 64, "icon.png");
        let output = root.join("icon.bin");

        let bitmap = convert(&root.join("64").join("icon.png"), &output, 40).await.unwrap();

        let written = std::fs::read(&output).unwrap();
        assert_eq!(written.len(), HEADER_SIZE + 40 * 80);
        assert_eq!(ImageHeader::from_bytes(&written).unwrap(), *bitmap.header());
        assert_eq!(&written[HEADER_SIZE..], bitmap.data());

        std::fs::remove_dir_all(&root).unwrap();
    }
}
