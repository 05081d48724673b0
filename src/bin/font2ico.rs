use anyhow::{bail, Context, Result};
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use glyphico::{GlyphRenderer, IconEncoder, IconFile, RenderConfig, Rgba};
use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

//===========================================================================//

const DEFAULT_COLOR: &str = "333333";

//===========================================================================//

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let matches = App::new("font2ico")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Renders a font glyph into a multi-resolution ICO file")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(
            SubCommand::with_name("create")
                .about("Creates an ICO file from one glyph of a font")
                .arg(
                    Arg::with_name("font")
                        .required(true)
                        .help(
                            "TTF/OTF file, or a font name under \
                             %WINDIR%\\Fonts",
                        ),
                )
                .arg(
                    Arg::with_name("codepoint")
                        .required(true)
                        .help("Hexadecimal Unicode code point, e.g. 0061"),
                )
                .arg(
                    Arg::with_name("output")
                        .required(true)
                        .help("Output file name; .ico is appended if missing"),
                )
                .arg(
                    Arg::with_name("color")
                        .help("Glyph color as hex digits, e.g. f00 or dedede"),
                )
                .arg(
                    Arg::with_name("sizes")
                        .takes_value(true)
                        .value_name("SIZES")
                        .short("s")
                        .long("sizes")
                        .help("Comma-separated icon sizes, e.g. 16,32,48"),
                ),
        )
        .subcommand(
            SubCommand::with_name("list")
                .about("Lists icons in an ICO file")
                .arg(Arg::with_name("ico").required(true)),
        )
        .get_matches();
    match matches.subcommand() {
        ("create", Some(submatches)) => create(submatches),
        ("list", Some(submatches)) => list(submatches),
        _ => Ok(()),
    }
}

//===========================================================================//

fn create(args: &ArgMatches) -> Result<()> {
    let font = args.value_of("font").context("missing font argument")?;
    let codepoint =
        args.value_of("codepoint").context("missing codepoint argument")?;
    let output = args.value_of("output").context("missing output argument")?;
    let color = args.value_of("color").unwrap_or(DEFAULT_COLOR);

    let ch = parse_codepoint(codepoint)?;
    let foreground = color
        .parse::<Rgba>()
        .with_context(|| format!("invalid color {:?}", color))?;
    let mut config = RenderConfig::with_foreground(foreground);
    if let Some(sizes) = args.value_of("sizes") {
        config.sizes = parse_sizes(sizes)?;
    }

    let font_path = resolve_font(font)?;
    debug!(path = %font_path.display(), "loading font");
    let font_data = fs::read(&font_path)
        .with_context(|| format!("failed to read {}", font_path.display()))?;
    let renderer = GlyphRenderer::from_bytes(&font_data, config)?;
    let bitmaps = renderer.render_configured(ch)?;

    let out_path = output_path(output);
    write_icon(&out_path, |file| {
        IconEncoder::new().encode_to(&bitmaps, file)?;
        Ok(())
    })?;
    info!(
        path = %out_path.display(),
        images = bitmaps.len(),
        "Successfully created icon"
    );
    Ok(())
}

fn list(args: &ArgMatches) -> Result<()> {
    let path = args.value_of("ico").context("missing ico argument")?;
    let file = fs::File::open(path)
        .with_context(|| format!("failed to open {}", path))?;
    let icon = IconFile::read(file)
        .with_context(|| format!("failed to parse {}", path))?;
    for (index, entry) in icon.entries().iter().enumerate() {
        let kind = if entry.is_png() { "PNG" } else { "BMP" };
        println!(
            "{:5}: {}x{} {}, {} bytes @ {}",
            index,
            entry.width(),
            entry.height(),
            kind,
            entry.directory().payload_size,
            entry.directory().payload_offset
        );
    }
    Ok(())
}

//===========================================================================//

/// Parses a hexadecimal code point such as `0061`, `U+0061`, or `0x61`.
fn parse_codepoint(input: &str) -> Result<char> {
    let digits = input
        .strip_prefix("U+")
        .or_else(|| input.strip_prefix("u+"))
        .or_else(|| input.strip_prefix("0x"))
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input);
    let value = u32::from_str_radix(digits, 16)
        .with_context(|| format!("invalid code point {:?}", input))?;
    match char::from_u32(value) {
        Some(ch) => Ok(ch),
        None => bail!("U+{:04X} is not a Unicode scalar value", value),
    }
}

fn parse_sizes(input: &str) -> Result<Vec<u32>> {
    let mut sizes = Vec::new();
    for part in input.split(',') {
        let part = part.trim();
        let size = part
            .parse::<u32>()
            .with_context(|| format!("invalid icon size {:?}", part))?;
        if size == 0 {
            bail!("icon sizes must be nonzero");
        }
        sizes.push(size);
    }
    Ok(sizes)
}

/// Appends `.ico` unless the name already ends with it.
fn output_path(name: &str) -> PathBuf {
    let path = PathBuf::from(name);
    let has_ico = path
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("ico"));
    if has_ico {
        path
    } else {
        let mut name = OsString::from(name);
        name.push(".ico");
        PathBuf::from(name)
    }
}

/// Returns `name` if it exists, or else the font of that name in the Windows
/// fonts directory.
fn resolve_font(name: &str) -> Result<PathBuf> {
    let path = PathBuf::from(name);
    if path.exists() {
        return Ok(path);
    }
    if let Some(windir) = env::var_os("WINDIR") {
        let fallback = Path::new(&windir).join("Fonts").join(name);
        if fallback.exists() {
            return Ok(fallback);
        }
    }
    bail!("Font file not found: {}", name)
}

/// Writes to a temporary sibling of `path` and renames it into place, so a
/// failed write never leaves a truncated icon behind.
fn write_icon<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut fs::File) -> Result<()>,
{
    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);
    let mut file = fs::File::create(&tmp_path)
        .with_context(|| format!("failed to create {}", tmp_path.display()))?;
    let result = write(&mut file).and_then(|()| {
        file.sync_all()?;
        drop(file);
        fs::rename(&tmp_path, path).with_context(|| {
            format!("failed to move icon into place at {}", path.display())
        })
    });
    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}

//===========================================================================//


//===========================================================================//
