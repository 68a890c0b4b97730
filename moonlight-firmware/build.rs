//! Build script for moonlight-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates wall.toml at compile time
//! - Generates the LED tables and wall constants into `OUT_DIR/wall_layout.rs`

use std::env;
use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::Write;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use moonlight_core::layout::{check_tables, LayoutError, TableError, WallLayout, Wiring};

fn main() {
    setup_linker();

    let config = read_config();
    validate_required_sections(&config);

    let wall = validate_wall(&config);
    emit_color_order(&wall);
    write_layout(&wall);

    println!("cargo:warning=wall.toml validated successfully");
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validated contents of wall.toml
struct Wall {
    device_name: String,
    baudrate: u32,
    rgb_order: bool,
    brightness: u8,
    auxiliary_brightness: u8,
    pixel_count: u32,
    primary: Vec<u16>,
    auxiliary_offset: Vec<i16>,
}

/// Read and parse wall.toml
fn read_config() -> toml::Table {
    // Re-run if wall.toml changes
    println!("cargo:rerun-if-changed=wall.toml");

    let config_path = Path::new("wall.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: wall.toml not found!                                     ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a wall.toml describing the LED layout.    ║\n\
            ║  Please create one in the moonlight-firmware directory.          ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read wall.toml                                 ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    match content.parse::<toml::Table>() {
        Ok(table) => table,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in wall.toml                         ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&e.to_string())
            );
        }
    }
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Panic with every collected error in one box
fn fail(title: &str, errors: &[String]) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

/// Validate that required sections exist
fn validate_required_sections(config: &toml::Table) {
    let errors: Vec<String> = ["link", "strip", "layout"]
        .iter()
        .filter(|name| !matches!(config.get(**name), Some(toml::Value::Table(_))))
        .map(|name| format!("Missing [{}] section", name))
        .collect();

    if !errors.is_empty() {
        fail("Missing required sections in wall.toml", &errors);
    }
}

fn section<'a>(config: &'a toml::Table, name: &str) -> &'a toml::Table {
    match config.get(name) {
        Some(toml::Value::Table(t)) => t,
        _ => unreachable!("sections are checked first"),
    }
}

/// Read an integer and check its range
fn integer(
    table: &toml::Table,
    section: &str,
    key: &str,
    range: RangeInclusive<i64>,
    errors: &mut Vec<String>,
) -> Option<i64> {
    match table.get(key) {
        Some(toml::Value::Integer(value)) if range.contains(value) => Some(*value),
        Some(toml::Value::Integer(_)) => {
            errors.push(format!(
                "[{}] {} must be {}-{}",
                section,
                key,
                range.start(),
                range.end()
            ));
            None
        }
        Some(_) => {
            errors.push(format!("[{}] {} must be an integer", section, key));
            None
        }
        None => {
            errors.push(format!("[{}] missing '{}'", section, key));
            None
        }
    }
}

/// Read one of a fixed set of strings
fn choice<'a>(
    table: &'a toml::Table,
    section: &str,
    key: &str,
    allowed: &[&str],
    errors: &mut Vec<String>,
) -> Option<&'a str> {
    match table.get(key) {
        Some(toml::Value::String(value)) if allowed.contains(&value.as_str()) => Some(value.as_str()),
        Some(_) => {
            let options = allowed
                .iter()
                .map(|a| format!("'{}'", a))
                .collect::<Vec<_>>()
                .join(", ");
            errors.push(format!("[{}] {} must be one of {}", section, key, options));
            None
        }
        None => {
            errors.push(format!("[{}] missing '{}'", section, key));
            None
        }
    }
}

/// Read an array of integers, each in range
fn integer_array(
    table: &toml::Table,
    key: &str,
    range: RangeInclusive<i64>,
    errors: &mut Vec<String>,
) -> Option<Vec<i64>> {
    let values = match table.get(key) {
        Some(toml::Value::Array(values)) => values,
        Some(_) => {
            errors.push(format!("[layout] {} must be an array", key));
            return None;
        }
        None => {
            errors.push(format!("[layout] missing '{}' (required for explicit wiring)", key));
            return None;
        }
    };

    let mut out = Vec::with_capacity(values.len());
    let mut valid = true;
    for (i, value) in values.iter().enumerate() {
        match value {
            toml::Value::Integer(v) if range.contains(v) => out.push(*v),
            _ => {
                errors.push(format!(
                    "[layout] {}[{}] must be an integer {}-{}",
                    key,
                    i,
                    range.start(),
                    range.end()
                ));
                valid = false;
            }
        }
    }
    valid.then_some(out)
}

fn validate_wall(config: &toml::Table) -> Wall {
    let mut errors = Vec::new();

    // [link]
    let link = section(config, "link");
    let device_name = match link.get("device_name") {
        Some(toml::Value::String(name))
            if (1..=20).contains(&name.len())
                && name.bytes().all(|b| b.is_ascii_graphic() || b == b' ') =>
        {
            Some(name.clone())
        }
        Some(_) => {
            errors.push("[link] device_name must be 1-20 printable ASCII chars".to_string());
            None
        }
        None => {
            errors.push("[link] missing 'device_name'".to_string());
            None
        }
    };
    let baudrate = integer(link, "link", "baudrate", 1200..=921_600, &mut errors);

    // [strip]
    let strip = section(config, "strip");
    let color_order = choice(strip, "strip", "color_order", &["grb", "rgb"], &mut errors);
    let brightness = integer(strip, "strip", "brightness", 1..=255, &mut errors);
    let auxiliary_brightness = integer(strip, "strip", "auxiliary_brightness", 1..=255, &mut errors);

    // [layout]
    let layout = section(config, "layout");
    let tables = match choice(
        layout,
        "layout",
        "wiring",
        &["serpentine", "linear", "explicit"],
        &mut errors,
    ) {
        Some("explicit") => explicit_tables(layout, &mut errors),
        Some(name) => generated_tables(layout, name, &mut errors),
        None => None,
    };

    if !errors.is_empty() {
        fail("Invalid wall configuration", &errors);
    }

    // Every field is present once no errors were collected
    match (
        device_name,
        baudrate,
        color_order,
        brightness,
        auxiliary_brightness,
        tables,
    ) {
        (
            Some(device_name),
            Some(baudrate),
            Some(color_order),
            Some(brightness),
            Some(auxiliary_brightness),
            Some((pixel_count, primary, auxiliary_offset)),
        ) => Wall {
            device_name,
            baudrate: baudrate as u32,
            rgb_order: color_order == "rgb",
            brightness: brightness as u8,
            auxiliary_brightness: auxiliary_brightness as u8,
            pixel_count,
            primary,
            auxiliary_offset,
        },
        _ => unreachable!("validation reported no errors"),
    }
}

type Tables = (u32, Vec<u16>, Vec<i16>);

/// Compute tables for a regular grid
fn generated_tables(layout: &toml::Table, wiring: &str, errors: &mut Vec<String>) -> Option<Tables> {
    let columns = integer(layout, "layout", "columns", 1..=255, errors);
    let rows = integer(layout, "layout", "rows", 1..=255, errors);
    let leds_per_hold = integer(layout, "layout", "leds_per_hold", 1..=2, errors);

    let wall = WallLayout {
        columns: columns? as u16,
        rows: rows? as u16,
        leds_per_hold: leds_per_hold? as u8,
        wiring: Wiring::from_name(wiring)?,
    };

    if let Err(e) = wall.validate() {
        errors.push(match e {
            LayoutError::EmptyGrid => "[layout] columns and rows must be non-zero".to_string(),
            LayoutError::LedsPerHold(n) => format!("[layout] leds_per_hold must be 1 or 2, got {}", n),
            LayoutError::TooManyLeds(n) => format!("[layout] grid needs {} LEDs, max 65535", n),
        });
        return None;
    }

    let primary: Vec<u16> = wall.primary_indices().collect();
    let auxiliary_offset = vec![wall.auxiliary_offset(); primary.len()];
    Some((wall.pixel_count(), primary, auxiliary_offset))
}

/// Take tables as written and check them against the strip length
fn explicit_tables(layout: &toml::Table, errors: &mut Vec<String>) -> Option<Tables> {
    let pixel_count = integer(layout, "layout", "pixel_count", 1..=65_535, errors);
    let primary = integer_array(layout, "primary", 0..=65_535, errors);
    let auxiliary_offset = integer_array(layout, "auxiliary_offset", -32_768..=32_767, errors);

    let pixel_count = pixel_count? as u32;
    let primary: Vec<u16> = primary?.into_iter().map(|v| v as u16).collect();
    let auxiliary_offset: Vec<i16> = auxiliary_offset?.into_iter().map(|v| v as i16).collect();

    if primary.is_empty() {
        errors.push("[layout] primary must list at least one hold".to_string());
    }

    let before = errors.len();
    errors.extend(check_tables(&primary, &auxiliary_offset, pixel_count).map(|e| match e {
        TableError::LengthMismatch { primary, auxiliary } => format!(
            "[layout] primary has {} entries, auxiliary_offset {}",
            primary, auxiliary
        ),
        TableError::PrimaryOutOfRange { hold, index } => {
            format!("[layout] hold {}: LED {} is past pixel_count", hold, index)
        }
        TableError::AuxiliaryOutOfRange { hold, index } => {
            format!("[layout] hold {}: auxiliary LED {} is off the strip", hold, index)
        }
    }));

    (errors.len() == before && !primary.is_empty()).then_some((pixel_count, primary, auxiliary_offset))
}

/// Select the WS2812 color order type
fn emit_color_order(wall: &Wall) {
    println!("cargo:rustc-check-cfg=cfg(color_order_rgb)");
    if wall.rgb_order {
        println!("cargo:rustc-cfg=color_order_rgb");
    }
}

/// Write the generated constants to `OUT_DIR/wall_layout.rs`
fn write_layout(wall: &Wall) {
    let mut out = String::new();

    writeln!(out, "// Generated by build.rs from wall.toml").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "/// Advertised BLE device name").unwrap();
    writeln!(out, "pub const DEVICE_NAME: &str = {:?};", wall.device_name).unwrap();
    writeln!(out, "/// UART speed to the BLE module").unwrap();
    writeln!(out, "pub const LINK_BAUDRATE: u32 = {};", wall.baudrate).unwrap();
    writeln!(out, "/// Hold color brightness").unwrap();
    writeln!(out, "pub const HOLD_BRIGHTNESS: u8 = {};", wall.brightness).unwrap();
    writeln!(out, "/// Auxiliary indicator brightness").unwrap();
    writeln!(out, "pub const AUXILIARY_BRIGHTNESS: u8 = {};", wall.auxiliary_brightness).unwrap();
    writeln!(out, "/// LEDs on the strip").unwrap();
    writeln!(out, "pub const PIXEL_COUNT: usize = {};", wall.pixel_count).unwrap();
    writeln!(out, "/// Holds with a table entry").unwrap();
    writeln!(out, "pub const HOLD_COUNT: usize = {};", wall.primary.len()).unwrap();
    writeln!(out).unwrap();

    write_table(&mut out, "PRIMARY_LED_INDEX", "u16", &wall.primary);
    write_table(&mut out, "AUXILIARY_LED_OFFSET", "i16", &wall.auxiliary_offset);

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    fs::write(out_dir.join("wall_layout.rs"), out).unwrap();
}

fn write_table<T: std::fmt::Display>(out: &mut String, name: &str, ty: &str, values: &[T]) {
    writeln!(out, "pub static {}: [{}; HOLD_COUNT] = [", name, ty).unwrap();
    for row in values.chunks(16) {
        let line = row.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", ");
        writeln!(out, "    {},", line).unwrap();
    }
    writeln!(out, "];").unwrap();
}
