//! Build script for noticeboard-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates device.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

fn main() {
    setup_linker();
    validate_config();
}

fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Check device.toml before it is embedded into the image
fn validate_config() {
    println!("cargo:rerun-if-changed=device.toml");

    let config_path = Path::new("device.toml");
    if !config_path.exists() {
        fail(
            "device.toml not found",
            &["The firmware embeds it as the fallback configuration".to_string()],
        );
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read device.toml", &[e.to_string()]),
    };

    let config: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => {
            let lines: Vec<String> = e.to_string().lines().map(str::to_string).collect();
            fail("Invalid TOML syntax in device.toml", &lines);
        }
    };

    let mut errors = Vec::new();
    validate_display(&config, &mut errors);
    validate_section(
        &config,
        "timing",
        &[
            ("scheduler_ms", 1, 10_000),
            ("reminder_check_ms", 1, 3_600_000),
            ("reminder_refresh_ms", 1, 3_600_000),
            ("scroll_period_ms", 1, 60_000),
            ("disc_period_ms", 1, 60_000),
            ("now_playing_timeout_ms", 1, 86_400_000),
        ],
        &mut errors,
    );
    validate_section(
        &config,
        "ticker",
        &[
            ("scroll_step_px", 1, 1_000),
            ("disc_frames", 1, 255),
            ("char_advance_px", 1, 1_000),
        ],
        &mut errors,
    );
    validate_section(
        &config,
        "limits",
        &[
            ("app_chars", 1, 16),
            ("sender_chars", 1, 32),
            ("notification_chars", 1, 64),
            ("reminder_chars", 1, 63),
            ("song_chars", 1, 48),
            ("artist_chars", 1, 32),
        ],
        &mut errors,
    );

    if !errors.is_empty() {
        fail("Invalid values in device.toml", &errors);
    }

    println!("cargo:warning=device.toml validated successfully");
}

fn validate_display(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(display) = config.get("display") else {
        return;
    };
    let Some(display) = display.as_table() else {
        errors.push("[display] must be a table".to_string());
        return;
    };

    if let Some(offset) = display.get("utc_offset_minutes") {
        match offset.as_integer() {
            Some(m) if (-720..=840).contains(&m) => {}
            _ => errors.push("[display] utc_offset_minutes must be -720..840".to_string()),
        }
    }
    check_choice(display, "clock_policy", &["cell_diff", "whole_string"], errors);
    check_choice(display, "layout", &["single", "slotted"], errors);
}

fn check_choice(
    table: &toml::value::Table,
    key: &str,
    allowed: &[&str],
    errors: &mut Vec<String>,
) {
    if let Some(value) = table.get(key) {
        if !value.as_str().is_some_and(|v| allowed.contains(&v)) {
            errors.push(format!(
                "[display] {} must be one of: {}",
                key,
                allowed.join(", ")
            ));
        }
    }
}

/// Optional section of bounded integers; missing keys keep their defaults
fn validate_section(
    config: &toml::Value,
    name: &str,
    keys: &[(&str, i64, i64)],
    errors: &mut Vec<String>,
) {
    let Some(section) = config.get(name) else {
        return;
    };
    let Some(section) = section.as_table() else {
        errors.push(format!("[{}] must be a table", name));
        return;
    };

    for key in section.keys() {
        if !keys.iter().any(|(k, _, _)| k == key) {
            errors.push(format!("[{}] unknown key '{}'", name, key));
        }
    }

    for (key, min, max) in keys {
        let Some(value) = section.get(*key) else {
            continue;
        };
        match value.as_integer() {
            Some(v) if (*min..=*max).contains(&v) => {}
            _ => errors.push(format!("[{}] {} must be {}..{}", name, key, min, max)),
        }
    }
}

fn fail(title: &str, lines: &[String]) -> ! {
    let body = lines
        .iter()
        .map(|line| {
            let line = if line.chars().count() > 62 {
                format!("{}...", line.chars().take(59).collect::<String>())
            } else {
                line.clone()
            };
            format!("║  • {:<62} ║", line)
        })
        .collect::<Vec<_>>()
        .join("\n");
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title, body
    );
}
