use std::fs;
use std::path::Path;

/// Endpoint settings read from `device_config.h`, with the fallback used
/// when the header or a define is absent.
const ENDPOINTS: [(&str, &str); 4] = [
    ("STORAGE_HOST", "s3.amazonaws.com"),
    ("STORAGE_BUCKET", "hal9kcam"),
    ("GATEWAY_HOST", "gateway.example.com"),
    ("STATUS_PREFIX", "/camera"),
];

fn define_value<'a>(contents: &'a str, name: &str) -> Option<&'a str> {
    let needle = format!("#define {}", name);
    contents.lines().find_map(|l| {
        let rest = l.trim_start().strip_prefix(needle.as_str())?;
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        rest.split('"').nth(1)
    })
}

fn main() -> anyhow::Result<()> {
    // Necessary for ESP-IDF
    embuild::espidf::sysenv::output();

    // Add crash log helper for better panic diagnostics
    println!("cargo:rustc-link-arg=-Wl,--undefined=esp_backtrace_print_app_description");

    let config_path = "device_config.h";
    println!("cargo:rerun-if-changed={}", config_path);
    let contents = if Path::new(config_path).exists() {
        fs::read_to_string(config_path)?
    } else {
        println!("cargo:warning=device_config.h not found! Copy device_config.h.example to device_config.h to set your endpoints.");
        String::new()
    };

    for (name, fallback) in ENDPOINTS {
        let value = define_value(&contents, name).unwrap_or(fallback);
        println!("cargo:rustc-env={}={}", name, value);
    }

    Ok(())
}
