use std::env;
use std::path::Path;

/// (environment variable, constant name, default address) of every memory-mapped peripheral
const REGISTER_MAP: [(&str, &str, usize); 3] = [
    ("LEDS_BASE", "LEDS_BASE", 0x4120_0000),
    ("BRAM_CTRL_BASE", "BRAM_CTRL_BASE", 0x4121_0000),
    ("BRAM_BASE", "BRAM_BASE", 0x4000_0000),
];

fn parse_address(text: &str) -> Option<usize> {
    let text = text.trim().replace('_', "");
    match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16).ok(),
        None => text.parse().ok(),
    }
}

fn main() {
    println!("cargo:rerun-if-env-changed=AD4134_MAIN");
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=cbindgen.toml");
    let out_dir = env::var("OUT_DIR").expect("No out dir");
    let ad4134_main = env::var("AD4134_MAIN").unwrap_or_else(|_| "ad4134_test".to_string());
    let dest_path = Path::new(&out_dir);

    // generate ad4134_main.name
    std::fs::write(dest_path.join("ad4134_main.name"), format!("mains::{ad4134_main}::main()")).unwrap();
    println!("cargo:rustc-env=AD4134_MAIN_NAME={ad4134_main}");

    // generate board_config.rs from the (optionally overridden) register map
    let mut board_config = String::new();
    for (variable, name, default) in REGISTER_MAP {
        println!("cargo:rerun-if-env-changed={variable}");
        let address = match env::var(variable) {
            Ok(text) => parse_address(&text).unwrap_or_else(|| panic!("{variable}={text} is not a valid address")),
            Err(_) => default,
        };
        assert!(address % 4 == 0, "{variable}={address:#x} must be 32-bit aligned");
        board_config += &format!("pub const {name}: usize = {address:#010x};\n");
    }
    std::fs::write(dest_path.join("board_config.rs"), board_config).unwrap();

    // C header for the Vitis project that links the staticlib
    let crate_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    match cbindgen::generate(&crate_dir) {
        Ok(bindings) => {
            bindings.write_to_file(dest_path.join("ad4134_bringup.h"));
        }
        Err(error) => println!("cargo:warning=cbindgen failed: {error}"),
    }
}
