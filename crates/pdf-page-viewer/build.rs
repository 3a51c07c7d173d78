use std::fs;
use std::path::Path;

fn pdfium_library_name(target_os: &str) -> &'static str {
    match target_os {
        "windows" => "pdfium.dll",
        "macos" | "ios" => "libpdfium.dylib",
        _ => "libpdfium.so",
    }
}

fn main() {
    let workspace_root = env!("CARGO_MANIFEST_DIR")
        .split("crates")
        .next()
        .expect("Failed to determine workspace root");

    let target_os = std::env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    let library_name = pdfium_library_name(&target_os);

    let vendor_library = Path::new(workspace_root)
        .join("vendor")
        .join("pdfium")
        .join(library_name);

    let out_dir = std::env::var("OUT_DIR").expect("OUT_DIR not set");
    let target_dir = Path::new(&out_dir)
        .ancestors()
        .nth(3)
        .expect("Failed to determine target directory");

    if vendor_library.exists() {
        let dest = target_dir.join(library_name);
        fs::copy(&vendor_library, &dest).expect("Failed to copy pdfium library");
        println!(
            "cargo:warning=Copied {} from vendor to {}",
            library_name,
            dest.display()
        );
    }

    println!("cargo:rerun-if-changed={}", vendor_library.display());
}
