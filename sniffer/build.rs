fn main() {
    use std::env;
    use std::path::Path;

    // Build scripts start in the directory of the package manifest.
    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(value) => value,
        Err(err) => {
            eprintln!("The CARGO_MANIFEST_DIR environment variable is not set: {err}");
            std::process::exit(1);
        },
    };

    let workspace_root = match Path::new(&manifest_dir).parent() {
        Some(value) => value,
        None => {
            eprintln!("Failed to get the workspace directory");
            std::process::exit(1);
        },
    };

    // Npcap SDK libraries (Packet.lib, wpcap.lib) may be dropped into ./lib on Windows.
    if env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("windows") {
        let lib_path = workspace_root.join("lib");
        println!("cargo:rustc-link-search=native={}", lib_path.display());
    }
    println!("cargo:rerun-if-changed=build.rs");
}
