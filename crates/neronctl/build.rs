// Build script for neronctl: bakes the version into the binary

fn main() {
    // NERON_VERSION lets packagers stamp a release; default is the crate version
    let version =
        std::env::var("NERON_VERSION").unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_string());

    println!("cargo:rustc-env=NERON_VERSION={}", version);
    println!("cargo:rerun-if-changed=Cargo.toml");
    println!("cargo:rerun-if-env-changed=NERON_VERSION");
}
