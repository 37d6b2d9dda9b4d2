use std::env;

fn main() {
    let version = env::var("POSTURE_CHECK_VERSION")
        .unwrap_or_else(|_| env::var("CARGO_PKG_VERSION").unwrap());
    println!("cargo:rustc-env=POSTURE_CHECK_VERSION={version}");

    let api_base =
        env::var("POSTURE_API_BASE").unwrap_or_else(|_| "http://localhost:8000".to_string());
    println!("cargo:rustc-env=POSTURE_API_BASE={api_base}");
    println!("cargo:rerun-if-env-changed=POSTURE_CHECK_VERSION");
    println!("cargo:rerun-if-env-changed=POSTURE_API_BASE");
}
