fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=mirage.rc");

    let target_os = std::env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    if target_os != "windows" {
        return;
    }

    embed_resource::compile_for_everything("mirage.rc", embed_resource::NONE)
        .manifest_optional()
        .unwrap();
}
