use std::io::{Error, ErrorKind, Result};
use std::path::PathBuf;

fn main() -> Result<()> {
    let proto_root = PathBuf::from("../../api/proto");

    let protos = ["firmament/firmament.proto"];

    let proto_paths: Vec<PathBuf> = protos.iter().map(|p| proto_root.join(p)).collect();

    // Fall back to the bundled compiler when none is configured.
    if std::env::var_os("PROTOC").is_none() {
        let protoc = protoc_bin_vendored::protoc_bin_path()
            .map_err(|e| Error::new(ErrorKind::NotFound, e.to_string()))?;
        std::env::set_var("PROTOC", protoc);
    }

    std::fs::create_dir_all("src/gen")?;

    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .out_dir("src/gen")
        .file_descriptor_set_path("src/gen/firmament_descriptor.bin")
        .compile_protos(&proto_paths, &[&proto_root])?;

    for proto in &protos {
        println!(
            "cargo:rerun-if-changed={}",
            proto_root.join(proto).display()
        );
    }

    Ok(())
}
