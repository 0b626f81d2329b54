fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=proto/optdispatch.proto");

    // Protobuf code is only needed by the gRPC transport.
    if std::env::var_os("CARGO_FEATURE_SERVER").is_some() {
        tonic_build::compile_protos("proto/optdispatch.proto")?;
    }

    Ok(())
}
