fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=proto/iam/runtime/v1/authentication.proto");
    println!("cargo:rerun-if-changed=proto/iam/runtime/v1/authorization.proto");
    println!("cargo:rerun-if-changed=proto");

    tonic_prost_build::configure()
        .build_client(true)
        .build_server(true)
        .compile_protos(
            &[
                "proto/iam/runtime/v1/authentication.proto",
                "proto/iam/runtime/v1/authorization.proto",
            ],
            &["proto"],
        )?;

    Ok(())
}
