fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 使用內建 protoc，建置環境不需另外安裝
    std::env::set_var("PROTOC", protoc_bin_vendored::protoc_bin_path()?);
    tonic_build::compile_protos("proto/randagi_env.proto")?;
    Ok(())
}
