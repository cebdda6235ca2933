//! gRPC 協定定義（由 build.rs 從 proto/randagi_env.proto 生成）

pub mod proto {
    tonic::include_proto!("randagi_env");
}
