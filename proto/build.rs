//! Generates `api.AuthService` client and server stubs.
//!
//! Messages are defined by hand in `src/lib.rs`, so no `protoc` is required.

use tonic_build::manual::{Builder, Method, Service};

fn main() {
    let method = |name: &str, route: &str, output: &str| {
        Method::builder()
            .name(name)
            .route_name(route)
            .input_type("crate::Token")
            .output_type(output)
            .codec_path("tonic::codec::ProstCodec")
            .build()
    };

    let auth = Service::builder()
        .name("AuthService")
        .package("api")
        .method(method("validate", "Validate", "crate::ValidateResponse"))
        .method(method("get_user", "GetUser", "crate::GetUserResponse"))
        .build();

    Builder::new().compile(&[auth]);
}
