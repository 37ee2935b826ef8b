//! RPC contract between the issuing (auth) service and its consumers.
//!
//! Wire-compatible with the `api.AuthService` protobuf definition:
//!
//! ```protobuf
//! syntax = "proto3";
//! package api;
//!
//! message Token { string token = 1; }
//! message ValidateResponse { int32 user_id = 1; }
//! message GetUserResponse {
//!     string login = 1;
//!     string email = 2;
//!     string name = 3;
//! }
//!
//! service AuthService {
//!     rpc Validate(Token) returns (ValidateResponse);
//!     rpc GetUser(Token) returns (GetUserResponse);
//! }
//! ```

include!(concat!(env!("OUT_DIR"), "/api.AuthService.rs"));

/// Session token to be resolved.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Token {
    /// Opaque token string.
    #[prost(string, tag = "1")]
    pub token: String,
}

/// Response of the `Validate` RPC.
#[derive(Clone, Copy, PartialEq, prost::Message)]
pub struct ValidateResponse {
    /// ID of the user the token belongs to.
    #[prost(int32, tag = "1")]
    pub user_id: i32,
}

/// Response of the `GetUser` RPC.
#[derive(Clone, PartialEq, prost::Message)]
pub struct GetUserResponse {
    /// Login of the user the token belongs to.
    #[prost(string, tag = "1")]
    pub login: String,

    /// Email of the user the token belongs to.
    #[prost(string, tag = "2")]
    pub email: String,

    /// Display name of the user the token belongs to.
    #[prost(string, tag = "3")]
    pub name: String,
}
