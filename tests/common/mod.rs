#![allow(dead_code)]
use cloudcraft::{
    Cloudcraft,
    types::{CloudcraftConfig, CloudcraftEndpoint},
};
use wiremock::MockServer;

pub const API_KEY: &str = "test-api-key";

pub fn endpoint(server: &MockServer) -> CloudcraftEndpoint {
    server.uri().parse().expect("valid mock server endpoint")
}

pub fn config(server: &MockServer) -> CloudcraftConfig {
    CloudcraftConfig::new(API_KEY).with_endpoint(endpoint(server))
}

pub fn cloudcraft(server: &MockServer) -> Cloudcraft {
    Cloudcraft::new(config(server)).expect("valid Cloudcraft client")
}

pub fn account_path(id: &str) -> String {
    format!("/providers/azure/account/{id}")
}
