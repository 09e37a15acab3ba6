pub mod auth;
pub mod config;
pub mod http_app;
pub mod logging;
pub mod http {
    pub mod client;
    pub mod headers;
    pub mod json;
}
pub mod boot;
