pub mod burp_export;
pub mod dedup;
pub mod encoding;
pub mod errors;
pub mod execute;
pub mod extract;
pub mod http_file_parser;
pub mod http_request;
pub mod http_request_executor;

pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
}
