pub mod api_client;
pub mod mail_service;

pub use api_client::ApiClient;
pub use mail_service::MailService;
