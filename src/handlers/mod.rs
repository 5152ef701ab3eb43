pub mod chat;
pub mod health;
pub mod prewarm;
pub mod recommendations;

pub use chat::chat_config;
pub use health::health_check;
pub use recommendations::recommendations_config;
