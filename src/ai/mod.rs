pub mod prompt;
pub mod providers;
pub mod retry;

pub use prompt::ReviewType;
pub use providers::{create_provider, AIProvider};
pub use retry::{RetryPolicy, RetryingClient, Sleeper, TokioSleeper};
