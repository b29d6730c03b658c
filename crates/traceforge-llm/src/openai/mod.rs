mod client;
mod completion;

pub use client::OpenAIClient;
pub use completion::{ChatCompletion, Choice, ResponseMessage, Usage};
