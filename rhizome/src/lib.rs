// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

// Re-export the testable helper functions for convenience
pub use handlers::{load_wordlist, parse_domain_line};
