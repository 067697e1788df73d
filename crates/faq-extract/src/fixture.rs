/// The Ranna FAQ parsed by the default invocation.
pub const RANNA_FAQ: &str = include_str!("../fixtures/ranna_faq.md");
