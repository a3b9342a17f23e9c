//! Prompt construction and response parsing.
//!
//! Each workflow has one [`schema::OutputSchema`]. The schema renders the output
//! format block that is embedded in the prompt and also drives the parser, so the
//! requested format and the parsed markers cannot drift apart.

pub mod examples;
pub mod parser;
pub mod render;
pub mod schema;
pub mod templates;
