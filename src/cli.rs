//! Minimal CLI parsing.

use std::env;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct CliOptions {
    /// Print the GraphQL SDL and exit
    pub print_schema: bool,
}

impl CliOptions {
    pub fn from_args() -> Self {
        Self::parse(env::args().skip(1))
    }

    pub fn parse(args: impl IntoIterator<Item = String>) -> Self {
        let mut options = CliOptions::default();
        for arg in args {
            match arg.as_str() {
                "--print-schema" => options.print_schema = true,
                _ => tracing::warn!(argument = %arg, "Ignoring unknown argument"),
            }
        }
        options
    }
}
