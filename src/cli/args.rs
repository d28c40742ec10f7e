use clap::builder::NonEmptyStringValueParser;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable debug output
    #[arg(short, long, default_value = "false", global = true)]
    pub debug: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Send a query to a model
    Chat {
        /// Your query to the LLM
        #[arg(value_parser = NonEmptyStringValueParser::new())]
        query: String,

        /// Model to use, e.g. anthropic/claude-3.5-sonnet
        #[arg(short, long)]
        model: Option<String>,

        /// System prompt, overrides the configured one
        #[arg(short, long)]
        system: Option<String>,

        /// Wait for the full response instead of streaming it
        #[arg(long)]
        no_stream: bool,
    },
    /// List available models
    Models {
        /// Only list models in this category, e.g. programming
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Show usage and limits of the current API key
    Key,
}
