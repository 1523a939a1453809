use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(author, version, about)]
pub struct Cli {
    /// Path to the book configuration file
    #[clap(default_value = "book.yaml")]
    pub config: PathBuf,
}
