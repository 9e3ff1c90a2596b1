use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "prizebot")]
#[command(author, version, about = "Telegram bot that broadcasts blurred prizes to be claimed by the fastest user", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the bot (default when no command is given)
    Run,

    /// Register every image in the images directory as a prize
    Seed {
        /// Directory whose images are copied into IMAGES_DIR before seeding
        #[arg(short, long)]
        dir: Option<String>,
    },

    /// Generate missing teasers for all known prizes
    Teasers,

    /// Print prize pool statistics
    Stats {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
