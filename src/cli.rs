use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = env!("CARGO_PKG_NAME"))]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = env!("CARGO_PKG_DESCRIPTION"))]
pub struct Cli {
    /// Root of the entries API
    #[arg(
        long,
        global = true,
        env = "DAYSCORE_API_URL",
        default_value = "http://localhost:8080/api"
    )]
    pub api_url: String,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Run the entries API
    Serve,
    /// List entries
    List,
    /// Show one entry
    Show {
        /// Id of the entry
        id: i64,
    },
    /// Record the entry for a day
    Add {
        /// Score from 1 to 5
        #[arg(long, short = 's', allow_negative_numbers = true)]
        score: i32,

        /// Day as YYYY-MM-DD, today when omitted
        #[arg(long, short = 'd')]
        date: Option<String>,

        /// Free-text note
        #[arg(long, short = 'n')]
        note: Option<String>,
    },
    /// Change the score or note of an entry
    Edit {
        /// Id of the entry
        id: i64,

        /// New score from 1 to 5
        #[arg(long, short = 's', allow_negative_numbers = true)]
        score: Option<i32>,

        /// New note
        #[arg(long, short = 'n', conflicts_with = "clear_note")]
        note: Option<String>,

        /// Remove the note
        #[arg(long)]
        clear_note: bool,
    },
    /// Delete an entry
    Delete {
        /// Id of the entry
        id: i64,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}
