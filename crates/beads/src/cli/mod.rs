//! CLI argument parsing and command dispatch.
//!
//! Clap derive API, one argument struct per command. The global `--json`
//! flag switches every command to structured output for programmatic use.
//!
//! ```bash
//! beads create --title "Fix login" --priority 1 --type bug
//! beads duplicates            # preview duplicate groups and their targets
//! beads duplicates --merge    # fold every group into its target
//! beads merge beads-1 beads-2 beads-3
//! ```

mod args;
mod execute;
mod types;
mod validators;

use anyhow::Result;
use clap::{Parser, Subcommand};

pub use args::{
    BlockedArgs, CloseArgs, CreateArgs, DeleteArgs, DepAction, DepArgs, DuplicatesArgs, InfoArgs,
    InitArgs, ListArgs, MergeArgs, ReadyArgs, ShowArgs, UpdateArgs,
};
pub use types::{
    BatchError, BatchResult, DependencyTypeArg, IssueStatusArg, IssueTypeArg, SortOrderArg,
    SortPolicyArg,
};
pub use validators::{validate_issue_id, validate_prefix, validate_text, validate_title};

/// Beads - a dependency-aware issue tracker
///
/// Issues live in `.beads/issues.jsonl` next to your code, so the tracker
/// versions with the repository.
#[derive(Parser, Debug)]
#[command(name = "beads")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output in JSON format for programmatic use
    #[arg(long, global = true)]
    pub json: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Initialize a new beads repository
    Init(InitArgs),

    /// Show repository information
    Info(InfoArgs),

    /// Create a new issue
    Create(CreateArgs),

    /// List issues with optional filters
    List(ListArgs),

    /// Show detailed information about issues
    Show(ShowArgs),

    /// Update existing issues
    Update(UpdateArgs),

    /// Close issues, recording a reason
    Close(CloseArgs),

    /// Delete an issue permanently
    Delete(DeleteArgs),

    /// Show issues ready to work on
    Ready(ReadyArgs),

    /// Show blocked issues with their blockers
    Blocked(BlockedArgs),

    /// Manage dependencies between issues
    Dep(DepArgs),

    /// Find duplicate issues; optionally merge each group into its target
    Duplicates(DuplicatesArgs),

    /// Merge source issues into a target
    ///
    /// Closes each source and migrates its dependency edges onto the
    /// target. Safe to re-run with the same arguments after a failure.
    Merge(MergeArgs),
}

impl Cli {
    /// Parse CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse CLI arguments from an iterator (for testing).
    pub fn try_parse_from<I, T>(iter: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Execute the parsed command.
    pub async fn execute(&self) -> Result<()> {
        use crate::app::App;
        use crate::output::OutputMode;

        let mode = if self.json {
            OutputMode::Json
        } else {
            OutputMode::Text
        };

        match &self.command {
            Some(Commands::Init(args)) => execute::execute_init(args).await,
            Some(Commands::Info(args)) => {
                let app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_info(&app, args, mode).await
            }
            Some(Commands::Create(args)) => {
                let mut app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_create(&mut app, args, mode).await
            }
            Some(Commands::List(args)) => {
                let app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_list(&app, args, mode).await
            }
            Some(Commands::Show(args)) => {
                let app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_show(&app, args, mode).await
            }
            Some(Commands::Update(args)) => {
                let mut app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_update(&mut app, args, mode).await
            }
            Some(Commands::Close(args)) => {
                let mut app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_close(&mut app, args, mode).await
            }
            Some(Commands::Delete(args)) => {
                let mut app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_delete(&mut app, args, mode).await
            }
            Some(Commands::Ready(args)) => {
                let app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_ready(&app, args, mode).await
            }
            Some(Commands::Blocked(args)) => {
                let app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_blocked(&app, args, mode).await
            }
            Some(Commands::Dep(args)) => {
                let mut app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_dep(&mut app, args, mode).await
            }
            Some(Commands::Duplicates(args)) => {
                let mut app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_duplicates(&mut app, args, mode).await
            }
            Some(Commands::Merge(args)) => {
                let mut app = App::from_directory(&std::env::current_dir()?).await?;
                execute::execute_merge(&mut app, args, mode).await
            }
            None => {
                println!("Beads issue tracking system");
                println!("Use --help for more information");
                Ok(())
            }
        }
    }
}
