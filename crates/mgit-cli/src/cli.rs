use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "mgit",
    about = "A minimal content-addressed version control engine",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Initialize a new repository in the current directory
    Init(InitArgs),
    /// Stage file contents for the next commit
    Add(AddArgs),
    /// Remove paths from the staging index
    Remove(RemoveArgs),
    /// Record the staged snapshot as a new commit
    Commit(CommitArgs),
    /// Show commit history, newest first
    Log(LogArgs),
    /// Show changes between snapshots
    Diff(DiffArgs),
    /// List, create, or delete branches
    Branch(BranchArgs),
    /// Switch to a branch
    Checkout(CheckoutArgs),
    /// Move the current branch to a commit
    Reset(ResetArgs),
    /// Print a stored object by digest
    CatFile(CatFileArgs),
    /// List the staging index
    ShowIndex(ShowIndexArgs),
}

#[derive(Args)]
pub struct InitArgs {}

#[derive(Args)]
pub struct AddArgs {
    /// Repository-relative paths to stage
    #[arg(required = true)]
    pub paths: Vec<String>,
}

#[derive(Args)]
pub struct RemoveArgs {
    /// Staged paths to remove
    #[arg(required = true)]
    pub paths: Vec<String>,
    /// Also delete the backing blob objects
    #[arg(long)]
    pub delete_objects: bool,
}

#[derive(Args)]
pub struct CommitArgs {
    #[arg(short, long)]
    pub message: Option<String>,
    /// Override the configured author
    #[arg(long)]
    pub author: Option<String>,
}

#[derive(Args)]
pub struct LogArgs {
    #[arg(short = 'n', long, default_value = "20")]
    pub limit: usize,
    #[arg(long)]
    pub oneline: bool,
}

#[derive(Args)]
pub struct DiffArgs {
    /// Commit to compare against the staged snapshot; defaults to HEAD
    pub commit: Option<String>,
    /// Second commit; when given, compares the two commits directly
    pub second: Option<String>,
    /// Structural changes only, no content hunks
    #[arg(long)]
    pub stat: bool,
}

#[derive(Args)]
pub struct BranchArgs {
    pub name: Option<String>,
    #[arg(short = 'd', long)]
    pub delete: bool,
}

#[derive(Args)]
pub struct CheckoutArgs {
    pub branch: String,
    /// Create the branch at the current commit first
    #[arg(short = 'b', long)]
    pub create: bool,
}

#[derive(Args)]
pub struct ResetArgs {
    /// Commit digest (40 hex characters)
    pub commit: String,
}

#[derive(Args)]
pub struct CatFileArgs {
    /// Object digest (40 hex characters)
    pub digest: String,
    /// Print the object kind instead of the content
    #[arg(short = 't', long)]
    pub kind: bool,
    /// Print the content size instead of the content
    #[arg(short = 's', long)]
    pub size: bool,
}

#[derive(Args)]
pub struct ShowIndexArgs {}
