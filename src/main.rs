use anyhow::Result;
use clap::{Parser, Subcommand};
use kit::areas::repository::Repository;

#[derive(Parser)]
#[command(
    name = "kit",
    version = "0.1.0",
    about = "A simple git-style version control system",
    long_about = "kit is a small version control system built around a \
    content-addressable object store, a staging index, and a commit graph. \
    It is a learning project, not a git replacement.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Initialize a new repository",
        long_about = "This command initializes a new repository in the current directory or at the specified path."
    )]
    Init {
        #[arg(index = 1, help = "The path to the repository")]
        path: Option<String>,
    },
    #[command(
        name = "cat-file",
        about = "Print the content of an object",
        long_about = "This command prints the content of an object in the repository, given its full SHA."
    )]
    CatFile {
        #[arg(short = 'p', long, help = "The object SHA to print")]
        sha: String,
    },
    #[command(
        name = "hash-object",
        about = "Hash a file and optionally write it to the object database",
        long_about = "This command hashes a file as a blob and can write it to the object database."
    )]
    HashObject {
        #[arg(short, long, required = false, help = "Write the object to the object database")]
        write: bool,
        #[arg(index = 1)]
        file: String,
    },
    #[command(
        name = "add",
        about = "Stage files for the next commit",
        long_about = "This command hashes the given files as blobs, stores them, and records them in the staging index."
    )]
    Add {
        #[arg(index = 1, required = true, help = "The paths to stage")]
        paths: Vec<String>,
    },
    #[command(
        name = "rm",
        about = "Remove files from the staging index",
        long_about = "This command removes the given paths from the staging index. Working tree files are left untouched."
    )]
    Rm {
        #[arg(index = 1, required = true, help = "The paths to unstage")]
        paths: Vec<String>,
    },
    #[command(
        name = "ls-files",
        about = "List staged files",
        long_about = "This command prints the paths currently recorded in the staging index, sorted."
    )]
    LsFiles,
    #[command(
        name = "commit",
        about = "Create a new commit with the specified message",
        long_about = "This command folds the staging index into a tree and records a commit chained to the current branch tip."
    )]
    Commit {
        #[arg(short, long, help = "The commit message")]
        message: String,
    },
    #[command(
        name = "log",
        about = "Show commit history",
        long_about = "This command walks the commit graph from the current branch tip and prints each commit, newest first."
    )]
    Log,
}

fn open_repository() -> Result<Repository> {
    let pwd = std::env::current_dir()?;
    Repository::new(&pwd.to_string_lossy(), Box::new(std::io::stdout()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Init { path } => {
            let repository = match path {
                Some(path) => Repository::new(path, Box::new(std::io::stdout()))?,
                None => open_repository()?,
            };

            repository.init()?
        }
        Commands::CatFile { sha } => open_repository()?.cat_file(sha)?,
        Commands::HashObject { write, file } => open_repository()?.hash_object(file, *write)?,
        Commands::Add { paths } => open_repository()?.add(paths)?,
        Commands::Rm { paths } => open_repository()?.rm(paths)?,
        Commands::LsFiles => open_repository()?.ls_files()?,
        Commands::Commit { message } => open_repository()?.commit(message.as_str())?,
        Commands::Log => open_repository()?.log()?,
    }

    Ok(())
}
