use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt};
use vault::areas::refs::Head;
use vault::artifacts::objects::object_id::ObjectId;
use vault::{Repository, RepositoryConfig, SwitchOutcome};

#[derive(Parser)]
#[command(
    name = "vault",
    version,
    about = "A content-addressed version control store",
    long_about = "Stores file contents, directory snapshots and commits as immutable, \
    deduplicated objects named by their hash, and restores any stored snapshot into \
    the working directory.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
"
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
        path: Option<PathBuf>,
    },
    #[command(
        name = "hash-object",
        about = "Hash a file as a blob and optionally write it to the object store"
    )]
    HashObject {
        #[arg(short, long, help = "Write the blob to the object store")]
        write: bool,
        #[arg(index = 1)]
        file: PathBuf,
    },
    #[command(name = "cat-file", about = "Print the content of an object")]
    CatFile {
        #[arg(short = 't', long = "type", help = "Print only the object kind")]
        kind: bool,
        #[arg(index = 1, help = "The object id")]
        object: String,
    },
    #[command(
        name = "write-tree",
        about = "Store a directory of the working tree as a tree object"
    )]
    WriteTree {
        #[arg(index = 1, help = "Directory relative to the repository root")]
        dir: Option<PathBuf>,
    },
    #[command(
        name = "commit",
        about = "Record the working tree on the current branch"
    )]
    Commit {
        #[arg(short, long, help = "The commit message")]
        message: String,
    },
    #[command(name = "log", about = "Show commit history")]
    Log {
        #[arg(index = 1, help = "Ref or commit id to start from (defaults to HEAD)")]
        start: Option<String>,
    },
    #[command(
        name = "checkout",
        about = "Restore a branch, tag or commit into the working tree"
    )]
    Checkout {
        #[arg(index = 1)]
        target: String,
    },
    #[command(name = "branch", about = "List branches, or create one")]
    Branch {
        #[arg(index = 1, help = "Name of the branch to create")]
        name: Option<String>,
        #[arg(index = 2, help = "Ref or commit id to start from (defaults to HEAD)")]
        start: Option<String>,
    },
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("warn"))?;
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = RepositoryConfig::from_env();
    let pwd = std::env::current_dir().context("Failed to read the current directory")?;

    match cli.command {
        Commands::Init { path } => {
            let path = path.unwrap_or(pwd);
            let repository = Repository::init(&path, config)
                .with_context(|| format!("Failed to initialize a repository at {}", path.display()))?;
            println!(
                "Initialized empty repository in {}",
                repository.metadata_path().display()
            );
        }
        Commands::HashObject { write, file } => {
            let repository = Repository::open(&pwd, config)?;
            println!("{}", repository.hash_object(&file, write)?);
        }
        Commands::CatFile { kind, object } => {
            let repository = Repository::open(&pwd, config)?;
            if kind {
                let object_id = ObjectId::try_parse(&object)?;
                println!("{}", repository.database().kind(&object_id)?);
            } else {
                print!("{}", repository.pretty_print(&object)?);
            }
        }
        Commands::WriteTree { dir } => {
            let repository = Repository::open(&pwd, config)?;
            println!("{}", repository.snapshot(dir.unwrap_or_default())?);
        }
        Commands::Commit { message } => {
            let repository = Repository::open(&pwd, config)?;
            let commit_oid = repository.commit(&message)?;
            let summary = message.lines().next().unwrap_or_default();
            println!("[{}] {summary}", commit_oid.to_short_oid());
        }
        Commands::Log { start } => {
            let repository = Repository::open(&pwd, config)?;
            let log = repository.log(start.as_deref())?;
            for entry in &log {
                let entry = entry?;
                println!("commit {}", entry.oid);
                println!();
                for line in entry.message().lines() {
                    println!("    {line}");
                }
                println!();
            }
        }
        Commands::Checkout { target } => {
            let repository = Repository::open(&pwd, config)?;
            match repository.checkout(&target)? {
                SwitchOutcome::Unchanged(_) => println!("Already on '{target}'"),
                SwitchOutcome::Switched {
                    head: Head::Symbolic(name),
                    ..
                } => println!("Switched to '{}'", name.short_name()),
                SwitchOutcome::Switched {
                    head: Head::Detached(_),
                    commit,
                } => println!("HEAD is now at {}", commit.to_short_oid()),
            }
        }
        Commands::Branch { name, start } => {
            let repository = Repository::open(&pwd, config)?;
            match name {
                Some(name) => {
                    let start_oid = repository.create_branch(&name, start.as_deref())?;
                    println!("Created branch '{name}' at {}", start_oid.to_short_oid());
                }
                None => {
                    let head = repository.head()?;
                    for branch in repository.branches()? {
                        let marker = match &head {
                            Head::Symbolic(current) if *current == branch => '*',
                            _ => ' ',
                        };
                        println!("{marker} {}", branch.as_ref().trim_start_matches("refs/heads/"));
                    }
                }
            }
        }
    }

    Ok(())
}
