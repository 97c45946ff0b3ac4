use anyhow::Result;
use clap::{Parser, Subcommand};
use is_terminal::IsTerminal;
use mgit::areas::remote::API_URL_ENV;
use mgit::areas::repository::Repository;
use mgit::artifacts::push::transport::HttpTransport;
use mgit::commands::porcelain::log::LogOptions;
use mgit::commands::porcelain::login::LoginPolling;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "MGIT_LOG";

#[derive(Parser)]
#[command(
    name = "mgit",
    version = "0.1.0",
    about = "A minimal version-control system",
    long_about = "A minimal version-control system with content-addressed storage, \
    branches, checkout and push to a hosted remote.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
"
)]
struct Cli {
    #[arg(
        long,
        global = true,
        env = API_URL_ENV,
        help = "Base URL of the remote service"
    )]
    api_url: Option<String>,
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
    #[command(name = "add", about = "Stage files or directories for the next commit")]
    Add {
        #[arg(index = 1, required = true, help = "Files or directories to stage")]
        paths: Vec<String>,
    },
    #[command(
        name = "commit",
        about = "Create a new commit with the specified message",
        long_about = "This command records the staged snapshot as a new commit on the current branch."
    )]
    Commit {
        #[arg(short, long, help = "The commit message")]
        message: String,
    },
    #[command(name = "log", about = "Show the commit history of HEAD")]
    Log {
        #[arg(long, help = "Show one commit per line")]
        oneline: bool,
    },
    #[command(name = "branch", about = "Create a branch at HEAD, or list branches")]
    Branch {
        #[arg(index = 1, help = "Name of the branch to create")]
        name: Option<String>,
    },
    #[command(
        name = "checkout",
        about = "Switch to a branch or detach HEAD at a commit",
        long_about = "This command replaces the tracked files of the working directory with \
        those of the target. It refuses to run over staged changes unless --force is given."
    )]
    Checkout {
        #[arg(index = 1, help = "Branch name or full commit hash")]
        target: String,
        #[arg(short, long, help = "Discard staged changes")]
        force: bool,
    },
    #[command(
        name = "hash-object",
        about = "Hash a file as a blob and optionally write it to the object store"
    )]
    HashObject {
        #[arg(short, long, required = false, help = "Write the object to the object store")]
        write: bool,
        #[arg(index = 1)]
        file: PathBuf,
    },
    #[command(name = "cat-file", about = "Print the raw content of an object")]
    CatFile {
        #[arg(index = 1, help = "The object hash")]
        sha: String,
    },
    #[command(name = "ls-tree", about = "List the files of a commit's tree")]
    LsTree {
        #[arg(index = 1, default_value = "HEAD", help = "Branch, commit hash or HEAD")]
        revision: String,
    },
    #[command(name = "login", about = "Authenticate with the remote service")]
    Login,
    #[command(name = "remote", about = "Manage the remote repository")]
    Remote {
        #[command(subcommand)]
        command: RemoteCommands,
    },
    #[command(
        name = "push",
        about = "Send a branch to the remote",
        long_about = "Push <local>[:<remote>]. Without an argument the current branch is pushed \
        to the remote branch of the same name."
    )]
    Push {
        #[arg(index = 1)]
        refspec: Option<String>,
    },
}

#[derive(Subcommand)]
enum RemoteCommands {
    #[command(name = "add", about = "Connect this repository to a remote repository")]
    Add {
        #[arg(index = 1)]
        repo: String,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn open_repository() -> Result<Repository> {
    let pwd = std::env::current_dir()?;
    Repository::open(&pwd, Box::new(std::io::stdout()))
}

fn http_transport(repository: &Repository, cli_api_url: Option<&str>) -> Result<HttpTransport> {
    let config = repository.remote().load_config()?;
    HttpTransport::new(&config.resolve_api_url(cli_api_url))
}

async fn run(cli: Cli) -> Result<()> {
    let api_url = cli.api_url.as_deref();

    match cli.command {
        Commands::Init { path } => {
            let path = match path {
                Some(path) => path,
                None => std::env::current_dir()?,
            };
            let mut repository = Repository::new(Path::new(&path), Box::new(std::io::stdout()))?;

            repository.init().await?
        }
        Commands::Add { paths } => open_repository()?.add(&paths).await?,
        Commands::Commit { message } => open_repository()?.commit(&message).await?,
        Commands::Log { oneline } => open_repository()?.log(&LogOptions { oneline })?,
        Commands::Branch { name } => open_repository()?.branch(name.as_deref())?,
        Commands::Checkout { target, force } => {
            open_repository()?.checkout(&target, force).await?
        }
        Commands::HashObject { write, file } => open_repository()?.hash_object(&file, write)?,
        Commands::CatFile { sha } => open_repository()?.cat_file(&sha)?,
        Commands::LsTree { revision } => open_repository()?.ls_tree(&revision)?,
        Commands::Login => {
            let mut repository = open_repository()?;
            let transport = http_transport(&repository, api_url)?;
            let resolved_url = transport.base_url().to_string();

            repository
                .login(&transport, &resolved_url, LoginPolling::default())
                .await?
        }
        Commands::Remote {
            command: RemoteCommands::Add { repo },
        } => {
            let mut repository = open_repository()?;
            let transport = http_transport(&repository, api_url)?;

            repository.remote_add(&transport, &repo).await?
        }
        Commands::Push { refspec } => {
            let mut repository = open_repository()?;
            let transport = http_transport(&repository, api_url)?;

            repository.push(&transport, refspec.as_deref()).await?
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    if !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}
