use std::{
    env,
    ffi::OsString,
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
};

use clap::{Args, Parser, Subcommand};
use gh_releasegen::{fmt::OutputFormat, git, Config, ReleaseGen, Result, SystemRunner};
use log::LevelFilter;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

/// Easily create release notes for GitHub releases.
#[derive(Debug, Parser)]
#[command(name = "gh-releasegen", version, about, long_about = None)]
struct Cli {
    /// Log what is being run to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create text for a GitHub release between a previous tag and now
    CreateText(CreateTextArgs),

    /// Commands for managing the configuration file
    #[command(subcommand)]
    Config(ConfigCommands),

    /// List the most recent tags, newest first
    Tags(TagsArgs),
}

#[derive(Debug, Subcommand)]
enum ConfigCommands {
    /// Initialize the configuration file at the repository root
    Init(ConfigInitArgs),
}

#[derive(Debug, Args)]
struct CreateTextArgs {
    /// The base ref to compare against
    #[arg(long, visible_alias = "base-tag", value_name = "REF")]
    base_ref: String,

    /// The ref being released
    #[arg(long, visible_alias = "new-tag", value_name = "REF")]
    target_ref: String,

    /// The owner of the repository
    #[arg(long)]
    repo_owner: Option<String>,

    /// The repository name
    #[arg(long)]
    repo_name: Option<String>,

    /// The local path to the repository
    #[arg(long, value_name = "PATH")]
    local_repo_path: Option<PathBuf>,

    /// Exclude the overview section from the text
    #[arg(long)]
    exclude_overview_section: bool,

    /// How many merged pull requests to fetch from GitHub
    #[arg(long, default_value_t = 1000)]
    limit: u32,

    /// markdown or json
    #[arg(long, value_name = "FORMAT", default_value_t = OutputFormat::Markdown)]
    output_format: OutputFormat,
}

#[derive(Debug, Args)]
struct ConfigInitArgs {
    /// The local path to the repository
    #[arg(long, value_name = "PATH")]
    local_repo_path: Option<PathBuf>,

    /// Overwrite an existing configuration file
    #[arg(long)]
    force: bool,
}

#[derive(Debug, Args)]
struct TagsArgs {
    /// The local path to the repository
    #[arg(long, value_name = "PATH")]
    local_repo_path: Option<PathBuf>,

    /// How many tags to list
    #[arg(long, default_value_t = 4)]
    count: usize,
}

impl Cli {
    fn run(self) -> Result<()> {
        match self.command {
            Commands::CreateText(args) => create_text(args),
            Commands::Config(ConfigCommands::Init(args)) => config_init(args),
            Commands::Tags(args) => tags(args),
        }
    }
}

impl CreateTextArgs {
    fn release_gen(self) -> ReleaseGen {
        let mut release = ReleaseGen::new(self.base_ref, self.target_ref)
            .exclude_overview(self.exclude_overview_section)
            .pr_limit(self.limit)
            .output_format(self.output_format);
        release.repo_owner = self.repo_owner;
        release.repo_name = self.repo_name;
        release.repo_path = self.local_repo_path;
        release
    }
}

fn create_text(args: CreateTextArgs) -> Result<()> {
    // rendered in full first, so a failure never leaves half a document on stdout
    let text = args.release_gen().render(&SystemRunner)?;
    let out = io::stdout();
    let mut out = out.lock();
    out.write_all(text.as_bytes())?;
    out.flush().map_err(Into::into)
}

fn config_init(args: ConfigInitArgs) -> Result<()> {
    let root = git::discover_root(&SystemRunner, args.local_repo_path.as_deref())?;
    let path = Config::init(root, args.force)?;
    println!(
        "The configuration file has been initialized at '{}'.",
        path.display()
    );
    Ok(())
}

fn tags(args: TagsArgs) -> Result<()> {
    let root = git::discover_root(&SystemRunner, args.local_repo_path.as_deref())?;
    for tag in git::Git::new(&SystemRunner, root).tags()?.iter().take(args.count) {
        println!("{tag}");
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    let config = ConfigBuilder::new().set_time_level(LevelFilter::Off).build();
    TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto).ok();
}

/// Usage errors exit with the same status as any other failure.
fn parse_cli<I, T>(args: I) -> std::result::Result<Cli, ExitCode>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => Ok(cli),
        // --help and --version
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            Err(ExitCode::FAILURE)
        }
    }
}

fn main() -> ExitCode {
    let cli = match parse_cli(env::args_os()) {
        Ok(cli) => cli,
        Err(code) => return code,
    };
    init_logging(cli.verbose);

    match cli.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_is_consistent() { Cli::command().debug_assert(); }

    #[test]
    fn create_text_defaults() {
        let cli = Cli::try_parse_from([
            "gh-releasegen",
            "create-text",
            "--base-ref",
            "v1.0.0",
            "--target-ref",
            "HEAD",
        ])
        .unwrap();
        let Commands::CreateText(args) = cli.command else {
            panic!("expected create-text");
        };
        let release = args.release_gen();
        assert_eq!(release.base_ref, "v1.0.0");
        assert_eq!(release.target_ref, "HEAD");
        assert_eq!(release.pr_limit, Some(1000));
        assert_eq!(release.out_format, OutputFormat::Markdown);
        assert!(!release.exclude_overview);
        assert!(release.repo_path.is_none());
    }

    #[test]
    fn create_text_tag_aliases_and_options() {
        let cli = Cli::try_parse_from([
            "gh-releasegen",
            "-v",
            "create-text",
            "--base-tag",
            "v1.0.0",
            "--new-tag",
            "v1.1.0",
            "--repo-owner",
            "octo",
            "--repo-name",
            "hello",
            "--exclude-overview-section",
            "--output-format",
            "json",
        ])
        .unwrap();
        assert!(cli.verbose);
        let Commands::CreateText(args) = cli.command else {
            panic!("expected create-text");
        };
        let release = args.release_gen();
        assert_eq!(release.target_ref, "v1.1.0");
        assert_eq!(release.repo_owner.as_deref(), Some("octo"));
        assert_eq!(release.repo_name.as_deref(), Some("hello"));
        assert!(release.exclude_overview);
        assert_eq!(release.out_format, OutputFormat::Json);
    }

    #[test]
    fn create_text_requires_both_refs() {
        assert!(Cli::try_parse_from(["gh-releasegen", "create-text", "--base-ref", "v1"]).is_err());
    }

    #[test]
    fn usage_error_is_a_failure() {
        assert!(parse_cli(["gh-releasegen", "create-text", "--bogus"]).is_err());
        assert!(parse_cli(["gh-releasegen", "tags", "--count", "2"]).is_ok());
    }

    #[test]
    fn config_init_force() {
        let cli = Cli::try_parse_from(["gh-releasegen", "config", "init", "--force"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config(ConfigCommands::Init(ConfigInitArgs { force: true, .. }))
        ));
    }
}
