use std::env;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use clap::{CommandFactory, Parser, Subcommand};
use tracing::error;
use tracing_subscriber::EnvFilter;

use assumers::assumer::{ExtraArgs, Providers};
use assumers::context::ResolveContext;
use assumers::credentials::aws_sdk::AwsSdkCredentialsRetriever;
use assumers::federation::aws_sdk::AwsSdkFederationTokenIssuer;
use assumers::handler::console::ConsoleHandler;
use assumers::handler::export::ExportCredentialsHandler;
use assumers::handler::shell::ShellCredentialsHandler;
use assumers::handler::HandleCredentials;
use assumers::profile::load::aws_sdk::AwsSdkProfileLoader;
use assumers::profile::load::LoadProfiles;
use assumers::profile::select::skim::SkimProfileSelector;
use assumers::profile::select::{SelectProfile, StaticProfileSelector};
use assumers::profile::{ProfileDescriptor, ProfileSet};
use assumers::region::aws_sdk::AwsSdkRegionResolver;
use assumers::registry::Registry;
use assumers::run::{Assumers, Target};
use assumers_schema::shell::Shell;

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug)]
struct AssumeArgs {
    /// Profile to assume. Prompts with a fuzzy finder when omitted.
    profile: Option<String>,

    /// Token code provided by the MFA device.
    #[arg(short, long)]
    token: Option<String>,

    /// Give up after this many seconds.
    #[arg(long)]
    timeout: Option<u64>,

    /// Arguments passed through to the assumer.
    #[arg(last = true)]
    extra: Vec<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start a shell with credentials for a profile.
    Terminal {
        #[command(flatten)]
        assume: AssumeArgs,

        /// Print export statements for the current shell instead.
        #[arg(long)]
        export: bool,
    },
    /// Print a sign-in URL for the web console.
    Console {
        #[command(flatten)]
        assume: AssumeArgs,
    },
    /// Show which kind of assumer handles a profile.
    Kind { profile: String },
    /// Show available profiles.
    List,
    /// Generate shell completions.
    Completions { shell: clap_complete::Shell },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    match run(args).await {
        Ok(_) => Ok(()),
        Err(e) => {
            error!("error:{:?}", e);
            Err(e)
        }
    }
}

enum ProfileSelector {
    Skim(SkimProfileSelector),
    Static(StaticProfileSelector),
}

impl SelectProfile for ProfileSelector {
    fn select_profile<'a>(
        &self,
        profiles: &'a ProfileSet,
    ) -> anyhow::Result<Option<&'a ProfileDescriptor>> {
        use ProfileSelector::*;
        match self {
            Skim(s) => s.select_profile(profiles),
            Static(s) => s.select_profile(profiles),
        }
    }
}

fn selector_from(args: &AssumeArgs) -> ProfileSelector {
    if let Some(profile) = args.profile.as_ref() {
        ProfileSelector::Static(StaticProfileSelector::from(profile.to_string()))
    } else {
        ProfileSelector::Skim(SkimProfileSelector)
    }
}

fn assumers() -> anyhow::Result<Assumers<AwsSdkProfileLoader>> {
    let providers = Providers::new(
        Arc::new(AwsSdkCredentialsRetriever::default()),
        Arc::new(AwsSdkRegionResolver::default()),
        Arc::new(AwsSdkFederationTokenIssuer::default()),
    );
    Ok(Assumers::new(
        AwsSdkProfileLoader::default(),
        Registry::builtin()?,
        providers,
    ))
}

async fn assume<H: HandleCredentials>(
    assumers: &Assumers<AwsSdkProfileLoader>,
    args: AssumeArgs,
    target: Target,
    handler: H,
) -> anyhow::Result<()> {
    let profiles = assumers.loader().load_profiles().await?;
    let Some(profile) = selector_from(&args).select_profile(&profiles)? else {
        return Ok(());
    };

    let ctx = match args.timeout {
        Some(secs) => ResolveContext::new().with_timeout(Duration::from_secs(secs)),
        None => ResolveContext::new(),
    };
    let extra = ExtraArgs {
        mfa_token: args.token,
        args: args.extra,
    };

    let credentials = assumers.assume(&ctx, profile.name(), target, &extra).await?;
    handler.handle_credentials(credentials).await
}

async fn run(args: Args) -> anyhow::Result<()> {
    let assumers = assumers()?;
    match args.command {
        Command::Terminal { assume: a, export } => {
            if export {
                let shell = Shell::from_process_path(env::var("SHELL")?)
                    .ok_or_else(|| anyhow::anyhow!("SHELL is empty"))?;
                assume(&assumers, a, Target::Terminal, ExportCredentialsHandler::new(shell)).await
            } else {
                assume(&assumers, a, Target::Terminal, ShellCredentialsHandler).await
            }
        }
        Command::Console { assume: a } => {
            assume(&assumers, a, Target::Console, ConsoleHandler).await
        }
        Command::Kind { profile } => {
            println!("{}", assumers.detect_kind(&profile).await?);
            Ok(())
        }
        Command::List => {
            let profiles = assumers.loader().load_profiles().await?;
            for name in profiles.names() {
                println!("{}", name);
            }
            Ok(())
        }
        Command::Completions { shell } => {
            let mut command = Args::command();
            let name = command.get_name().to_string();
            clap_complete::generate(shell, &mut command, name, &mut io::stdout());
            Ok(())
        }
    }
}
