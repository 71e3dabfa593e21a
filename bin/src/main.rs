use std::{io, process::exit};

use clap::{error::ErrorKind, CommandFactory, Parser};
use dias_id_check::{
    run, Config, ConfigOverrides, Error, ProcessEnv, ProvisioningClient, SsmParameterStore,
};

/// Check client and organization IDs against existing ones before provisioning
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// New Client ID to check against existing clients
    #[arg(short, long)]
    client_id: Option<String>,

    /// New organization ID to check against existing organizations
    #[arg(short, long)]
    org_id: Option<String>,

    /// MuleSoft environment to run checks against [default: $Environment]
    #[arg(short, long)]
    environment: Option<String>,

    /// Host to use when making requests against DIAS Provisioning API
    #[arg(long)]
    provisioning_api_host: Option<String>,
}

impl From<Cli> for ConfigOverrides {
    fn from(cli: Cli) -> Self {
        ConfigOverrides {
            environment: cli.environment,
            client_id: cli.client_id,
            org_id: cli.org_id,
            provisioning_api_host: cli.provisioning_api_host,
        }
    }
}

fn main() {
    env_logger::init();

    if std::env::args_os().len() <= 1 {
        eprintln!("{}", Cli::command().render_help());
        exit(1);
    }
    let cli = Cli::parse();

    let config = match Config::resolve(cli.into(), &ProcessEnv) {
        Ok(config) => config,
        Err(e @ Error::MissingEnvironment) => Cli::command()
            .error(ErrorKind::MissingRequiredArgument, e)
            .exit(),
        Err(e) => fail(e),
    };

    let store = SsmParameterStore::new().unwrap_or_else(|e| fail(e));
    let api = ProvisioningClient::new(&config.provisioning_api_host).unwrap_or_else(|e| fail(e));

    if let Err(e) = run(&config, &store, &api, &mut io::stdout().lock()) {
        fail(e);
    }
}

fn fail(e: Error) -> ! {
    eprintln!("Error: {}", e);
    exit(1);
}
