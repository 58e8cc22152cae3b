use anyhow::{Context as _, Result};
use serde_json::Value;
use tokio::runtime::Runtime;

use chaosgcp::{
    client::ComputeClient,
    cmd::Command,
    config::Config,
    context::{Credentials, GcpContext},
    logger,
    logging::Logger,
};

fn main() -> Result<()> {
    let command = Command::init();

    if command.logging {
        Logger::init()?;
    }

    let config = Config::load(command.config_load_option()?)?;

    logger!(info, "config {:?}", config);

    let rt = Runtime::new().context("failed to create runtime")?;

    let output = command.output;

    let ret = rt.block_on(run(command, config));

    if let Err(e) = &ret {
        logger!(error, "{:#}", e);
    }

    println!("{}", output.render(&ret?)?);

    Ok(())
}

async fn run(command: Command, config: Config) -> Result<Value> {
    let http = reqwest::Client::new();

    let context = GcpContext::discover(&config.gcp, &command.context_overrides(), &http).await?;

    command.subcommand.validate(&context)?;

    let credentials = Credentials::resolve(&config.secrets, &http)
        .await
        .context("failed to load credentials")?;

    let client = ComputeClient::new(
        http,
        config.api.endpoint.clone(),
        credentials,
        config.operation.clone(),
    );

    logger!(
        info,
        "project={} region={:?}",
        context.project_id,
        context.region
    );

    command.subcommand.run(&client, &context).await
}
