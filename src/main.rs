use clap::Parser;
use recru_dashboard::config::parse_params;
use recru_dashboard::core::ConfigProvider;
use recru_dashboard::utils::{logger, validation::Validate};
use recru_dashboard::{
    AppConfig, CliConfig, Command, Dashboard, DashboardError, DataProvider, Deferred,
    DispatchMode, Subscribed,
};
use serde_json::Value;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting recru-dashboard CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = match cli.resolve().and_then(|config| config.validate().map(|_| config)) {
        Ok(config) => config,
        Err(e) => fail(&e, "❌ Configuration validation failed"),
    };

    let command = cli.command();
    let result = if config.use_deferred() {
        tracing::debug!("Dispatch mode: deferred");
        run::<Deferred>(&config, command).await
    } else {
        tracing::debug!("Dispatch mode: subscribed");
        run::<Subscribed>(&config, command).await
    };

    match result {
        Ok(Value::Null) => {}
        Ok(response) => println!("{}", serde_json::to_string_pretty(&response)?),
        Err(e) => fail(&e, "❌ Request failed"),
    }

    Ok(())
}

async fn run<M: DispatchMode>(config: &AppConfig, command: Command) -> recru_dashboard::Result<Value> {
    let provider = DataProvider::<M>::from_config(config)?;

    let output = match command {
        Command::Dashboard => {
            Dashboard::with_endpoint(provider, config.dashboard_endpoint()).init()
        }
        Command::Get { url } => provider.get_data(&url, None),
        Command::Post { url, params } => provider.post_data(&url, &parse_params(&params)?, None),
        Command::PostJson { url, params } => {
            provider.post_json_data(&url, &parse_params(&params)?, None)
        }
        Command::Download {
            url,
            download_url,
            params,
        } => provider.download(&url, &parse_params(&params)?, &download_url, None),
    };

    M::settle(output).await
}

fn fail(e: &DashboardError, context: &str) -> ! {
    tracing::error!("{}: {}", context, e);
    if !e.already_notified() {
        eprintln!("❌ {}", e.user_friendly_message());
    }
    std::process::exit(e.exit_code());
}
