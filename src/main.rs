//! hark CLI binary entry point.

use std::fs::File;

use hark::cli::{logging, Cli, Commands, ServeArgs, TranscribeArgs};
use hark::config::HarkConfig;
use hark::response::TranscriptionResponse;

#[tokio::main]
async fn main() {
    logging::init_tracing();
    let cli = Cli::parse_args();

    let result = match load_config(cli.backend.as_deref()) {
        Ok(config) => match cli.command {
            Commands::Transcribe(args) => handle_transcribe(&config, args).await,
            Commands::Serve(args) => handle_serve(config, args).await,
        },
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn load_config(backend: Option<&str>) -> Result<HarkConfig, Box<dyn std::error::Error>> {
    let config = HarkConfig::from_env_with(|key| match key {
        "HARK_BACKEND" => backend.map(ToString::to_string),
        _ => None,
    })?;
    Ok(config)
}

async fn handle_transcribe(
    config: &HarkConfig,
    args: TranscribeArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let pipeline = config.build_pipeline()?;
    let file = File::open(&args.file)?;
    let filename = args
        .file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned());

    let result = pipeline.transcribe_reader(file, filename.as_deref()).await;

    if args.json {
        let (_, body) = TranscriptionResponse::from_result(&result);
        println!("{}", serde_json::to_string_pretty(&body)?);
        return result.map(|_| ()).map_err(Into::into);
    }

    let text = result?;
    println!("{text}");
    Ok(())
}

async fn handle_serve(
    mut config: HarkConfig,
    args: ServeArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    let pipeline = config.build_pipeline()?;
    let router = hark::server::create_router(pipeline);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, backend = %config.backend, "server listening");
    axum::serve(listener, router).await?;
    Ok(())
}
