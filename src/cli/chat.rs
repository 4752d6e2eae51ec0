//! Chat command implementation

use crate::app::App;
use crate::cli::{load_config, ChatArgs};
use crate::config::Preferences;
use crate::events::{AppEvent, EventReceiver};
use crate::health::HttpHealthProber;
use crate::logging::init_tracing;
use crate::relay::ChatRequest;
use std::io::Write;
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tokio_util::sync::CancellationToken;

async fn read_input(args: &ChatArgs) -> anyhow::Result<String> {
    let input = match &args.input {
        Some(text) => text.clone(),
        None => {
            let mut buf = String::new();
            tokio::io::stdin().read_to_string(&mut buf).await?;
            buf
        }
    };
    if input.trim().is_empty() {
        anyhow::bail!("no input text; pass it as an argument or on stdin");
    }
    Ok(input)
}

/// Print chunks as they arrive until the request finishes. Ctrl-C cancels.
async fn stream_output(
    events: &mut EventReceiver,
    cancel: &CancellationToken,
    echo: bool,
) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout();
    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(AppEvent::ChatChunk(text)) if echo => {
                    stdout.write_all(text.as_bytes())?;
                    stdout.flush()?;
                }
                Some(AppEvent::ChatComplete) | Some(AppEvent::ChatError(_)) | None => break,
                Some(_) => {}
            },
            _ = tokio::signal::ctrl_c(), if !cancel.is_cancelled() => {
                cancel.cancel();
            }
        }
    }
    if echo {
        writeln!(stdout)?;
    }
    Ok(())
}

/// Handle `fabric-desk chat`
pub async fn run_chat(args: ChatArgs) -> anyhow::Result<()> {
    let mut config = load_config(&args.config, args.base_url.as_deref())?;
    // One-shot command: no periodic health reporting
    config.health_check.enabled = false;
    if let Err(e) = init_tracing(&config.logging) {
        eprintln!("Warning: failed to initialize logging: {}", e);
    }

    let input = read_input(&args).await?;

    let preferences = Preferences {
        auto_start_server: args.start_server,
        ..Default::default()
    };
    let prober = Arc::new(HttpHealthProber::from_config(&config.health_check));
    let (mut app, mut events) = App::with_prober(config, preferences, prober);
    app.startup().await?;

    let vendor = match &args.vendor {
        Some(vendor) => vendor.clone(),
        None => {
            let models = app.catalog().models().await?;
            models
                .vendor_of(&args.model)
                .map(str::to_string)
                .ok_or_else(|| anyhow::anyhow!("no vendor serves model '{}'", args.model))?
        }
    };

    let request = ChatRequest::new(&args.pattern, vendor, &args.model, input);
    let cancel = CancellationToken::new();
    let relay = app.relay().clone();
    let send = tokio::spawn({
        let cancel = cancel.clone();
        async move { relay.send_with_cancel(request, cancel).await }
    });

    let streamed = stream_output(&mut events, &cancel, !args.json).await;
    let result = send.await?;
    app.shutdown().await?;
    streamed?;
    result?;

    if args.json {
        if let Some(entry) = app.history().latest() {
            println!("{}", serde_json::to_string_pretty(&entry)?);
        }
    }

    Ok(())
}
