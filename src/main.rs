use clap::Parser;
use line_fanout::core::ConfigProvider;
use line_fanout::utils::{logger, monitor::SystemMonitor};
use line_fanout::{
    build_processor, stdin_source, CliConfig, DispatchError, DispatchOptions, Dispatcher,
    DrainOutcome, Result, Settings,
};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose, cli.log_format);

    tracing::info!("Starting line-fanout");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let settings = match Settings::resolve(&cli) {
        Ok(settings) => settings,
        Err(e) => exit_with(&e),
    };

    // 單元是獨立執行緒，main 返回時未 drain 的行會隨行程結束被放棄
    if let Err(e) = run(settings).await {
        exit_with(&e);
    }
}

async fn run(settings: Settings) -> Result<()> {
    let processor = build_processor(&settings.processor)?;
    let mut dispatcher = Dispatcher::new(
        stdin_source(),
        processor,
        DispatchOptions::from_config(&settings),
    );
    let tracker = dispatcher.tracker();

    match settings.max_concurrency() {
        Some(limit) => tracing::info!(
            "🚦 Dispatching with {} processor, at most {} lines at once",
            settings.processor.kind(),
            limit
        ),
        None => tracing::info!(
            "🚀 Dispatching with {} processor, unbounded concurrency",
            settings.processor.kind()
        ),
    }

    let monitor = Arc::new(SystemMonitor::new(settings.monitor));
    let monitor_task = if monitor.is_enabled() {
        tracing::info!("🔍 System monitoring enabled");
        let monitor = Arc::clone(&monitor);
        let tracker = tracker.clone();
        let period = settings.monitor_interval;
        Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                monitor.report("Dispatching", &tracker.stats());
            }
        }))
    } else {
        None
    };

    let outcome = dispatcher.run().await;
    if let Some(task) = monitor_task {
        task.abort();
    }
    let report = outcome?;

    tracing::info!(
        "✅ Input exhausted: {} lines dispatched, {} still running",
        report.lines_dispatched,
        report.live_at_return
    );

    if settings.drain_on_exit() {
        match dispatcher.drain(settings.drain_timeout()).await {
            DrainOutcome::Drained => tracing::info!("All lines finished"),
            DrainOutcome::TimedOut { abandoned } => {
                tracing::warn!("Drain timed out, abandoning {} in-flight lines", abandoned)
            }
        }
    } else if tracker.live() > 0 {
        tracing::warn!(
            "Exiting without waiting for {} in-flight lines (use --drain to wait)",
            tracker.live()
        );
    }

    let stats = tracker.stats();
    tracing::info!(
        "📊 Units started: {}, completed: {}, failed: {}, panicked: {}",
        stats.started,
        stats.completed,
        stats.failed,
        stats.panicked
    );
    if let Ok(summary) = serde_json::to_string(&stats) {
        tracing::debug!(summary = %summary, "Run summary");
    }
    monitor.report("Exit", &stats);

    Ok(())
}

fn exit_with(e: &DispatchError) -> ! {
    tracing::error!(
        "❌ line-fanout failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    std::process::exit(e.exit_code());
}
