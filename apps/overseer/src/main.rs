use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use overseer::agents::baseline::direct_answer;
use overseer::agents::{
    Agent, AgentResult, CompletionGateway, EventSink, HumanAgent, ManagerAgent, PurposeReader,
    ReportWriter, Session, TracingSink, WorkerAgent,
};
use overseer::config::OverseerConfig;
use overseer::infrastructure::{
    FileReportWriter, LinePurposeReader, OpenAiGateway, TerminalReportWriter,
};

/// Delegate a goal to a manager/worker pair of language model agents
#[derive(Debug, Parser)]
#[command(name = "overseer", version)]
struct Cli {
    /// Answer the goal with a single completion instead of delegating
    #[arg(long)]
    baseline: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load environment variables
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "session failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> AgentResult<()> {
    let config = OverseerConfig::from_env()?;
    config.require_credentials()?;
    if config.api_key.is_none() {
        tracing::warn!(
            api_base = %config.api_base,
            "OPENAI_API_KEY not set, using local service"
        );
    }

    let goal = LinePurposeReader::stdin().read()?;

    let mut output: Vec<Box<dyn ReportWriter>> = vec![
        Box::new(FileReportWriter::new(&config.output_dir)),
        Box::new(TerminalReportWriter),
    ];

    if cli.baseline {
        let gateway = OpenAiGateway::new(config.manager_settings())?;
        let answer = direct_answer(&gateway, &goal).await?;
        return output.write(&answer);
    }

    let sink: Arc<dyn EventSink> = Arc::new(TracingSink);
    let worker_gateway: Arc<dyn CompletionGateway> =
        Arc::new(OpenAiGateway::new(config.worker_settings())?);
    let manager_gateway: Arc<dyn CompletionGateway> =
        Arc::new(OpenAiGateway::new(config.manager_settings())?);

    let workers: Vec<WorkerAgent> = (0..config.worker_count)
        .map(|_| WorkerAgent::new(worker_gateway.clone()).with_sink(sink.clone()))
        .collect();

    let manager = ManagerAgent::new(manager_gateway, workers.iter().map(|w| w.id()).collect())
        .with_selector(config.worker_selection.selector())
        .with_window(config.context_window)
        .with_max_rounds(config.max_rounds)
        .with_sink(sink.clone());

    let human = HumanAgent::new(Box::new(output));

    tracing::info!(
        manager_model = %config.manager_model,
        worker_model = %config.worker_model,
        workers = config.worker_count,
        "starting session"
    );

    let outcome = Session::new(human, manager, workers, sink).run(&goal).await?;
    tracing::info!(deliveries = outcome.deliveries, "report delivered");

    Ok(())
}
