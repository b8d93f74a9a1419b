use clap::Parser;
use job_board::{
    cli::{Cli, CliConfirm, Command},
    config::{get_config, init_config_with, resolve_api_base, AppEnv, Config},
    forms::job_form::JobForm,
    models::job::Job,
    services::{board_service::BoardService, job_list_service::RefreshOutcome, toast_service::ToastKind},
    views::job_card::{render_board, render_card},
    AppState,
};
use tokio::time::Instant;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    init_tracing(config.app_env);
    if let Some(base) = cli.api_base.as_deref() {
        config.api_base = resolve_api_base(Some(base), config.app_env, None)?;
    }
    init_config_with(config)?;
    let config = get_config()?;

    let state = AppState::new(config)?;
    let confirm = match &cli.command {
        Command::Delete { yes: true, .. } => CliConfirm::AssumeYes,
        _ => CliConfirm::Ask,
    };
    let board = BoardService::new(state, confirm);

    let result = run(&board, cli.command).await;

    for toast in board.toasts().drain() {
        let label = match toast.kind {
            ToastKind::Success => "ok",
            ToastKind::Error => "error",
            ToastKind::Info => "info",
        };
        eprintln!("[{}] {}", label, toast.message);
    }

    result
}

/// JSON lines in production, human-readable otherwise. Both write to stderr.
fn init_tracing(app_env: AppEnv) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if app_env.json_logs() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn run(board: &BoardService<CliConfirm>, command: Command) -> anyhow::Result<()> {
    let now = job_board::utils::time::now();

    match command {
        Command::List(args) => {
            let outcome = match board.apply_filters(args.filter_state()).await {
                Some(outcome) => outcome,
                None => board.load().await,
            };
            if let RefreshOutcome::Failed { message } = outcome {
                if !args.json {
                    print!("{}", render_board(&board.view(), now, Instant::now()));
                }
                anyhow::bail!("could not load jobs: {}", message);
            }

            let view = board.view();
            if args.json {
                let jobs: Vec<&Job> = view.jobs.iter().map(|l| &l.job).collect();
                println!("{}", serde_json::to_string_pretty(&jobs)?);
            } else {
                print!("{}", render_board(&view, now, Instant::now()));
            }
        }
        Command::Show { id, json } => {
            let job = board.fetch_job(&id).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&job)?);
            } else {
                print!("{}", render_card(&job, false, now));
            }
        }
        Command::Add(args) => {
            let mut form = args.into_form();
            let job = board.submit(&mut form).await?;
            print!("{}", render_card(&job, true, now));
        }
        Command::Edit { id, fields } => {
            let job = board.fetch_job(&id).await?;
            let mut form = JobForm::edit(&job);
            fields.apply(&mut form.fields);
            let job = board.submit(&mut form).await?;
            print!("{}", render_card(&job, false, now));
        }
        Command::Delete { id, .. } => {
            if board.delete_job(&id).await? {
                info!(job_id = %id, "Job deleted");
            } else {
                println!("Cancelled.");
            }
        }
    }

    Ok(())
}
