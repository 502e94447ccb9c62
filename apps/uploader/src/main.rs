mod config;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use resumedrop_i18n::{Translate, Translator, normalize_locale};
use resumedrop_upload::{
    AttachOutcome, HttpTransport, SelectedFile, SubmitOutcome, UploadEvent, UploadOrchestrator,
    format_bytes, status_label_key,
};

use config::AppConfig;

#[derive(Parser)]
#[command(name = "resumedrop-uploader")]
#[command(version, about = "Upload a resume (PDF or DOCX) for job matching", long_about = None)]
struct Args {
    /// Resume file to upload
    file: PathBuf,

    /// Model used to analyse the resume
    #[arg(short, long)]
    model: Option<String>,

    /// Access token, required by premium models
    #[arg(short, long)]
    token: Option<String>,

    /// UI language (zh-CN, en-US, or any alias such as `en`)
    #[arg(short, long)]
    locale: Option<String>,

    /// API base URL, overrides config and environment
    #[arg(long)]
    api_url: Option<String>,

    /// Config file (defaults to ~/.config/resumedrop/config.json)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,resumedrop=debug")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut app = AppConfig::load(args.config.as_deref())?;
    app.apply_env(|name| std::env::var(name).ok());
    if let Some(url) = args.api_url {
        app.upload.api_base_url = Some(url);
    }

    let lang = std::env::var("LANG").ok();
    let locale = normalize_locale(
        args.locale
            .as_deref()
            .or(app.locale.as_deref())
            .or(lang.as_deref()),
    );
    let translator = Translator::new(locale).context("loading message catalogs")?;

    let transport = HttpTransport::new(app.upload.request_timeout())
        .context("building HTTP client")?;
    let max_size = app.upload.max_size_bytes;
    let mut orch = UploadOrchestrator::new(app.upload, locale, Box::new(transport));

    if let Some(model) = args.model.as_deref() {
        orch.select_model(model)
            .with_context(|| format!("selecting model {model}"))?;
    }
    if let Some(token) = args.token.as_deref() {
        orch.set_access_token(token);
    }

    let mut events = orch.take_events().context("event receiver already taken")?;
    let forwarder = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match &event {
                UploadEvent::Started { file_id } => info!(%file_id, "uploading"),
                UploadEvent::Navigate { target } => info!(%target, "next step"),
                _ => debug!(?event, "upload event"),
            }
        }
    });

    let cancel = orch.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    println!("{}", translator.translate("upload.labels.sectionTitle", &[]));
    println!(
        "{}",
        translator.translate(
            "upload.labels.fileSelector",
            &[("size", format_bytes(max_size))]
        )
    );

    let file = SelectedFile::from_path(&args.file)
        .with_context(|| format!("reading {}", args.file.display()))?;
    info!(
        file = %file.name,
        size = file.size_bytes,
        mime = %file.mime_type,
        model = %orch.session().selected_model(),
        "attaching resume"
    );

    let mut outcome = orch.handle_attach(file).await;
    if outcome == AttachOutcome::Pending {
        // Auto-submit is off in the config; a CLI run always submits.
        let submitted = orch.handle_submit().await.context("submitting upload")?;
        outcome = AttachOutcome::Submitted(submitted);
    }

    if let Some(file) = orch.state().file() {
        println!(
            "{} [{}]",
            file.name,
            translator.translate(status_label_key(&file.status), &[])
        );
    }
    if let Some(banner) = orch.feedback().render(&translator) {
        println!("{}", banner.title);
        for line in banner.lines {
            println!("  {line}");
        }
    }

    let code = match outcome {
        AttachOutcome::Submitted(SubmitOutcome::Uploaded { navigation, .. }) => {
            println!(
                "{}",
                translator.translate("upload.feedback.nextStep", &[("target", navigation)])
            );
            ExitCode::SUCCESS
        }
        AttachOutcome::Submitted(SubmitOutcome::Cancelled) => {
            println!("{}", translator.translate("upload.feedback.cancelled", &[]));
            ExitCode::from(130)
        }
        AttachOutcome::AwaitingToken => {
            println!("{}", translator.translate("upload.labels.promptToken", &[]));
            ExitCode::from(2)
        }
        AttachOutcome::Pending
        | AttachOutcome::Rejected(_)
        | AttachOutcome::Submitted(SubmitOutcome::Failed(_))
        | AttachOutcome::Submitted(SubmitOutcome::MissingResumeId) => ExitCode::FAILURE,
    };

    drop(orch);
    let _ = forwarder.await;
    Ok(code)
}
