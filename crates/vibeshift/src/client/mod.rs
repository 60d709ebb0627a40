mod http;

pub use http::{TransformClient, TransformReply};

use crate::prelude::{eprintln, println, *};
use anstream::print;
use colored::Colorize;
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use vibeshift_core::controller::{Controller, Notice, Submission};
use vibeshift_core::samples::ExampleLibrary;
use vibeshift_core::types::{GenerationStyle, ProgrammingLanguage, TransformRequest};

#[derive(Debug, clap::Args)]
pub struct TransformOptions {
    /// Language of the source code (JavaScript, Python, Java, TypeScript, C++, Ruby, Go)
    #[arg(short, long, default_value = "JavaScript", value_parser = parse_language)]
    pub language: ProgrammingLanguage,

    /// Generational style to rewrite the code in (Gen Z, Millennial, Boomer)
    #[arg(short, long, default_value = "Gen Z", value_parser = parse_style)]
    pub style: GenerationStyle,

    /// File holding the code to transform ("-" reads stdin). Defaults to the language sample
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Base URL of a running `vibeshift serve`
    #[arg(long, env = "VIBESHIFT_SERVER", default_value = "http://127.0.0.1:3000")]
    pub server: String,

    /// Give up on the endpoint after this many seconds
    #[arg(
        long,
        default_value = "60",
        value_parser = clap::value_parser!(u64).range(1..=MAX_TIMEOUT_SECS)
    )]
    pub timeout_secs: u64,

    /// Copy the transformed code to the clipboard
    #[arg(long)]
    pub copy: bool,
}

/// Upper bound for `--timeout-secs`, one day.
pub const MAX_TIMEOUT_SECS: u64 = 86_400;

pub fn parse_language(value: &str) -> std::result::Result<ProgrammingLanguage, String> {
    value.parse().map_err(|e: vibeshift_core::TransformError| e.to_string())
}

pub fn parse_style(value: &str) -> std::result::Result<GenerationStyle, String> {
    value.parse().map_err(|e: vibeshift_core::TransformError| e.to_string())
}

pub async fn run(options: TransformOptions, global: crate::Global) -> Result<()> {
    let mut controller = Controller::new(ExampleLibrary::builtin(), options.language, options.style);

    if let Some(path) = &options.file {
        controller.edit_source(read_source(path).await?);
    }

    if global.verbose {
        eprintln!("Endpoint: {}/transform", options.server);
        eprintln!("Language: {}", controller.language());
        eprintln!("Style: {}", controller.style());
        eprintln!("Source length: {} chars", controller.source().len());
    }

    let client = TransformClient::new(&options.server, Duration::from_secs(options.timeout_secs))?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .map_err(|e| eyre!("Invalid spinner template: {}", e))?,
    );
    spinner.set_message("Vibing...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let mut printed = false;
    let notice = transform_once(&mut controller, &client, |chunk| {
        if !printed {
            spinner.finish_and_clear();
            printed = true;
        }
        print!("{chunk}");
        if let Err(e) = std::io::stdout().flush() {
            log::warn!("Failed to flush stdout: {e}");
        }
    })
    .await;
    spinner.finish_and_clear();

    if printed && !controller.output().ends_with('\n') {
        println!();
    }

    let Some(notice) = notice else {
        return Err(eyre!("A transformation is already in flight"));
    };
    if let Some(warning) = partial_output_warning(printed, notice) {
        eprintln!("{}", warning.yellow());
    }
    show_notice(notice);
    if notice.is_destructive() {
        return Err(eyre!(notice.description()));
    }

    if options.copy {
        let result = crate::clipboard::copy(controller.output()).await;
        if let Err(e) = &result {
            log::warn!("Clipboard write failed: {e:#}");
        }
        show_notice(Controller::copy_notice(&result));
    }

    Ok(())
}

/// Run one transformation against the endpoint and feed the reply into
/// `controller`.
///
/// `on_chunk` sees the output as it arrives: every streamed chunk in order,
/// or the whole text once for a batch reply. Returns `None` when the
/// controller suppressed the submission.
pub async fn transform_once<F>(
    controller: &mut Controller,
    client: &TransformClient,
    mut on_chunk: F,
) -> Option<Notice>
where
    F: FnMut(&str),
{
    let request = match controller.submit() {
        Submission::Send(request) => request,
        Submission::Rejected(notice) => return Some(notice),
        Submission::Suppressed => return None,
    };

    match receive(controller, client, &request, &mut on_chunk).await {
        Ok(()) => Some(controller.complete()),
        Err(e) => {
            log::error!("Transform request failed: {e:#}");
            Some(controller.fail())
        }
    }
}

async fn receive<F>(
    controller: &mut Controller,
    client: &TransformClient,
    request: &TransformRequest,
    on_chunk: &mut F,
) -> Result<()>
where
    F: FnMut(&str),
{
    match client.transform(request).await? {
        TransformReply::Batch(text) => {
            on_chunk(&text);
            controller.set_output(text);
        }
        TransformReply::Stream(mut chunks) => {
            while let Some(chunk) = chunks.next().await {
                let chunk = chunk?;
                controller.apply_chunk(&chunk);
                on_chunk(&chunk);
            }
        }
    }

    Ok(())
}

/// Streamed text is printed as it arrives, so a transfer that fails halfway
/// has already left a fragment on stdout.
fn partial_output_warning(printed: bool, notice: Notice) -> Option<&'static str> {
    (printed && notice == Notice::TransformFailed)
        .then_some("The output above is incomplete and was discarded.")
}

async fn read_source(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut source = String::new();
        tokio::io::AsyncReadExt::read_to_string(&mut tokio::io::stdin(), &mut source)
            .await
            .context("Failed to read source from stdin")?;
        return Ok(source);
    }

    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| eyre!("Failed to read file '{}': {}", path.display(), e))
}

fn show_notice(notice: Notice) {
    let title = if notice.is_destructive() {
        notice.title().red().bold()
    } else {
        notice.title().green().bold()
    };

    eprintln!("{} {}", title, notice.description());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::testing::{Behavior, FakeProvider};
    use crate::server::{router, AppState};
    use std::sync::Arc;
    use vibeshift_core::types::ResponseMode;

    async fn spawn_server(provider: Arc<FakeProvider>, mode: ResponseMode) -> String {
        let state = Arc::new(AppState {
            provider,
            library: ExampleLibrary::builtin(),
            mode,
            timeout: Duration::from_millis(300),
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(state)).await.unwrap();
        });

        format!("http://{addr}")
    }

    fn controller() -> Controller {
        Controller::new(
            ExampleLibrary::builtin(),
            ProgrammingLanguage::Python,
            GenerationStyle::GenZ,
        )
    }

    #[tokio::test]
    async fn test_streamed_chunks_are_applied_in_order() {
        let chunks = vec!["def vibe", "_check(n):\n", "    return n  # slay 💅"];
        let provider = Arc::new(FakeProvider::replying(chunks.clone()));
        let server = spawn_server(provider.clone(), ResponseMode::Stream).await;
        let client = TransformClient::new(&server, Duration::from_secs(5)).unwrap();

        let mut controller = controller();
        let mut seen = String::new();
        let notice = transform_once(&mut controller, &client, |chunk| seen.push_str(chunk)).await;

        assert_eq!(notice, Some(Notice::Transformed));
        assert_eq!(controller.output(), chunks.concat());
        assert_eq!(seen, chunks.concat());
        assert!(!controller.is_in_flight());
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_batch_reply_sets_output() {
        let provider = Arc::new(FakeProvider::replying(vec!["print('hi bestie')"]));
        let server = spawn_server(provider, ResponseMode::Batch).await;
        let client = TransformClient::new(&server, Duration::from_secs(5)).unwrap();

        let mut controller = controller();
        controller.edit_source("print('hi')");
        let notice = transform_once(&mut controller, &client, |_| {}).await;

        assert_eq!(notice, Some(Notice::Transformed));
        assert_eq!(controller.output(), "print('hi bestie')");
    }

    #[tokio::test]
    async fn test_empty_source_never_reaches_the_server() {
        let provider = Arc::new(FakeProvider::replying(vec!["unused"]));
        let server = spawn_server(provider.clone(), ResponseMode::Stream).await;
        let client = TransformClient::new(&server, Duration::from_secs(5)).unwrap();

        let mut controller = controller();
        controller.edit_source("");
        let notice = transform_once(&mut controller, &client, |_| {}).await;

        assert_eq!(notice, Some(Notice::EmptySource));
        assert!(!controller.is_in_flight());
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_provider_timeout_leaves_output_unchanged() {
        let provider = Arc::new(FakeProvider::replying(vec!["first result"]));
        let server = spawn_server(provider, ResponseMode::Stream).await;
        let client = TransformClient::new(&server, Duration::from_secs(5)).unwrap();
        let mut controller = controller();
        transform_once(&mut controller, &client, |_| {}).await;
        assert_eq!(controller.output(), "first result");

        let hanging = Arc::new(FakeProvider::new(Behavior::Hang));
        let server = spawn_server(hanging, ResponseMode::Stream).await;
        let client = TransformClient::new(&server, Duration::from_secs(5)).unwrap();
        let notice = transform_once(&mut controller, &client, |_| {}).await;

        assert_eq!(notice, Some(Notice::TransformFailed));
        assert!(!controller.is_in_flight());
        assert_eq!(controller.output(), "first result");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_a_failure_notice() {
        let client = TransformClient::new("http://127.0.0.1:1", Duration::from_secs(2)).unwrap();

        let mut controller = controller();
        let notice = transform_once(&mut controller, &client, |_| {}).await;

        assert_eq!(notice, Some(Notice::TransformFailed));
        assert!(!controller.is_in_flight());
    }

    #[tokio::test]
    async fn test_read_source_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "puts 'hi'").unwrap();

        let source = read_source(file.path()).await.unwrap();
        assert_eq!(source, "puts 'hi'");

        let missing = read_source(Path::new("/definitely/not/here.rb")).await;
        assert!(missing.is_err());
    }

    #[tokio::test]
    async fn test_stream_failing_halfway_warns_about_printed_fragment() {
        let provider = Arc::new(FakeProvider::new(Behavior::FailMidStream("connection reset")));
        let server = spawn_server(provider, ResponseMode::Stream).await;
        let client = TransformClient::new(&server, Duration::from_secs(5)).unwrap();

        let mut controller = controller();
        let before = controller.output().to_string();
        let mut printed = false;
        let notice = transform_once(&mut controller, &client, |_| printed = true)
            .await
            .unwrap();

        assert_eq!(notice, Notice::TransformFailed);
        assert!(printed);
        assert_eq!(controller.output(), before);
        assert!(partial_output_warning(printed, notice).is_some());
    }

    #[test]
    fn test_partial_output_warning_only_after_printed_failure() {
        assert!(partial_output_warning(false, Notice::TransformFailed).is_none());
        assert!(partial_output_warning(true, Notice::Transformed).is_none());
        assert!(partial_output_warning(true, Notice::TransformFailed).is_some());
    }

    #[derive(Debug, clap::Parser)]
    struct Cli {
        #[command(flatten)]
        options: TransformOptions,
    }

    #[test]
    fn test_timeout_flag_is_bounded() {
        use clap::Parser;

        let cli = Cli::try_parse_from(["transform", "--timeout-secs", "5"]).unwrap();
        assert_eq!(cli.options.timeout_secs, 5);
        assert!(Cli::try_parse_from(["transform", "--timeout-secs", "0"]).is_err());
        assert!(Cli::try_parse_from(["transform", "--timeout-secs", "18446744073709551615"]).is_err());
    }

    #[test]
    fn test_value_parsers() {
        assert_eq!(parse_language("cpp"), Ok(ProgrammingLanguage::Cpp));
        assert_eq!(parse_style("Gen Z"), Ok(GenerationStyle::GenZ));
        assert_eq!(
            parse_style("Gen Alpha"),
            Err("Unsupported style: Gen Alpha".to_string())
        );
    }
}
