mod display;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use sdg_ai::{Classify, DEFAULT_MAX_LEN, OnnxClassifier, OnnxOptions};
use sdg_chart::ChartOptions;
use sdg_core::{Prediction, classification_text, normalize_doi};
use sdg_openalex::{DEFAULT_BASE_URL, OpenAlexClient};
use sdg_server::{AppState, build_app};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "sdg",
    version,
    about = "Classify scholarly text against the UN Sustainable Development Goals"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API
    Serve {
        #[command(flatten)]
        model: ModelArgs,
        #[command(flatten)]
        openalex: OpenAlexArgs,
        /// Host to bind
        #[arg(long, env = "SDG_HOST", default_value = "0.0.0.0")]
        host: String,
        /// Port to bind
        #[arg(long, env = "SDG_PORT", default_value_t = 8000)]
        port: u16,
        #[command(flatten)]
        chart: ChartArgs,
        /// Comma-separated allowed CORS origins (default: any)
        #[arg(long, env = "CORS_ALLOW_ORIGIN")]
        cors_allow_origin: Option<String>,
    },
    /// Classify a piece of text
    Classify {
        /// Text to classify
        #[arg(required_unless_present = "file", conflicts_with = "file")]
        text: Option<String>,
        /// Read the text from a file instead
        #[arg(long)]
        file: Option<PathBuf>,
        /// Print raw JSON instead of a table
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        model: ModelArgs,
    },
    /// Fetch a work from OpenAlex by DOI and classify its metadata
    Fetch {
        /// DOI, bare or as a https://doi.org/ URL
        doi: String,
        /// Print raw JSON instead of a table
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        model: ModelArgs,
        #[command(flatten)]
        openalex: OpenAlexArgs,
    },
    /// Render classification output as a PNG bar chart
    Plot {
        /// Predictions JSON, as printed by `classify --json`
        #[arg(long)]
        input: PathBuf,
        /// Where to write the chart
        #[arg(long)]
        output: PathBuf,
        /// Write an HTML <img> fragment instead of a bare PNG
        #[arg(long)]
        html: bool,
        #[command(flatten)]
        chart: ChartArgs,
    },
}

#[derive(Args)]
struct ModelArgs {
    /// Directory with model.onnx and tokenizer.json
    #[arg(long = "model", env = "MODEL_PATH", default_value = "models/sdg-bert")]
    model_path: PathBuf,
    /// Maximum sequence length fed to the model
    #[arg(
        long,
        env = "SDG_MAX_LEN",
        default_value_t = DEFAULT_MAX_LEN as u64,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    max_len: u64,
    /// Graph input name for token ids
    #[arg(long, default_value = "input_ids")]
    ids_input: String,
    /// Graph input name for the attention mask
    #[arg(long, default_value = "attention_mask")]
    mask_input: String,
}

impl ModelArgs {
    fn load(&self) -> anyhow::Result<OnnxClassifier> {
        let options = OnnxOptions {
            max_len: self.max_len as usize,
            ids_input: self.ids_input.clone(),
            mask_input: self.mask_input.clone(),
        };
        OnnxClassifier::load(&self.model_path, &options)
            .with_context(|| format!("loading model from {}", self.model_path.display()))
    }
}

#[derive(Args)]
struct OpenAlexArgs {
    /// OpenAlex API base URL
    #[arg(long, env = "OPENALEX_BASE_URL", default_value = DEFAULT_BASE_URL)]
    openalex_url: String,
    /// Contact address for the OpenAlex polite pool
    #[arg(long, env = "OPENALEX_MAILTO")]
    mailto: Option<String>,
    /// Request timeout in seconds
    #[arg(long, env = "OPENALEX_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,
}

impl OpenAlexArgs {
    fn client(&self) -> anyhow::Result<OpenAlexClient> {
        let client = OpenAlexClient::with_timeout(
            self.openalex_url.clone(),
            Duration::from_secs(self.timeout_secs),
        )
        .context("building OpenAlex client")?;
        Ok(client.with_mailto(self.mailto.clone()))
    }
}

#[derive(Args)]
struct ChartArgs {
    /// Directory holding the E_SDG_icons-NN.jpg goal icons
    #[arg(long, env = "IMAGES_PATH")]
    images: Option<PathBuf>,
    /// Font for chart titles and labels (default: a common system font)
    #[arg(long, env = "CHART_FONT_PATH")]
    font: Option<PathBuf>,
}

impl ChartArgs {
    fn options(&self) -> ChartOptions {
        let font = self.font.clone().or_else(sdg_chart::find_system_font);
        if font.is_none() {
            warn!("no chart font found; charts will be drawn without text");
        }
        ChartOptions::with_icons_dir(self.images.clone()).with_font(font)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve {
            model,
            openalex,
            host,
            port,
            chart,
            cors_allow_origin,
        } => {
            info!("sdg v{}", env!("CARGO_PKG_VERSION"));
            let classifier: Arc<dyn Classify> = Arc::new(model.load()?);
            let state = AppState::new(
                classifier,
                openalex.client()?,
                chart.options(),
            );
            let app = build_app(state, cors_allow_origin.as_deref());

            let addr: SocketAddr = format!("{host}:{port}")
                .parse()
                .with_context(|| format!("invalid bind address {host}:{port}"))?;
            let listener = TcpListener::bind(addr)
                .await
                .with_context(|| format!("binding {addr}"))?;
            info!(%addr, "server listening");
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await?;
            info!("server stopped");
        }
        Command::Classify {
            text,
            file,
            json,
            model,
        } => {
            let text = match (text, file) {
                (Some(text), _) => text,
                (None, Some(path)) => std::fs::read_to_string(&path)
                    .with_context(|| format!("reading {}", path.display()))?,
                (None, None) => bail!("either TEXT or --file is required"),
            };
            let classifier = model.load()?;
            let predictions = classifier.classify(&text)?;
            print_output(&predictions, json)?;
        }
        Command::Fetch {
            doi,
            json,
            model,
            openalex,
        } => {
            let doi = normalize_doi(&doi);
            let work = openalex
                .client()?
                .fetch_work(doi)
                .await
                .with_context(|| format!("fetching {doi} from OpenAlex"))?;
            let text = classification_text(&work)
                .with_context(|| format!("building classification text for {doi}"))?;
            if text.is_empty() {
                bail!("no classifiable text for DOI {doi}");
            }
            if !json {
                display::print_work_card(doi, &work, &text);
            }
            let classifier = model.load()?;
            let predictions = classifier.classify(&text)?;
            print_output(&predictions, json)?;
        }
        Command::Plot {
            input,
            output,
            html,
            chart,
        } => {
            let raw = std::fs::read(&input)
                .with_context(|| format!("reading {}", input.display()))?;
            let predictions: Vec<Prediction> = serde_json::from_slice(&raw)
                .with_context(|| format!("parsing predictions from {}", input.display()))?;
            let png = sdg_chart::render_png(&predictions, &chart.options())?;
            let contents = if html {
                sdg_chart::html_fragment(&png).into_bytes()
            } else {
                png
            };
            std::fs::write(&output, contents)
                .with_context(|| format!("writing {}", output.display()))?;
            info!(path = %output.display(), "chart written");
        }
    }
    Ok(())
}

fn print_output(predictions: &[Prediction], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(predictions)?);
    } else {
        display::print_predictions(predictions);
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_len_must_be_positive() {
        let parsed = Cli::try_parse_from(["sdg", "classify", "text", "--max-len", "0"]);
        assert!(parsed.is_err());

        let cli = Cli::try_parse_from(["sdg", "classify", "text", "--max-len", "1"]).unwrap();
        match cli.command {
            Command::Classify { model, .. } => assert_eq!(model.max_len, 1),
            _ => panic!("expected classify"),
        }
    }

    #[test]
    fn plot_takes_chart_font() {
        let cli = Cli::try_parse_from([
            "sdg", "plot", "--input", "in.json", "--output", "out.png", "--font", "f.ttf",
        ])
        .unwrap();
        match cli.command {
            Command::Plot { chart, html, .. } => {
                assert!(!html);
                assert_eq!(chart.font, Some(PathBuf::from("f.ttf")));
            }
            _ => panic!("expected plot"),
        }
    }
}
