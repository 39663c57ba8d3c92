//! Diabetes classifier CLI
//!
//! Command-line interface for training, serving and one-off predictions.

use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use std::time::Instant;

use crate::inference::{FeatureRecord, LabelFormat, Predictor};
use crate::server::{run_server, ServerConfig};
use crate::training::{train_and_save, TrainingConfig};

// ─── Styling helpers ───────────────────────────────────────────────────────────

const W: usize = 58; // box inner width

fn dim(s: &str) -> ColoredString   { s.truecolor(100, 100, 100) }
fn accent(s: &str) -> ColoredString { s.truecolor(120, 170, 255) }
fn muted(s: &str) -> ColoredString  { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString     { s.truecolor(100, 210, 120) }

fn line_box_top()    { println!("  {}", dim("┌─────────────────────────────────────────────────────────┐")); }
fn line_box_bottom() { println!("  {}", dim("└─────────────────────────────────────────────────────────┘")); }
fn line_box_sep()    { println!("  {}", dim("├─────────────────────────────────────────────────────────┤")); }

fn line_box(content: &str) {
    let visible_len = strip_ansi(content).chars().count();
    let pad = W.saturating_sub(visible_len);
    println!("  {}  {}{} {}", dim("│"), content, " ".repeat(pad), dim("│"));
}

fn line_box_center(content: &str) {
    let visible_len = strip_ansi(content).chars().count();
    let total_pad = W.saturating_sub(visible_len);
    let left = total_pad / 2;
    let right = total_pad - left;
    println!("  {}  {}{}{} {}", dim("│"), " ".repeat(left), content, " ".repeat(right), dim("│"));
}

fn line_box_empty() { line_box(""); }

fn strip_ansi(s: &str) -> String {
    let mut out = String::new();
    let mut in_escape = false;
    for c in s.chars() {
        if c == '\x1b' { in_escape = true; continue; }
        if in_escape { if c == 'm' { in_escape = false; } continue; }
        out.push(c);
    }
    out
}

fn kv(key: &str, val: &str) -> String {
    format!("{} {}", muted(key), val.white())
}

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), dim(detail));
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "diabetes-classifier")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Train and serve a logistic-regression diabetes classifier")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Train on the built-in diabetes dataset and write the artifacts
    Train {
        /// Output model file [env: MODEL_PATH, default: model.json]
        #[arg(short, long)]
        model: Option<PathBuf>,

        /// Output scaler file [env: SCALER_PATH, default: scaler.json]
        #[arg(short, long)]
        scaler: Option<PathBuf>,

        /// Train on raw features and skip the scaler
        #[arg(long)]
        no_scale: bool,

        /// Fraction of rows held out for evaluation
        #[arg(long, default_value = "0.2")]
        test_size: f64,

        /// Seed for the train/test shuffle
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Targets above this value are labelled diabetic
        #[arg(long, default_value = "140")]
        threshold: f64,
    },

    /// Start the prediction server
    Serve {
        /// Server host [env: API_HOST, default: 0.0.0.0]
        #[arg(long)]
        host: Option<String>,

        /// Server port [env: API_PORT, default: 5000]
        #[arg(short, long)]
        port: Option<u16>,

        /// Model file [env: MODEL_PATH]
        #[arg(short, long)]
        model: Option<PathBuf>,

        /// Scaler file [env: SCALER_PATH]
        #[arg(short, long)]
        scaler: Option<PathBuf>,

        /// Response format: class or name [env: PREDICTION_LABELS]
        #[arg(short, long)]
        labels: Option<LabelFormat>,
    },

    /// Classify one JSON feature record from the command line
    Predict {
        /// JSON object mapping feature names to numbers
        input: String,

        /// Model file [env: MODEL_PATH]
        #[arg(short, long)]
        model: Option<PathBuf>,

        /// Scaler file [env: SCALER_PATH]
        #[arg(short, long)]
        scaler: Option<PathBuf>,

        /// Output format: class or name
        #[arg(short, long)]
        labels: Option<LabelFormat>,
    },
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub fn cmd_train(
    model: Option<PathBuf>,
    scaler: Option<PathBuf>,
    no_scale: bool,
    test_size: f64,
    seed: u64,
    threshold: f64,
) -> anyhow::Result<()> {
    section("Train");

    let mut config = TrainingConfig::new()
        .with_scaling(!no_scale)
        .with_test_size(test_size)
        .with_random_state(seed)
        .with_threshold(threshold);
    if let Some(path) = model {
        config = config.with_model_path(path);
    }
    if let Some(path) = scaler {
        config = config.with_scaler_path(path);
    }
    let model_path = config.model_path.clone();
    let scaler_path = config.scaler_path.clone();

    step_run(&format!("Training {}", "logistic regression".cyan()));
    let start = Instant::now();
    let report = train_and_save(config)?;
    step_done(&format!("{} iterations in {:?}", report.iterations, start.elapsed()));

    println!();
    println!("Accuracy: {:.2}", report.accuracy);
    println!();
    println!("  {:<16} {}", muted("Train / test"), format!("{} / {}", report.n_train, report.n_test).white());
    let ratio = |v: Option<f64>| v.map(|v| format!("{:.4}", v)).unwrap_or_else(|| "n/a".to_string());
    println!("  {:<16} {}", muted("Precision"), ratio(report.confusion.precision()).white());
    println!("  {:<16} {}", muted("Recall"), ratio(report.confusion.recall()).white());
    println!("  {:<16} {}", muted("Model"), model_path.display().to_string().white());
    if report.scaled {
        println!("  {:<16} {}", muted("Scaler"), scaler_path.display().to_string().white());
    } else {
        println!("  {:<16} {}", muted("Scaler"), dim("none"));
    }
    println!();

    Ok(())
}

pub async fn cmd_serve(
    host: Option<String>,
    port: Option<u16>,
    model: Option<PathBuf>,
    scaler: Option<PathBuf>,
    labels: Option<LabelFormat>,
) -> anyhow::Result<()> {
    let mut config = ServerConfig::default();
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }
    if let Some(path) = model {
        config.model_path = path;
    }
    if let Some(path) = scaler {
        config.scaler_path = path;
    }
    if let Some(labels) = labels {
        config.label_format = labels;
    }

    println!();
    line_box_top();
    line_box_empty();
    line_box_center(&format!("{}", "Diabetes Classifier".white().bold()));
    line_box_center(&format!("{}", dim(&format!("v{}", env!("CARGO_PKG_VERSION")))));
    line_box_empty();
    line_box_sep();
    line_box_empty();
    line_box(&kv("Predict", &format!("POST http://{}:{}/predict", config.host, config.port)));
    line_box(&kv("Model  ", &config.model_path.display().to_string()));
    line_box(&kv("Labels ", &format!("{:?}", config.label_format).to_lowercase()));
    line_box_empty();
    line_box_sep();
    line_box_empty();
    line_box_center(&format!("{}", dim("ctrl+c to stop")));
    line_box_empty();
    line_box_bottom();
    println!();

    run_server(config).await
}

pub fn cmd_predict(
    input: &str,
    model: Option<PathBuf>,
    scaler: Option<PathBuf>,
    labels: Option<LabelFormat>,
) -> anyhow::Result<()> {
    let defaults = ServerConfig::default();
    let model_path = model.unwrap_or(defaults.model_path);
    let scaler_path = scaler.unwrap_or(defaults.scaler_path);
    let format = labels.unwrap_or(defaults.label_format);

    let record: FeatureRecord = serde_json::from_str(input)
        .map_err(|e| anyhow::anyhow!("Input must be a JSON object of numeric features: {}", e))?;

    let predictor = Predictor::load(&model_path, Some(&scaler_path))?;
    let prediction = predictor.predict(&record)?;

    let rendered = serde_json::json!({ "prediction": prediction.render(format) });
    println!("{}", rendered);
    Ok(())
}
