// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Kante — document corner detection.
//
// Entry point. Loads an image, runs the edge/line front end and the corner
// detector, and prints the detection report as JSON on stdout. Logs go to
// stderr so the output stays machine-readable.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;

use kante_core::{Corners, ImageSize, KanteConfig, KanteError, Result};
use kante_detect::{CornerDetector, DetectionReport, EdgeExtractor};

#[derive(Parser)]
#[command(name = "kante")]
#[command(about = "Find the four corners of a document in a photo")]
#[command(version)]
struct Cli {
    /// Path to the input image.
    image: PathBuf,

    /// JSON configuration file; omitted options keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Also report the corners mapped onto a view of this size, e.g. 1080x1920.
    #[arg(long, value_parser = parse_size)]
    view_size: Option<ImageSize>,

    /// Pretty-print the JSON report.
    #[arg(long)]
    pretty: bool,
}

#[derive(Serialize)]
struct Output {
    #[serde(flatten)]
    report: DetectionReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    view_corners: Option<Corners>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Detection failed");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => KanteConfig::load(path)?,
        None => KanteConfig::default(),
    };

    let extractor = EdgeExtractor::new(config.preprocess)?;
    let detector = CornerDetector::new(config.detection)?;
    tracing::debug!(
        detection = ?detector.config(),
        preprocess = ?extractor.config(),
        "Configuration loaded"
    );

    let frame = extractor.open(&cli.image)?;
    let report = detector.detect(&frame.edges, &frame.lines);
    let view_corners = cli
        .view_size
        .and_then(|size| report.detection.corners().map(|c| c.scaled_to(size)));

    let output = Output {
        report,
        view_corners,
    };
    let json = if cli.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{json}");
    Ok(())
}

/// Parse `WIDTHxHEIGHT`.
fn parse_size(text: &str) -> std::result::Result<ImageSize, String> {
    let (w, h) = text
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {text:?}"))?;
    let width: u32 = w.trim().parse().map_err(|e| format!("bad width {w:?}: {e}"))?;
    let height: u32 = h.trim().parse().map_err(|e| format!("bad height {h:?}: {e}"))?;
    if width == 0 || height == 0 {
        return Err(KanteError::EmptyImage { width, height }.to_string());
    }
    Ok(ImageSize::new(width, height))
}
