//! PolyExport CLI - Bridge interface for map front-ends
//!
//! Commands: area, scale, export
//! Outputs JSON to stdout, logs to stderr
//! Returns non-zero on invalid input or failed export

use chrono::Utc;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use polyexport_core::{
    format_area, ExportFormat, ExportPipeline, ExportRequest, ExportSettings, Ring,
    ENGINE_VERSION,
};

#[derive(Parser)]
#[command(name = "polyexport-cli")]
#[command(about = "PolyExport CLI - Polygon area, scaling and GIS export")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to export settings (JSON)
    #[arg(short, long, default_value = "polyexport.json")]
    config: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the Web Mercator area of a polygon
    Area {
        /// JSON vertex list: [{"lat": .., "lng": ..}, ...]
        #[arg(short, long)]
        payload: String,
    },

    /// Scale a polygon to a target area
    Scale {
        /// JSON vertex list
        #[arg(short, long)]
        payload: String,

        /// Target area in square meters
        #[arg(short, long, allow_negative_numbers = true)]
        target: f64,
    },

    /// Export a polygon as geojson, kml or shapefile
    Export {
        /// JSON vertex list
        #[arg(short, long)]
        payload: String,

        /// geojson | kml | shp
        #[arg(short, long)]
        format: ExportFormat,

        /// Scale to this area (square meters) before export
        #[arg(short, long, allow_negative_numbers = true)]
        target: Option<f64>,

        /// Directory to write the artifact into; omitted prints base64 data
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

fn parse_ring(payload: &str) -> Result<Ring, serde_json::Error> {
    serde_json::from_str(payload)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let settings = match ExportSettings::load(&cli.config) {
        Ok(s) => s,
        Err(e) => {
            let output = serde_json::json!({ "error": e.to_string() });
            println!("{}", output);
            return ExitCode::FAILURE;
        }
    };

    let pipeline = ExportPipeline::new(settings);

    match cli.command {
        Commands::Area { payload } => {
            let ring = match parse_ring(&payload) {
                Ok(r) => r,
                Err(e) => {
                    println!("{}", serde_json::json!({ "error": format!("Invalid payload: {}", e) }));
                    return ExitCode::FAILURE;
                }
            };
            let area = pipeline.area(&ring);
            let output = serde_json::json!({
                "areaSqM": area,
                "display": format_area(area),
            });
            println!("{}", output);
            ExitCode::SUCCESS
        }

        Commands::Scale { payload, target } => {
            let ring = match parse_ring(&payload) {
                Ok(r) => r,
                Err(e) => {
                    println!("{}", serde_json::json!({ "error": format!("Invalid payload: {}", e) }));
                    return ExitCode::FAILURE;
                }
            };
            let scaled = pipeline.scale(&ring, target);
            let output = serde_json::json!({
                "vertices": scaled,
                "areaSqM": pipeline.area(&scaled),
            });
            println!("{}", output);
            ExitCode::SUCCESS
        }

        Commands::Export { payload, format, target, out } => {
            let ring = match parse_ring(&payload) {
                Ok(r) => r,
                Err(e) => {
                    println!("{}", serde_json::json!({ "success": false, "error": format!("Invalid payload: {}", e) }));
                    return ExitCode::FAILURE;
                }
            };

            let mut request = ExportRequest::new(format, Utc::now().date_naive());
            if let Some(t) = target {
                request = request.with_target(t);
            }

            let artifact = match pipeline.export(&ring, &request) {
                Ok(a) => a,
                Err(e) => {
                    let output = serde_json::json!({
                        "success": false,
                        "error": e.to_string(),
                    });
                    println!("{}", output);
                    return ExitCode::from(2);
                }
            };

            let output = match out {
                Some(dir) => {
                    let path = dir.join(&artifact.filename);
                    if let Err(e) = fs::write(&path, &artifact.data) {
                        println!("{}", serde_json::json!({ "success": false, "error": e.to_string() }));
                        return ExitCode::FAILURE;
                    }
                    serde_json::json!({
                        "success": true,
                        "engineVersion": ENGINE_VERSION,
                        "path": path,
                        "filename": artifact.filename,
                        "mimeType": artifact.mime_type,
                        "areaSqM": artifact.area_sq_m,
                        "checksum": artifact.checksum,
                    })
                }
                None => serde_json::json!({
                    "success": true,
                    "engineVersion": ENGINE_VERSION,
                    "artifact": artifact,
                }),
            };
            println!("{}", output);
            ExitCode::SUCCESS
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_target_parses() {
        let cli = Cli::try_parse_from([
            "polyexport-cli",
            "scale",
            "--payload",
            "[]",
            "--target",
            "-5",
        ])
        .unwrap();
        match cli.command {
            Commands::Scale { target, .. } => assert_eq!(target, -5.0),
            _ => panic!("expected scale command"),
        }
    }

    #[test]
    fn test_negative_export_target_parses() {
        let cli = Cli::try_parse_from([
            "polyexport-cli",
            "export",
            "-p",
            "[]",
            "-f",
            "kml",
            "-t",
            "-1.5",
        ])
        .unwrap();
        match cli.command {
            Commands::Export { target, format, .. } => {
                assert_eq!(target, Some(-1.5));
                assert_eq!(format, ExportFormat::Kml);
            }
            _ => panic!("expected export command"),
        }
    }
}
