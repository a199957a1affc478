//! Parse command - extract data from a single receipt.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::AsyncReadExt;
use tracing::{debug, info};

use rcpt_core::models::config::OutputConfig;
use rcpt_core::{HeuristicReceiptParser, InputError, OcrDocument, ParsedReceipt, ReceiptParser};

use super::load_config;

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Input file (.txt OCR text, .json OCR output) or - for stdin
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Show extraction confidence and missing fields
    #[arg(long)]
    show_confidence: bool,

    /// Validate extracted data
    #[arg(long)]
    validate: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub async fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);

    pb.set_message("Reading input...");
    let text = read_input(&args.input).await?;

    info!("Parsing {}", args.input.display());
    pb.set_message("Extracting receipt data...");

    let parser = HeuristicReceiptParser::from_config(config.extraction.clone());
    let result = parser.parse(&text);

    pb.finish_and_clear();

    if args.validate {
        let issues = result.receipt.validate();
        if !issues.is_empty() {
            eprintln!("{}", style("Validation issues:").yellow());
            for issue in &issues {
                eprintln!("  - {}", issue);
            }
        }
    }

    let output = format_receipt(&result.receipt, args.format, &config.output)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.show_confidence {
        eprintln!();
        eprintln!(
            "{} Extraction confidence: {:.1}%",
            style("ℹ").blue(),
            result.confidence * 100.0
        );
        eprintln!(
            "{} Processing time: {}ms",
            style("ℹ").blue(),
            result.processing_time_ms
        );
        if !result.missing_fields.is_empty() {
            eprintln!(
                "{} Defaulted fields: {}",
                style("ℹ").blue(),
                result.missing_fields.join(", ")
            );
        }
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Read receipt text from a `.txt` file, an OCR `.json` document or stdin.
///
/// Stdin holding a JSON object is read as an OCR document.
pub async fn read_input(input: &Path) -> anyhow::Result<String> {
    if input.as_os_str() == "-" {
        let mut content = String::new();
        tokio::io::stdin().read_to_string(&mut content).await?;
        if content.trim_start().starts_with('{') {
            return document_text(&content);
        }
        return Ok(content);
    }

    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    let extension = input
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    if !matches!(extension.as_str(), "txt" | "json") {
        return Err(InputError::UnsupportedFormat(extension).into());
    }

    let content = tokio::fs::read_to_string(input)
        .await
        .with_context(|| format!("Failed to read {}", input.display()))?;

    if extension == "json" {
        document_text(&content)
    } else {
        Ok(content)
    }
}

fn document_text(content: &str) -> anyhow::Result<String> {
    let document: OcrDocument = serde_json::from_str(content)?;
    debug!(
        "OCR document: {} pages, detector {:?}, recognizer {:?}",
        document.pages.len(),
        document.detector,
        document.recognizer
    );
    Ok(document.receipt_text()?)
}

pub fn format_receipt(
    receipt: &ParsedReceipt,
    format: OutputFormat,
    output: &OutputConfig,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => format_json(receipt, output),
        OutputFormat::Csv => format_csv(receipt),
        OutputFormat::Text => Ok(format_text(receipt)),
    }
}

fn format_json(receipt: &ParsedReceipt, output: &OutputConfig) -> anyhow::Result<String> {
    let mut value = serde_json::to_value(receipt)?;
    if !output.include_raw_text {
        if let Some(obj) = value.as_object_mut() {
            obj.remove("raw_text");
        }
    }

    if output.pretty {
        Ok(serde_json::to_string_pretty(&value)?)
    } else {
        Ok(serde_json::to_string(&value)?)
    }
}

/// Receipt row, a blank line, then one row per item.
fn format_csv(receipt: &ParsedReceipt) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "receipt_number",
        "purchase_date",
        "store_name",
        "store_address",
        "store_website",
        "payment_method",
        "tax_amount",
        "total_amount",
        "currency",
    ])?;

    wtr.write_record([
        receipt.receipt_number.as_str(),
        &receipt.purchase_date.to_string(),
        &receipt.store_name,
        receipt.store_address.as_deref().unwrap_or_default(),
        receipt.store_website.as_deref().unwrap_or_default(),
        receipt.payment_method.as_deref().unwrap_or_default(),
        &receipt.tax_amount.to_string(),
        &receipt.total_amount.to_string(),
        &receipt.currency,
    ])?;

    let mut data = String::from_utf8(wtr.into_inner()?)?;

    if !receipt.items.is_empty() {
        let mut items = csv::Writer::from_writer(vec![]);
        items.write_record(["serial_no", "description", "quantity", "unit_price", "total_price"])?;

        for item in &receipt.items {
            items.write_record([
                item.serial_no.to_string(),
                item.description.clone(),
                item.quantity.to_string(),
                item.unit_price.map(|p| p.round_dp(2).to_string()).unwrap_or_default(),
                item.total_price.to_string(),
            ])?;
        }

        data.push('\n');
        data.push_str(&String::from_utf8(items.into_inner()?)?);
    }

    Ok(data)
}

pub fn format_text(receipt: &ParsedReceipt) -> String {
    let mut output = String::new();

    output.push_str(&format!("Store: {}\n", receipt.store_name));
    if let Some(address) = &receipt.store_address {
        output.push_str(&format!("  {}\n", address));
    }
    if let Some(website) = &receipt.store_website {
        output.push_str(&format!("  {}\n", website));
    }
    output.push_str(&format!("Receipt: {}\n", receipt.receipt_number));
    output.push_str(&format!("Date: {}\n", receipt.purchase_date));
    output.push('\n');

    if !receipt.items.is_empty() {
        output.push_str("Items:\n");
        for item in &receipt.items {
            output.push_str(&format!(
                "  {:>2}. {} x{} {} {}\n",
                item.serial_no, item.description, item.quantity, item.total_price, receipt.currency
            ));
        }
        output.push('\n');
    }

    output.push_str("Summary:\n");
    output.push_str(&format!("  Tax:   {} {}\n", receipt.tax_amount, receipt.currency));
    output.push_str(&format!("  Total: {} {}\n", receipt.total_amount, receipt.currency));

    if let Some(payment) = &receipt.payment_method {
        output.push_str(&format!("\nPaid with: {}\n", payment));
    }

    output
}
