//! 命令行解析OCR文本文件

use anyhow::Context;
use clap::Parser;
use medreport_core::{
    utils::{format_file_size, validate_file},
    MedicalReportDataDetailed, UploadConfig,
};
use medreport_extract::{PlainTextSource, RecordAssembler, TextSource};
use medreport_server::{init_tracing, load_config};
use std::path::PathBuf;
use tracing::info;

/// 解析命令行参数
#[derive(Parser, Debug)]
#[command(name = "medreport-parse")]
#[command(about = "Extract structured fields from an OCR text file")]
struct Args {
    /// OCR输出的文本文件
    file: PathBuf,

    /// 输出带元数据的详细结果
    #[arg(short, long)]
    detailed: bool,

    /// 配置文件路径
    #[arg(short, long)]
    config: Option<String>,

    /// 日志级别
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref(), args.log_level.as_deref())?;
    init_tracing(&config.logging.level);

    // 只接受OCR引擎输出的纯文本
    let policy = UploadConfig {
        allowed_extensions: vec![".txt".to_string()],
        ..config.upload.clone()
    };

    let filename = args.file.file_name().map(|name| name.to_string_lossy().into_owned());
    let size = tokio::fs::metadata(&args.file)
        .await
        .with_context(|| format!("Failed to read {}", args.file.display()))?
        .len();
    validate_file(filename.as_deref(), Some(size), &policy)?;
    info!("Processing file: {} ({})", args.file.display(), format_file_size(size));

    let text = PlainTextSource.extract_text(&args.file).await?;
    if text.trim().is_empty() {
        anyhow::bail!("No text could be extracted from {}", args.file.display());
    }

    let assembler = RecordAssembler::new()?;
    let record = assembler.parse(&text);

    let output = if args.detailed {
        let extracted = RecordAssembler::count_non_absent(&record);
        let detailed = MedicalReportDataDetailed::new(record, Some(text), filename, extracted);
        serde_json::to_string_pretty(&detailed)?
    } else {
        serde_json::to_string_pretty(&record)?
    };
    println!("{}", output);

    Ok(())
}
