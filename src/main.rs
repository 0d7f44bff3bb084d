use clap::Parser;
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use poster_ai_rust::{batch, chat, cli, config, error, export, logging, ocr, summary};
use batch::cache::CacheFile;
use batch::{BatchProcessor, BatchStatus};
use chat::ChatClient;
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use std::io::Write;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Run { folder, output, format, model, use_cache } => {
            println!("🩺 poster-ai - ポスター一括抽出\n");

            if !folder.is_dir() {
                println!("フォルダが見つかりません: {}", folder.display());
                println!("正しいフォルダのパスを指定してください");
                return Ok(());
            }

            // 1. エンジン準備（1度だけ生成して全画像で使う）
            println!("[1/3] OCRエンジンとチャットモデルを準備中...");
            let ocr_engine = ocr::build_engine(&config)?;
            let mut chat_client = ChatClient::from_config(&config)?;
            if let Some(model) = model {
                chat_client = chat_client.with_model(model);
            }
            println!("✔ OCR: {:?} / チャット: {}\n", config.ocr_backend, chat_client.model());

            let progress = ProgressBar::new(0);
            progress.set_style(
                ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );

            let processor = BatchProcessor::new(ocr_engine, Box::new(chat_client))
                .with_schema(config.schema())
                .with_ocr_prompt(config.ocr_prompt.clone())
                .with_progress(progress);

            // 2. 抽出
            println!("[2/3] OCR・AI解析中...{}", if use_cache { " (キャッシュ有効)" } else { "" });
            let report = if use_cache {
                let mut cache = CacheFile::load(&folder);
                let report = processor.run_with_cache(&folder, &mut cache).await?;
                cache.save(&folder)?;
                report
            } else {
                processor.run(&folder).await?
            };
            println!("✔ 解析完了\n");

            // 3. 出力
            if report.status() == BatchStatus::Completed {
                println!("[3/3] 結果を保存中...");
                let output_dir = output.unwrap_or_else(|| folder.clone());
                let written = export::export_report(
                    &report.table,
                    &format,
                    &output_dir,
                    &config.output_file_name,
                )?;
                for path in &written {
                    println!("✔ 表を保存: {}", path.display());
                }
                println!();
            }

            summary::print_summary(&report);
        }

        Commands::Chat { prompt, model, no_stream } => {
            let mut client = ChatClient::from_config(&config)?;
            if let Some(model) = model {
                client = client.with_model(model);
            }

            if no_stream {
                println!("{}", client.chat_complete(&prompt).await?);
            } else {
                let mut stream = client.chat_stream(&prompt).await?;
                let mut stdout = std::io::stdout();
                while let Some(fragment) = stream.next().await {
                    write!(stdout, "{}", fragment?)?;
                    stdout.flush()?;
                }
                writeln!(stdout)?;
            }
        }

        Commands::Config { set_endpoint, set_model, show } => {
            let mut config = config;

            if let Some(endpoint) = set_endpoint {
                config.set_endpoint(endpoint)?;
                println!("✔ エンドポイントを設定しました");
            }

            if let Some(model) = set_model {
                config.set_chat_model(model)?;
                println!("✔ チャットモデルを設定しました");
            }

            if show {
                println!("設定:");
                println!("  エンドポイント: {}", config.endpoint());
                println!("  チャットモデル: {}", config.chat_model);
                println!("  OCR方式: {:?}", config.ocr_backend);
                println!("  OCRモデル: {}", config.ocr_model);
                if !config.ocr_command.is_empty() {
                    println!("  OCRコマンド: {}", config.ocr_command.join(" "));
                }
                println!("  出力ファイル名: {}", config.output_file_name);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                let schema = config.schema();
                println!("  抽出項目 ({}): {}", schema.len(), schema.names().collect::<Vec<_>>().join(", "));
            }
        }

        Commands::Cache { clear, folder, info } => {
            let target = folder.unwrap_or_else(|| std::path::PathBuf::from("."));
            let cache_path = CacheFile::cache_path(&target);

            if info || !clear {
                // デフォルトまたは--info: 情報表示
                if cache_path.exists() {
                    let cache = CacheFile::load(&target);
                    println!("キャッシュ情報:");
                    println!("  パス: {}", cache_path.display());
                    println!("  件数: {}", cache.len());
                    if let Ok(meta) = std::fs::metadata(&cache_path) {
                        println!("  サイズ: {} bytes", meta.len());
                    }
                } else {
                    println!("キャッシュファイルが存在しません: {}", cache_path.display());
                }
            }

            if clear {
                match CacheFile::clear(&target) {
                    Ok(true) => println!("✔ キャッシュを削除しました: {}", cache_path.display()),
                    Ok(false) => println!("キャッシュファイルが存在しません"),
                    Err(e) => println!("キャッシュ削除エラー: {}", e),
                }
            }
        }
    }

    Ok(())
}
