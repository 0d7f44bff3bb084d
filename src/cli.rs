use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "poster-ai")]
#[command(about = "医師紹介ポスターAI抽出・一覧表生成ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// ポスターフォルダを一括処理して一覧表を出力
    Run {
        /// ポスター画像フォルダのパス（サブフォルダも走査）
        #[arg(required = true)]
        folder: PathBuf,

        /// 出力ファイル/ディレクトリ（デフォルト: 入力フォルダ）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 出力形式 (excel/json/both)
        #[arg(short, long, default_value = "excel")]
        format: ExportFormat,

        /// 要約に使うチャットモデル（設定より優先）
        #[arg(short, long)]
        model: Option<String>,

        /// キャッシュを使用（処理済み画像をスキップ）
        #[arg(long)]
        use_cache: bool,
    },

    /// チャットモデルにプロンプトを送って回答を表示
    Chat {
        /// 送信するプロンプト
        #[arg(required = true)]
        prompt: String,

        /// チャットモデル（設定より優先）
        #[arg(short, long)]
        model: Option<String>,

        /// ストリーミングせず完了後にまとめて表示
        #[arg(long)]
        no_stream: bool,
    },

    /// 設定を表示/編集
    Config {
        /// チャットエンドポイントを設定
        #[arg(long)]
        set_endpoint: Option<String>,

        /// チャットモデルを設定
        #[arg(long)]
        set_model: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },

    /// キャッシュ管理
    Cache {
        /// キャッシュを削除
        #[arg(long)]
        clear: bool,

        /// 対象フォルダ（省略時はカレント）
        #[arg(short, long)]
        folder: Option<PathBuf>,

        /// キャッシュ情報を表示
        #[arg(long)]
        info: bool,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Excel,
    Json,
    Both,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            "json" => Ok(ExportFormat::Json),
            "both" => Ok(ExportFormat::Both),
            _ => Err(format!("Unknown format: {}. Use excel, json, or both", s)),
        }
    }
}
