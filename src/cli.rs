use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Vocabulary deck patcher (translation fixes + version bumps)")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// パッチ計画を単語帳に適用
    Apply {
        /// パッチ計画ファイル（既定: <deck-dir>/patches.json）
        #[arg(long)]
        plan: Option<PathBuf>,
        /// 単語帳ディレクトリ（既定: decks）
        #[arg(long)]
        deck_dir: Option<PathBuf>,
        /// 変更内容を表示するだけで書き込まない
        #[arg(long, default_value_t = false)]
        dry_run: bool,
        /// 指定したパッチセットだけを適用（複数指定可）
        #[arg(long = "only", value_name = "NAME")]
        only: Vec<String>,
    },
    /// 単語帳 1 つのバージョンを更新
    Bump {
        /// 単語帳ファイル名（deck-dir からの相対）
        file: String,
        /// 新しいバージョン
        version: String,
        #[arg(long)]
        deck_dir: Option<PathBuf>,
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
    /// パッチ計画の内容と重複修正を一覧表示
    List {
        #[arg(long)]
        plan: Option<PathBuf>,
        #[arg(long)]
        deck_dir: Option<PathBuf>,
    },
}
