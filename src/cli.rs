use clap::{Parser, Subcommand, ValueEnum};
use meal_cart_common::Rounding;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "meal-cart")]
#[command(about = "献立から買い物リストを集計・管理するツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 献立JSONから買い物リストを一括集計（保存はしない）
    Build {
        /// 献立JSONファイル
        #[arg(required = true)]
        meals: PathBuf,

        /// JSONで出力
        #[arg(long)]
        json: bool,

        /// 出力ファイル（省略時は標準出力）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 各品目の出所（献立ごとの内訳）を表示
        #[arg(long)]
        explain: bool,
    },

    /// 献立JSONを集計して保存済みリストに追加
    FromMeals {
        /// 献立JSONファイル
        #[arg(required = true)]
        meals: PathBuf,
    },

    /// リストに項目を追加
    Add {
        /// 食材名
        #[arg(required = true)]
        name: String,

        /// 分量（"2", "1 1/2 cups" など）
        #[arg(short, long)]
        qty: Option<String>,

        /// 単位
        #[arg(short, long)]
        unit: Option<String>,

        /// メモ
        #[arg(short, long)]
        note: Option<String>,

        /// 売り場
        #[arg(short, long)]
        cat: Option<String>,
    },

    /// 保存済みリストを表示
    List {
        /// JSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 項目をチェック（購入済みに）
    Check {
        /// 項目ID（先頭数文字でも可）
        #[arg(required = true)]
        id: String,

        /// チェックを外す
        #[arg(long)]
        off: bool,
    },

    /// 項目を編集
    Edit {
        /// 項目ID（先頭数文字でも可）
        #[arg(required = true)]
        id: String,

        /// 名前
        #[arg(long)]
        name: Option<String>,

        /// 分量
        #[arg(short, long)]
        qty: Option<f64>,

        /// 単位（空文字で削除）
        #[arg(short, long)]
        unit: Option<String>,

        /// メモ（空文字で削除）
        #[arg(short, long)]
        note: Option<String>,

        /// 売り場（空文字で削除）
        #[arg(short, long)]
        cat: Option<String>,
    },

    /// 項目を削除
    Remove {
        /// 項目ID（先頭数文字でも可）
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// リストを空にする
    Clear {
        /// チェック済みの項目だけ削除
        #[arg(long)]
        checked: bool,
    },

    /// リスト設定を表示/編集
    Options {
        /// 売り場ごとに表示
        #[arg(long)]
        group_by_aisle: Option<bool>,

        /// 常備品を追加しない
        #[arg(long)]
        exclude_pantry: Option<bool>,

        /// 丸め方 (none/friendly)
        #[arg(long)]
        rounding: Option<Rounding>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },

    /// 週単位のリセットを切り替え
    Week {
        #[arg(value_enum)]
        state: Toggle,
    },

    /// 対話的にチェックを付ける
    Review,

    /// 設定を表示/編集
    Config {
        /// データディレクトリを設定
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// 常備品を追加
        #[arg(long)]
        add_staple: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

impl Toggle {
    pub fn enabled(&self) -> bool {
        matches!(self, Toggle::On)
    }
}
