use thiserror::Error;

#[derive(Error, Debug)]
pub enum MealCartError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("献立ファイルが不正: {0}")]
    InvalidMeals(String),

    #[error("項目が見つかりません: {0}")]
    ItemNotFound(String),

    #[error("リストの保存に失敗: {0}")]
    Store(#[from] meal_cart_common::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("入力エラー: {0}")]
    Prompt(#[from] dialoguer::Error),
}

pub type Result<T> = std::result::Result<T, MealCartError>;
