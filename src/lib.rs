//! meal-cart
//!
//! 献立から買い物リストを集計し、保存済みリストを管理するCLI。
//! 集計・リストの本体は `meal-cart-common` にある。

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod review;
pub mod storage;
