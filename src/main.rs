use clap::Parser;
use meal_cart::{cli, commands, config, error, review, storage};
use cli::{Cli, Commands};
use commands::AddOutcome;
use config::Config;
use error::Result;
use meal_cart_common::{
    build_shopping_list_from_meals, canonicalize, format_item_display, format_qty, group_by_aisle,
    ItemPatch, ListStore, NewShopItem, QtyInput, CATALOG_VERSION,
};
use storage::FileRepository;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open_store(config: &Config) -> Result<ListStore<FileRepository>> {
    let dir = config.resolve_data_dir()?;
    tracing::debug!(dir = %dir.display(), "opening shopping list");
    Ok(ListStore::new(FileRepository::new(dir)).with_pantry_staples(config.pantry_staples()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Build { meals, json, output, explain } => {
            let meals = commands::load_meals(&meals)?;
            let list = build_shopping_list_from_meals(&meals);

            let text = if json {
                serde_json::to_string_pretty(&list)?
            } else {
                let mut lines = Vec::new();
                for item in &list {
                    lines.push(format_item_display(item));
                    if explain {
                        for source in &item.sources {
                            let unit = source.unit.as_ref().map(|u| u.as_str()).unwrap_or("");
                            lines.push(format!(
                                "    ↳ {} {} — {}",
                                format_qty(source.qty),
                                unit,
                                source.meal_name
                            ));
                        }
                    }
                }
                lines.join("\n")
            };

            match output {
                Some(path) => {
                    std::fs::write(&path, text)?;
                    println!("✔ {}品目を保存: {}", list.len(), path.display());
                }
                None => println!("{}", text),
            }
        }

        Commands::FromMeals { meals } => {
            let store = open_store(&config)?;
            let meals = commands::load_meals(&meals)?;
            let list = build_shopping_list_from_meals(&meals);
            let before = store.read_list().items.len();
            let updated = store.add_items(commands::to_new_items(&list))?;
            println!(
                "✔ {}件の献立から{}品目を集計（リスト: {}件 → {}件）",
                meals.len(),
                list.len(),
                before,
                updated.items.len()
            );
        }

        Commands::Add { name, qty, unit, note, cat } => {
            let store = open_store(&config)?;
            let before = store.read_list();
            let canonical = canonicalize(&name);
            let item = NewShopItem {
                name: name.clone(),
                qty: qty.map(QtyInput::Text),
                unit,
                cat,
                note,
                checked: None,
            };
            let updated = store.add_items(vec![item])?;
            match commands::add_outcome(&before, &updated, &canonical) {
                AddOutcome::Added => println!("✔ 追加しました: {}", name),
                AddOutcome::Merged => println!("✔ 既存の項目に合算しました: {}", name),
                AddOutcome::Skipped => println!("常備品のため追加しませんでした: {}", name),
            }
        }

        Commands::List { json } => {
            let store = open_store(&config)?;
            let list = store.read_list();

            if json {
                println!("{}", serde_json::to_string_pretty(&list)?);
            } else if list.items.is_empty() {
                println!("買い物リストは空です");
            } else {
                let options = store.read_options();
                if options.group_by_aisle {
                    for (aisle, items) in group_by_aisle(&list.items, commands::item_category) {
                        println!("■ {}", aisle);
                        for item in items {
                            println!("  {}", commands::format_shop_item(item));
                        }
                    }
                } else {
                    for item in &list.items {
                        println!("{}", commands::format_shop_item(item));
                    }
                }
                let done = list.items.iter().filter(|i| i.is_checked()).count();
                println!("---");
                println!(
                    "{}/{}件チェック済み（更新: {}）",
                    done,
                    list.items.len(),
                    list.updated_at.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M")
                );
            }
        }

        Commands::Check { id, off } => {
            let store = open_store(&config)?;
            let id = commands::resolve_item_id(&store.read_list(), &id)?;
            store.toggle_checked(&id, Some(!off))?;
            let action = if off {
                "チェックを外しました"
            } else {
                "チェックしました"
            };
            println!("✔ {}: {}", action, commands::short_id(&id));
        }

        Commands::Edit { id, name, qty, unit, note, cat } => {
            let store = open_store(&config)?;
            let id = commands::resolve_item_id(&store.read_list(), &id)?;
            let patch = ItemPatch {
                name,
                qty,
                unit,
                cat,
                note,
                checked: None,
            };
            let updated = store.update_item(&id, patch)?;
            if let Some(item) = updated.find(&id) {
                println!("✔ 更新しました: {}", commands::format_shop_item(item));
            }
        }

        Commands::Remove { ids } => {
            let store = open_store(&config)?;
            let list = store.read_list();
            let resolved = ids
                .iter()
                .map(|id| commands::resolve_item_id(&list, id))
                .collect::<Result<Vec<_>>>()?;
            let updated = store.delete_items(&resolved)?;
            let removed = commands::removed_count(&resolved, &updated);
            println!("✔ {}件削除しました", removed);
        }

        Commands::Clear { checked } => {
            let store = open_store(&config)?;
            let before = store.read_list().items.len();
            let updated = if checked {
                store.clear_checked()?
            } else {
                store.clear_all()?
            };
            println!("✔ {}件削除しました", before.saturating_sub(updated.items.len()));
        }

        Commands::Options { group_by_aisle, exclude_pantry, rounding, show } => {
            let store = open_store(&config)?;
            let mut options = store.read_options();
            let changed =
                group_by_aisle.is_some() || exclude_pantry.is_some() || rounding.is_some();

            if let Some(value) = group_by_aisle {
                options.group_by_aisle = value;
            }
            if let Some(value) = exclude_pantry {
                options.exclude_pantry_staples = value;
            }
            if let Some(value) = rounding {
                options.rounding = value;
            }
            if changed {
                store.write_options(&options)?;
                println!("✔ 設定を更新しました");
            }

            if show || !changed {
                println!("リスト設定:");
                println!("  売り場ごとに表示: {}", options.group_by_aisle);
                println!("  常備品を除外: {}", options.exclude_pantry_staples);
                println!("  丸め: {}", options.rounding);
                println!("  週単位リセット: {}", options.scope_by_week);
            }
        }

        Commands::Week { state } => {
            let store = open_store(&config)?;
            store.set_week_scope(state.enabled())?;
            if state.enabled() {
                let week = store.read_list().week_key.unwrap_or_default();
                println!("✔ 週単位リセットを有効にしました（今週: {}）", week);
            } else {
                println!("✔ 週単位リセットを無効にしました");
            }
        }

        Commands::Review => {
            let store = open_store(&config)?;
            review::run_interactive_review(&store)?;
        }

        Commands::Config { data_dir, add_staple, show } => {
            let mut config = config;

            if let Some(dir) = data_dir {
                config.set_data_dir(dir)?;
                println!("✔ データディレクトリを設定しました");
            }

            if let Some(name) = add_staple {
                config.add_pantry_staple(name)?;
                println!("✔ 常備品を追加しました");
            }

            if show {
                println!("設定:");
                println!("  データディレクトリ: {}", config.resolve_data_dir()?.display());
                println!("  食材カタログ: v{}", CATALOG_VERSION);
                if config.extra_pantry_staples.is_empty() {
                    println!("  追加の常備品: なし");
                } else {
                    println!("  追加の常備品: {}", config.extra_pantry_staples.join(", "));
                }
            }
        }
    }

    Ok(())
}
