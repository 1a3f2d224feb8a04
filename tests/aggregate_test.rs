//! 献立JSONからの一括集計テスト

use meal_cart::commands::parse_meals;
use meal_cart_common::{
    build_shopping_list_from_meals, format_item_display, parse_amount, Category, Unit,
};
use pretty_assertions::assert_eq;

const WEEK_PLAN: &str = r#"{
  "meals": [
    {
      "mealId": "mon-dinner",
      "mealName": "Lemon chicken",
      "generator": "recipe",
      "day": "Mon",
      "slot": "dinner",
      "ingredients": [
        {"item": "boneless chicken breasts", "amount": "1 1/2 lb"},
        {"item": "olive oil", "amount": "2 tbsp"},
        {"item": "lemons", "amount": "2"},
        {"item": "salt", "amount": "to taste"}
      ]
    },
    {
      "mealId": "tue-lunch",
      "mealName": "Grain bowl",
      "generator": "ai",
      "day": "Tue",
      "slot": "lunch",
      "ingredients": ["1 tbsp olive oil", "1/2 cup rice", "8 oz chicken breast"]
    },
    {
      "mealId": "snack",
      "mealName": "Yogurt",
      "generator": "manual",
      "ingredients": {"greek yogurt": "1 cup", "honey": ".25 cup"}
    }
  ]
}"#;

#[test]
fn test_week_plan_aggregation() {
    let meals = parse_meals(WEEK_PLAN).unwrap();
    let list = build_shopping_list_from_meals(&meals);

    let olive = list.iter().find(|i| i.name == "Olive oil").unwrap();
    assert_eq!(olive.total_qty, 3.0);
    assert_eq!(olive.unit, Some(Unit::Tbsp));
    assert_eq!(olive.sources.len(), 2);

    // 1.5 lb と 8 oz は単位が違うので別品目
    let chicken: Vec<_> = list.iter().filter(|i| i.name == "Chicken breast").collect();
    assert_eq!(chicken.len(), 2);

    // "to taste" は集計に含まれない
    assert!(list.iter().all(|i| i.name != "Salt"));

    let honey = list.iter().find(|i| i.name == "Honey").unwrap();
    assert_eq!(honey.total_qty, 0.25);
    assert_eq!(honey.category, Category::Pantry);
}

#[test]
fn test_week_plan_sorted_by_aisle() {
    let meals = parse_meals(WEEK_PLAN).unwrap();
    let list = build_shopping_list_from_meals(&meals);
    let orders: Vec<usize> = list.iter().map(|i| i.category.aisle_order()).collect();
    let mut sorted = orders.clone();
    sorted.sort();
    assert_eq!(orders, sorted);
}

#[test]
fn test_week_plan_keys_unique() {
    let meals = parse_meals(WEEK_PLAN).unwrap();
    let list = build_shopping_list_from_meals(&meals);
    let mut keys: Vec<&str> = list.iter().map(|i| i.key.as_str()).collect();
    let total = keys.len();
    keys.sort();
    keys.dedup();
    assert_eq!(keys.len(), total);
}

#[test]
fn test_display_lines() {
    let meals = parse_meals(WEEK_PLAN).unwrap();
    let list = build_shopping_list_from_meals(&meals);

    let lemons = list.iter().find(|i| i.name == "Lemons").unwrap();
    assert_eq!(
        format_item_display(lemons),
        "Lemons — 2 • Produce • for Lemon chicken (recipe) — Mon dinner"
    );

    let olive = list.iter().find(|i| i.name == "Olive oil").unwrap();
    assert_eq!(
        format_item_display(olive),
        "Olive oil — 3 tbsp • Pantry • from 2 meals"
    );
}

#[test]
fn test_parse_amount_scenario() {
    let parsed = parse_amount("1 1/2 cups rice");
    assert_eq!(parsed.amount, 1.5);
    assert_eq!(parsed.unit, Some(Unit::Cup));
    assert_eq!(parsed.rest, "rice");
}

#[test]
fn test_line_ingredients_keep_multi_word_names() {
    let meals = parse_meals(
        r#"[{"mealId": "m", "mealName": "Salsa", "ingredients": ["2 red onions", "3 garlic cloves"]}]"#,
    )
    .unwrap();
    let list = build_shopping_list_from_meals(&meals);

    let onion = list.iter().find(|i| i.name == "Red onion").unwrap();
    assert_eq!(onion.total_qty, 2.0);
    assert_eq!(onion.unit, None);
    assert_eq!(onion.category, Category::Produce);
    assert_eq!(format_item_display(onion), "Red onion — 2 • Produce • for Salsa");

    let garlic = list.iter().find(|i| i.name == "Garlic").unwrap();
    assert_eq!(garlic.total_qty, 3.0);
    assert_eq!(garlic.unit, Some(Unit::Clove));
    assert_eq!(garlic.category, Category::Produce);
}
