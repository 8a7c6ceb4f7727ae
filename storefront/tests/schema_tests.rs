// tests/schema_tests.rs

const SCHEMA: &str = include_str!("../schema.sql");

#[test]
fn test_money_columns_keep_full_precision() {
  for column in ["price", "subtotal", "shipping_fee", "total", "unit_price"] {
    let declarations: Vec<&str> = SCHEMA
      .lines()
      .map(str::trim)
      .filter(|l| l.split_whitespace().next() == Some(column))
      .collect();
    assert!(!declarations.is_empty(), "no column named {}", column);
    for declaration in declarations {
      assert!(
        declaration.split_whitespace().nth(1) == Some("NUMERIC"),
        "{} should be an unscaled NUMERIC: {}",
        column,
        declaration
      );
    }
  }
}

#[test]
fn test_checkout_token_is_unique() {
  assert!(SCHEMA
    .lines()
    .any(|l| l.trim().starts_with("checkout_token") && l.contains("UNIQUE")));
}
