// storefront/src/catalog.rs

//! Client-side browsing over a product list the store already filtered:
//! free-text search, sorting and pagination.

use crate::models::Product;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PER_PAGE: usize = 12;
pub const MAX_PER_PAGE: usize = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
  #[default]
  Newest,
  PriceLowHigh,
  PriceHighLow,
  NameAz,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
  pub items: Vec<T>,
  /// 1-based, always within `1..=total_pages`.
  pub page: usize,
  pub per_page: usize,
  pub total_items: usize,
  /// At least 1, even for an empty result.
  pub total_pages: usize,
}

impl<T> Page<T> {
  /// Cuts one page out of `items`. Out-of-range pages are clamped.
  pub fn paginate(items: Vec<T>, page: usize, per_page: usize) -> Self {
    let per_page = per_page.clamp(1, MAX_PER_PAGE);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(per_page).max(1);
    let page = page.clamp(1, total_pages);
    let items = items.into_iter().skip((page - 1) * per_page).take(per_page).collect();
    Self {
      items,
      page,
      per_page,
      total_items,
      total_pages,
    }
  }

  pub fn has_next(&self) -> bool {
    self.page < self.total_pages
  }
}

#[derive(Debug, Clone)]
pub struct Listing {
  pub search: Option<String>,
  pub sort: SortKey,
  pub page: usize,
  pub per_page: usize,
}

impl Default for Listing {
  fn default() -> Self {
    Self {
      search: None,
      sort: SortKey::default(),
      page: 1,
      per_page: DEFAULT_PER_PAGE,
    }
  }
}

impl Listing {
  pub fn apply(&self, products: Vec<Product>) -> Page<Product> {
    let mut found = search(products, self.search.as_deref());
    sort(&mut found, self.sort);
    Page::paginate(found, self.page, self.per_page)
  }
}

/// Case-insensitive substring match on name, code and description.
/// A blank term matches everything.
pub fn search(products: Vec<Product>, term: Option<&str>) -> Vec<Product> {
  let term = match term.map(str::trim) {
    Some(t) if !t.is_empty() => t.to_lowercase(),
    _ => return products,
  };
  products
    .into_iter()
    .filter(|p| {
      p.name.to_lowercase().contains(&term)
        || p.code.to_lowercase().contains(&term)
        || p
          .description
          .as_deref()
          .map_or(false, |d| d.to_lowercase().contains(&term))
    })
    .collect()
}

/// Stable sort; ties keep their incoming order.
pub fn sort(products: &mut [Product], key: SortKey) {
  match key {
    SortKey::Newest => products.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    SortKey::PriceLowHigh => products.sort_by(|a, b| a.price.cmp(&b.price)),
    SortKey::PriceHighLow => products.sort_by(|a, b| b.price.cmp(&a.price)),
    SortKey::NameAz => products.sort_by_key(|p| p.name.to_lowercase()),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn paginate_clamps_page() {
    let page = Page::paginate((1..=25).collect::<Vec<_>>(), 9, 10);
    assert_eq!(page.page, 3);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.items, vec![21, 22, 23, 24, 25]);
    assert!(!page.has_next());

    let first = Page::paginate((1..=25).collect::<Vec<_>>(), 0, 10);
    assert_eq!(first.page, 1);
    assert!(first.has_next());
  }

  #[test]
  fn empty_result_has_one_page() {
    let page = Page::paginate(Vec::<u8>::new(), 4, 0);
    assert_eq!(page.page, 1);
    assert_eq!(page.per_page, 1);
    assert_eq!(page.total_pages, 1);
    assert!(page.items.is_empty());
  }
}
