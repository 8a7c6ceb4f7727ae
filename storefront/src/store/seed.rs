// storefront/src/store/seed.rs

//! Demo catalog used when `SEED_DB=true` and by tests.

use super::DataStore;
use crate::errors::Result;
use crate::models::NewProduct;
use rust_decimal::Decimal;
use tracing::info;

struct SeedProduct {
  id: &'static str,
  name: &'static str,
  code: &'static str,
  price_paise: i64,
  description: &'static str,
}

const SEED: &[(&str, &[(&str, &[SeedProduct])])] = &[
  (
    "Kitchen",
    &[
      (
        "Cookware",
        &[
          SeedProduct {
            id: "kadai-28",
            name: "Cast Iron Kadai 28cm",
            code: "KIT-KD-28",
            price_paise: 149_900,
            description: "Pre-seasoned cast iron kadai.",
          },
          SeedProduct {
            id: "tawa-30",
            name: "Flat Tawa 30cm",
            code: "KIT-TW-30",
            price_paise: 69_900,
            description: "Heavy gauge tawa for rotis and dosas.",
          },
        ],
      ),
      (
        "Storage",
        &[SeedProduct {
          id: "steel-dabba-set",
          name: "Steel Dabba Set of 5",
          code: "KIT-SD-05",
          price_paise: 39_900,
          description: "Stackable stainless steel containers.",
        }],
      ),
    ],
  ),
  (
    "Home",
    &[(
      "Linen",
      &[
        SeedProduct {
          id: "cotton-bedsheet",
          name: "Cotton Bedsheet Double",
          code: "HOM-BS-02",
          price_paise: 89_900,
          description: "Hand block printed, 220 thread count.",
        },
        SeedProduct {
          id: "bath-towel",
          name: "Bath Towel",
          code: "HOM-BT-01",
          price_paise: 24_950,
          description: "Soft terry cotton towel.",
        },
      ],
    )],
  ),
];

/// Writes the demo categories and products. Returns the number of products created.
pub async fn seed_demo_catalog(store: &dyn DataStore) -> Result<usize> {
  let mut created = 0;
  for (cat_pos, (category_name, subcategories)) in SEED.iter().enumerate() {
    let category = store.create_category(category_name, cat_pos as i32).await?;
    for (sub_pos, (sub_name, products)) in subcategories.iter().enumerate() {
      let sub = store.create_subcategory(category.id, sub_name, sub_pos as i32).await?;
      for p in products.iter() {
        store
          .create_product(NewProduct {
            id: Some(p.id.to_string()),
            name: p.name.to_string(),
            code: p.code.to_string(),
            description: Some(p.description.to_string()),
            price: Decimal::new(p.price_paise, 2),
            image_url: Some(format!("/images/{}.jpg", p.id)),
            category_id: Some(category.id),
            subcategory_id: Some(sub.id),
            is_active: true,
          })
          .await?;
        created += 1;
      }
    }
  }
  info!(products = created, "Demo catalog seeded.");
  Ok(created)
}
