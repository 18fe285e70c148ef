//! Use case tests for the catalog crate
//!
//! Run against `InMemoryProductRepository` and the in-process cache.

#[cfg(test)]
mod support {
    use std::str::FromStr;
    use std::sync::Arc;

    use platform::cache::CacheClient;
    use rust_decimal::Decimal;

    use crate::application::{CatalogConfig, CreateProductUseCase};
    use crate::application::view::ProductView;
    use crate::domain::entity::product::NewProduct;
    use crate::domain::value_object::{price::Price, sku::Sku};
    use crate::infra::memory::InMemoryProductRepository;

    pub struct Fixture {
        pub repo: Arc<InMemoryProductRepository>,
        pub cache: CacheClient,
        pub config: Arc<CatalogConfig>,
    }

    pub fn fixture() -> Fixture {
        Fixture {
            repo: Arc::new(InMemoryProductRepository::new()),
            cache: CacheClient::memory(),
            config: Arc::new(CatalogConfig::default()),
        }
    }

    pub fn new_product(sku: &str, name: &str, price: &str, quantity: i32, category: &str) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            description: Some(format!("{name} description")),
            price: Price::new(Decimal::from_str(price).unwrap()).unwrap(),
            quantity,
            sku: Sku::new(sku).unwrap(),
            category: category.to_string(),
            is_active: true,
        }
    }

    pub async fn seed(f: &Fixture, product: NewProduct) -> ProductView {
        CreateProductUseCase::new(f.repo.clone(), f.cache.clone(), f.config.clone())
            .execute(product)
            .await
            .unwrap()
    }
}

#[cfg(test)]
mod write_tests {
    use super::support::*;
    use crate::application::{
        CreateProductUseCase, DeleteProductUseCase, GetProductUseCase, UpdateProductUseCase,
    };
    use crate::domain::entity::product::ProductChanges;
    use crate::domain::value_object::{product_id::ProductId, sku::Sku};
    use crate::error::CatalogError;

    #[tokio::test]
    async fn test_duplicate_sku_is_conflict() {
        let f = fixture();
        seed(&f, new_product("SKU-1", "Laptop", "999.99", 5, "Electronics")).await;

        let err = CreateProductUseCase::new(f.repo.clone(), f.cache.clone(), f.config.clone())
            .execute(new_product("SKU-1", "Other", "1", 1, "Misc"))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::SkuTaken));
        assert_eq!(err.status_code(), 409);
    }

    #[tokio::test]
    async fn test_update_refreshes_item_cache() {
        let f = fixture();
        let created = seed(&f, new_product("SKU-1", "Laptop", "999.99", 5, "Electronics")).await;
        let get = GetProductUseCase::new(f.repo.clone(), f.cache.clone(), f.config.clone());
        assert_eq!(get.execute(created.id).await.unwrap().name, "Laptop");

        UpdateProductUseCase::new(f.repo.clone(), f.cache.clone())
            .execute(
                created.id,
                ProductChanges {
                    name: Some("Laptop Pro".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(get.execute(created.id).await.unwrap().name, "Laptop Pro");
    }

    #[tokio::test]
    async fn test_update_sku_conflict_and_own_sku() {
        let f = fixture();
        let a = seed(&f, new_product("SKU-A", "Alpha", "1", 1, "Misc")).await;
        seed(&f, new_product("SKU-B", "Beta", "1", 1, "Misc")).await;
        let use_case = UpdateProductUseCase::new(f.repo.clone(), f.cache.clone());

        let err = use_case
            .execute(
                a.id,
                ProductChanges {
                    sku: Some(Sku::new("SKU-B").unwrap()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::SkuTaken));

        let same = use_case
            .execute(
                a.id,
                ProductChanges {
                    sku: Some(Sku::new("SKU-A").unwrap()),
                    quantity: Some(7),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(same.quantity, 7);
    }

    #[tokio::test]
    async fn test_missing_product_is_not_found() {
        let f = fixture();
        let missing = ProductId::new();

        let err = UpdateProductUseCase::new(f.repo.clone(), f.cache.clone())
            .execute(missing, ProductChanges::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::ProductNotFound));

        let err = DeleteProductUseCase::new(f.repo.clone(), f.cache.clone())
            .execute(missing)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn test_delete_evicts_item_cache() {
        let f = fixture();
        let created = seed(&f, new_product("SKU-1", "Laptop", "10", 5, "Electronics")).await;
        let get = GetProductUseCase::new(f.repo.clone(), f.cache.clone(), f.config.clone());
        get.execute(created.id).await.unwrap();

        DeleteProductUseCase::new(f.repo.clone(), f.cache.clone())
            .execute(created.id)
            .await
            .unwrap();

        assert!(matches!(
            get.execute(created.id).await,
            Err(CatalogError::ProductNotFound)
        ));
    }
}

#[cfg(test)]
mod read_tests {
    use super::support::*;
    use crate::application::{GetProductUseCase, ListProductsUseCase, ProductStatsUseCase};
    use crate::domain::entity::product::Product;
    use crate::domain::query::{ProductFilter, ProductQuery, SortField, SortOrder};
    use crate::domain::repository::{CategoryCount, ProductRepository};

    async fn seed_catalog(f: &Fixture) {
        seed(f, new_product("LAP-001", "Laptop", "999.99", 5, "Electronics")).await;
        seed(f, new_product("PHN-001", "Phone", "499.50", 20, "Electronics")).await;
        seed(f, new_product("BK-001", "Rust Book", "39.90", 3, "Books")).await;
        let mut inactive = new_product("BK-002", "Old Book", "5", 50, "Books");
        inactive.is_active = false;
        seed(f, inactive).await;
        seed(f, new_product("MUG-001", "Mug", "12.5", 100, "Kitchen")).await;
    }

    #[tokio::test]
    async fn test_pagination_metadata() {
        let f = fixture();
        seed_catalog(&f).await;
        let list = ListProductsUseCase::new(f.repo.clone(), f.cache.clone(), f.config.clone());

        let first = list
            .execute(ProductQuery {
                limit: 2,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(first.products.len(), 2);
        assert_eq!(first.pagination.total_count, 5);
        assert_eq!(first.pagination.total_pages, 3);
        assert!(first.pagination.has_next_page);
        assert!(!first.pagination.has_prev_page);

        let last = list
            .execute(ProductQuery {
                page: 3,
                limit: 2,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(last.products.len(), 1);
        assert!(!last.pagination.has_next_page);
        assert!(last.pagination.has_prev_page);
    }

    #[tokio::test]
    async fn test_filters_and_sort() {
        let f = fixture();
        seed_catalog(&f).await;
        let list = ListProductsUseCase::new(f.repo.clone(), f.cache.clone(), f.config.clone());

        let books = list
            .execute(ProductQuery {
                filter: ProductFilter {
                    category: Some("book".into()),
                    is_active: Some(true),
                    ..Default::default()
                },
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(books.products.len(), 1);
        assert_eq!(books.products[0].sku.as_str(), "BK-001");

        let by_sku = list
            .execute(ProductQuery {
                filter: ProductFilter {
                    search: Some("phn".into()),
                    ..Default::default()
                },
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_sku.products.len(), 1);

        let cheapest_first = list
            .execute(ProductQuery {
                sort_by: SortField::Price,
                sort_order: SortOrder::Asc,
                ..Default::default()
            })
            .await
            .unwrap();
        let prices: Vec<String> = cheapest_first
            .products
            .iter()
            .map(|p| p.price.to_string())
            .collect();
        assert_eq!(prices, vec!["5.00", "12.50", "39.90", "499.50", "999.99"]);
    }

    #[tokio::test]
    async fn test_cached_reads_are_identical() {
        let f = fixture();
        seed_catalog(&f).await;
        let list = ListProductsUseCase::new(f.repo.clone(), f.cache.clone(), f.config.clone());

        let first = list.execute(ProductQuery::default()).await.unwrap();
        let second = list.execute(ProductQuery::default()).await.unwrap();
        assert_eq!(
            serde_json::to_vec(&first).unwrap(),
            serde_json::to_vec(&second).unwrap()
        );

        let id = first.products[0].id;
        let get = GetProductUseCase::new(f.repo.clone(), f.cache.clone(), f.config.clone());
        let a = get.execute(id).await.unwrap();
        let b = get.execute(id).await.unwrap();
        assert_eq!(serde_json::to_vec(&a).unwrap(), serde_json::to_vec(&b).unwrap());
    }

    #[tokio::test]
    async fn test_list_cache_follows_use_case_writes_only() {
        let f = fixture();
        seed_catalog(&f).await;
        let list = ListProductsUseCase::new(f.repo.clone(), f.cache.clone(), f.config.clone());
        assert_eq!(list.execute(ProductQuery::default()).await.unwrap().products.len(), 5);

        // A write through the use case bumps the generation: the list is fresh.
        seed(&f, new_product("NEW-001", "New", "1", 1, "Misc")).await;
        assert_eq!(list.execute(ProductQuery::default()).await.unwrap().products.len(), 6);

        // A write behind the cache's back stays invisible until the entry expires.
        let sneaky = Product::new(new_product("SNK-001", "Sneaky", "1", 1, "Misc"));
        f.repo.create(&sneaky).await.unwrap();
        assert_eq!(list.execute(ProductQuery::default()).await.unwrap().products.len(), 6);
    }

    #[tokio::test]
    async fn test_stats() {
        let f = fixture();
        seed_catalog(&f).await;

        let stats = ProductStatsUseCase::new(f.repo.clone(), f.cache.clone(), f.config.clone())
            .execute()
            .await
            .unwrap();

        assert_eq!(stats.total_products, 5);
        assert_eq!(stats.active_products, 4);
        assert_eq!(stats.inactive_products, 1);
        assert_eq!(stats.total_value.to_string(), "1556.89");
        assert_eq!(stats.categories_count, 3);
        assert_eq!(
            stats.categories[0],
            CategoryCount {
                name: "Books".into(),
                count: 2
            }
        );
        // Laptop (5) and Rust Book (3); Old Book is inactive
        assert_eq!(stats.low_stock_products, 2);
    }
}
