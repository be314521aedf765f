// src/db/fixtures.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{json, Value};

use crate::{
    db::MemoryStore,
    models::{
        dashboard::{DashboardStat, Recommendation, RecommendationIcon, SalesPoint},
        inventory::{Product, ProductStatus},
        operations::{Order, OrderStatus},
    },
};

// ---
// Dados demo: o que a tela mostra quando o banco não responde.
// ---

pub fn demo_dashboard_stats() -> DashboardStat {
    DashboardStat {
        total_revenue: Decimal::new(4_523_189, 2),
        revenue_change: 20.1,
        total_orders: 2_350,
        orders_change: 10.5,
        new_customers: 573,
        customers_change: 12.2,
        active_products: 128,
        new_products: 12,
    }
}

pub fn demo_sales_data() -> Vec<SalesPoint> {
    [
        ("Jan", 4_000),
        ("Feb", 3_000),
        ("Mar", 5_000),
        ("Apr", 2_780),
        ("May", 1_890),
        ("Jun", 2_390),
        ("Jul", 3_490),
    ]
    .into_iter()
    .map(|(name, total)| SalesPoint { name: name.to_string(), total: Decimal::from(total) })
    .collect()
}

pub fn demo_recommendations() -> Vec<Recommendation> {
    vec![
        Recommendation {
            title: "Increase stock of best sellers".to_string(),
            description: "Smartphone Pro sold out twice this month. Restock before the weekend rush.".to_string(),
            icon: RecommendationIcon::TrendingUp,
        },
        Recommendation {
            title: "Low stock alert".to_string(),
            description: "3 products are below 5 units in stock.".to_string(),
            icon: RecommendationIcon::AlertCircle,
        },
        Recommendation {
            title: "Plan a seasonal promotion".to_string(),
            description: "Sales usually peak in the first week of the month. Schedule a stablecoin discount.".to_string(),
            icon: RecommendationIcon::Calendar,
        },
    ]
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

pub fn demo_orders() -> Vec<Order> {
    vec![
        Order {
            id: "ORD-001".to_string(),
            customer: "John Doe".to_string(),
            date: date(2024, 3, 15),
            total: Decimal::new(12_599, 2),
            status: OrderStatus::Completed,
            items: 3,
        },
        Order {
            id: "ORD-002".to_string(),
            customer: "Jane Smith".to_string(),
            date: date(2024, 3, 14),
            total: Decimal::new(8_950, 2),
            status: OrderStatus::Processing,
            items: 2,
        },
        Order {
            id: "ORD-003".to_string(),
            customer: "Budi Santoso".to_string(),
            date: date(2024, 3, 14),
            total: Decimal::new(4_500, 2),
            status: OrderStatus::Pending,
            items: 1,
        },
        Order {
            id: "ORD-004".to_string(),
            customer: "Siti Rahma".to_string(),
            date: date(2024, 3, 13),
            total: Decimal::new(21_075, 2),
            status: OrderStatus::Completed,
            items: 5,
        },
        Order {
            id: "ORD-005".to_string(),
            customer: "Alex Tan".to_string(),
            date: date(2024, 3, 12),
            total: Decimal::new(3_299, 2),
            status: OrderStatus::Cancelled,
            items: 1,
        },
    ]
}

pub fn demo_products() -> Vec<Product> {
    vec![
        Product {
            id: "1".to_string(),
            name: "Stylish Watch".to_string(),
            description: Some("Elegant watch with leather band".to_string()),
            price: Decimal::new(12_999, 2),
            category: "Accessories".to_string(),
            image: Some("https://images.unsplash.com/photo-1523275335684-37898b6baf30".to_string()),
            stock: 25,
            barcode: Some("8991234567001".to_string()),
            status: ProductStatus::Active,
        },
        Product {
            id: "2".to_string(),
            name: "Smartphone Pro".to_string(),
            description: Some("Latest smartphone with advanced features".to_string()),
            price: Decimal::new(89_999, 2),
            category: "Electronics".to_string(),
            image: Some("https://images.unsplash.com/photo-1598327105666-5b89351aff97".to_string()),
            stock: 5,
            barcode: Some("8991234567002".to_string()),
            status: ProductStatus::Active,
        },
        Product {
            id: "3".to_string(),
            name: "Gold Necklace".to_string(),
            description: Some("Elegant gold necklace".to_string()),
            price: Decimal::new(24_999, 2),
            category: "Jewelry".to_string(),
            image: Some("https://images.unsplash.com/photo-1599643477877-530eb83abc8e".to_string()),
            stock: 15,
            barcode: None,
            status: ProductStatus::Active,
        },
        Product {
            id: "4".to_string(),
            name: "Kopi Luwak 250g".to_string(),
            description: Some("Single origin coffee beans".to_string()),
            price: Decimal::new(3_450, 2),
            category: "Food".to_string(),
            image: None,
            stock: 0,
            barcode: Some("8991234567004".to_string()),
            status: ProductStatus::OutOfStock,
        },
        Product {
            id: "5".to_string(),
            name: "Batik Shirt".to_string(),
            description: None,
            price: Decimal::new(4_200, 2),
            category: "Clothing".to_string(),
            image: None,
            stock: 12,
            barcode: None,
            status: ProductStatus::Inactive,
        },
    ]
}

// ---
// Carga inicial do armazenamento em memória (DATABASE_URL=memory://):
// as mesmas fixtures, mas no formato das tabelas.
// ---

fn to_rows<T: Serialize>(items: &[T]) -> Vec<Value> {
    items.iter().filter_map(|item| serde_json::to_value(item).ok()).collect()
}

pub async fn seed_memory_store(store: &MemoryStore) {
    let orders = demo_orders();

    let mut products = to_rows(&demo_products());
    for product in &mut products {
        product["created_at"] = json!("2024-03-01T00:00:00+00:00");
    }

    let profiles = orders
        .iter()
        .enumerate()
        .map(|(index, order)| {
            json!({
                "id": format!("customer-{}", index + 1),
                "name": order.customer,
                "created_at": order.date.to_string(),
            })
        })
        .collect();

    let order_rows = orders
        .iter()
        .enumerate()
        .map(|(index, order)| {
            json!({
                "id": order.id,
                "user_id": format!("customer-{}", index + 1),
                "total": order.total,
                "status": order.status.as_str(),
                "created_at": order.date.to_string(),
            })
        })
        .collect();

    let order_items = orders
        .iter()
        .flat_map(|order| {
            (1..=order.items).map(move |n| json!({"id": format!("{}-{}", order.id, n), "order_id": order.id}))
        })
        .collect();

    store.seed("sales_data", to_rows(&demo_sales_data())).await;
    store.seed("products", products).await;
    store.seed("profiles", profiles).await;
    store.seed("orders", order_rows).await;
    store.seed("order_items", order_items).await;
}
