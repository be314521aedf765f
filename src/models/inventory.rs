// src/models/inventory.rs

use serde::{Serialize, Deserialize};
use rust_decimal::Decimal;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    Active,
    Inactive,
    OutOfStock, // Vira "out_of_stock"
}

// --- Produto do catálogo do vendedor ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    // Atribuído pelo banco, ou "demo-<timestamp>" no modo demo
    #[serde(deserialize_with = "crate::models::id_from_any")]
    #[schema(example = "demo-1718000000000")]
    pub id: String,
    #[schema(example = "Stylish Watch")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[schema(example = "129.99")]
    pub price: Decimal,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub stock: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    pub status: ProductStatus,
}

fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.message = Some("The value cannot be negative.".into());
        return Err(err);
    }
    Ok(())
}

// Produto sem id: o que o vendedor preenche no formulário.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct NewProduct {
    #[validate(length(min = 1, message = "The name is required."))]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[validate(custom(function = "validate_not_negative"))]
    pub price: Decimal,
    #[validate(length(min = 1, message = "The category is required."))]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub stock: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    pub status: ProductStatus,
}

impl NewProduct {
    pub fn into_product(self, id: String) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
            category: self.category,
            image: self.image,
            stock: self.stock,
            barcode: self.barcode,
            status: self.status,
        }
    }
}

// Atualização parcial: só os campos presentes são enviados e aplicados.
// Nos campos opcionais do produto, `null` limpa o valor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct ProductUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "The name is required."))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "crate::models::double_option", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_not_negative"))]
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "crate::models::double_option", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub image: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
    #[serde(default, deserialize_with = "crate::models::double_option", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub barcode: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProductStatus>,
}

impl ProductUpdate {
    pub fn apply_to(&self, product: &mut Product) {
        if let Some(name) = &self.name {
            product.name = name.clone();
        }
        if let Some(description) = &self.description {
            product.description = description.clone();
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(category) = &self.category {
            product.category = category.clone();
        }
        if let Some(image) = &self.image {
            product.image = image.clone();
        }
        if let Some(stock) = self.stock {
            product.stock = stock;
        }
        if let Some(barcode) = &self.barcode {
            product.barcode = barcode.clone();
        }
        if let Some(status) = self.status {
            product.status = status;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_rows_with_numeric_ids() {
        let product: Product = serde_json::from_value(json!({
            "id": 42,
            "name": "Coffee",
            "description": null,
            "price": 4,
            "category": "Food",
            "image": null,
            "stock": 10,
            "barcode": null,
            "status": "out_of_stock"
        }))
        .unwrap();

        assert_eq!(product.id, "42");
        assert_eq!(product.status, ProductStatus::OutOfStock);
        assert_eq!(product.price, Decimal::from(4));
    }

    #[test]
    fn negative_stock_is_not_a_product() {
        let row = json!({"id": "p1", "name": "x", "price": 1, "category": "c", "stock": -1, "status": "active"});
        assert!(serde_json::from_value::<Product>(row).is_err());
    }

    #[test]
    fn partial_update_touches_only_present_fields() {
        let mut product = NewProduct {
            name: "Watch".into(),
            description: None,
            price: Decimal::from(100),
            category: "Accessories".into(),
            image: None,
            stock: 3,
            barcode: None,
            status: ProductStatus::Active,
        }
        .into_product("p1".into());

        let update = ProductUpdate { stock: Some(0), status: Some(ProductStatus::OutOfStock), ..Default::default() };
        update.apply_to(&mut product);

        assert_eq!(product.stock, 0);
        assert_eq!(product.status, ProductStatus::OutOfStock);
        assert_eq!(product.name, "Watch");
        assert_eq!(product.price, Decimal::from(100));

        let body = serde_json::to_value(&update).unwrap();
        assert_eq!(body, json!({"stock": 0, "status": "out_of_stock"}));
    }

    #[test]
    fn null_clears_optional_fields() {
        let mut product = crate::db::fixtures::demo_products().remove(0);
        assert!(product.description.is_some());

        let update: ProductUpdate = serde_json::from_value(json!({"description": null, "image": "new.png"})).unwrap();
        assert_eq!(update.description, Some(None));
        assert_eq!(update.image, Some(Some("new.png".to_string())));
        assert_eq!(update.barcode, None);

        let barcode = product.barcode.clone();
        update.apply_to(&mut product);

        assert_eq!(product.description, None);
        assert_eq!(product.image.as_deref(), Some("new.png"));
        assert_eq!(product.barcode, barcode);

        let body = serde_json::to_value(&update).unwrap();
        assert_eq!(body, json!({"description": null, "image": "new.png"}));
    }

    #[test]
    fn rejects_negative_prices() {
        let product = NewProduct {
            name: "X".into(),
            description: None,
            price: Decimal::from(-1),
            category: "C".into(),
            image: None,
            stock: 1,
            barcode: None,
            status: ProductStatus::Active,
        };
        assert!(product.validate().is_err());
    }
}
