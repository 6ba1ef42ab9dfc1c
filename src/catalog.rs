//! Sellable design templates. Products have no lifecycle of their own and
//! deleting one never cascades to orders, which keep a name snapshot.

use std::fmt;
use std::str::FromStr;

use crate::error::CatalogError;
use crate::utils;

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    #[n(0)]
    Jersey,
    #[n(1)]
    Kemeja,
    #[n(2)]
    Kaos,
    #[n(3)]
    Jaket,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Jersey,
        Category::Kemeja,
        Category::Kaos,
        Category::Jaket,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Jersey => "Jersey",
            Category::Kemeja => "Kemeja",
            Category::Kaos => "Kaos",
            Category::Jaket => "Jaket",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("unknown category: {0}")]
pub struct ParseCategoryError(String);

impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ParseCategoryError(s.to_string()))
    }
}

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq, Eq)]
pub struct Product {
    #[n(0)]
    pub id: String, // opaque ref, bech32-encoded uuid7
    #[n(1)]
    pub name: String,
    #[n(2)]
    pub category: Category,
    #[n(3)]
    pub image: String, // data URI or external URL
    #[n(4)]
    pub description: String,
}

/// Draft for a new catalog entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductDetails {
    name: Option<String>,
    category: Option<Category>,
    image: Option<String>,
    description: Option<String>,
}

impl ProductDetails {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn set_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }
    pub fn set_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }
    pub fn set_image(mut self, image: &str) -> Self {
        self.image = Some(image.to_string());
        self
    }
    pub fn set_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn build(&self) -> anyhow::Result<Product> {
        if self.name.as_deref().unwrap_or("").is_empty() {
            return Err(CatalogError::MissingName.into());
        }

        Ok(Product {
            id: utils::new_product_ref()?,
            name: self.name.clone().unwrap_or_default(),
            category: self.category.unwrap_or(Category::Jersey),
            image: self.image.clone().unwrap_or_default(),
            description: self.description.clone().unwrap_or_default(),
        })
    }
}
