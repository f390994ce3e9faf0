//! Reference data: the product and material tables.
//!
//! Both tables are read once at startup from CSV files and never mutated.
//! Rows keep their file order (the recommender breaks score ties by it) and
//! are additionally indexed by identifier.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::model::{Material, Product, ValidationError};

/// Failed identifier lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupError {
    UnknownProduct(String),
    UnknownMaterial(String),
}

impl std::fmt::Display for LookupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupError::UnknownProduct(id) => write!(f, "Unknown product id '{}'", id),
            LookupError::UnknownMaterial(id) => write!(f, "Unknown material id '{}'", id),
        }
    }
}

impl std::error::Error for LookupError {}

/// Errors raised while loading the reference tables.
#[derive(Debug)]
pub enum CatalogError {
    Io { path: String, source: std::io::Error },
    Parse { table: &'static str, source: csv::Error },
    InvalidRow {
        table: &'static str,
        id: String,
        source: ValidationError,
    },
    DuplicateId { table: &'static str, id: String },
    DanglingMaterial { product_id: String, material_id: String },
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::Io { path, source } => write!(f, "Could not read {}: {}", path, source),
            CatalogError::Parse { table, source } => {
                write!(f, "Could not parse {} table: {}", table, source)
            }
            CatalogError::InvalidRow { table, id, source } => {
                write!(f, "Invalid row '{}' in {} table: {}", id, table, source)
            }
            CatalogError::DuplicateId { table, id } => {
                write!(f, "Duplicate id '{}' in {} table", id, table)
            }
            CatalogError::DanglingMaterial {
                product_id,
                material_id,
            } => write!(
                f,
                "Product '{}' references unknown packaging material '{}'",
                product_id, material_id
            ),
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::Io { source, .. } => Some(source),
            CatalogError::Parse { source, .. } => Some(source),
            CatalogError::InvalidRow { source, .. } => Some(source),
            _ => None,
        }
    }
}

const PRODUCTS_TABLE: &str = "products";
const MATERIALS_TABLE: &str = "materials";

/// Immutable, key-indexed product and material tables.
#[derive(Clone, Debug)]
pub struct ReferenceData {
    products: Vec<Product>,
    product_index: HashMap<String, usize>,
    materials: Vec<Material>,
    material_index: HashMap<String, usize>,
}

impl ReferenceData {
    /// Builds the tables after validating every row, identifier uniqueness
    /// and the products' material references.
    pub fn new(products: Vec<Product>, materials: Vec<Material>) -> Result<Self, CatalogError> {
        for material in &materials {
            material
                .validate()
                .map_err(|source| CatalogError::InvalidRow {
                    table: MATERIALS_TABLE,
                    id: material.material_id.clone(),
                    source,
                })?;
        }
        let material_index = build_index(&materials, MATERIALS_TABLE, |m| &m.material_id)?;

        for product in &products {
            product
                .validate()
                .map_err(|source| CatalogError::InvalidRow {
                    table: PRODUCTS_TABLE,
                    id: product.product_id.clone(),
                    source,
                })?;
            if !material_index.contains_key(&product.current_packaging_material) {
                return Err(CatalogError::DanglingMaterial {
                    product_id: product.product_id.clone(),
                    material_id: product.current_packaging_material.clone(),
                });
            }
        }
        let product_index = build_index(&products, PRODUCTS_TABLE, |p| &p.product_id)?;

        Ok(Self {
            products,
            product_index,
            materials,
            material_index,
        })
    }

    /// Reads both tables from CSV sources with header rows.
    pub fn from_readers<P: Read, M: Read>(products: P, materials: M) -> Result<Self, CatalogError> {
        let products = read_rows(products, PRODUCTS_TABLE)?;
        let materials = read_rows(materials, MATERIALS_TABLE)?;
        Self::new(products, materials)
    }

    /// Reads both tables from CSV files.
    pub fn load(
        products_path: impl AsRef<Path>,
        materials_path: impl AsRef<Path>,
    ) -> Result<Self, CatalogError> {
        let products = open(products_path.as_ref())?;
        let materials = open(materials_path.as_ref())?;
        Self::from_readers(products, materials)
    }

    /// All products in table order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// All materials in table order.
    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    /// Looks up one product by id.
    pub fn lookup_product(&self, product_id: &str) -> Result<&Product, LookupError> {
        self.product_index
            .get(product_id)
            .map(|&idx| &self.products[idx])
            .ok_or_else(|| LookupError::UnknownProduct(product_id.to_string()))
    }

    /// Looks up one material by id.
    pub fn lookup_material(&self, material_id: &str) -> Result<&Material, LookupError> {
        self.material_index
            .get(material_id)
            .map(|&idx| &self.materials[idx])
            .ok_or_else(|| LookupError::UnknownMaterial(material_id.to_string()))
    }

    /// Resolves a selection to its distinct products.
    ///
    /// Duplicate ids are collapsed, keeping the first occurrence. Any unknown
    /// id fails the whole selection.
    pub fn resolve_selection<S: AsRef<str>>(
        &self,
        product_ids: &[S],
    ) -> Result<Vec<&Product>, LookupError> {
        let mut seen = HashSet::new();
        let mut resolved = Vec::with_capacity(product_ids.len());
        for id in product_ids {
            let id = id.as_ref();
            if !seen.insert(id) {
                continue;
            }
            resolved.push(self.lookup_product(id)?);
        }
        Ok(resolved)
    }
}

/// Largest carbon footprint of the given materials, 0.0 for an empty slice.
pub fn max_carbon_footprint(materials: &[Material]) -> f64 {
    materials
        .iter()
        .map(|m| m.carbon_footprint_per_unit_sqm)
        .fold(0.0, f64::max)
}

fn build_index<T>(
    rows: &[T],
    table: &'static str,
    key: impl Fn(&T) -> &String,
) -> Result<HashMap<String, usize>, CatalogError> {
    let mut index = HashMap::with_capacity(rows.len());
    for (idx, row) in rows.iter().enumerate() {
        let id = key(row);
        if index.insert(id.clone(), idx).is_some() {
            return Err(CatalogError::DuplicateId {
                table,
                id: id.clone(),
            });
        }
    }
    Ok(index)
}

fn read_rows<T: DeserializeOwned, R: Read>(
    reader: R,
    table: &'static str,
) -> Result<Vec<T>, CatalogError> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
        .deserialize()
        .collect::<Result<Vec<T>, csv::Error>>()
        .map_err(|source| CatalogError::Parse { table, source })
}

fn open(path: &Path) -> Result<File, CatalogError> {
    File::open(path).map_err(|source| CatalogError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// The catalog shipped in `data/`, compiled in for tests.
#[cfg(test)]
pub(crate) fn fixture() -> ReferenceData {
    ReferenceData::from_readers(
        include_str!("../data/products.csv").as_bytes(),
        include_str!("../data/packaging_materials.csv").as_bytes(),
    )
    .expect("bundled reference data must load")
}
