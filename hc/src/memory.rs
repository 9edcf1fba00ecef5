//! In-memory catalog backed by the embedded dataset or a JSON/YAML file

use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::{CatalogError, CatalogGateway, MAX_PAGE_SIZE, Property, PropertyPage, PropertyQuery};

/// Default dataset compiled into the binary
const EMBEDDED_CATALOG: &str = include_str!("../data/catalog.yml");

/// Accepted file layouts: a bare list, or a document with a `properties` key
#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    List(Vec<Property>),
    Document { properties: Vec<Property> },
}

impl CatalogFile {
    fn into_properties(self) -> Vec<Property> {
        match self {
            CatalogFile::List(properties) => properties,
            CatalogFile::Document { properties } => properties,
        }
    }
}

/// Immutable catalog held in memory
#[derive(Debug, Clone)]
pub struct MemoryCatalog {
    properties: Vec<Property>,
}

impl MemoryCatalog {
    /// Build a catalog from records, rejecting invalid or duplicate entries
    pub fn new(properties: Vec<Property>) -> Result<Self, CatalogError> {
        debug!(count = properties.len(), "MemoryCatalog::new: called");
        let mut seen = HashSet::new();
        for property in &properties {
            property.validate().map_err(CatalogError::Parse)?;
            if !seen.insert(property.id.as_str()) {
                return Err(CatalogError::Parse(format!("duplicate property id: {}", property.id)));
            }
        }
        Ok(Self { properties })
    }

    /// Catalog built from the dataset shipped with the crate
    pub fn embedded() -> Result<Self, CatalogError> {
        debug!("MemoryCatalog::embedded: called");
        Self::from_yaml_str(EMBEDDED_CATALOG)
    }

    /// Parse a YAML catalog
    pub fn from_yaml_str(content: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_yaml::from_str(content).map_err(|e| CatalogError::Parse(e.to_string()))?;
        Self::new(file.into_properties())
    }

    /// Parse a JSON catalog
    pub fn from_json_str(content: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(content).map_err(|e| CatalogError::Parse(e.to_string()))?;
        Self::new(file.into_properties())
    }

    /// Load a catalog file; `.json` is parsed as JSON, anything else as YAML
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        debug!(?path, "MemoryCatalog::from_path: called");
        let content = fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        let catalog = if is_json {
            Self::from_json_str(&content)?
        } else {
            Self::from_yaml_str(&content)?
        };
        info!(path = %path.display(), count = catalog.len(), "Loaded catalog");
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

fn matches_price_and_rating(property: &Property, min_rating: Option<f64>, max_price: Option<f64>) -> bool {
    min_rating.is_none_or(|min| property.rating >= min) && max_price.is_none_or(|max| property.price <= max)
}

impl CatalogGateway for MemoryCatalog {
    fn list_properties(
        &self,
        city: &str,
        min_rating: Option<f64>,
        max_price: Option<f64>,
    ) -> Result<Vec<Property>, CatalogError> {
        debug!(%city, ?min_rating, ?max_price, "MemoryCatalog::list_properties: called");
        Ok(self
            .properties
            .iter()
            .filter(|p| p.in_city(city))
            .filter(|p| matches_price_and_rating(p, min_rating, max_price))
            .cloned()
            .collect())
    }

    fn get_property(&self, id: &str) -> Result<Property, CatalogError> {
        debug!(%id, "MemoryCatalog::get_property: called");
        self.properties
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    fn search(&self, query: &PropertyQuery) -> Result<PropertyPage, CatalogError> {
        debug!(?query, "MemoryCatalog::search: called");
        let city = query.city.as_deref().map(|c| c.trim().to_lowercase()).filter(|c| !c.is_empty());
        let filtered: Vec<&Property> = self
            .properties
            .iter()
            .filter(|p| city.as_deref().is_none_or(|c| p.city.to_lowercase().contains(c)))
            .filter(|p| matches_price_and_rating(p, query.min_rating, query.max_price))
            .filter(|p| query.amenities.iter().all(|a| p.has_amenity(a)))
            .collect();

        let page = query.page.max(1);
        let page_size = query.page_size.clamp(1, MAX_PAGE_SIZE);
        let total = filtered.len();
        let items = filtered
            .into_iter()
            .skip((page - 1) * page_size)
            .take(page_size)
            .cloned()
            .collect();

        Ok(PropertyPage {
            items,
            page,
            page_size,
            total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PropertySource;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn property(id: &str, city: &str, price: f64, rating: f64) -> Property {
        Property {
            id: id.to_string(),
            name: format!("Hotel {}", id),
            city: city.to_string(),
            price,
            rating,
            amenities: vec!["WiFi".to_string()],
            source: PropertySource::Local,
        }
    }

    fn small_catalog() -> MemoryCatalog {
        MemoryCatalog::new(vec![
            property("a", "Kandy", 50.0, 4.0),
            property("b", "Kandy", 120.0, 4.8),
            property("c", "Galle", 90.0, 4.2),
            property("d", "Galle Fort", 150.0, 4.9),
        ])
        .unwrap()
    }

    #[test]
    fn test_embedded_catalog_loads() {
        let catalog = MemoryCatalog::embedded().unwrap();
        assert!(!catalog.is_empty());
        assert!(!catalog.list_properties("Kandy", None, None).unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = MemoryCatalog::new(vec![property("a", "Kandy", 1.0, 1.0), property("a", "Ella", 1.0, 1.0)]);
        assert!(matches!(result, Err(CatalogError::Parse(_))));
    }

    #[test]
    fn test_list_properties_exact_city() {
        let catalog = small_catalog();
        let galle = catalog.list_properties("galle", None, None).unwrap();
        assert_eq!(galle.len(), 1);
        assert_eq!(galle[0].id, "c");
    }

    #[test]
    fn test_list_properties_filters() {
        let catalog = small_catalog();
        let cheap = catalog.list_properties("Kandy", None, Some(100.0)).unwrap();
        assert_eq!(cheap.iter().map(|p| p.id.as_str()).collect::<Vec<_>>(), vec!["a"]);

        let good = catalog.list_properties("Kandy", Some(4.5), None).unwrap();
        assert_eq!(good.iter().map(|p| p.id.as_str()).collect::<Vec<_>>(), vec!["b"]);

        assert!(catalog.list_properties("Jaffna", None, None).unwrap().is_empty());
    }

    #[test]
    fn test_get_property() {
        let catalog = small_catalog();
        assert_eq!(catalog.get_property("c").unwrap().city, "Galle");
        assert!(matches!(catalog.get_property("zzz"), Err(CatalogError::NotFound(_))));
    }

    #[test]
    fn test_search_substring_city_and_pagination() {
        let catalog = small_catalog();
        let query = PropertyQuery {
            city: Some("galle".to_string()),
            page_size: 1,
            ..Default::default()
        };
        let first = catalog.search(&query).unwrap();
        assert_eq!(first.total, 2);
        assert_eq!(first.items[0].id, "c");

        let second = catalog.search(&PropertyQuery { page: 2, ..query }).unwrap();
        assert_eq!(second.items[0].id, "d");
        assert_eq!(second.page_count(), 2);
    }

    #[test]
    fn test_search_amenities_all_required() {
        let catalog = small_catalog();
        let query = PropertyQuery {
            amenities: vec!["wifi".to_string(), "pool".to_string()],
            ..Default::default()
        };
        assert_eq!(catalog.search(&query).unwrap().total, 0);
    }

    #[test]
    fn test_from_path_json_list() {
        let mut file = NamedTempFile::with_suffix(".json").unwrap();
        write!(
            file,
            r#"[{{"id":"1","name":"Sea View","location":"Mirissa","price":60,"rating":4.0,"source":"AIRBNB"}}]"#
        )
        .unwrap();
        let catalog = MemoryCatalog::from_path(file.path()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get_property("1").unwrap().source, PropertySource::Airbnb);
    }

    #[test]
    fn test_from_path_yaml_document() {
        let mut file = NamedTempFile::with_suffix(".yml").unwrap();
        writeln!(
            file,
            "properties:\n  - id: x1\n    name: Tea Estate Bungalow\n    city: Nuwara Eliya\n    price: 110\n    rating: 4.6"
        )
        .unwrap();
        let catalog = MemoryCatalog::from_path(file.path()).unwrap();
        assert_eq!(catalog.get_property("x1").unwrap().city, "Nuwara Eliya");
    }

    #[test]
    fn test_from_path_missing_file() {
        let result = MemoryCatalog::from_path("/nonexistent/catalog.yml");
        assert!(matches!(result, Err(CatalogError::Io(_))));
    }
}
