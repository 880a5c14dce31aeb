// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Deserialize;
use std::collections::HashMap;

use crate::config::consts::DEFAULT_AREA_ADDRESS;

/// Static category → contact address table, fixed at deployment.
///
/// ```yaml
/// routing:
///   default: soporte@utec.edu.pe
///   areas:
///     Seguridad: seguridad@utec.edu.pe
///     Limpieza: servicios@utec.edu.pe
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RoutingTable {
    #[serde(default = "default_address")]
    pub default: String,
    #[serde(default = "default_areas")]
    pub areas: HashMap<String, String>,
}

fn default_address() -> String {
    DEFAULT_AREA_ADDRESS.to_string()
}

fn default_areas() -> HashMap<String, String> {
    [
        ("Seguridad", "seguridad@utec.edu.pe"),
        ("Infraestructura", "infraestructura@utec.edu.pe"),
        ("Limpieza", "servicios@utec.edu.pe"),
        ("Tecnología", "ti@utec.edu.pe"),
        ("Académico", "academico@utec.edu.pe"),
    ]
    .into_iter()
    .map(|(category, address)| (category.to_string(), address.to_string()))
    .collect()
}

impl Default for RoutingTable {
    fn default() -> Self {
        Self {
            default: default_address(),
            areas: default_areas(),
        }
    }
}

impl RoutingTable {
    /// Contact address for a category; unmapped categories go to the default address.
    pub fn address_for(&self, category: &str) -> &str {
        self.areas
            .get(category)
            .map(String::as_str)
            .unwrap_or(&self.default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_routes_known_categories() {
        let table = RoutingTable::default();
        let cases = vec![
            ("Seguridad", "seguridad@utec.edu.pe"),
            ("Infraestructura", "infraestructura@utec.edu.pe"),
            ("Limpieza", "servicios@utec.edu.pe"),
            ("Tecnología", "ti@utec.edu.pe"),
            ("Académico", "academico@utec.edu.pe"),
        ];

        for (category, expected) in cases {
            assert_eq!(table.address_for(category), expected, "category {}", category);
        }
    }

    #[test]
    fn test_unknown_category_uses_default() {
        let table = RoutingTable::default();
        assert_eq!(table.address_for("default"), "soporte@utec.edu.pe");
        assert_eq!(table.address_for("General"), "soporte@utec.edu.pe");
        assert_eq!(table.address_for("seguridad"), "soporte@utec.edu.pe");
    }

    #[test]
    fn test_partial_yaml_keeps_default_address() {
        let table: RoutingTable = serde_yaml::from_str(
            r#"
areas:
  Seguridad: guardia@example.com
"#,
        )
        .unwrap();

        assert_eq!(table.address_for("Seguridad"), "guardia@example.com");
        assert_eq!(table.address_for("Limpieza"), "soporte@utec.edu.pe");
    }
}
