//! Column resolution: map normalized headers onto the fixed item schema.

use serde::{Deserialize, Serialize};

/// Semantic fields an import sheet can provide.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Code,
    Description,
    Category,
    Unit,
    Quantity,
    UnitValue,
    TotalValue,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::Code,
        Field::Description,
        Field::Category,
        Field::Unit,
        Field::Quantity,
        Field::UnitValue,
        Field::TotalValue,
    ];

    /// Fields without which an import is rejected outright.
    pub const MANDATORY: [Field; 4] = [
        Field::Code,
        Field::Description,
        Field::Quantity,
        Field::UnitValue,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Code => "code",
            Field::Description => "description",
            Field::Category => "category",
            Field::Unit => "unit",
            Field::Quantity => "quantity",
            Field::UnitValue => "unit_value",
            Field::TotalValue => "total_value",
        }
    }

    /// Substrings (of a normalized header) that identify this field.
    pub fn candidates(&self) -> &'static [&'static str] {
        match self {
            Field::Code => &["codigo", "cod"],
            Field::Description => &["descripci", "descripcion", "descripcion de"],
            Field::Category => &["categoria", "categor"],
            Field::Unit => &["unidad", "unidad de medida", "unidad de"],
            Field::Quantity => &["cantidad", "cant"],
            Field::UnitValue => &[
                "valor articulo",
                "valor articulo (unitario)",
                "valor unitario",
                "valor unit",
            ],
            Field::TotalValue => &["valor total", "total"],
        }
    }

    pub fn is_mandatory(&self) -> bool {
        Field::MANDATORY.contains(self)
    }

    fn matches(&self, normalized_header: &str) -> bool {
        self.candidates()
            .iter()
            .any(|candidate| normalized_header.contains(candidate))
    }
}

impl core::fmt::Display for Field {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field -> column index table produced once per import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    indices: [Option<usize>; Field::ALL.len()],
}

impl ColumnMap {
    /// Resolve every field against the normalized header row.
    ///
    /// Each field takes the first header (left to right) containing any of its
    /// candidates. Fields are resolved independently, so one header may serve
    /// several fields. Unmatched fields stay absent.
    pub fn resolve(normalized_headers: &[String]) -> Self {
        let mut map = ColumnMap::default();
        for field in Field::ALL {
            map.indices[slot(field)] = normalized_headers
                .iter()
                .position(|header| field.matches(header));
        }
        map
    }

    pub fn index_of(&self, field: Field) -> Option<usize> {
        self.indices[slot(field)]
    }

    /// Mandatory fields that no header matched, in declaration order.
    pub fn missing_mandatory(&self) -> Vec<Field> {
        Field::MANDATORY
            .into_iter()
            .filter(|field| self.index_of(*field).is_none())
            .collect()
    }
}

fn slot(field: Field) -> usize {
    match field {
        Field::Code => 0,
        Field::Description => 1,
        Field::Category => 2,
        Field::Unit => 3,
        Field::Quantity => 4,
        Field::UnitValue => 5,
        Field::TotalValue => 6,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::normalize::normalize_header;

    fn headers(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|h| normalize_header(h)).collect()
    }

    #[test]
    fn resolves_canonical_spanish_headers() {
        let map = ColumnMap::resolve(&headers(&[
            "Código",
            "Descripción",
            "Cantidad",
            "Valor Unitario",
        ]));

        assert_eq!(map.index_of(Field::Code), Some(0));
        assert_eq!(map.index_of(Field::Description), Some(1));
        assert_eq!(map.index_of(Field::Quantity), Some(2));
        assert_eq!(map.index_of(Field::UnitValue), Some(3));
        assert_eq!(map.index_of(Field::Category), None);
        assert_eq!(map.index_of(Field::Unit), None);
        assert_eq!(map.index_of(Field::TotalValue), None);
        assert!(map.missing_mandatory().is_empty());
    }

    #[test]
    fn resolves_abbreviated_and_reordered_headers() {
        let map = ColumnMap::resolve(&headers(&[
            "Cant.",
            "Unidad de Medida",
            "Cod. Artículo",
            "Categoría",
            "Descripción del bien",
            "Valor Artículo (Unitario)",
            "Valor Total",
        ]));

        assert_eq!(map.index_of(Field::Quantity), Some(0));
        assert_eq!(map.index_of(Field::Unit), Some(1));
        assert_eq!(map.index_of(Field::Code), Some(2));
        assert_eq!(map.index_of(Field::Category), Some(3));
        assert_eq!(map.index_of(Field::Description), Some(4));
        assert_eq!(map.index_of(Field::UnitValue), Some(5));
        assert_eq!(map.index_of(Field::TotalValue), Some(6));
    }

    #[test]
    fn header_position_wins_over_candidate_rank() {
        // "total" (second candidate) appears before "valor total" (first candidate).
        let map = ColumnMap::resolve(&headers(&["Subtotal", "Valor Total"]));
        assert_eq!(map.index_of(Field::TotalValue), Some(0));
    }

    #[test]
    fn one_header_may_serve_several_fields() {
        // "descripcion del codigo" contains both "descripci" and "cod".
        let map = ColumnMap::resolve(&headers(&["Descripción del código"]));
        assert_eq!(map.index_of(Field::Code), Some(0));
        assert_eq!(map.index_of(Field::Description), Some(0));
    }

    #[test]
    fn reports_missing_mandatory_fields_in_order() {
        let map = ColumnMap::resolve(&headers(&["Descripción", "Valor Unitario"]));
        assert_eq!(map.missing_mandatory(), vec![Field::Code, Field::Quantity]);
    }

    #[test]
    fn empty_headers_match_nothing() {
        let map = ColumnMap::resolve(&headers(&["", "  "]));
        assert_eq!(map.missing_mandatory(), Field::MANDATORY.to_vec());
        assert_eq!(map.index_of(Field::TotalValue), None);
    }

    #[test]
    fn field_names_are_snake_case() {
        let names: Vec<&str> = Field::ALL.iter().map(Field::as_str).collect();
        assert_eq!(
            names,
            vec!["code", "description", "category", "unit", "quantity", "unit_value", "total_value"]
        );
        assert!(Field::UnitValue.is_mandatory());
        assert!(!Field::TotalValue.is_mandatory());
    }
}
