//! Expansion of delimited multi-valued fields into a per-token relation.

use crate::catalog::Catalog;
use crate::types::{RecordId, TitleRecord};
use serde::{Deserialize, Serialize};

/// Fields that hold delimited lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListField {
    Genres,
    Cast,
    Country,
}

impl ListField {
    /// Raw cell of this field on `record`; blank when absent.
    pub fn raw<'r>(&self, record: &'r TitleRecord) -> &'r str {
        match self {
            ListField::Genres => &record.listed_in,
            ListField::Cast => &record.cast,
            ListField::Country => record.country.as_deref().unwrap_or_default(),
        }
    }
}

/// Split `raw` on `delimiter`, trimming tokens and dropping blank ones.
///
/// Duplicates are kept and token order follows the source text.
pub fn split_tokens<'r>(raw: &'r str, delimiter: &str) -> impl Iterator<Item = &'r str> {
    raw.split(delimiter)
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// One token together with the record it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RelationEntry<'a> {
    pub source: RecordId,
    pub token: &'a str,
}

/// Tokens of one list field across a whole catalog.
///
/// Borrows the catalog, so the back-references can never outlive it.
#[derive(Debug, Clone)]
pub struct ExplodedRelation<'a> {
    catalog: &'a Catalog,
    field: ListField,
    entries: Vec<RelationEntry<'a>>,
}

impl<'a> ExplodedRelation<'a> {
    /// Split `field` on `delimiter` for every record in `catalog`.
    ///
    /// Records with an empty field contribute nothing.
    pub fn build(catalog: &'a Catalog, field: ListField, delimiter: &str) -> Self {
        let entries = catalog
            .entries()
            .flat_map(|(source, record)| {
                split_tokens(field.raw(record), delimiter)
                    .map(move |token| RelationEntry { source, token })
                    .collect::<Vec<_>>()
            })
            .collect();

        Self {
            catalog,
            field,
            entries,
        }
    }

    pub fn field(&self) -> ListField {
        self.field
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    pub fn entries(&self) -> &[RelationEntry<'a>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn tokens(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.entries.iter().map(|e| e.token)
    }

    /// Entries paired with the record each one references.
    pub fn with_records(&self) -> impl Iterator<Item = (&'a TitleRecord, &'a str)> + '_ {
        let catalog = self.catalog;
        self.entries
            .iter()
            .filter_map(move |e| catalog.get(e.source).map(|r| (r, e.token)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{RawRow, normalize_rows};

    fn catalog() -> Catalog {
        normalize_rows(vec![
            RawRow::new()
                .with("title", "A")
                .with("type", "Movie")
                .with("listed_in", "Dramas, Comedies, Dramas")
                .with("country", "India, Japan"),
            RawRow::new().with("title", "B").with("type", "Movie"),
            RawRow::new()
                .with("title", "C")
                .with("type", "TV Show")
                .with("listed_in", "Kids' TV,  , Comedies "),
        ])
        .catalog
    }

    #[test]
    fn test_split_tokens_trims_and_drops_blanks() {
        let tokens: Vec<&str> = split_tokens(" a ,  , b,c ", ",").collect();
        assert_eq!(tokens, vec!["a", "b", "c"]);
        assert_eq!(split_tokens("", ", ").count(), 0);
    }

    #[test]
    fn test_cardinality_matches_token_count() {
        let catalog = catalog();
        let relation = ExplodedRelation::build(&catalog, ListField::Genres, ", ");

        let per_record = |idx: usize| {
            relation
                .entries()
                .iter()
                .filter(|e| e.source == RecordId(idx))
                .count()
        };
        assert_eq!(per_record(0), 3);
        assert_eq!(per_record(1), 0);
        assert_eq!(per_record(2), 2);
        assert_eq!(relation.len(), 5);
    }

    #[test]
    fn test_duplicates_and_order_are_preserved() {
        let catalog = catalog();
        let relation = ExplodedRelation::build(&catalog, ListField::Genres, ", ");
        let tokens: Vec<&str> = relation.tokens().collect();
        assert_eq!(
            tokens,
            vec!["Dramas", "Comedies", "Dramas", "Kids' TV", "Comedies"]
        );
    }

    #[test]
    fn test_back_references_resolve() {
        let catalog = catalog();
        let relation = ExplodedRelation::build(&catalog, ListField::Country, ",");
        let pairs: Vec<(&str, &str)> = relation
            .with_records()
            .map(|(r, token)| (r.title.as_str(), token))
            .collect();
        assert_eq!(pairs, vec![("A", "India"), ("A", "Japan")]);
    }

    #[test]
    fn test_empty_cast_produces_no_entries() {
        let catalog = catalog();
        let relation = ExplodedRelation::build(&catalog, ListField::Cast, ", ");
        assert!(relation.is_empty());
    }
}
