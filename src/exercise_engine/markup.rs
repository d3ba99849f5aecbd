//! Authored page structure, as handed over by the host page.
//!
//! Lists are optional so a page can describe a container whose expected
//! substructure is missing; the engine then skips that container.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::exercise_engine::models::ExerciseKind;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageMarkup {
    #[serde(default)]
    pub exercises: Vec<ExerciseMarkup>,
}

impl PageMarkup {
    pub fn from_json(doc: &str) -> Result<Self> {
        Ok(serde_json::from_str(doc)?)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExerciseMarkup {
    OrderItems {
        container: String,
        list: Option<Vec<String>>,
    },
    MatchItems {
        container: String,
        items: Option<Vec<MatchItemMarkup>>,
    },
    SelectAll {
        container: String,
        list: Option<Vec<SelectItemMarkup>>,
    },
    SortItems {
        container: String,
        answer_bank: Option<BucketMarkup>,
        #[serde(default)]
        buckets: Vec<BucketMarkup>,
    },
}

impl ExerciseMarkup {
    pub fn kind(&self) -> ExerciseKind {
        match self {
            ExerciseMarkup::OrderItems { .. } => ExerciseKind::OrderItems,
            ExerciseMarkup::MatchItems { .. } => ExerciseKind::MatchItems,
            ExerciseMarkup::SelectAll { .. }  => ExerciseKind::SelectAll,
            ExerciseMarkup::SortItems { .. }  => ExerciseKind::SortItems,
        }
    }

    pub fn container(&self) -> &str {
        match self {
            ExerciseMarkup::OrderItems { container, .. }
            | ExerciseMarkup::MatchItems { container, .. }
            | ExerciseMarkup::SelectAll { container, .. }
            | ExerciseMarkup::SortItems { container, .. } => container,
        }
    }
}

/// `dt` terms and `dd` definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchSide {
    #[default]
    Term,
    Definition,
}

impl MatchSide {
    pub fn tag(self) -> &'static str {
        match self {
            MatchSide::Term       => "dt",
            MatchSide::Definition => "dd",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchItemMarkup {
    pub text: String,
    pub pair_id: String,
    #[serde(default)]
    pub side: MatchSide,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectItemMarkup {
    pub text: String,
    #[serde(default)]
    pub correct: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BucketMarkup {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub items: Vec<SortItemMarkup>,
}

/// A sortable item. `bucket` names the label of the bucket it belongs in;
/// items placed inside a bucket in markup belong there unless they say
/// otherwise. An `image` makes it a figure item captioned by `text`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SortItemMarkup {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub bucket: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_exercise_kind() {
        let doc = r#"{ "exercises": [
            { "kind": "order_items", "container": "o1", "list": ["A", "B"] },
            { "kind": "match_items", "container": "m1", "items": [
                { "text": "Cat", "pair_id": "1" },
                { "text": "Meow", "pair_id": "1", "side": "definition" } ] },
            { "kind": "select_all", "container": "s1", "list": [
                { "text": "Red", "correct": true }, { "text": "Dog" } ] },
            { "kind": "sort_items", "container": "p1",
              "answer_bank": { "items": [ { "text": "Apple", "bucket": "Fruit" } ] },
              "buckets": [ { "label": "Fruit" }, { "label": "Veg", "items": [ { "text": "Leek" } ] } ] }
        ] }"#;
        let page = PageMarkup::from_json(doc).unwrap();
        let kinds: Vec<ExerciseKind> = page.exercises.iter().map(|e| e.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                ExerciseKind::OrderItems,
                ExerciseKind::MatchItems,
                ExerciseKind::SelectAll,
                ExerciseKind::SortItems
            ]
        );
        assert_eq!(page.exercises[3].container(), "p1");
        match &page.exercises[1] {
            ExerciseMarkup::MatchItems { items: Some(items), .. } => {
                assert_eq!(items[0].side, MatchSide::Term);
                assert_eq!(items[1].side.tag(), "dd");
            }
            other => panic!("unexpected markup: {other:?}"),
        }
    }

    #[test]
    fn missing_lists_parse_as_none() {
        let doc = r#"{ "exercises": [ { "kind": "order_items", "container": "o" },
                                      { "kind": "sort_items", "container": "s" } ] }"#;
        let page = PageMarkup::from_json(doc).unwrap();
        assert!(matches!(&page.exercises[0], ExerciseMarkup::OrderItems { list: None, .. }));
        assert!(matches!(
            &page.exercises[1],
            ExerciseMarkup::SortItems { answer_bank: None, buckets, .. } if buckets.is_empty()
        ));
    }
}
