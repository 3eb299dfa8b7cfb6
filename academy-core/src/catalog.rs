use serde::Deserialize;

use crate::error::{AdminError, Result};
use crate::selection::SelectedItem;
use crate::table::TableId;

/// A lesson as returned by the lessons list endpoint
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Lesson {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub date: String,
    /// Name of the school the lesson belongs to
    #[serde(default)]
    pub category_name: String,
    #[serde(default)]
    pub series_name: String,
    /// Position within the series, when the lesson is part of one
    #[serde(default)]
    pub true_position: Option<u32>,
    #[serde(default)]
    pub edit_link: String,
    pub delete_link: String,
}

impl Lesson {
    /// Series column text, e.g. "Basics (#3)"
    pub fn series_label(&self) -> String {
        match (self.series_name.is_empty(), self.true_position) {
            (true, _) => String::new(),
            (false, Some(pos)) => format!("{} (#{})", self.series_name, pos),
            (false, None) => self.series_name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Series {
    pub id: u64,
    pub series_name: String,
    #[serde(default)]
    pub lesson_count: u32,
    #[serde(default)]
    pub view_lessons_link: String,
    #[serde(default)]
    pub edit_link: String,
    pub delete_link: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct School {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub lesson_count: u32,
    #[serde(default)]
    pub view_lessons_link: String,
    #[serde(default)]
    pub edit_link: String,
    pub delete_link: String,
}

/// One row of any catalog table
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogRow {
    Lesson(Lesson),
    Series(Series),
    School(School),
}

impl CatalogRow {
    pub fn id(&self) -> u64 {
        match self {
            CatalogRow::Lesson(l) => l.id,
            CatalogRow::Series(s) => s.id,
            CatalogRow::School(s) => s.id,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            CatalogRow::Lesson(l) => &l.title,
            CatalogRow::Series(s) => &s.series_name,
            CatalogRow::School(s) => &s.name,
        }
    }

    pub fn delete_endpoint(&self) -> &str {
        match self {
            CatalogRow::Lesson(l) => &l.delete_link,
            CatalogRow::Series(s) => &s.delete_link,
            CatalogRow::School(s) => &s.delete_link,
        }
    }

    /// Link listing the lessons of a series or school
    pub fn view_lessons_link(&self) -> Option<&str> {
        let link = match self {
            CatalogRow::Lesson(_) => return None,
            CatalogRow::Series(s) => &s.view_lessons_link,
            CatalogRow::School(s) => &s.view_lessons_link,
        };
        (!link.is_empty()).then_some(link.as_str())
    }

    pub fn lesson_count(&self) -> Option<u32> {
        match self {
            CatalogRow::Lesson(_) => None,
            CatalogRow::Series(s) => Some(s.lesson_count),
            CatalogRow::School(s) => Some(s.lesson_count),
        }
    }

    /// Schools that still own lessons cannot be deleted
    pub fn delete_blocked(&self) -> bool {
        matches!(self, CatalogRow::School(s) if s.lesson_count > 0)
    }

    /// Build the selection entry for this row, or None if it is delete-blocked
    pub fn to_selected_item(&self, table: TableId) -> Option<SelectedItem> {
        if self.delete_blocked() {
            return None;
        }
        Some(SelectedItem::new(
            table,
            self.id(),
            self.display_name(),
            self.delete_endpoint(),
        ))
    }
}

/// Decode a list endpoint body into rows for the given table
pub fn decode_rows(table: TableId, body: &str) -> Result<Vec<CatalogRow>> {
    let decode_err = |e: serde_json::Error| AdminError::Decode(format!("{} list: {}", table, e));
    let rows = match table {
        TableId::Lessons | TableId::Modal => serde_json::from_str::<Vec<Lesson>>(body)
            .map_err(decode_err)?
            .into_iter()
            .map(CatalogRow::Lesson)
            .collect(),
        TableId::Series => serde_json::from_str::<Vec<Series>>(body)
            .map_err(decode_err)?
            .into_iter()
            .map(CatalogRow::Series)
            .collect(),
        TableId::Schools => serde_json::from_str::<Vec<School>>(body)
            .map_err(decode_err)?
            .into_iter()
            .map(CatalogRow::School)
            .collect(),
    };
    Ok(rows)
}
