//! # Task search
//!
//! Case-insensitive substring filtering over one OS's tasks. A task matches
//! when the trimmed query occurs in `"<category name> <task name> <task description>"`.
//! Results keep catalog declaration order; there is no relevance ranking.

use crate::{
    core::catalog::Catalog,
    models::{OsId, Task},
};

/// One search result: a task and the category it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchHit<'a> {
    /// Id of the category holding the task.
    pub category_id: &'a str,
    /// Display name of that category.
    pub category_name: &'a str,
    /// The matching task.
    pub task: &'a Task,
}

impl SearchHit<'_> {
    /// Whether this hit is the given `(category, task)` selection.
    pub fn is(&self, category_id: &str, task_id: &str) -> bool {
        self.category_id == category_id && self.task.id == task_id
    }
}

/// Returns every task under `os` matching `text`. Blank text matches everything.
pub fn search<'a>(catalog: &'a Catalog, os: OsId, text: &str) -> Vec<SearchHit<'a>> {
    let query = text.trim().to_lowercase();

    catalog
        .categories_of(os)
        .iter()
        .flat_map(|category| {
            category.tasks.iter().map(move |task| SearchHit {
                category_id: category.id.as_str(),
                category_name: category.name.as_str(),
                task,
            })
        })
        .filter(|hit| query.is_empty() || haystack(hit).contains(&query))
        .collect()
}

fn haystack(hit: &SearchHit<'_>) -> String {
    format!(
        "{} {} {}",
        hit.category_name, hit.task.name, hit.task.description
    )
    .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn pairs(hits: &[SearchHit<'_>]) -> Vec<(String, String)> {
        hits.iter()
            .map(|h| (h.category_id.to_string(), h.task.id.clone()))
            .collect()
    }

    #[test]
    fn test_empty_query_returns_everything_in_order() {
        let catalog = Catalog::builtin().unwrap();
        for os in OsId::ALL {
            let hits = search(&catalog, os, "");
            assert_eq!(hits.len(), catalog.task_count(os));

            let expected: Vec<(String, String)> = catalog
                .categories_of(os)
                .iter()
                .flat_map(|c| c.tasks.iter().map(move |t| (c.id.clone(), t.id.clone())))
                .collect();
            assert_eq!(pairs(&hits), expected);

            let unique: HashSet<_> = pairs(&hits).into_iter().collect();
            assert_eq!(unique.len(), hits.len());
        }
    }

    #[test]
    fn test_whitespace_query_is_unfiltered() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(
            search(&catalog, OsId::Windows, "   \t").len(),
            catalog.task_count(OsId::Windows)
        );
    }

    #[test]
    fn test_case_insensitive() {
        let catalog = Catalog::builtin().unwrap();
        let upper = pairs(&search(&catalog, OsId::Windows, "DNS"));
        let lower = pairs(&search(&catalog, OsId::Windows, "dns"));
        assert_eq!(upper, lower);
        assert_eq!(upper, [("network".to_string(), "dns_check".to_string())]);
    }

    #[test]
    fn test_disk_on_linux_leads_with_disk_space() {
        let catalog = Catalog::builtin().unwrap();
        let hits = search(&catalog, OsId::Linux, "disk");
        let first = hits.first().unwrap();
        assert!(first.is("disk", "disk_space"));
    }

    #[test]
    fn test_category_name_participates_in_match() {
        let catalog = Catalog::builtin().unwrap();
        let hits = search(&catalog, OsId::Windows, "storage");
        assert_eq!(
            pairs(&hits),
            [
                ("disk".to_string(), "disk_space".to_string()),
                ("disk".to_string(), "check_disk".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_is_trimmed_and_can_span_fields() {
        let catalog = Catalog::builtin().unwrap();
        // "Networking" + " " + "DNS check"
        let hits = search(&catalog, OsId::Linux, "  networking dns  ");
        assert_eq!(pairs(&hits), [("network".to_string(), "dns_check".to_string())]);
    }

    #[test]
    fn test_no_match() {
        let catalog = Catalog::builtin().unwrap();
        assert!(search(&catalog, OsId::Linux, "printer spooler").is_empty());
    }
}
