// Generic grid view-model shared by the products, cart and history lists.
// One implementation backs every table: global substring filter, three-state
// single-column sort, category filter, fixed page sizes and multi-select.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::models::GridQuery;

/// Page sizes a grid may be switched between
pub const PAGE_SIZES: [u64; 3] = [10, 25, 50];
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// One column definition: a stable id and an accessor producing the cell's
/// display value
pub struct Column<T> {
    pub id: &'static str,
    pub accessor: fn(&T) -> String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

pub struct Grid<T> {
    rows: Vec<T>,
    columns: Vec<Column<T>>,
    category_of: Option<fn(&T) -> Option<String>>,
    filter: Option<String>,
    category: Option<String>,
    sort: Option<(usize, SortDirection)>,
    page_size: u64,
    selected: BTreeSet<usize>,
    selection_listener: Option<Box<dyn FnMut(&[usize]) + Send>>,
}

impl<T> Grid<T> {
    pub fn new(rows: Vec<T>, columns: Vec<Column<T>>) -> Self {
        Grid {
            rows,
            columns,
            category_of: None,
            filter: None,
            category: None,
            sort: None,
            page_size: DEFAULT_PAGE_SIZE,
            selected: BTreeSet::new(),
            selection_listener: None,
        }
    }

    /// Declares where a row's category comes from, enabling the category
    /// filter and [`Grid::categories`]
    pub fn with_categories(mut self, category_of: fn(&T) -> Option<String>) -> Self {
        self.category_of = Some(category_of);
        self
    }

    /// Sets the global substring filter; empty strings clear it
    pub fn set_filter(&mut self, query: Option<String>) {
        self.filter = query.filter(|q| !q.is_empty());
    }

    /// Sets the category filter; None or "all" shows every category
    pub fn set_category(&mut self, category: Option<String>) {
        self.category = category.filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case("all"));
    }

    /// Sets the sort state directly (query-parameter driven)
    pub fn set_sort(&mut self, column_id: &str, direction: SortDirection) {
        if let Some(index) = self.columns.iter().position(|c| c.id == column_id) {
            self.sort = Some((index, direction));
        }
    }

    /// Switches the page size; values outside the fixed set are ignored
    pub fn set_page_size(&mut self, size: u64) {
        if PAGE_SIZES.contains(&size) {
            self.page_size = size;
        }
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    fn matches_filter(&self, row: &T) -> bool {
        let Some(query) = &self.filter else {
            return true;
        };
        let needle = query.to_lowercase();

        self.columns
            .iter()
            .any(|column| (column.accessor)(row).to_lowercase().contains(&needle))
    }

    fn matches_category(&self, row: &T) -> bool {
        let Some(wanted) = &self.category else {
            return true;
        };
        let Some(category_of) = self.category_of else {
            return true;
        };

        category_of(row).as_deref() == Some(wanted.as_str())
    }

    /// Indices of the rows that survive the filters, in display order
    fn visible_indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..self.rows.len())
            .filter(|&i| {
                let row = &self.rows[i];
                self.matches_filter(row) && self.matches_category(row)
            })
            .collect();

        if let Some((column, direction)) = self.sort {
            let accessor = self.columns[column].accessor;
            indices.sort_by(|&a, &b| {
                let ordering = compare_cells(&accessor(&self.rows[a]), &accessor(&self.rows[b]));
                match direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            });
        }

        indices
    }

    /// Number of rows after filtering (pagination denominator)
    pub fn total(&self) -> u64 {
        self.visible_indices().len() as u64
    }

    pub fn total_pages(&self) -> u64 {
        let total = self.total();
        if total == 0 {
            0
        } else {
            (total + self.page_size - 1) / self.page_size
        }
    }

    /// One page of visible rows, 1-based
    pub fn page(&self, page: u64) -> Vec<&T> {
        let page = page.max(1);
        let start = ((page - 1) * self.page_size) as usize;

        self.visible_indices()
            .into_iter()
            .skip(start)
            .take(self.page_size as usize)
            .map(|i| &self.rows[i])
            .collect()
    }

    /// Applies the query parameters of a grid-backed list endpoint
    pub fn apply_query(&mut self, query: &GridQuery) {
        self.set_filter(query.q.clone());
        self.set_category(query.category.clone());
        self.set_page_size(query.per_page);

        if let Some(column_id) = query.sort.as_deref() {
            match query.dir.as_deref() {
                Some("asc") => self.set_sort(column_id, SortDirection::Ascending),
                Some("desc") => self.set_sort(column_id, SortDirection::Descending),
                _ => {}
            }
        }
    }
}

// Selection and the interactive sort cycle belong to table hosts that own
// their rows; the HTTP layer drives the grid through apply_query instead.
#[allow(dead_code)]
impl<T> Grid<T> {
    /// Registers a callback invoked with the selected row indices on every
    /// selection change
    pub fn on_selection_change(&mut self, listener: Box<dyn FnMut(&[usize]) + Send>) {
        self.selection_listener = Some(listener);
    }

    /// Cycles the sort state of a column: ascending, descending, none
    pub fn toggle_sort(&mut self, column_id: &str) {
        let Some(index) = self.columns.iter().position(|c| c.id == column_id) else {
            return;
        };

        self.sort = match self.sort {
            Some((current, SortDirection::Ascending)) if current == index => {
                Some((index, SortDirection::Descending))
            }
            Some((current, SortDirection::Descending)) if current == index => None,
            _ => Some((index, SortDirection::Ascending)),
        };
    }

    /// Distinct categories present in the data, sorted
    pub fn categories(&self) -> Vec<String> {
        let Some(category_of) = self.category_of else {
            return Vec::new();
        };

        let set: BTreeSet<String> = self.rows.iter().filter_map(category_of).collect();
        set.into_iter().collect()
    }

    /// Rows that survive the filters, in display order
    pub fn visible(&self) -> Vec<&T> {
        self.visible_indices()
            .into_iter()
            .map(|i| &self.rows[i])
            .collect()
    }

    fn notify_selection(&mut self) {
        if let Some(listener) = self.selection_listener.as_mut() {
            let snapshot: Vec<usize> = self.selected.iter().copied().collect();
            listener(&snapshot);
        }
    }

    /// Toggles one row in or out of the selection
    pub fn toggle_select(&mut self, index: usize) {
        if index >= self.rows.len() {
            return;
        }
        if !self.selected.remove(&index) {
            self.selected.insert(index);
        }
        self.notify_selection();
    }

    /// Selects every currently visible row
    pub fn select_all(&mut self) {
        self.selected = self.visible_indices().into_iter().collect();
        self.notify_selection();
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
        self.notify_selection();
    }

    pub fn selected_rows(&self) -> Vec<&T> {
        self.selected.iter().map(|&i| &self.rows[i]).collect()
    }
}

/// Numeric cells sort numerically, everything else case-insensitively
fn compare_cells(a: &str, b: &str) -> Ordering {
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(left), Ok(right)) => left.partial_cmp(&right).unwrap_or(Ordering::Equal),
        _ => a.to_lowercase().cmp(&b.to_lowercase()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        name: &'static str,
        price: f64,
        category: Option<&'static str>,
    }

    fn columns() -> Vec<Column<Row>> {
        vec![
            Column {
                id: "name",
                accessor: |r: &Row| r.name.to_string(),
            },
            Column {
                id: "price",
                accessor: |r: &Row| r.price.to_string(),
            },
        ]
    }

    fn rows() -> Vec<Row> {
        vec![
            Row {
                name: "Oat Milk",
                price: 3.5,
                category: Some("dairy-free"),
            },
            Row {
                name: "Tempeh",
                price: 4.25,
                category: Some("protein"),
            },
            Row {
                name: "Kale",
                price: 2.0,
                category: Some("produce"),
            },
            Row {
                name: "Almond Butter",
                price: 10.0,
                category: Some("pantry"),
            },
        ]
    }

    fn grid() -> Grid<Row> {
        Grid::new(rows(), columns()).with_categories(|r| r.category.map(str::to_string))
    }

    #[test]
    fn filter_is_case_insensitive_across_cells() {
        let mut grid = grid();
        grid.set_filter(Some("OAT".to_string()));

        let visible = grid.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].name, "Oat Milk");

        // Numeric cells are searchable too
        grid.set_filter(Some("4.25".to_string()));
        assert_eq!(grid.visible()[0].name, "Tempeh");
    }

    #[test]
    fn sort_toggle_cycles_three_states() {
        let mut grid = grid();

        grid.toggle_sort("price");
        let ascending: Vec<&str> = grid.visible().iter().map(|r| r.name).collect();
        assert_eq!(ascending, ["Kale", "Oat Milk", "Tempeh", "Almond Butter"]);

        grid.toggle_sort("price");
        let descending: Vec<&str> = grid.visible().iter().map(|r| r.name).collect();
        assert_eq!(descending, ["Almond Butter", "Tempeh", "Oat Milk", "Kale"]);

        // Third toggle restores insertion order
        grid.toggle_sort("price");
        let unsorted: Vec<&str> = grid.visible().iter().map(|r| r.name).collect();
        assert_eq!(unsorted, ["Oat Milk", "Tempeh", "Kale", "Almond Butter"]);
    }

    #[test]
    fn numeric_columns_sort_numerically_not_lexically() {
        let mut grid = grid();
        grid.toggle_sort("price");

        // Lexical ordering would put "10" before "2"
        let prices: Vec<f64> = grid.visible().iter().map(|r| r.price).collect();
        assert_eq!(prices, [2.0, 3.5, 4.25, 10.0]);
    }

    #[test]
    fn category_filter_is_exact_and_all_resets() {
        let mut grid = grid();

        grid.set_category(Some("produce".to_string()));
        assert_eq!(grid.total(), 1);
        assert_eq!(grid.visible()[0].name, "Kale");

        grid.set_category(Some("all".to_string()));
        assert_eq!(grid.total(), 4);
    }

    #[test]
    fn page_size_outside_fixed_set_is_ignored() {
        let mut grid = grid();
        assert_eq!(grid.page_size(), DEFAULT_PAGE_SIZE);

        grid.set_page_size(25);
        assert_eq!(grid.page_size(), 25);

        grid.set_page_size(17);
        assert_eq!(grid.page_size(), 25);
    }

    #[test]
    fn pagination_slices_visible_rows() {
        let many: Vec<Row> = (0..23)
            .map(|i| Row {
                name: Box::leak(format!("item-{:02}", i).into_boxed_str()),
                price: i as f64,
                category: None,
            })
            .collect();

        let mut grid = Grid::new(many, columns());
        grid.set_page_size(10);

        assert_eq!(grid.total(), 23);
        assert_eq!(grid.total_pages(), 3);
        assert_eq!(grid.page(1).len(), 10);
        assert_eq!(grid.page(3).len(), 3);
        assert_eq!(grid.page(3)[0].name, "item-20");
    }

    #[test]
    fn selection_callback_fires_with_full_selected_set() {
        let seen: Arc<Mutex<Vec<Vec<usize>>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let mut grid = grid();
        grid.on_selection_change(Box::new(move |selected| {
            sink.lock().unwrap().push(selected.to_vec());
        }));

        grid.toggle_select(0);
        grid.toggle_select(2);
        grid.toggle_select(0);

        let calls = seen.lock().unwrap();
        assert_eq!(calls.as_slice(), &[vec![0], vec![0, 2], vec![2]]);
    }

    #[test]
    fn select_all_selects_only_visible_rows() {
        let mut grid = grid();
        grid.set_category(Some("protein".to_string()));
        grid.select_all();

        let selected: Vec<&str> = grid.selected_rows().iter().map(|r| r.name).collect();
        assert_eq!(selected, ["Tempeh"]);
    }

    #[test]
    fn categories_are_distinct_and_sorted() {
        let grid = grid();
        assert_eq!(
            grid.categories(),
            ["dairy-free", "pantry", "produce", "protein"]
        );
    }
}
