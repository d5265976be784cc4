// Column sets and query plumbing for the grid-backed list endpoints.
// Products, cart and history all render through the same Grid view-model.

use crate::models::{
    CartItemData, GridQuery, GridResponse, PaginationMeta, ProductData, TransactionData,
};
use crate::table::{Column, Grid};

/// Applies the query to a grid and pages out a response
fn respond<T: Clone>(mut grid: Grid<T>, query: &GridQuery) -> GridResponse<T> {
    grid.apply_query(query);

    let total = grid.total();
    let total_pages = grid.total_pages();
    let rows = grid.page(query.page).into_iter().cloned().collect();

    GridResponse {
        rows,
        pagination: PaginationMeta {
            total,
            page: query.page,
            limit: grid.page_size(),
            total_pages,
        },
    }
}

pub fn product_grid(rows: Vec<ProductData>, query: &GridQuery) -> GridResponse<ProductData> {
    let columns = vec![
        Column {
            id: "name",
            accessor: |p: &ProductData| p.name.clone(),
        },
        Column {
            id: "description",
            accessor: |p: &ProductData| p.description.clone(),
        },
        Column {
            id: "type",
            accessor: |p: &ProductData| p.product_type.clone(),
        },
        Column {
            id: "price",
            accessor: |p: &ProductData| p.price.to_string(),
        },
        Column {
            id: "stock",
            accessor: |p: &ProductData| p.stock.to_string(),
        },
    ];

    let grid = Grid::new(rows, columns).with_categories(|p| p.category.clone());
    respond(grid, query)
}

pub fn cart_grid(rows: Vec<CartItemData>, query: &GridQuery) -> GridResponse<CartItemData> {
    let columns = vec![
        Column {
            id: "name",
            accessor: |c: &CartItemData| {
                c.product.as_ref().map(|p| p.name.clone()).unwrap_or_default()
            },
        },
        Column {
            id: "quantity",
            accessor: |c: &CartItemData| c.quantity.to_string(),
        },
        Column {
            id: "total_price",
            accessor: |c: &CartItemData| c.total_price.to_string(),
        },
    ];

    respond(Grid::new(rows, columns), query)
}

pub fn transaction_grid(
    rows: Vec<TransactionData>,
    query: &GridQuery,
) -> GridResponse<TransactionData> {
    let columns = vec![
        Column {
            id: "name",
            accessor: |t: &TransactionData| {
                t.product.as_ref().map(|p| p.name.clone()).unwrap_or_default()
            },
        },
        Column {
            id: "quantity",
            accessor: |t: &TransactionData| t.quantity.to_string(),
        },
        Column {
            id: "total_price",
            accessor: |t: &TransactionData| t.total_price.to_string(),
        },
        Column {
            id: "transaction_date",
            accessor: |t: &TransactionData| t.transaction_date.clone(),
        },
    ];

    respond(Grid::new(rows, columns), query)
}
