use comfy_table::{Attribute, Cell, ContentArrangement, Table};
use crossterm::style::Stylize;

use todo_grid::data::column_order::ColumnOrder;
use todo_grid::data::data_view::DataView;

/// Print one page of the derived view as a plain table
pub fn display_page(view: &DataView, columns: &ColumnOrder) {
    if view.filtered_count() == 0 {
        println!("{}", "No matching todos.".yellow());
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(
        columns
            .columns()
            .iter()
            .map(|c| Cell::new(&c.label).add_attribute(Attribute::Bold)),
    );

    for record in view.page_rows() {
        table.add_row(columns.columns().iter().map(|c| record.display(c.id)));
    }

    println!("{table}");
    println!(
        "\n{}",
        format!(
            "page {} of {} ({} matching todos)",
            view.page(),
            view.total_pages(),
            view.filtered_count()
        )
        .green()
    );
}
