//! Plain text tables.

use colored::Colorize;

use food_index_core::FoodRecord;

const DESCRIPTION_COLUMN: usize = 50;

/// Print a titled food table, or `empty` when there is nothing to show.
/// Returns the number of rows printed.
pub fn print_foods<'a>(
    title: &str,
    empty: &str,
    foods: impl Iterator<Item = &'a FoodRecord>,
) -> usize {
    let mut rows = foods.peekable();
    if rows.peek().is_none() {
        println!("{}", empty.yellow());
        return 0;
    }

    println!();
    println!("{}", format!("=== {} ===", title).bold());
    println!(
        "  {:>4} | {:<width$} | {:>9} | {:>8}",
        "ID",
        "Description",
        "Energy",
        "Protein",
        width = DESCRIPTION_COLUMN
    );
    println!("  {}", "-".repeat(DESCRIPTION_COLUMN + 32));

    let mut count = 0;
    for food in rows {
        println!("{}", format_row(food));
        count += 1;
    }
    println!();
    count
}

pub fn format_row(food: &FoodRecord) -> String {
    format!(
        "  {:>4} | {:<width$} | {:>4} kcal | {:>6.1} g",
        food.id,
        clip(&food.description, DESCRIPTION_COLUMN),
        food.energy_kcal,
        food.protein,
        width = DESCRIPTION_COLUMN
    )
}

/// Cut to `max` characters so long descriptions keep the columns aligned.
fn clip(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
