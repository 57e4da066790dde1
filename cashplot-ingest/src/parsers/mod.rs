pub mod ing_csv;
